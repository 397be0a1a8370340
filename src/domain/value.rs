use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// OAuth / Basic client id issued by Zuora.
///
/// Invariant: non-empty after trimming.
pub struct ClientId(String);

impl ClientId {
    /// Form field name used by the token endpoint (`client_id`).
    pub const FIELD: &'static str = "client_id";

    /// Create a validated [`ClientId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated client id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Client secret paired with a [`ClientId`].
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
/// The value never appears in `Debug` output.
pub struct ClientSecret(String);

impl ClientSecret {
    /// Form field name used by the token endpoint (`client_secret`).
    pub const FIELD: &'static str = "client_secret";

    /// Create a validated [`ClientSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret([censored])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Account number or account id, accepted wherever Zuora documents an `account-key`.
///
/// Invariant: non-empty after trimming.
pub struct AccountKey(String);

impl AccountKey {
    pub const FIELD: &'static str = "accountKey";

    /// Create a validated [`AccountKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Subscription number or subscription id.
///
/// Invariant: non-empty after trimming.
pub struct SubscriptionKey(String);

impl SubscriptionKey {
    pub const FIELD: &'static str = "subscriptionKey";

    /// Create a validated [`SubscriptionKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Internal object id assigned by Zuora (CRUD `/v1/object/...` endpoints).
///
/// Invariant: non-empty after trimming.
pub struct ObjectId(String);

impl ObjectId {
    pub const FIELD: &'static str = "id";

    /// Create a validated [`ObjectId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Zuora object type name used by the describe endpoint (`Account`, `Product`, ...).
///
/// Invariant: non-empty after trimming, no whitespace or `/` inside.
pub struct ObjectName(String);

impl ObjectName {
    pub const FIELD: &'static str = "object";

    pub const ACCOUNT: &'static str = "Account";
    pub const PRODUCT: &'static str = "Product";
    pub const PRODUCT_RATE_PLAN: &'static str = "ProductRatePlan";
    pub const PRODUCT_RATE_PLAN_CHARGE: &'static str = "ProductRatePlanCharge";
    pub const SUBSCRIPTION: &'static str = "Subscription";
    pub const INVOICE: &'static str = "Invoice";
    pub const PAYMENT: &'static str = "Payment";
    pub const REFUND: &'static str = "Refund";

    /// Create a validated [`ObjectName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(ValidationError::InvalidIdentifier {
                field: Self::FIELD,
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// `pageSize` query parameter for paginated endpoints.
///
/// Invariant: `1..=40`.
pub struct PageSize(u32);

impl PageSize {
    /// Query parameter name (`pageSize`).
    pub const FIELD: &'static str = "pageSize";

    pub const MIN: u32 = 1;
    pub const MAX: u32 = 40;

    /// Create a validated [`PageSize`].
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub(crate) const fn new_unchecked(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}
