//! Reason-code classification: maps Zuora error reasons to an HTTP-equivalent
//! status, a message and retryability.

use serde::Deserialize;

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_REQUEST_TIMEOUT: u16 = 408;
pub const STATUS_LOCKED: u16 = 423;
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;
pub const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

/// Statuses a caller may retry unchanged.
///
/// Both the plain status check and the reason-based classification go through
/// [`is_retryable_status`], so this is the only copy of the set.
pub const RETRYABLE_STATUSES: [u16; 4] = [
    STATUS_REQUEST_TIMEOUT,
    STATUS_TOO_MANY_REQUESTS,
    STATUS_INTERNAL_SERVER_ERROR,
    STATUS_SERVICE_UNAVAILABLE,
];

/// Returns `true` for 408, 429, 500 and 503.
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// A single `{code, message}` entry of a Zuora `reasons` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorReason {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl ErrorReason {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ReasonCategory {
        ReasonCategory::from_code(self.code)
    }
}

/// Category encoded in the last two digits of a reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCategory {
    Unknown,
    AccessDenied,
    AuthFailed,
    InvalidFormat,
    UnknownField,
    RequiredField,
    RuleRestriction,
    NotFound,
    LockingContention,
    InternalError,
    RequestExceeded,
    MalformedRequest,
    ExtensionError,
    /// A remainder Zuora does not document.
    Other(u8),
}

impl ReasonCategory {
    pub fn from_code(code: i64) -> Self {
        // rem_euclid keeps negative codes in 0..100.
        let tag = code.rem_euclid(100) as u8;
        match tag {
            0 => Self::Unknown,
            10 => Self::AccessDenied,
            11 => Self::AuthFailed,
            20 => Self::InvalidFormat,
            21 => Self::UnknownField,
            22 => Self::RequiredField,
            30 => Self::RuleRestriction,
            40 => Self::NotFound,
            50 => Self::LockingContention,
            60 => Self::InternalError,
            70 => Self::RequestExceeded,
            90 => Self::MalformedRequest,
            99 => Self::ExtensionError,
            other => Self::Other(other),
        }
    }

    /// Precedence rank used when several categories are present (lower wins).
    fn rank(self) -> Option<(u8, u16)> {
        match self {
            Self::RequestExceeded => Some((0, STATUS_TOO_MANY_REQUESTS)),
            Self::AuthFailed => Some((1, STATUS_UNAUTHORIZED)),
            Self::AccessDenied => Some((2, STATUS_FORBIDDEN)),
            Self::NotFound => Some((3, STATUS_NOT_FOUND)),
            Self::LockingContention => Some((4, STATUS_LOCKED)),
            Self::InternalError => Some((5, STATUS_INTERNAL_SERVER_ERROR)),
            _ => None,
        }
    }
}

/// Picks one HTTP-equivalent status for a set of reasons.
///
/// The result does not depend on the order of `reasons`: a rate-limit reason
/// yields 429 even when listed after validation errors. Anything without a
/// mapped category (including an empty list) is 400.
pub fn classify_reasons(reasons: &[ErrorReason]) -> u16 {
    reasons
        .iter()
        .filter_map(|reason| reason.category().rank())
        .min_by_key(|(rank, _)| *rank)
        .map_or(STATUS_BAD_REQUEST, |(_, status)| status)
}

/// Renders reasons as `code: <n> message: <lowercased>` joined by ` || `.
pub fn format_reasons(reasons: &[ErrorReason]) -> String {
    reasons
        .iter()
        .map(|reason| {
            format!(
                "code: {} message: {}",
                reason.code,
                reason.message.to_lowercase()
            )
        })
        .collect::<Vec<_>>()
        .join(" || ")
}

/// Normalized, retry-aware view of a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub status: u16,
    pub message: String,
    pub retryable: bool,
}

impl ClassifiedError {
    pub fn from_reasons(reasons: &[ErrorReason]) -> Self {
        let status = classify_reasons(reasons);
        let message = if reasons.is_empty() {
            "zuora reported a failure without reasons".to_owned()
        } else {
            format_reasons(reasons)
        };
        Self {
            status,
            message,
            retryable: is_retryable_status(status),
        }
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            retryable: is_retryable_status(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(408)]
    #[test_case(429)]
    #[test_case(500)]
    #[test_case(503)]
    fn retryable(status: u16) {
        assert!(is_retryable_status(status));
    }

    #[test_case(200)]
    #[test_case(400)]
    #[test_case(401)]
    #[test_case(404)]
    #[test_case(423)]
    #[test_case(502)]
    #[test_case(504)]
    fn non_retryable(status: u16) {
        assert!(!is_retryable_status(status));
    }

    #[test_case(53100020, ReasonCategory::InvalidFormat)]
    #[test_case(53100370, ReasonCategory::RequestExceeded)]
    #[test_case(50000011, ReasonCategory::AuthFailed)]
    #[test_case(58730040, ReasonCategory::NotFound)]
    #[test_case(53100199, ReasonCategory::ExtensionError)]
    #[test_case(53100045, ReasonCategory::Other(45))]
    fn category_from_code(code: i64, expected: ReasonCategory) {
        assert_eq!(ReasonCategory::from_code(code), expected);
    }

    #[test]
    fn request_exceeded_wins_regardless_of_position() {
        let exceeded = ErrorReason::new(53100370, "b");
        let others = [
            ErrorReason::new(53100020, "a"),
            ErrorReason::new(53100011, "auth"),
            ErrorReason::new(53100040, "missing"),
            ErrorReason::new(53100060, "boom"),
        ];

        for position in 0..=others.len() {
            let mut reasons = others.to_vec();
            reasons.insert(position, exceeded.clone());
            assert_eq!(classify_reasons(&reasons), 429, "position {position}");
        }
    }

    #[test]
    fn precedence_order_is_applied() {
        let auth = ErrorReason::new(11, "");
        let denied = ErrorReason::new(10, "");
        let missing = ErrorReason::new(40, "");
        let locked = ErrorReason::new(50, "");
        let internal = ErrorReason::new(60, "");

        assert_eq!(classify_reasons(&[denied.clone(), auth.clone()]), 401);
        assert_eq!(classify_reasons(&[missing.clone(), denied]), 403);
        assert_eq!(classify_reasons(&[locked.clone(), missing]), 404);
        assert_eq!(classify_reasons(&[internal.clone(), locked]), 423);
        assert_eq!(classify_reasons(&[internal]), 500);
        assert_eq!(classify_reasons(&[ErrorReason::new(22, "")]), 400);
        assert_eq!(classify_reasons(&[]), 400);
    }

    #[test]
    fn mixed_validation_and_rate_limit_is_retryable_429() {
        let reasons = [
            ErrorReason::new(53100020, " {com.zuora.constraints.either_or_both}"),
            ErrorReason::new(
                53100370,
                "'termType' value should be one of: TERMED, EVERGREEN",
            ),
        ];
        let classified = ClassifiedError::from_reasons(&reasons);
        assert_eq!(classified.status, 429);
        assert!(classified.retryable);
        assert_eq!(
            classified.message,
            "code: 53100020 message:  {com.zuora.constraints.either_or_both} || \
             code: 53100370 message: 'termtype' value should be one of: termed, evergreen"
        );
    }

    #[test]
    fn locking_contention_is_not_retryable() {
        let classified = ClassifiedError::from_reasons(&[ErrorReason::new(50, "locked")]);
        assert_eq!(classified.status, 423);
        assert!(!classified.retryable);
    }
}
