use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::value::{AccountKey, ObjectId};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Body of `PUT /v1/subscriptions/{key}`.
///
/// Covers both the minimal form (terms, renewal, notes) and the full form with
/// rate plan `add` / `update` / `remove` amendments. Tenant custom fields
/// (`Field__c`) go into `custom_fields`.
pub struct SubscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_term: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_term_period_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_setting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_term: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_term_period_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_billing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<RatePlanAdd>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub update: Vec<RatePlanUpdate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<RatePlanRemove>,
    #[serde(flatten)]
    pub custom_fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePlanAdd {
    pub product_rate_plan_id: String,
    pub contract_effective_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_acceptance_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_activation_date: Option<String>,
    /// Free-form charge overrides, passed through unchanged.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub charge_overrides: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePlanUpdate {
    pub rate_plan_id: String,
    pub contract_effective_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_update_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub charge_update_details: Vec<ChargeUpdateDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeUpdateDetail {
    pub rate_plan_charge_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePlanRemove {
    pub rate_plan_id: String,
    pub contract_effective_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CancellationPolicy {
    EndOfCurrentTerm,
    EndOfLastInvoicePeriod,
    SpecificDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Body of `PUT /v1/subscriptions/{key}/cancel`.
pub struct SubscriptionCancellation {
    pub cancellation_policy: CancellationPolicy,
    /// Required when the policy is [`CancellationPolicy::SpecificDate`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_effective_date: Option<String>,
    pub invoice_collect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_credit_balance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_billing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_date: Option<String>,
}

impl SubscriptionCancellation {
    pub fn new(policy: CancellationPolicy) -> Self {
        Self {
            cancellation_policy: policy,
            cancellation_effective_date: None,
            invoice_collect: false,
            apply_credit_balance: None,
            collect: None,
            invoice: None,
            run_billing: None,
            target_date: None,
            document_date: None,
        }
    }

    /// Cancel on a given date (`yyyy-mm-dd`).
    pub fn on_date(date: impl Into<String>) -> Self {
        Self {
            cancellation_effective_date: Some(date.into()),
            ..Self::new(CancellationPolicy::SpecificDate)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RefundType {
    Electronic,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum RefundReasonCode {
    #[serde(rename = "Customer Satisfaction")]
    CustomerSatisfaction,
    Chargeback,
    #[serde(rename = "Payment Reversal")]
    PaymentReversal,
    /// A reason code configured on the tenant.
    #[serde(untagged)]
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayOptionData {
    pub gateway_option: Vec<GatewayOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RefundInvoicePayment {
    pub invoice_id: String,
    pub refund_amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RefundInvoicePaymentData {
    pub refund_invoice_payment: Vec<RefundInvoicePayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
/// Body of `POST /v1/object/refund`.
pub struct RefundCreate {
    /// Only for non-referenced refunds; Zuora derives it from the payment otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_option_data: Option<GatewayOptionData>,
    /// Required for external refunds (`Check`, `Cash`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_type: Option<String>,
    pub payment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<RefundReasonCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_invoice_payment_data: Option<RefundInvoicePaymentData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_descriptor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_descriptor_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(rename = "Type")]
    pub refund_type: RefundType,
}

impl RefundCreate {
    pub fn new(payment_id: &ObjectId, amount: f64, refund_type: RefundType) -> Self {
        Self {
            account_id: None,
            amount,
            comment: None,
            gateway_option_data: None,
            method_type: None,
            payment_id: payment_id.as_str().to_owned(),
            reason_code: None,
            refund_date: None,
            refund_invoice_payment_data: None,
            soft_descriptor: None,
            soft_descriptor_phone: None,
            source_type: None,
            refund_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Body of `POST /v1/action/create`: up to 50 objects of one type.
pub struct ActionCreate {
    #[serde(rename = "type")]
    pub object_type: String,
    pub objects: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Query parameters for `GET /v1/billing-documents`.
pub struct BillingDocumentsQuery {
    pub account_id: AccountKey,
    pub document_date: Option<String>,
    pub status: Option<String>,
}

impl BillingDocumentsQuery {
    pub fn for_account(account_id: AccountKey) -> Self {
        Self {
            account_id,
            document_date: None,
            status: None,
        }
    }

    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("accountId".to_owned(), self.account_id.as_str().to_owned())];
        if let Some(date) = &self.document_date {
            params.push(("documentDate".to_owned(), date.clone()));
        }
        if let Some(status) = &self.status {
            params.push(("status".to_owned(), status.clone()));
        }
        params
    }
}
