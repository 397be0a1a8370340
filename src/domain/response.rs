//! Response models.
//!
//! Only commonly used fields are typed. Everything else, including tenant
//! custom fields, lands in the flattened `extra` map unchanged.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub work_email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBasicInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// `GET /v1/accounts/{key}`.
pub struct AccountDetail {
    pub basic_info: AccountBasicInfo,
    #[serde(default)]
    pub bill_to_contact: Option<Contact>,
    #[serde(default)]
    pub sold_to_contact: Option<Contact>,
    #[serde(default)]
    pub billing_and_payment: Option<Value>,
    #[serde(default)]
    pub metrics: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// `GET /v1/accounts/{key}/summary`.
pub struct AccountSummary {
    pub basic_info: AccountBasicInfo,
    #[serde(default)]
    pub bill_to_contact: Option<Contact>,
    #[serde(default)]
    pub sold_to_contact: Option<Contact>,
    #[serde(default)]
    pub subscriptions: Vec<Value>,
    #[serde(default)]
    pub invoices: Vec<Value>,
    #[serde(default)]
    pub payments: Vec<Value>,
    #[serde(default)]
    pub usage: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// CRUD `Account` object (`GET /v1/object/account/{id}`).
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub bill_cycle_day: Option<u8>,
    #[serde(default)]
    pub auto_pay: Option<bool>,
    #[serde(default)]
    pub payment_term: Option<String>,
    #[serde(default)]
    pub crm_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// Result of CRUD create/update calls (`{"Success": true, "Id": "..."}`).
pub struct ObjectWriteResponse {
    #[serde(default)]
    pub success: bool,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub subscription_number: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub term_type: Option<String>,
    #[serde(default)]
    pub auto_renew: Option<bool>,
    #[serde(default)]
    pub term_start_date: Option<String>,
    #[serde(default)]
    pub term_end_date: Option<String>,
    #[serde(default)]
    pub contract_effective_date: Option<String>,
    #[serde(default)]
    pub rate_plans: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// `GET /v1/subscriptions/accounts/{key}`.
pub struct SubscriptionList {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdateResponse {
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub total_delta_mrr: Option<f64>,
    #[serde(default)]
    pub total_delta_tcv: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCancellationResponse {
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub cancelled_date: Option<String>,
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub credit_memo_id: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub paid_amount: Option<f64>,
    #[serde(default)]
    pub total_delta_mrr: Option<f64>,
    #[serde(default)]
    pub total_delta_tcv: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// CRUD `Product` object.
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "SKU")]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub effective_start_date: Option<String>,
    #[serde(default)]
    pub effective_end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRatePlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_rate_plan_charges: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub effective_start_date: Option<String>,
    #[serde(default)]
    pub effective_end_date: Option<String>,
    #[serde(default)]
    pub product_rate_plans: Vec<CatalogRatePlan>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One page of `GET /v1/catalog/products`.
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
    /// Relative URI of the next page, if any.
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// CRUD `Invoice` object.
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFile {
    pub id: String,
    pub version_number: i64,
    pub pdf_file_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// PDF files of an invoice, newest version first.
pub struct InvoiceFiles {
    #[serde(default)]
    pub invoice_files: Vec<InvoiceFile>,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// CRUD `Payment` object.
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub payment_number: Option<String>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "Type")]
    pub payment_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// CRUD `PaymentMethod` object, also returned for payment method snapshots.
pub struct PaymentMethod {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default, rename = "Type")]
    pub method_type: Option<String>,
    #[serde(default)]
    pub payment_method_status: Option<String>,
    #[serde(default)]
    pub credit_card_type: Option<String>,
    #[serde(default)]
    pub credit_card_mask_number: Option<String>,
    #[serde(default)]
    pub credit_card_expiration_month: Option<u8>,
    #[serde(default)]
    pub credit_card_expiration_year: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDocument {
    pub id: String,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub document_date: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDocuments {
    #[serde(default)]
    pub documents: Vec<BillingDocument>,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Rows returned by the query action.
pub struct QueryResult<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub done: bool,
    /// Present when more than one batch of rows exists.
    #[serde(default)]
    pub query_locator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
/// Per-object outcome of the create action.
pub struct ActionSaveResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub errors: Vec<ActionError>,
}
