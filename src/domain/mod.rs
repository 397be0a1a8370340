//! Domain layer: strong types, request/response models and error classification (no I/O).

mod describe;
mod reason;
mod request;
mod response;
mod validation;
mod value;
pub mod zoql;

pub use describe::{DescribedField, DescribedObject};
pub use reason::{
    ClassifiedError, ErrorReason, RETRYABLE_STATUSES, ReasonCategory, classify_reasons,
    format_reasons, is_retryable_status,
};
pub use request::{
    ActionCreate, BillingDocumentsQuery, CancellationPolicy, ChargeUpdateDetail, GatewayOption,
    GatewayOptionData, RatePlanAdd, RatePlanRemove, RatePlanUpdate, RefundCreate,
    RefundInvoicePayment, RefundInvoicePaymentData, RefundReasonCode, RefundType,
    SubscriptionCancellation, SubscriptionUpdate,
};
pub use response::{
    Account, AccountBasicInfo, AccountDetail, AccountSummary, ActionError, ActionSaveResult,
    BillingDocument, BillingDocuments, CatalogPage, CatalogProduct, CatalogRatePlan, Contact,
    Invoice, InvoiceFile, InvoiceFiles, ObjectWriteResponse, Payment, PaymentMethod, Product,
    QueryResult, Subscription, SubscriptionCancellationResponse, SubscriptionList,
    SubscriptionUpdateResponse,
};
pub use validation::ValidationError;
pub use value::{
    AccountKey, ClientId, ClientSecret, ObjectId, ObjectName, PageSize, SubscriptionKey,
};
pub use zoql::{Condition, Conjunction, ZoqlQuery, ZoqlSelect};

pub(crate) use reason::{STATUS_BAD_REQUEST, STATUS_NOT_FOUND, STATUS_UNAUTHORIZED};
