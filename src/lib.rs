//! Typed async client for the Zuora billing REST API.
//!
//! The crate is layered like this: a domain layer of validated types,
//! request/response models, reason-code classification and a ZOQL builder;
//! a transport layer for wire-format quirks (JSON envelopes, OAuth form,
//! describe XML); an auth layer producing `Authorization` headers; and a small
//! client layer orchestrating requests per resource.
//!
//! ```rust,no_run
//! use zuora::{AccountKey, Auth, RequestContext, ZoqlQuery, ZuoraClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), zuora::ZuoraError> {
//!     let client = ZuoraClient::builder(Auth::oauth("client-id", "client-secret")?)
//!         .base_url("https://rest.apisandbox.zuora.com")
//!         .build()?;
//!
//!     let account = client
//!         .accounts()
//!         .get(&AccountKey::new("A00000001")?)
//!         .await?;
//!     println!("{:?}", account.basic_info.name);
//!
//!     let scoped = client.with_context(RequestContext::new().with_track_id("sync-1"));
//!     let query = ZoqlQuery::fields(["Id", "Name"]).from("Product");
//!     let products = scoped.actions().query(&query).await?;
//!     println!("{} products", products.size);
//!     Ok(())
//! }
//! ```
//!
//! Failures come back as [`ZuoraError`]; [`ZuoraError::is_retryable`] tells
//! whether a retry may help. The crate never retries by itself.
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod domain;
mod transport;

pub use auth::{
    AuthHeaderProvider, BasicAuthHeader, MemoryTokenStore, OAuthHeader, Token, TokenStore,
};
pub use client::{
    Auth, BoxFuture, DEFAULT_BASE_URL, PCE_PORT, RequestContext, ZuoraClient, ZuoraClientBuilder,
    ZuoraError,
};
pub use domain::{
    AccountKey, ClassifiedError, ClientId, ClientSecret, ErrorReason, ObjectId, ObjectName,
    PageSize, ReasonCategory, SubscriptionKey, ValidationError, ZoqlQuery, is_retryable_status,
};
