//! Client layer: builds requests, attaches auth and pass-through headers, and
//! maps responses into typed values or [`ZuoraError`].

mod accounts;
mod actions;
mod billing_documents;
mod catalog;
mod describe;
mod error;
pub(crate) mod http;
mod invoices;
mod payment_methods;
mod payments;
mod products;
mod refunds;
mod subscriptions;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::{AuthHeaderProvider, BasicAuthHeader, MemoryTokenStore, OAuthHeader, TokenStore};
use crate::domain::{ClassifiedError, ClientId, ClientSecret, ValidationError};
use crate::transport::{self, ErrorBody};

pub use accounts::AccountsService;
pub use actions::ActionsService;
pub use billing_documents::BillingDocumentsService;
pub use catalog::{CatalogService, DEFAULT_CATALOG_PAGE_SIZE};
pub use describe::DescribeService;
pub use error::ZuoraError;
pub use http::BoxFuture;
pub use invoices::{DEFAULT_INVOICE_FILES_PAGE_SIZE, InvoicesService};
pub use payment_methods::PaymentMethodsService;
pub use payments::PaymentsService;
pub use products::ProductsService;
pub use refunds::RefundsService;
pub use subscriptions::SubscriptionsService;

use http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody};

/// Default REST endpoint (US production).
pub const DEFAULT_BASE_URL: &str = "https://rest.zuora.com";

/// Port serving the Production Copy Environment on the regular API host.
pub const PCE_PORT: u16 = 19016;

pub const ENTITY_IDS_HEADER: &str = "Zuora-Entity-Ids";
pub const TRACK_ID_HEADER: &str = "Zuora-Track-Id";
pub const VERSION_HEADER: &str = "zuora-version";

#[derive(Debug, Clone)]
/// Credentials used to authorize API calls.
///
/// Use [`Auth::oauth`] for OAuth client credentials (recommended by Zuora),
/// or [`Auth::basic`] for Basic authentication.
pub enum Auth {
    /// `Authorization: Basic ...` on every request.
    Basic {
        client_id: ClientId,
        client_secret: ClientSecret,
    },
    /// Bearer tokens from `/oauth/token`, cached until they expire.
    OAuth {
        client_id: ClientId,
        client_secret: ClientSecret,
    },
}

impl Auth {
    /// Create [`Auth::Basic`] and validate that both parts are non-empty.
    pub fn basic(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::Basic {
            client_id: ClientId::new(client_id)?,
            client_secret: ClientSecret::new(client_secret)?,
        })
    }

    /// Create [`Auth::OAuth`] and validate that both parts are non-empty.
    pub fn oauth(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::OAuth {
            client_id: ClientId::new(client_id)?,
            client_secret: ClientSecret::new(client_secret)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Optional headers forwarded with every request of a scoped client.
///
/// ```
/// use zuora::RequestContext;
///
/// let ctx = RequestContext::new()
///     .with_entity_ids("8a8082e4")
///     .with_track_id("checkout-42");
/// assert_eq!(ctx.track_id(), Some("checkout-42"));
/// ```
pub struct RequestContext {
    entity_ids: Option<String>,
    track_id: Option<String>,
    version: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multi-entity tenants: `Zuora-Entity-Ids`.
    pub fn with_entity_ids(mut self, entity_ids: impl Into<String>) -> Self {
        self.entity_ids = Some(entity_ids.into());
        self
    }

    /// Correlation id echoed in Zuora's logs: `Zuora-Track-Id`.
    pub fn with_track_id(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    /// Minor API version: `zuora-version`.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn entity_ids(&self) -> Option<&str> {
        self.entity_ids.as_deref()
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn headers(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (ENTITY_IDS_HEADER, self.entity_ids()),
            (TRACK_ID_HEADER, self.track_id()),
            (VERSION_HEADER, self.version()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
    }
}

#[derive(Clone)]
/// Builder for [`ZuoraClient`].
///
/// Use this when you need another data center, a timeout, a shared token
/// store or the Production Copy Environment.
pub struct ZuoraClientBuilder {
    auth: Auth,
    auth_provider: Option<Arc<dyn AuthHeaderProvider>>,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    production_copy: bool,
    token_store: Option<Arc<dyn TokenStore>>,
    http_client: Option<reqwest::Client>,
}

impl ZuoraClientBuilder {
    /// Create a builder for the default endpoint with no timeout or user-agent override.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            auth_provider: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
            production_copy: false,
            token_store: None,
            http_client: None,
        }
    }

    /// Override the REST endpoint, e.g. `https://rest.apisandbox.zuora.com`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    ///
    /// Ignored when a client is supplied through [`Self::http_client`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    ///
    /// Ignored when a client is supplied through [`Self::http_client`].
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Send resource requests to the Production Copy Environment
    /// (port 19016 on the base host). Tokens still come from the base URL.
    pub fn production_copy(mut self, enabled: bool) -> Self {
        self.production_copy = enabled;
        self
    }

    /// Share a token store between clients (OAuth only).
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Replace the header provider derived from [`Auth`].
    pub fn auth_provider(mut self, provider: Arc<dyn AuthHeaderProvider>) -> Self {
        self.auth_provider = Some(provider);
        self
    }

    /// Use a preconfigured `reqwest` client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build a [`ZuoraClient`].
    pub fn build(mut self) -> Result<ZuoraClient, ZuoraError> {
        let client = match self.http_client.take() {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent.as_deref() {
                    builder = builder.user_agent(user_agent);
                }
                builder
                    .build()
                    .map_err(|err| ZuoraError::Transport(Box::new(err)))?
            }
        };

        self.build_with_transport(Arc::new(ReqwestTransport::new(client)))
    }

    fn build_with_transport(self, http: Arc<dyn HttpTransport>) -> Result<ZuoraClient, ZuoraError> {
        let base_url = parse_base_url(&self.base_url)?;
        let mut api_url = base_url.clone();
        if self.production_copy {
            api_url.set_port(Some(PCE_PORT)).map_err(|()| {
                ZuoraError::InvalidUrl(format!("{}: cannot set a port", self.base_url))
            })?;
        }

        let auth: Arc<dyn AuthHeaderProvider> = match self.auth_provider {
            Some(provider) => provider,
            None => match self.auth {
                Auth::Basic {
                    client_id,
                    client_secret,
                } => Arc::new(BasicAuthHeader::new(&client_id, &client_secret)),
                Auth::OAuth {
                    client_id,
                    client_secret,
                } => {
                    let store = self
                        .token_store
                        .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));
                    Arc::new(OAuthHeader::with_transport(
                        crate::auth::token_url(base_url.as_str())?,
                        client_id,
                        client_secret,
                        store,
                        Arc::clone(&http),
                    ))
                }
            },
        };

        Ok(ZuoraClient {
            inner: Arc::new(ClientInner {
                api_url,
                auth,
                http,
            }),
            context: RequestContext::default(),
        })
    }
}

impl fmt::Debug for ZuoraClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZuoraClientBuilder")
            .field("auth", &self.auth)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("production_copy", &self.production_copy)
            .finish_non_exhaustive()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ZuoraError> {
    let url = Url::parse(raw.trim()).map_err(|err| ZuoraError::InvalidUrl(format!("{raw}: {err}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ZuoraError::InvalidUrl(format!(
            "{raw}: expected an http(s) base URL"
        )));
    }
    Ok(url)
}

struct ClientInner {
    api_url: Url,
    auth: Arc<dyn AuthHeaderProvider>,
    http: Arc<dyn HttpTransport>,
}

#[derive(Clone)]
/// High-level Zuora REST client.
///
/// Cloning is cheap. Resource handles ([`ZuoraClient::accounts`],
/// [`ZuoraClient::subscriptions`], ...) borrow the client and share its
/// token cache.
pub struct ZuoraClient {
    inner: Arc<ClientInner>,
    context: RequestContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether a 2xx body is checked for `success: false`.
pub(crate) enum Envelope {
    Checked,
    Unchecked,
}

impl ZuoraClient {
    /// Create a client for [`DEFAULT_BASE_URL`].
    ///
    /// For more customization, use [`ZuoraClient::builder`].
    pub fn new(auth: Auth) -> Result<Self, ZuoraError> {
        Self::builder(auth).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(auth: Auth) -> ZuoraClientBuilder {
        ZuoraClientBuilder::new(auth)
    }

    /// A client sending `ctx` headers with every request. Shares connections
    /// and tokens with `self`.
    pub fn with_context(&self, ctx: RequestContext) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            context: ctx,
        }
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Base URL of resource requests (includes the PCE port when enabled).
    pub fn api_url(&self) -> &Url {
        &self.inner.api_url
    }

    pub fn accounts(&self) -> AccountsService<'_> {
        AccountsService::new(self)
    }

    pub fn subscriptions(&self) -> SubscriptionsService<'_> {
        SubscriptionsService::new(self)
    }

    pub fn products(&self) -> ProductsService<'_> {
        ProductsService::new(self)
    }

    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self)
    }

    pub fn invoices(&self) -> InvoicesService<'_> {
        InvoicesService::new(self)
    }

    pub fn payments(&self) -> PaymentsService<'_> {
        PaymentsService::new(self)
    }

    pub fn payment_methods(&self) -> PaymentMethodsService<'_> {
        PaymentMethodsService::new(self)
    }

    pub fn refunds(&self) -> RefundsService<'_> {
        RefundsService::new(self)
    }

    pub fn billing_documents(&self) -> BillingDocumentsService<'_> {
        BillingDocumentsService::new(self)
    }

    pub fn actions(&self) -> ActionsService<'_> {
        ActionsService::new(self)
    }

    pub fn describe(&self) -> DescribeService<'_> {
        DescribeService::new(self)
    }

    /// `<api_url>/<segments...>`, each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ZuoraError> {
        let mut url = self.inner.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| ZuoraError::InvalidUrl(self.inner.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `<api_url><uri>` for pagination links returned by Zuora.
    pub(crate) fn relative(&self, uri: &str) -> Result<Url, ZuoraError> {
        let uri = uri.trim();
        let base = self.inner.api_url.as_str().trim_end_matches('/');
        let joined = if uri.starts_with('/') {
            format!("{base}{uri}")
        } else {
            format!("{base}/{uri}")
        };
        Url::parse(&joined).map_err(|err| ZuoraError::InvalidUrl(format!("{joined}: {err}")))
    }

    pub(crate) fn json_body<P: Serialize + ?Sized>(payload: &P) -> Result<RequestBody, ZuoraError> {
        serde_json::to_string(payload)
            .map(RequestBody::Json)
            .map_err(ZuoraError::Encode)
    }

    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<RequestBody>,
        envelope: Envelope,
    ) -> Result<T, ZuoraError> {
        let response = self.execute(method, url, body).await?;

        if envelope == Envelope::Checked && transport::reports_failure(&response.body) {
            let classified = classify_failure(&response.body);
            tracing::warn!(
                status = classified.status,
                message = %classified.message,
                "zuora reported success: false"
            );
            return Err(ZuoraError::api(
                classified,
                response.status,
                &response.body,
            ));
        }

        transport::decode_json_response(&response.body)
            .map_err(|err| ZuoraError::parse(err, &response.body))
    }

    pub(crate) async fn request_text(
        &self,
        method: Method,
        url: Url,
    ) -> Result<String, ZuoraError> {
        Ok(self.execute(method, url, None).await?.body)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<RequestBody>,
    ) -> Result<HttpResponse, ZuoraError> {
        let auth = self.inner.auth.auth_header(&self.context).await?;

        let mut request = HttpRequest::new(method, url).header(AUTHORIZATION.as_str(), auth);
        for (name, value) in self.context.headers() {
            request = request.header(name, value);
        }
        request.body = body;

        tracing::debug!(method = %request.method, url = %request.url, "sending zuora request");
        let response = self
            .inner
            .http
            .execute(request)
            .await
            .map_err(ZuoraError::Transport)?;

        if !response.is_success() {
            let err = error_from_response(response);
            tracing::warn!(status = ?err.status(), error = %err, "zuora request failed");
            return Err(err);
        }
        Ok(response)
    }
}

impl fmt::Debug for ZuoraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZuoraClient")
            .field("api_url", &self.inner.api_url.as_str())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

fn error_from_response(response: HttpResponse) -> ZuoraError {
    match transport::decode_error_body(&response.body) {
        Some(ErrorBody { reasons, .. }) if !reasons.is_empty() => {
            ZuoraError::api(
                ClassifiedError::from_reasons(&reasons),
                response.status,
                &response.body,
            )
        }
        _ => {
            let message = transport::fallback_message(response.status, &response.body);
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            ZuoraError::HttpStatus {
                status: response.status,
                message,
                body,
            }
        }
    }
}

fn classify_failure(body: &str) -> ClassifiedError {
    match transport::decode_error_body(body) {
        Some(ErrorBody { reasons, .. }) if !reasons.is_empty() => {
            ClassifiedError::from_reasons(&reasons)
        }
        Some(ErrorBody {
            failure: Some(message),
            ..
        })
        | Some(ErrorBody {
            detail: Some(message),
            ..
        }) => ClassifiedError::from_status(crate::domain::STATUS_BAD_REQUEST, message),
        _ => ClassifiedError::from_reasons(&[]),
    }
}
