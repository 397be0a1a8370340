//! Authorization header providers: static Basic credentials and cached OAuth
//! client-credentials tokens.

mod token_store;

use std::fmt;
use std::future;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use url::Url;

use crate::client::http::{
    BoxFuture, HttpRequest, HttpTransport, ReqwestTransport, RequestBody,
};
use crate::client::{RequestContext, ZuoraError};
use crate::domain::{ClientId, ClientSecret};

pub use token_store::{MemoryTokenStore, Token, TokenStore};

const TOKEN_PATH: &str = "oauth/token";

/// Produces the `Authorization` header value for each outgoing request.
///
/// Implement this to plug in credentials the crate does not know about.
pub trait AuthHeaderProvider: Send + Sync {
    fn auth_header<'a>(
        &'a self,
        ctx: &'a RequestContext,
    ) -> BoxFuture<'a, Result<String, ZuoraError>>;
}

#[derive(Clone)]
/// `Authorization: Basic base64(client_id:client_secret)`.
pub struct BasicAuthHeader {
    header: String,
}

impl BasicAuthHeader {
    pub fn new(client_id: &ClientId, client_secret: &ClientSecret) -> Self {
        let credentials = format!("{}:{}", client_id.as_str(), client_secret.as_str());
        Self {
            header: format!("Basic {}", STANDARD.encode(credentials)),
        }
    }
}

impl fmt::Debug for BasicAuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthHeader")
            .field("header", &"[censored]")
            .finish()
    }
}

impl AuthHeaderProvider for BasicAuthHeader {
    fn auth_header<'a>(
        &'a self,
        _ctx: &'a RequestContext,
    ) -> BoxFuture<'a, Result<String, ZuoraError>> {
        Box::pin(future::ready(Ok(self.header.clone())))
    }
}

/// `Authorization: Bearer <token>` with tokens from `POST <base>/oauth/token`.
///
/// Tokens are kept in a [`TokenStore`]. When the cached token is missing or
/// expired, concurrent callers share a single token request.
pub struct OAuthHeader {
    token_url: Url,
    client_id: ClientId,
    client_secret: ClientSecret,
    store: Arc<dyn TokenStore>,
    http: Arc<dyn HttpTransport>,
    refresh: tokio::sync::Mutex<()>,
}

impl OAuthHeader {
    /// Create a provider requesting tokens from `<base_url>/oauth/token`.
    pub fn new(
        base_url: &str,
        client_id: ClientId,
        client_secret: ClientSecret,
        store: Arc<dyn TokenStore>,
        http_client: reqwest::Client,
    ) -> Result<Self, ZuoraError> {
        Ok(Self::with_transport(
            token_url(base_url)?,
            client_id,
            client_secret,
            store,
            Arc::new(ReqwestTransport::new(http_client)),
        ))
    }

    pub(crate) fn with_transport(
        token_url: Url,
        client_id: ClientId,
        client_secret: ClientSecret,
        store: Arc<dyn TokenStore>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            token_url,
            client_id,
            client_secret,
            store,
            http,
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Return the cached token, requesting a new one when it is missing or expired.
    pub async fn token(&self) -> Result<Token, ZuoraError> {
        if let Some(token) = self.store.get() {
            tracing::debug!("using cached zuora token");
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(token) = self.store.get() {
            tracing::debug!("zuora token refreshed by a concurrent request");
            return Ok(token);
        }

        let token = self.request_token().await?;
        self.store.put(token.clone());
        Ok(token)
    }

    async fn request_token(&self) -> Result<Token, ZuoraError> {
        tracing::debug!(url = %self.token_url, "requesting zuora token");
        let request = HttpRequest {
            body: Some(RequestBody::Form(crate::transport::encode_token_form(
                &self.client_id,
                &self.client_secret,
            ))),
            ..HttpRequest::new(Method::POST, self.token_url.clone())
        };

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ZuoraError::Transport)?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "zuora token request failed");
            let message = crate::transport::fallback_message(response.status, &response.body);
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(ZuoraError::HttpStatus {
                status: response.status,
                message,
                body,
            });
        }

        crate::transport::decode_token_json_response(&response.body)
            .map_err(|err| ZuoraError::parse(err, &response.body))
    }
}

impl fmt::Debug for OAuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthHeader")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .finish_non_exhaustive()
    }
}

impl AuthHeaderProvider for OAuthHeader {
    fn auth_header<'a>(
        &'a self,
        _ctx: &'a RequestContext,
    ) -> BoxFuture<'a, Result<String, ZuoraError>> {
        Box::pin(async move {
            let token = self.token().await?;
            Ok(format!("Bearer {}", token.access_token))
        })
    }
}

pub(crate) fn token_url(base_url: &str) -> Result<Url, ZuoraError> {
    let mut base = Url::parse(base_url)
        .map_err(|err| ZuoraError::InvalidUrl(format!("{base_url}: {err}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(TOKEN_PATH)
        .map_err(|err| ZuoraError::InvalidUrl(format!("{base_url}: {err}")))
}
