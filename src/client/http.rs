//! Minimal HTTP seam between the client and `reqwest`, replaceable in tests.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use url::Url;

/// Boxed `Send` future returned by object-safe async traits in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub(crate) type TransportResult = Result<HttpResponse, Box<dyn StdError + Send + Sync>>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequestBody {
    Json(String),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
}

impl HttpRequest {
    pub(crate) fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl HttpResponse {
    pub(crate) fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

pub(crate) trait HttpTransport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub(crate) fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> BoxFuture<'_, TransportResult> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method, request.url);
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            builder = match request.body {
                Some(RequestBody::Json(body)) => {
                    builder.header(CONTENT_TYPE, "application/json").body(body)
                }
                Some(RequestBody::Form(params)) => builder.form(&params),
                None => builder,
            };

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}
