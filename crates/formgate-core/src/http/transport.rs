use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use tracing::debug;

use super::request::{PreparedRequest, FORM_CONTENT_TYPE};
use super::TransportError;
use crate::form::FormMethod;

/// Status code and raw body text of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx, plus 304 Not Modified.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) || self.status == 304
    }
}

/// Sends prepared requests. Any status is returned as a response; only
/// failures to get a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;
}

/// Transport backed by reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport. With `timeout` unset, requests run until the
    /// connection completes or fails.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn method(method: FormMethod) -> Method {
        match method {
            FormMethod::Get => Method::GET,
            FormMethod::Post => Method::POST,
            FormMethod::Put => Method::PUT,
            FormMethod::Patch => Method::PATCH,
            FormMethod::Delete => Method::DELETE,
            FormMethod::Head => Method::HEAD,
        }
    }
}

/// Strip leading and trailing HTTP whitespace (space, tab, CR, LF) from a
/// header value. The stored credential itself is never modified.
pub fn trim_http_whitespace(value: &str) -> &str {
    value.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "Sending form request");

        let mut builder = self
            .client
            .request(Self::method(request.method), request.url);

        if let Some(token) = request.authorization {
            let value = header::HeaderValue::from_str(trim_http_whitespace(&token))
                .map_err(|_| TransportError::InvalidHeader("Authorization"))?;
            builder = builder.header(header::AUTHORIZATION, value);
        }

        if let Some(body) = request.body {
            builder = builder
                .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
