//! HTTP transport used by the permission client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderValue, Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use permission_sdk::PermissionError;
use secrecy::{ExposeSecret, SecretString};

/// Sends one fully-buffered request and returns the fully-buffered response.
///
/// Implementations must not retry. Any failure to obtain a complete response
/// (connect error, timeout, truncated body) is a [`PermissionError::Transport`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the exchange.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::Transport`] if no complete response was received.
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, PermissionError>;
}

/// `Authorization` header value for `token`, marked sensitive.
pub(crate) fn bearer(token: &SecretString) -> Result<HeaderValue, PermissionError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| {
            PermissionError::Serialization("bearer token is not a valid header value".to_owned())
        })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Transport backed by the hyper-util pooled client (HTTP/1.1, rustls for `https`).
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
}

impl HyperTransport {
    /// Build a transport whose exchanges are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::Transport`] if the TLS configuration cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, PermissionError> {
        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::aws_lc_rs::default_provider())
            .map_err(|e| PermissionError::Transport(format!("tls setup failed: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client, timeout })
    }
}

impl fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpTransport for HyperTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, PermissionError> {
        let request = request.map(Full::new);
        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| PermissionError::Transport(e.to_string()))?;
            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| PermissionError::Transport(e.to_string()))?
                .to_bytes();
            Ok::<_, PermissionError>(Response::from_parts(parts, body))
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                PermissionError::Transport(format!(
                    "request timed out after {}ms",
                    self.timeout.as_millis()
                ))
            })?
    }
}
