//! The permission client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method, Request};
use permission_sdk::{
    AuthorizeRequest, AuthorizeResponse, DiscoveryApi, PermissionApi, PermissionError,
    RequestOptions,
};
use secrecy::ExposeSecret;

use crate::config::PermissionClientConfig;
use crate::protocol::{self, CorrelationIdGenerator, UuidV4Ids};
use crate::transport::{self, HttpTransport, HyperTransport};

/// Sends batched authorization requests to the permission backend.
///
/// Holds no per-call state; a single instance can be shared across tasks.
pub struct PermissionClient {
    discovery: Arc<dyn DiscoveryApi>,
    transport: Arc<dyn HttpTransport>,
    ids: Arc<dyn CorrelationIdGenerator>,
    config: PermissionClientConfig,
}

impl PermissionClient {
    /// Client backed by [`HyperTransport`] with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        discovery: Arc<dyn DiscoveryApi>,
        config: PermissionClientConfig,
    ) -> Result<Self, PermissionError> {
        let transport = HyperTransport::new(config.request_timeout())?;
        Ok(Self::with_transport(discovery, Arc::new(transport), config))
    }

    #[must_use]
    pub fn with_transport(
        discovery: Arc<dyn DiscoveryApi>,
        transport: Arc<dyn HttpTransport>,
        config: PermissionClientConfig,
    ) -> Self {
        Self {
            discovery,
            transport,
            ids: Arc::new(UuidV4Ids),
            config,
        }
    }

    /// Replace the correlation id source.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn CorrelationIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PermissionClientConfig {
        &self.config
    }

    /// Check a batch of permissions in one request.
    ///
    /// Responses are returned in the order of `requests`. An empty batch is
    /// still sent. An empty token is treated as no token.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::Discovery`] / [`PermissionError::InvalidUrl`] if the
    ///   endpoint cannot be resolved
    /// - [`PermissionError::Transport`] if no response was received
    /// - [`PermissionError::RequestFailed`] on a non-success status
    /// - [`PermissionError::MalformedResponse`] if a request has no valid answer
    #[tracing::instrument(
        skip_all,
        fields(
            plugin_id = %self.config.plugin_id,
            batch_size = requests.len(),
            status = tracing::field::Empty
        )
    )]
    pub async fn authorize(
        &self,
        requests: &[AuthorizeRequest],
        options: &RequestOptions,
    ) -> Result<Vec<AuthorizeResponse>, PermissionError> {
        let identified = protocol::identify(requests, self.ids.as_ref());
        let url = self.endpoint().await?;
        let body = serde_json::to_vec(&identified)?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(url.as_str())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = options
            .token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
        {
            builder = builder.header(AUTHORIZATION, transport::bearer(token)?);
        }
        let request = builder
            .body(Bytes::from(body))
            .map_err(|e| PermissionError::InvalidUrl(e.to_string()))?;

        let response = self.transport.send(request).await?;
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());

        if !status.is_success() {
            let body = String::from_utf8_lossy(response.body()).into_owned();
            tracing::warn!(status = status.as_u16(), "permission request failed");
            return Err(PermissionError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let accepted = protocol::decode_responses(response.body());
        protocol::correlate(identified.iter().map(|r| r.id.as_str()), accepted)
    }

    async fn endpoint(&self) -> Result<url::Url, PermissionError> {
        let base = self.discovery.base_url(&self.config.plugin_id).await?;
        let path = &self.config.authorize_path;
        let sep = if path.starts_with('/') { "" } else { "/" };
        let raw = format!("{base}{sep}{path}");
        url::Url::parse(&raw).map_err(|e| PermissionError::InvalidUrl(format!("{raw}: {e}")))
    }
}

impl fmt::Debug for PermissionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionClient")
            .field("config", &self.config)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PermissionApi for PermissionClient {
    async fn authorize(
        &self,
        requests: &[AuthorizeRequest],
        options: &RequestOptions,
    ) -> Result<Vec<AuthorizeResponse>, PermissionError> {
        PermissionClient::authorize(self, requests, options).await
    }
}
