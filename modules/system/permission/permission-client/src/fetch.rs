//! Transport wrapper that attaches the signed-in user's identity token.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::{Request, Response};
use permission_sdk::{IdTokenProvider, PermissionError};
use secrecy::ExposeSecret;

use crate::transport::{self, HttpTransport};

/// How outgoing requests are authenticated.
#[derive(Clone, Default)]
pub enum FetchMode {
    /// Requests are forwarded untouched.
    #[default]
    Anonymous,
    /// Requests carry `Authorization: Bearer <token>` when the provider has a
    /// non-empty token.
    Authenticated(Arc<dyn IdTokenProvider>),
}

impl fmt::Debug for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Authenticated(_) => f.write_str("Authenticated"),
        }
    }
}

/// [`HttpTransport`] that switches between anonymous and authenticated mode
/// on sign-in and sign-out.
///
/// Each `send` reads the mode once when it starts; switching modes affects
/// only requests issued afterwards.
pub struct IdentityAwareFetch {
    inner: Arc<dyn HttpTransport>,
    mode: ArcSwap<FetchMode>,
}

impl IdentityAwareFetch {
    /// Wrap `inner`, starting anonymous.
    #[must_use]
    pub fn new(inner: Arc<dyn HttpTransport>) -> Self {
        Self {
            inner,
            mode: ArcSwap::from_pointee(FetchMode::Anonymous),
        }
    }

    /// Switch to authenticated mode. Without a provider the wrapper stays
    /// (or becomes) anonymous.
    pub fn sign_in(&self, provider: Option<Arc<dyn IdTokenProvider>>) {
        let mode = provider.map_or(FetchMode::Anonymous, FetchMode::Authenticated);
        tracing::debug!(mode = ?mode, "identity fetch mode changed");
        self.mode.store(Arc::new(mode));
    }

    pub fn sign_out(&self) {
        tracing::debug!("identity fetch mode reset to anonymous");
        self.mode.store(Arc::new(FetchMode::Anonymous));
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(**self.mode.load(), FetchMode::Authenticated(_))
    }
}

impl fmt::Debug for IdentityAwareFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityAwareFetch")
            .field("mode", &**self.mode.load())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpTransport for IdentityAwareFetch {
    async fn send(&self, mut request: Request<Bytes>) -> Result<Response<Bytes>, PermissionError> {
        let mode = self.mode.load_full();
        if let FetchMode::Authenticated(provider) = mode.as_ref()
            && let Some(token) = provider.id_token().await?
            && !token.expose_secret().is_empty()
        {
            request
                .headers_mut()
                .insert(AUTHORIZATION, transport::bearer(&token)?);
        }
        self.inner.send(request).await
    }
}
