//! Public API trait for permission checks.

use async_trait::async_trait;

use crate::error::PermissionError;
use crate::models::{AuthorizeRequest, AuthorizeResponse, RequestOptions};

/// Public API for submitting permission checks.
///
/// ```ignore
/// let responses = permissions
///     .authorize(
///         &[AuthorizeRequest::new(registry.get("ENTITY_READ")?.clone())
///             .with_resource_ref("component:default/foo")],
///         &RequestOptions::with_token(token),
///     )
///     .await?;
///
/// match &responses[0] {
///     AuthorizeResponse::Allow => { /* render */ }
///     AuthorizeResponse::Deny => { /* hide */ }
///     AuthorizeResponse::Maybe { conditions } => { /* evaluate conditions.criteria */ }
/// }
/// ```
#[async_trait]
pub trait PermissionApi: Send + Sync {
    /// Check a batch of permissions in one exchange.
    ///
    /// The result has the same length and order as `requests`.
    ///
    /// # Errors
    ///
    /// - `Transport` if no complete response was received
    /// - `RequestFailed` for a non-success status
    /// - `MalformedResponse` if any request is left without a valid response
    /// - `Discovery` / `InvalidUrl` if the endpoint cannot be resolved
    async fn authorize(
        &self,
        requests: &[AuthorizeRequest],
        options: &RequestOptions,
    ) -> Result<Vec<AuthorizeResponse>, PermissionError>;
}
