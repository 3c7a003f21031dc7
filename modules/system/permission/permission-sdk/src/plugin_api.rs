//! Policy contract implemented by permission backends.

use async_trait::async_trait;

use crate::error::PolicyError;
use crate::identity::PolicyIdentity;
use crate::models::{OpaqueAuthorizeRequest, PolicyResult};

/// Decides a single permission check on the server side.
///
/// Returns either a definitive allow/deny or a conditional result whose
/// criteria the resource owner evaluates. The policy may await its own data
/// sources.
#[async_trait]
pub trait AuthorizationPolicy: Send + Sync {
    /// Decide `request` for `identity` (`None` for anonymous callers).
    ///
    /// # Errors
    ///
    /// - `EmptyCriteria` if a conditional result could not be built
    /// - `Internal` for policy-specific failures
    async fn handle(
        &self,
        request: &OpaqueAuthorizeRequest,
        identity: Option<&PolicyIdentity>,
    ) -> Result<PolicyResult, PolicyError>;
}
