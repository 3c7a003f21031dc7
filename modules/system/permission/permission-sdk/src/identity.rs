//! Identity types shared by the client and policy sides.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::PermissionError;

/// The signed-in user as seen by an [`AuthorizationPolicy`](crate::AuthorizationPolicy).
#[derive(Debug, Clone)]
pub struct PolicyIdentity {
    /// Stable user identifier (e.g. an entity reference).
    pub id: String,
    /// The identity token the user authenticated with, if forwarded.
    pub token: Option<SecretString>,
}

impl PolicyIdentity {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<SecretString>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Source of the current user's identity token.
///
/// Implemented by whatever owns the sign-in session. Returning `Ok(None)`
/// means no token is available right now and the call proceeds anonymously.
#[async_trait]
pub trait IdTokenProvider: Send + Sync {
    /// Resolve the current identity token.
    ///
    /// # Errors
    ///
    /// Implementation-defined; propagated unchanged to the caller.
    async fn id_token(&self) -> Result<Option<SecretString>, PermissionError>;
}

/// Token provider that always returns the same token.
#[derive(Debug, Clone)]
pub struct StaticIdToken(SecretString);

impl StaticIdToken {
    #[must_use]
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl IdTokenProvider for StaticIdToken {
    async fn id_token(&self) -> Result<Option<SecretString>, PermissionError> {
        Ok(Some(self.0.clone()))
    }
}
