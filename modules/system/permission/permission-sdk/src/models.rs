//! Wire models for the permission module.
//!
//! Requests travel as a JSON array of [`Identified<AuthorizeRequest>`], responses
//! as a JSON array of [`Identified<AuthorizeResponse>`]. The `id` is a
//! correlation identifier assigned by the client for one batch.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::criteria::AuthorizationCriteria;
use crate::error::PolicyError;
use crate::permission::Permission;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizeResult {
    Allow,
    Deny,
    /// The policy needs resource data to decide; see [`ConditionalDecision`].
    Maybe,
}

/// Outcome that requires no further evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefinitiveResult {
    Allow,
    Deny,
}

impl From<DefinitiveResult> for AuthorizeResult {
    fn from(r: DefinitiveResult) -> Self {
        match r {
            DefinitiveResult::Allow => Self::Allow,
            DefinitiveResult::Deny => Self::Deny,
        }
    }
}

/// A wire record tagged with its batch correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identified<T> {
    pub id: String,
    #[serde(flatten)]
    pub inner: T,
}

impl<T> Identified<T> {
    #[must_use]
    pub fn new(id: impl Into<String>, inner: T) -> Self {
        Self {
            id: id.into(),
            inner,
        }
    }
}

/// A single permission check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    /// The permission being checked.
    pub permission: Permission,
    /// Reference to the resource the check applies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_ref: Option<String>,
}

impl AuthorizeRequest {
    #[must_use]
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            resource_ref: None,
        }
    }

    #[must_use]
    pub fn with_resource_ref(mut self, resource_ref: impl Into<String>) -> Self {
        self.resource_ref = Some(resource_ref.into());
        self
    }
}

/// A request as handed to a policy: the resource reference is withheld, so
/// resource-dependent decisions come back as conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueAuthorizeRequest {
    pub permission: Permission,
}

impl From<&AuthorizeRequest> for OpaqueAuthorizeRequest {
    fn from(request: &AuthorizeRequest) -> Self {
        Self {
            permission: request.permission.clone(),
        }
    }
}

/// Criteria a caller must evaluate against a resource owned by `plugin_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalDecision {
    /// Plugin that owns the resource and understands the conditions.
    pub plugin_id: String,
    /// Resource type the criteria apply to.
    pub resource_type: String,
    /// The criteria tree.
    #[serde(alias = "conditions")]
    pub criteria: AuthorizationCriteria,
}

/// Response to a single permission check.
///
/// Serialized with the result as the `result` tag:
/// `{"result":"ALLOW"}`, `{"result":"DENY"}` or
/// `{"result":"MAYBE","conditions":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizeResponse {
    Allow,
    Deny,
    Maybe { conditions: ConditionalDecision },
}

impl AuthorizeResponse {
    #[must_use]
    pub fn result(&self) -> AuthorizeResult {
        match self {
            Self::Allow => AuthorizeResult::Allow,
            Self::Deny => AuthorizeResult::Deny,
            Self::Maybe { .. } => AuthorizeResult::Maybe,
        }
    }

    /// The conditional decision, present only for `MAYBE`.
    #[must_use]
    pub fn conditions(&self) -> Option<&ConditionalDecision> {
        match self {
            Self::Maybe { conditions } => Some(conditions),
            Self::Allow | Self::Deny => None,
        }
    }

    #[must_use]
    pub fn is_definitive(&self) -> bool {
        self.conditions().is_none()
    }
}

/// Result returned by an [`AuthorizationPolicy`](crate::AuthorizationPolicy).
///
/// A conditional result always carries a non-empty criteria tree; use
/// [`PolicyResult::conditional`] to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AuthorizeResponse", try_from = "AuthorizeResponse")]
pub enum PolicyResult {
    Definitive(DefinitiveResult),
    Conditional(ConditionalDecision),
}

impl PolicyResult {
    #[must_use]
    pub fn allow() -> Self {
        Self::Definitive(DefinitiveResult::Allow)
    }

    #[must_use]
    pub fn deny() -> Self {
        Self::Definitive(DefinitiveResult::Deny)
    }

    /// Build a conditional result.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::EmptyCriteria`] if `criteria` has no conditions.
    pub fn conditional(
        plugin_id: impl Into<String>,
        resource_type: impl Into<String>,
        criteria: AuthorizationCriteria,
    ) -> Result<Self, PolicyError> {
        if criteria.is_empty() {
            return Err(PolicyError::EmptyCriteria);
        }
        Ok(Self::Conditional(ConditionalDecision {
            plugin_id: plugin_id.into(),
            resource_type: resource_type.into(),
            criteria,
        }))
    }

    #[must_use]
    pub fn result(&self) -> AuthorizeResult {
        match self {
            Self::Definitive(r) => (*r).into(),
            Self::Conditional(_) => AuthorizeResult::Maybe,
        }
    }

    /// The criteria tree, present only for conditional results.
    #[must_use]
    pub fn criteria(&self) -> Option<&AuthorizationCriteria> {
        match self {
            Self::Conditional(decision) => Some(&decision.criteria),
            Self::Definitive(_) => None,
        }
    }
}

impl From<PolicyResult> for AuthorizeResponse {
    fn from(result: PolicyResult) -> Self {
        match result {
            PolicyResult::Definitive(DefinitiveResult::Allow) => Self::Allow,
            PolicyResult::Definitive(DefinitiveResult::Deny) => Self::Deny,
            PolicyResult::Conditional(conditions) => Self::Maybe { conditions },
        }
    }
}

impl TryFrom<AuthorizeResponse> for PolicyResult {
    type Error = PolicyError;

    fn try_from(response: AuthorizeResponse) -> Result<Self, Self::Error> {
        match response {
            AuthorizeResponse::Allow => Ok(Self::allow()),
            AuthorizeResponse::Deny => Ok(Self::deny()),
            AuthorizeResponse::Maybe { conditions } => Self::conditional(
                conditions.plugin_id,
                conditions.resource_type,
                conditions.criteria,
            ),
        }
    }
}

/// Per-call options for `authorize`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Bearer token forwarded to the permission service. Never logged.
    pub token: Option<SecretString>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<SecretString>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}
