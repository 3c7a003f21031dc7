//! Error types for the permission module.

use thiserror::Error;

/// Errors returned by an `authorize` exchange and its collaborators.
///
/// A deny is not an error: it is an [`AuthorizeResponse`](crate::AuthorizeResponse)
/// with result `DENY`.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The request never produced a complete response (connection failure,
    /// timeout, cancelled body).
    #[error("transport error: {0}")]
    Transport(String),

    /// The permission service answered with a non-success status.
    #[error("request failed with {status}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// The response set does not cover every submitted request.
    #[error("unexpected response from permission service")]
    MalformedResponse,

    /// The service base URL could not be resolved.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// The resolved endpoint is not a valid URL.
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(String),

    /// The outgoing batch could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PermissionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Errors from building or querying a [`PermissionRegistry`](crate::PermissionRegistry).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("permission key not found: {0}")]
    KeyNotFound(String),

    #[error("permission name '{name}' is registered under both '{first}' and '{second}'")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
}

/// Errors produced by an [`AuthorizationPolicy`](crate::AuthorizationPolicy).
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A conditional decision was built from a criteria tree with no conditions.
    #[error("conditional decision requires at least one condition")]
    EmptyCriteria,

    #[error("internal error: {0}")]
    Internal(String),
}
