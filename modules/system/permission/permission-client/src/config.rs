//! Configuration for the permission client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PermissionClientConfig {
    /// Plugin id passed to discovery to locate the permission backend.
    pub plugin_id: String,

    /// Path appended to the discovered base URL for batch checks. A missing
    /// leading `/` is added when the URL is built.
    pub authorize_path: String,

    /// Upper bound for one exchange, body included.
    pub request_timeout_ms: u64,
}

impl Default for PermissionClientConfig {
    fn default() -> Self {
        Self {
            plugin_id: "permission".to_owned(),
            authorize_path: "/authorize".to_owned(),
            request_timeout_ms: 30_000,
        }
    }
}

impl PermissionClientConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
