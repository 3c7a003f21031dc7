//! Service discovery contract.

use async_trait::async_trait;

use crate::error::PermissionError;

/// Resolves the base URL of a plugin's backend.
///
/// Called once per `authorize` invocation; results are not cached here.
#[async_trait]
pub trait DiscoveryApi: Send + Sync {
    /// Base URL for `plugin_id`, without a trailing slash
    /// (e.g. `http://backstage:7007/api/permission`).
    ///
    /// # Errors
    ///
    /// Returns [`PermissionError::Discovery`] if the plugin cannot be located.
    async fn base_url(&self, plugin_id: &str) -> Result<String, PermissionError>;
}

/// Discovery that serves every plugin from `<base>/<plugin_id>`, or a single
/// fixed URL.
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    base: String,
    append_plugin_id: bool,
}

impl StaticDiscovery {
    /// Every plugin resolves to exactly `url`.
    #[must_use]
    pub fn fixed(url: impl Into<String>) -> Self {
        Self {
            base: trim_slash(url.into()),
            append_plugin_id: false,
        }
    }

    /// Plugins resolve to `<base>/<plugin_id>`.
    #[must_use]
    pub fn per_plugin(base: impl Into<String>) -> Self {
        Self {
            base: trim_slash(base.into()),
            append_plugin_id: true,
        }
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[async_trait]
impl DiscoveryApi for StaticDiscovery {
    async fn base_url(&self, plugin_id: &str) -> Result<String, PermissionError> {
        if self.base.is_empty() {
            return Err(PermissionError::Discovery(format!(
                "no base url configured for '{plugin_id}'"
            )));
        }
        if self.append_plugin_id {
            Ok(format!("{}/{plugin_id}", self.base))
        } else {
            Ok(self.base.clone())
        }
    }
}
