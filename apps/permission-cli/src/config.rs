//! CLI configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. YAML file given with `--config`
//! 3. Environment variables prefixed `PERMISSION_CLI_` (nested keys use `__`,
//!    e.g. `PERMISSION_CLI_CLIENT__REQUEST_TIMEOUT_MS=5000`)
//!
//! Command-line flags are applied on top by the caller.

use std::path::Path;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use permission_client::PermissionClientConfig;
use permission_sdk::PermissionRegistry;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "PERMISSION_CLI_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Base URL of the permission backend, e.g. `http://localhost:7007/api/permission`.
    pub base_url: Option<String>,

    pub client: PermissionClientConfig,

    /// Permissions that can be checked, keyed by symbolic name.
    pub permissions: PermissionRegistry,
}

impl CliConfig {
    /// Load from `path` (if any) and the environment.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or the merged configuration is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::from_figment(&Self::figment(path)?)
    }

    fn figment(path: Option<&Path>) -> anyhow::Result<Figment> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        figment
            .extract()
            .context("invalid permission-cli configuration")
    }
}
