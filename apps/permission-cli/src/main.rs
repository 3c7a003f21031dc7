//! `permission-cli`: check permissions against a permission backend.
//!
//! ```text
//! permission-cli --config permissions.yaml --token "$TOKEN" ENTITY_READ=component:default/foo ENTITY_DELETE
//! ```
//!
//! Permissions are looked up by key in the `permissions` section of the
//! configuration; see [`config`] for the sources that are merged.

mod check;
mod config;
mod output;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use permission_client::PermissionClient;
use permission_sdk::{AuthorizeRequest, RequestOptions, StaticDiscovery};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use check::Check;
use config::CliConfig;
use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "permission-cli")]
#[command(version, about = "Check permissions against a permission backend", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the permission backend (overrides config)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Bearer token forwarded to the backend
    #[arg(long)]
    token: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Checks to run, in order
    #[arg(value_name = "KEY[=RESOURCE_REF]", required = true)]
    checks: Vec<Check>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = CliConfig::load(cli.config.as_deref())?;
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| config.base_url.clone())
        .context("no base url: pass --base-url or set base_url in the config")?;

    let requests = cli
        .checks
        .iter()
        .map(|c| c.to_request(&config.permissions))
        .collect::<Result<Vec<AuthorizeRequest>, _>>()?;

    tracing::debug!(base_url = %base_url, checks = requests.len(), "running permission checks");

    let client = PermissionClient::new(Arc::new(StaticDiscovery::fixed(base_url)), config.client)?;
    let options = cli.token.map_or_else(RequestOptions::new, |token| {
        RequestOptions::with_token(SecretString::from(token))
    });
    let responses = client.authorize(&requests, &options).await?;

    let mut stdout = std::io::stdout().lock();
    output::render(cli.format, &cli.checks, &responses, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
