#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! HTTP client for the permission module.
//!
//! [`PermissionClient`] sends a batch of [`AuthorizeRequest`](permission_sdk::AuthorizeRequest)s
//! to `<base>/authorize` in a single `POST`, tags each with a correlation id
//! and returns the answers in request order.
//!
//! ```ignore
//! let client = PermissionClient::new(
//!     Arc::new(StaticDiscovery::per_plugin("http://backstage:7007/api")),
//!     PermissionClientConfig::default(),
//! )?;
//! let decisions = client
//!     .authorize(&[AuthorizeRequest::new(permission)], &RequestOptions::with_token(token))
//!     .await?;
//! ```
//!
//! For frontends that track a signed-in user, wrap the transport in
//! [`IdentityAwareFetch`] so every call carries the user's identity token.

pub mod client;
pub mod config;
pub mod fetch;
pub mod protocol;
pub mod transport;

pub use client::PermissionClient;
pub use config::PermissionClientConfig;
pub use fetch::{FetchMode, IdentityAwareFetch};
pub use protocol::{CorrelationIdGenerator, UuidV4Ids};
pub use transport::{HttpTransport, HyperTransport};
