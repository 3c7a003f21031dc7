#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Permission SDK
//!
//! This crate provides the public types and contracts of the permission module:
//!
//! - [`Permission`], [`PermissionAttributes`] - Named capabilities
//! - [`PermissionRegistry`] - Fixed key → permission mapping
//! - [`AuthorizationCriteria`], [`PermissionCondition`] - Criteria trees for conditional decisions
//! - [`AuthorizeRequest`], [`AuthorizeResponse`], [`Identified`] - Wire models
//! - [`PolicyResult`], [`AuthorizationPolicy`] - Server-side policy contract
//! - [`PermissionApi`] - Client API trait
//! - [`DiscoveryApi`], [`IdTokenProvider`] - Collaborators consumed by the client
//! - [`PermissionError`], [`RegistryError`], [`PolicyError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use permission_sdk::{AuthorizeRequest, AuthorizeResponse, PermissionApi, RequestOptions};
//!
//! let read = registry.get("ENTITY_READ")?;
//! let responses = client
//!     .authorize(
//!         &[AuthorizeRequest::new(read.clone()).with_resource_ref("component:default/foo")],
//!         &RequestOptions::with_token(token),
//!     )
//!     .await?;
//!
//! if let AuthorizeResponse::Maybe { conditions } = &responses[0] {
//!     let allowed = conditions.criteria.evaluate(&mut |c| rules.check(c, &entity));
//! }
//! ```

pub mod api;
pub mod criteria;
pub mod discovery;
pub mod error;
pub mod identity;
pub mod models;
pub mod permission;
pub mod plugin_api;
pub mod registry;

// Re-export main types at crate root
pub use api::PermissionApi;
pub use criteria::{AuthorizationCriteria, PermissionCondition};
pub use discovery::{DiscoveryApi, StaticDiscovery};
pub use error::{PermissionError, PolicyError, RegistryError};
pub use identity::{IdTokenProvider, PolicyIdentity, StaticIdToken};
pub use models::{
    AuthorizeRequest, AuthorizeResponse, AuthorizeResult, ConditionalDecision, DefinitiveResult,
    Identified, OpaqueAuthorizeRequest, PolicyResult, RequestOptions,
};
pub use permission::{CrudAction, Permission, PermissionAttributes};
pub use plugin_api::AuthorizationPolicy;
pub use registry::PermissionRegistry;
