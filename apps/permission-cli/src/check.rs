//! Positional `KEY[=RESOURCE_REF]` arguments.

use std::str::FromStr;

use anyhow::bail;
use permission_sdk::{AuthorizeRequest, PermissionRegistry, RegistryError};

/// One requested check: a registry key and an optional resource reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub key: String,
    pub resource_ref: Option<String>,
}

impl FromStr for Check {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, resource_ref) = s
            .split_once('=')
            .map_or((s, None), |(key, resource_ref)| (key, Some(resource_ref)));
        let key = key.trim();
        if key.is_empty() {
            bail!("missing permission key in '{s}'");
        }
        if resource_ref.is_some_and(str::is_empty) {
            bail!("empty resource reference in '{s}'");
        }
        Ok(Self {
            key: key.to_owned(),
            resource_ref: resource_ref.map(str::to_owned),
        })
    }
}

impl Check {
    /// Build the request for this check.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::KeyNotFound`] if the key is not registered.
    pub fn to_request(
        &self,
        registry: &PermissionRegistry,
    ) -> Result<AuthorizeRequest, RegistryError> {
        let mut request = AuthorizeRequest::new(registry.get(&self.key)?.clone());
        if let Some(resource_ref) = &self.resource_ref {
            request = request.with_resource_ref(resource_ref);
        }
        Ok(request)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use permission_sdk::{Permission, PermissionAttributes};

    #[test]
    fn parses_key_only() {
        let c: Check = "ENTITY_READ".parse().unwrap();
        assert_eq!(c.key, "ENTITY_READ");
        assert_eq!(c.resource_ref, None);
    }

    #[test]
    fn parses_key_and_resource_ref() {
        let c: Check = "ENTITY_READ=component:default/foo".parse().unwrap();
        assert_eq!(c.key, "ENTITY_READ");
        assert_eq!(c.resource_ref.as_deref(), Some("component:default/foo"));
    }

    #[test]
    fn resource_ref_may_contain_equals() {
        let c: Check = "K=a=b".parse().unwrap();
        assert_eq!(c.resource_ref.as_deref(), Some("a=b"));
    }

    #[test]
    fn rejects_empty_parts() {
        assert!("".parse::<Check>().is_err());
        assert!("=foo".parse::<Check>().is_err());
        assert!("KEY=".parse::<Check>().is_err());
    }

    #[test]
    fn builds_request_from_registry() {
        let registry = PermissionRegistry::new([(
            "TEST",
            Permission::new("test.permission", PermissionAttributes::new(), None),
        )])
        .unwrap();

        let request = "TEST=foo".parse::<Check>().unwrap().to_request(&registry).unwrap();
        assert_eq!(request.permission.name(), "test.permission");
        assert_eq!(request.resource_ref.as_deref(), Some("foo"));

        let err = "OTHER".parse::<Check>().unwrap().to_request(&registry).unwrap_err();
        assert_eq!(err, RegistryError::KeyNotFound("OTHER".to_owned()));
    }
}
