//! Fixed registry of permissions keyed by symbolic names.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::permission::Permission;

/// Immutable mapping from symbolic keys (e.g. `ENTITY_READ`) to permissions.
///
/// Built once, typically at plugin start-up, and shared read-only afterwards.
/// Permission names are unique across the registry.
///
/// ```
/// use permission_sdk::{Permission, PermissionAttributes, PermissionRegistry};
///
/// let registry = PermissionRegistry::new([(
///     "TEST",
///     Permission::new("test.permission", PermissionAttributes::new(), None),
/// )])
/// .unwrap();
///
/// let test = registry.get("TEST").unwrap();
/// assert!(registry.includes(test));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Permission>", into = "BTreeMap<String, Permission>")]
pub struct PermissionRegistry {
    by_key: BTreeMap<String, Permission>,
}

impl PermissionRegistry {
    /// Build a registry from `(key, permission)` pairs.
    ///
    /// A key given twice keeps its last permission.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if two keys map to permissions
    /// with the same name.
    pub fn new<K, I>(entries: I) -> Result<Self, RegistryError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Permission)>,
    {
        let by_key: BTreeMap<String, Permission> = entries
            .into_iter()
            .map(|(key, permission)| (key.into(), permission))
            .collect();

        let mut seen: HashMap<&str, &str> = HashMap::with_capacity(by_key.len());
        for (key, permission) in &by_key {
            if let Some(first) = seen.insert(permission.name(), key.as_str()) {
                return Err(RegistryError::DuplicateName {
                    name: permission.name().to_owned(),
                    first: first.to_owned(),
                    second: key.clone(),
                });
            }
        }

        Ok(Self { by_key })
    }

    /// Look up a permission by its symbolic key.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::KeyNotFound`] if `key` was never registered.
    pub fn get(&self, key: &str) -> Result<&Permission, RegistryError> {
        self.by_key
            .get(key)
            .ok_or_else(|| RegistryError::KeyNotFound(key.to_owned()))
    }

    /// Whether a permission with the same name as `permission` is registered.
    #[must_use]
    pub fn includes(&self, permission: &Permission) -> bool {
        self.by_key.values().any(|p| p.is(permission))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Permission)> {
        self.by_key.iter().map(|(k, p)| (k.as_str(), p))
    }
}

impl TryFrom<BTreeMap<String, Permission>> for PermissionRegistry {
    type Error = RegistryError;

    fn try_from(map: BTreeMap<String, Permission>) -> Result<Self, Self::Error> {
        Self::new(map)
    }
}

impl From<PermissionRegistry> for BTreeMap<String, Permission> {
    fn from(registry: PermissionRegistry) -> Self {
        registry.by_key
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::permission::{CrudAction, PermissionAttributes};
    use serde_json::json;

    fn registry() -> PermissionRegistry {
        PermissionRegistry::new([
            (
                "ENTITY_READ",
                Permission::new(
                    "catalog.entity.read",
                    PermissionAttributes::new().crud_action(CrudAction::Read),
                    Some("catalog-entity".to_owned()),
                ),
            ),
            (
                "ROUTE",
                Permission::new(
                    "catalog.route.view",
                    PermissionAttributes::new().route_visibility(true),
                    None,
                ),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn get_returns_registered_permission() {
        let reg = registry();
        let p = reg.get("ENTITY_READ").unwrap();
        assert_eq!(p.name(), "catalog.entity.read");
        assert!(p.is_read());
    }

    #[test]
    fn get_unknown_key_fails() {
        let err = registry().get("MISSING").unwrap_err();
        assert_eq!(err, RegistryError::KeyNotFound("MISSING".to_owned()));
        assert_eq!(err.to_string(), "permission key not found: MISSING");
    }

    #[test]
    fn includes_matches_by_name_only() {
        let reg = registry();
        let lookalike = Permission::new("catalog.entity.read", PermissionAttributes::new(), None);
        let stranger = Permission::new("catalog.entity.delete", PermissionAttributes::new(), None);

        assert!(reg.includes(&lookalike));
        assert!(!reg.includes(&stranger));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = PermissionRegistry::new([
            ("A", Permission::new("same", PermissionAttributes::new(), None)),
            ("B", Permission::new("same", PermissionAttributes::new(), None)),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::DuplicateName { ref name, ref first, ref second }
                if name == "same" && first == "A" && second == "B"
        ));
    }

    #[test]
    fn deserializes_from_key_map() {
        let reg: PermissionRegistry = serde_json::from_value(json!({
            "TEST": {
                "name": "test.permission",
                "attributes": {},
                "resourceType": "test-resource",
            }
        }))
        .unwrap();

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["TEST"]);
        assert_eq!(reg.get("TEST").unwrap().resource_type(), Some("test-resource"));
    }

    #[test]
    fn deserialization_enforces_unique_names() {
        let result: Result<PermissionRegistry, _> = serde_json::from_value(json!({
            "A": { "name": "dup" },
            "B": { "name": "dup" },
        }));
        assert!(result.is_err());
    }

    #[test]
    fn try_from_map_builds_or_rejects() {
        let mut map = BTreeMap::new();
        map.insert(
            "A".to_owned(),
            Permission::new("a.permission", PermissionAttributes::new(), None),
        );
        let reg = PermissionRegistry::try_from(map.clone()).unwrap();
        assert_eq!(reg.get("A").unwrap().name(), "a.permission");

        map.insert(
            "B".to_owned(),
            Permission::new("a.permission", PermissionAttributes::new(), None),
        );
        let err = PermissionRegistry::try_from(map).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName { .. }));
    }

    #[test]
    fn empty_registry() {
        let reg = PermissionRegistry::default();
        assert!(reg.is_empty());
        assert_eq!(reg.iter().count(), 0);
    }
}
