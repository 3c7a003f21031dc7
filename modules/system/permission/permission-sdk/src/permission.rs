//! Permission value objects.
//!
//! A [`Permission`] is a named capability that can be checked for a
//! subject/resource pair. Its identity is the `name`; attributes and the
//! resource type are descriptive only and never take part in equality.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// CRUD action a permission guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudAction {
    Create,
    Read,
    Update,
    Delete,
}

/// Sparse set of known permission attributes.
///
/// Every attribute is optional; absent attributes are omitted on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionAttributes {
    /// The CRUD action guarded by the permission.
    #[serde(
        rename = "CRUD_ACTION",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub crud_action: Option<CrudAction>,

    /// Marks a permission that controls whether a route is visible.
    #[serde(
        rename = "ROUTE_VISIBILITY",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub route_visibility: Option<bool>,
}

impl PermissionAttributes {
    /// Attributes with no entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn crud_action(mut self, action: CrudAction) -> Self {
        self.crud_action = Some(action);
        self
    }

    #[must_use]
    pub fn route_visibility(mut self, visible: bool) -> Self {
        self.route_visibility = Some(visible);
        self
    }
}

/// A named capability.
///
/// Two permissions are equal when their names are equal, regardless of
/// attributes or resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    name: String,
    #[serde(default)]
    attributes: PermissionAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resource_type: Option<String>,
}

impl Permission {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        attributes: PermissionAttributes,
        resource_type: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            resource_type,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attributes(&self) -> &PermissionAttributes {
        &self.attributes
    }

    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    /// Whether `other` denotes the same permission (same name).
    #[must_use]
    pub fn is(&self, other: &Permission) -> bool {
        self.name == other.name
    }

    /// Whether this permission applies to resources of type `resource_type`.
    #[must_use]
    pub fn supports_type(&self, resource_type: &str) -> bool {
        self.resource_type.as_deref() == Some(resource_type)
    }

    #[must_use]
    pub fn is_route_visibility(&self) -> bool {
        self.attributes.route_visibility.unwrap_or(false)
    }

    #[must_use]
    pub fn is_create(&self) -> bool {
        self.attributes.crud_action == Some(CrudAction::Create)
    }

    #[must_use]
    pub fn is_read(&self) -> bool {
        self.attributes.crud_action == Some(CrudAction::Read)
    }

    #[must_use]
    pub fn is_update(&self) -> bool {
        self.attributes.crud_action == Some(CrudAction::Update)
    }

    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.attributes.crud_action == Some(CrudAction::Delete)
    }
}

impl PartialEq for Permission {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for Permission {}

impl Hash for Permission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_entity() -> Permission {
        Permission::new(
            "catalog.entity.read",
            PermissionAttributes::new().crud_action(CrudAction::Read),
            Some("catalog-entity".to_owned()),
        )
    }

    #[test]
    fn equality_ignores_attributes_and_resource_type() {
        let a = read_entity();
        let b = Permission::new(
            "catalog.entity.read",
            PermissionAttributes::new().route_visibility(true),
            None,
        );

        assert!(a.is(&b));
        assert_eq!(a, b);
        assert_ne!(a, Permission::new("catalog.entity.delete", a.attributes, None));
    }

    #[test]
    fn crud_predicates_follow_attributes() {
        let p = read_entity();
        assert!(p.is_read());
        assert!(!p.is_create());
        assert!(!p.is_update());
        assert!(!p.is_delete());
        assert!(!p.is_route_visibility());

        let empty = Permission::new("x", PermissionAttributes::new(), None);
        assert!(!empty.is_read());
        assert!(!empty.is_route_visibility());
    }

    #[test]
    fn route_visibility_false_is_not_visibility() {
        let p = Permission::new("x", PermissionAttributes::new().route_visibility(false), None);
        assert!(!p.is_route_visibility());
    }

    #[test]
    fn supports_type_matches_resource_type_only() {
        let p = read_entity();
        assert!(p.supports_type("catalog-entity"));
        assert!(!p.supports_type("other"));
        assert!(!Permission::new("x", PermissionAttributes::new(), None).supports_type(""));
    }

    #[test]
    fn wire_shape_uses_attribute_keys() {
        let value = serde_json::to_value(read_entity()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "catalog.entity.read",
                "attributes": { "CRUD_ACTION": "read" },
                "resourceType": "catalog-entity",
            })
        );

        let bare = serde_json::to_value(Permission::new("x", PermissionAttributes::new(), None))
            .unwrap();
        assert_eq!(bare, json!({ "name": "x", "attributes": {} }));
    }

    #[test]
    fn deserializes_definition_without_optional_fields() {
        let p: Permission = serde_json::from_value(json!({ "name": "test.permission" })).unwrap();
        assert_eq!(p.name(), "test.permission");
        assert_eq!(p.attributes(), &PermissionAttributes::default());
        assert_eq!(p.resource_type(), None);
    }
}
