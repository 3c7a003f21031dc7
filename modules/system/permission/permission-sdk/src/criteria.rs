//! Criteria trees for conditional authorization decisions.
//!
//! When the policy cannot decide without looking at the resource itself, it
//! answers `MAYBE` together with an [`AuthorizationCriteria`] tree. The
//! resource owner loads the resource and evaluates the tree's leaf
//! conditions against it to reach a final allow/deny.
//!
//! ## Wire form
//!
//! ```json
//! { "allOf": [
//!     { "condition": { "name": "isEntityOwner", "resourceType": "catalog-entity", "params": ["user:default/jane"] } },
//!     { "not": { "condition": { "name": "isEntityKind", "resourceType": "catalog-entity", "params": [["Template"]] } } }
//! ] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recursive boolean combination of conditions.
///
/// Leaves are always [`AuthorizationCriteria::Condition`]. Evaluation has no
/// side effects, so `AllOf`/`AnyOf` short-circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationCriteria<C = PermissionCondition> {
    /// Satisfied when every child is satisfied (true when empty).
    AllOf(Vec<AuthorizationCriteria<C>>),
    /// Satisfied when at least one child is satisfied (false when empty).
    AnyOf(Vec<AuthorizationCriteria<C>>),
    /// Satisfied when the child is not.
    Not(Box<AuthorizationCriteria<C>>),
    /// Atomic predicate resolved by the resource owner.
    Condition(C),
}

/// Atomic condition to be checked against a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCondition {
    /// Rule name understood by the resource owner (e.g. `isEntityOwner`).
    pub name: String,
    /// Resource type the rule applies to.
    pub resource_type: String,
    /// Rule parameters.
    #[serde(default)]
    pub params: Vec<Value>,
}

impl PermissionCondition {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        resource_type: impl Into<String>,
        params: impl IntoIterator<Item = Value>,
    ) -> Self {
        Self {
            name: name.into(),
            resource_type: resource_type.into(),
            params: params.into_iter().collect(),
        }
    }
}

impl<C> AuthorizationCriteria<C> {
    #[must_use]
    pub fn condition(condition: C) -> Self {
        Self::Condition(condition)
    }

    #[must_use]
    pub fn all_of(children: impl IntoIterator<Item = Self>) -> Self {
        Self::AllOf(children.into_iter().collect())
    }

    #[must_use]
    pub fn any_of(children: impl IntoIterator<Item = Self>) -> Self {
        Self::AnyOf(children.into_iter().collect())
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Self) -> Self {
        Self::Not(Box::new(child))
    }

    /// All leaf conditions, depth-first, left to right.
    #[must_use]
    pub fn conditions(&self) -> Vec<&C> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a C>) {
        match self {
            Self::AllOf(children) | Self::AnyOf(children) => {
                for child in children {
                    child.collect_conditions(out);
                }
            }
            Self::Not(child) => child.collect_conditions(out),
            Self::Condition(c) => out.push(c),
        }
    }

    /// Number of leaf conditions in the tree.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        match self {
            Self::AllOf(children) | Self::AnyOf(children) => {
                children.iter().map(Self::condition_count).sum()
            }
            Self::Not(child) => child.condition_count(),
            Self::Condition(_) => 1,
        }
    }

    /// Whether the tree has no conditions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.condition_count() == 0
    }

    /// Evaluate the tree with `check` deciding each leaf.
    pub fn evaluate<F>(&self, check: &mut F) -> bool
    where
        F: FnMut(&C) -> bool,
    {
        match self {
            Self::AllOf(children) => children.iter().all(|c| c.evaluate(check)),
            Self::AnyOf(children) => children.iter().any(|c| c.evaluate(check)),
            Self::Not(child) => !child.evaluate(check),
            Self::Condition(c) => check(c),
        }
    }

    /// Evaluate the tree with a fallible leaf check, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `check`.
    pub fn try_evaluate<F, E>(&self, check: &mut F) -> Result<bool, E>
    where
        F: FnMut(&C) -> Result<bool, E>,
    {
        match self {
            Self::AllOf(children) => {
                for child in children {
                    if !child.try_evaluate(check)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::AnyOf(children) => {
                for child in children {
                    if child.try_evaluate(check)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not(child) => Ok(!child.try_evaluate(check)?),
            Self::Condition(c) => check(c),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(name: &str) -> AuthorizationCriteria {
        AuthorizationCriteria::condition(PermissionCondition::new(name, "catalog-entity", []))
    }

    fn holds<'a>(names: &'a [&'a str]) -> impl FnMut(&PermissionCondition) -> bool + 'a {
        move |c: &PermissionCondition| names.contains(&c.name.as_str())
    }

    #[test]
    fn evaluates_nested_tree() {
        // owner AND NOT (template OR archived)
        let tree = AuthorizationCriteria::all_of([
            cond("owner"),
            AuthorizationCriteria::not(AuthorizationCriteria::any_of([
                cond("template"),
                cond("archived"),
            ])),
        ]);

        assert!(tree.evaluate(&mut holds(&["owner"])));
        assert!(!tree.evaluate(&mut holds(&["owner", "archived"])));
        assert!(!tree.evaluate(&mut holds(&[])));
    }

    #[test]
    fn empty_combinators_follow_identity_elements() {
        let all: AuthorizationCriteria = AuthorizationCriteria::all_of([]);
        let any: AuthorizationCriteria = AuthorizationCriteria::any_of([]);
        assert!(all.evaluate(&mut |_: &PermissionCondition| false));
        assert!(!any.evaluate(&mut |_: &PermissionCondition| true));
        assert!(all.is_empty());
        assert!(any.is_empty());
    }

    #[test]
    fn short_circuits() {
        let tree = AuthorizationCriteria::any_of([cond("a"), cond("b"), cond("c")]);
        let mut visited = Vec::new();
        let result = tree.evaluate(&mut |c: &PermissionCondition| {
            visited.push(c.name.clone());
            c.name == "a"
        });
        assert!(result);
        assert_eq!(visited, vec!["a".to_owned()]);
    }

    #[test]
    fn try_evaluate_propagates_first_error() {
        let tree = AuthorizationCriteria::all_of([cond("a"), cond("broken"), cond("c")]);
        let result: Result<bool, String> = tree.try_evaluate(&mut |c: &PermissionCondition| {
            if c.name == "broken" {
                Err(format!("cannot resolve {}", c.name))
            } else {
                Ok(true)
            }
        });
        assert_eq!(result, Err("cannot resolve broken".to_owned()));
    }

    #[test]
    fn collects_conditions_in_order() {
        let tree = AuthorizationCriteria::all_of([
            cond("a"),
            AuthorizationCriteria::not(cond("b")),
            AuthorizationCriteria::any_of([cond("c")]),
        ]);
        let names: Vec<&str> = tree.conditions().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(tree.condition_count(), 3);
        assert!(!tree.is_empty());
    }

    #[test]
    fn wire_format() {
        let tree = AuthorizationCriteria::all_of([
            AuthorizationCriteria::condition(PermissionCondition::new(
                "isEntityOwner",
                "catalog-entity",
                [json!("user:default/jane")],
            )),
            AuthorizationCriteria::not(cond("template")),
        ]);

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            json!({
                "allOf": [
                    { "condition": {
                        "name": "isEntityOwner",
                        "resourceType": "catalog-entity",
                        "params": ["user:default/jane"],
                    } },
                    { "not": { "condition": {
                        "name": "template",
                        "resourceType": "catalog-entity",
                        "params": [],
                    } } },
                ]
            })
        );

        let back: AuthorizationCriteria = serde_json::from_value(value).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn rejects_unknown_node_kind() {
        let result: Result<AuthorizationCriteria, _> =
            serde_json::from_value(json!({ "oneOf": [] }));
        assert!(result.is_err());
    }
}
