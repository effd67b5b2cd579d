//! Named protected objects.
//!
//! A [`Resource`] is a pure lookup key: rules are scoped to it by name and
//! it carries no other state. Resources are registered explicitly via
//! [`Acl::add_resource`](crate::Acl::add_resource) or implicitly the first
//! time an allow/deny rule references them.

use serde::{Deserialize, Serialize};

/// A named protected object that rules are scoped to.
///
/// Equality and hashing are by name. Bare strings convert directly, so
/// registry calls accept either form:
///
/// # Example
///
/// ```
/// use warden_acl::Resource;
///
/// let page = Resource::new("page");
/// assert_eq!(page.name(), "page");
///
/// let from_str: Resource = "page".into();
/// assert_eq!(page, from_str);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// The identifying name.
    name: String,
}

impl Resource {
    /// Creates a resource with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Resource {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Resource {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_accessor() {
        let res = Resource::new("article");
        assert_eq!(res.name(), "article");
    }

    #[test]
    fn equality_by_name() {
        assert_eq!(Resource::new("a"), Resource::new("a"));
        assert_ne!(Resource::new("a"), Resource::new("b"));
    }

    #[test]
    fn from_str_and_string() {
        let a: Resource = "article".into();
        let b: Resource = String::from("article").into();
        assert_eq!(a, b);
    }

    #[test]
    fn display_is_name() {
        let res = Resource::new("article");
        assert_eq!(res.to_string(), "article");
    }

    #[test]
    fn usable_as_hash_key() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Resource::new("a"));
        set.insert(Resource::new("a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let res = Resource::new("article");
        let json = serde_json::to_string(&res).expect("serialize");
        let parsed: Resource = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, res);
    }
}
