//! Access policy trait.
//!
//! Defines [`AccessPolicy`] — the abstract seam a gating layer depends on,
//! so request handlers can hold `Arc<dyn AccessPolicy>` without naming the
//! concrete engine.
//!
//! # Architecture
//!
//! ```text
//! AccessPolicy trait (THIS MODULE)
//!          │
//!          ├── Acl        ← owned engine
//!          └── SharedAcl  ← Arc<RwLock<Acl>> shared service
//! ```

use crate::error::Result;
use crate::{Acl, SharedAcl};

/// Abstract authorization decision point.
///
/// A `false` answer is the ordinary "access denied" outcome; an `Err` means
/// the query itself was invalid (e.g. an unregistered role) and is a
/// configuration problem, not a denial.
///
/// # Example
///
/// ```
/// use warden_acl::{AccessPolicy, Acl, Role};
///
/// fn gate(policy: &dyn AccessPolicy, role: &str, action: &str) -> bool {
///     policy
///         .can_access(role, Some("article"), Some(action))
///         .unwrap_or(false)
/// }
///
/// let editor = Role::new("editor");
/// editor.add_permission("edit");
///
/// let mut acl = Acl::new();
/// acl.add_role(editor);
/// acl.allow("editor", &["article"], &["edit"]).unwrap();
///
/// assert!(gate(&acl, "editor", "edit"));
/// assert!(!gate(&acl, "editor", "delete"));
/// ```
pub trait AccessPolicy: Send + Sync {
    /// Answers whether the role may act on the resource with the
    /// permission, with deny rules taking precedence.
    ///
    /// # Errors
    ///
    /// Returns [`AclError`](crate::AclError) when the role is not
    /// registered.
    fn can_access(
        &self,
        role: &str,
        resource: Option<&str>,
        permission: Option<&str>,
    ) -> Result<bool>;
}

impl AccessPolicy for Acl {
    fn can_access(
        &self,
        role: &str,
        resource: Option<&str>,
        permission: Option<&str>,
    ) -> Result<bool> {
        self.is_allowed(role, resource, permission)
    }
}

impl AccessPolicy for SharedAcl {
    fn can_access(
        &self,
        role: &str,
        resource: Option<&str>,
        permission: Option<&str>,
    ) -> Result<bool> {
        self.is_allowed(role, resource, permission)
    }
}
