//! Roles and permission inheritance.
//!
//! A [`Role`] is a named principal that owns a set of permission labels and
//! may inherit from one parent role, forming a tree:
//!
//! ```text
//! admin {manage}
//!   └── editor {edit}          ← holds "edit", inherits "manage"
//!         └── contributor {}   ← inherits "edit" and "manage"
//! ```
//!
//! [`has_permission`](Role::has_permission) walks the parent chain, so a
//! role's effective permission set is its own labels unioned with every
//! ancestor's. The `children` list exists for the reverse direction but is
//! informational only; evaluation never consults it.
//!
//! # Shared Handles
//!
//! `Role` is a cheap-to-clone handle over shared interior state. The
//! registry, a parent link, and any caller-held clone all observe the same
//! mutations, and all mutators take `&self`:
//!
//! ```
//! use warden_acl::Role;
//!
//! let admin = Role::new("admin");
//! let handle = admin.clone();
//! handle.add_permission("manage");
//! assert!(admin.has_permission("manage"));
//! ```

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// A named principal capable of holding permissions and inheriting from a
/// parent role.
///
/// Cloning produces a second handle to the same role, not a copy. Equality
/// compares names.
///
/// # Example
///
/// ```
/// use warden_acl::Role;
///
/// let admin = Role::new("admin");
/// admin.add_permission("manage");
///
/// let editor = Role::new("editor");
/// editor.add_permission("edit");
/// editor.inherits_from(&admin);
///
/// assert!(editor.has_permission("edit"));
/// assert!(editor.has_permission("manage")); // via admin
/// assert!(!admin.has_permission("edit"));   // inheritance is one-way
/// ```
#[derive(Clone)]
pub struct Role {
    inner: Arc<RwLock<RoleInner>>,
}

struct RoleInner {
    name: String,
    permissions: HashSet<String>,
    parent: Option<Role>,
    children: Vec<Role>,
}

impl Role {
    /// Creates a role with the given name and no permissions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RoleInner {
                name: name.into(),
                permissions: HashSet::new(),
                parent: None,
                children: Vec::new(),
            })),
        }
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> String {
        self.inner.read().name.clone()
    }

    /// Returns the permissions held directly by this role, sorted.
    ///
    /// Inherited permissions are not included; use
    /// [`has_permission`](Self::has_permission) to query the effective set.
    #[must_use]
    pub fn permissions(&self) -> Vec<String> {
        let mut perms: Vec<String> = self.inner.read().permissions.iter().cloned().collect();
        perms.sort();
        perms
    }

    /// Adds a permission label to this role's own set.
    ///
    /// Re-adding an existing label is a no-op.
    pub fn add_permission(&self, permission: impl Into<String>) {
        self.inner.write().permissions.insert(permission.into());
    }

    /// Removes a permission label from this role's own set.
    ///
    /// Removing an absent label is a no-op.
    pub fn remove_permission(&self, permission: &str) {
        self.inner.write().permissions.remove(permission);
    }

    /// Returns `true` if this role or any ancestor holds the permission.
    ///
    /// Walks the parent chain one link at a time. The walk tracks visited
    /// role names, so an inheritance cycle terminates as "not held" instead
    /// of looping.
    ///
    /// # Example
    ///
    /// ```
    /// use warden_acl::Role;
    ///
    /// let admin = Role::new("admin");
    /// admin.add_permission("manage");
    ///
    /// let editor = Role::new("editor");
    /// editor.inherits_from(&admin);
    ///
    /// assert!(editor.has_permission("manage"));
    /// assert!(!editor.has_permission("publish"));
    /// ```
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = self.clone();
        loop {
            // One lock at a time: clone the parent handle out before moving on.
            let parent = {
                let inner = current.inner.read();
                if !visited.insert(inner.name.clone()) {
                    return false;
                }
                if inner.permissions.contains(permission) {
                    return true;
                }
                inner.parent.clone()
            };
            match parent {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    /// Sets (or overwrites) the parent link.
    ///
    /// Unlike [`inherits_from`](Self::inherits_from), this does not register
    /// this role in the parent's children list.
    pub fn set_parent(&self, parent: &Role) {
        self.inner.write().parent = Some(parent.clone());
    }

    /// Sets the parent link and registers this role as a child of the
    /// parent (bidirectional wiring).
    ///
    /// A self-link is ignored.
    pub fn inherits_from(&self, parent: &Role) {
        if Arc::ptr_eq(&self.inner, &parent.inner) {
            return;
        }
        self.inner.write().parent = Some(parent.clone());
        parent.inner.write().children.push(self.clone());
    }

    /// Appends a child role and sets its parent back-reference.
    ///
    /// A self-link is ignored.
    pub fn add_child(&self, child: &Role) {
        if Arc::ptr_eq(&self.inner, &child.inner) {
            return;
        }
        child.inner.write().parent = Some(self.clone());
        self.inner.write().children.push(child.clone());
    }

    /// Returns a handle to the parent role, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Role> {
        self.inner.read().parent.clone()
    }

    /// Returns `true` if this role has a parent.
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.inner.read().parent.is_some()
    }

    /// Returns handles to the roles that declared this role as parent.
    ///
    /// Informational only: permission evaluation walks `parent` links, never
    /// this list. Roles wired with [`set_parent`](Self::set_parent) do not
    /// appear here.
    #[must_use]
    pub fn children(&self) -> Vec<Role> {
        self.inner.read().children.clone()
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Role {}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Debug for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Capture under one short read, then resolve the parent name with no
        // lock held (the graph may contain cycles).
        let (name, mut permissions, parent) = {
            let inner = self.inner.read();
            (
                inner.name.clone(),
                inner.permissions.iter().cloned().collect::<Vec<_>>(),
                inner.parent.clone(),
            )
        };
        permissions.sort();
        f.debug_struct("Role")
            .field("name", &name)
            .field("permissions", &permissions)
            .field("parent", &parent.map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── Permissions ────────────────────────────────────────────────

    #[test]
    fn direct_permission() {
        let role = Role::new("editor");
        role.add_permission("edit");
        assert!(role.has_permission("edit"));
        assert!(!role.has_permission("manage"));
    }

    #[test]
    fn add_permission_idempotent() {
        let role = Role::new("editor");
        role.add_permission("edit");
        role.add_permission("edit");
        assert_eq!(role.permissions(), vec!["edit".to_string()]);
    }

    #[test]
    fn remove_permission() {
        let role = Role::new("editor");
        role.add_permission("edit");
        role.remove_permission("edit");
        assert!(!role.has_permission("edit"));
    }

    #[test]
    fn remove_absent_permission_is_noop() {
        let role = Role::new("editor");
        role.remove_permission("edit"); // Should not panic
        assert!(role.permissions().is_empty());
    }

    #[test]
    fn permissions_sorted() {
        let role = Role::new("editor");
        role.add_permission("write");
        role.add_permission("edit");
        role.add_permission("read");
        assert_eq!(role.permissions(), vec!["edit", "read", "write"]);
    }

    // ─── Inheritance ────────────────────────────────────────────────

    #[test]
    fn inherited_permission() {
        let admin = Role::new("admin");
        admin.add_permission("manage");

        let editor = Role::new("editor");
        editor.inherits_from(&admin);

        assert!(editor.has_permission("manage"));
        assert!(!admin.has_permission("edit"));
    }

    #[test]
    fn grandparent_permission() {
        let admin = Role::new("admin");
        admin.add_permission("manage");

        let editor = Role::new("editor");
        editor.add_permission("edit");
        editor.inherits_from(&admin);

        let contributor = Role::new("contributor");
        contributor.inherits_from(&editor);

        assert!(contributor.has_permission("edit"));
        assert!(contributor.has_permission("manage"));
    }

    #[test]
    fn permission_added_to_parent_after_wiring_is_visible() {
        let admin = Role::new("admin");
        let editor = Role::new("editor");
        editor.inherits_from(&admin);

        admin.add_permission("manage");
        assert!(editor.has_permission("manage"));
    }

    #[test]
    fn set_parent_does_not_wire_children() {
        let admin = Role::new("admin");
        let editor = Role::new("editor");
        editor.set_parent(&admin);

        assert!(editor.has_parent());
        assert!(admin.children().is_empty());
    }

    #[test]
    fn inherits_from_wires_children() {
        let admin = Role::new("admin");
        let editor = Role::new("editor");
        editor.inherits_from(&admin);

        assert!(editor.has_parent());
        assert_eq!(admin.children().len(), 1);
        assert_eq!(admin.children()[0].name(), "editor");
    }

    #[test]
    fn add_child_sets_back_reference() {
        let admin = Role::new("admin");
        admin.add_permission("manage");
        let editor = Role::new("editor");
        admin.add_child(&editor);

        assert!(editor.has_parent());
        assert!(editor.has_permission("manage"));
        assert_eq!(admin.children().len(), 1);
    }

    #[test]
    fn self_links_ignored() {
        let role = Role::new("loner");
        role.inherits_from(&role);
        role.add_child(&role);

        assert!(!role.has_parent());
        assert!(role.children().is_empty());
    }

    #[test]
    fn set_parent_overwrites() {
        let a = Role::new("a");
        a.add_permission("alpha");
        let b = Role::new("b");
        b.add_permission("beta");

        let child = Role::new("child");
        child.set_parent(&a);
        assert!(child.has_permission("alpha"));

        child.set_parent(&b);
        assert!(child.has_permission("beta"));
        assert!(!child.has_permission("alpha"));
    }

    // ─── Cycle Guard ────────────────────────────────────────────────

    #[test]
    fn two_role_cycle_terminates() {
        let a = Role::new("a");
        let b = Role::new("b");
        a.set_parent(&b);
        b.set_parent(&a);

        // Neither holds the permission; the walk must not loop.
        assert!(!a.has_permission("anything"));
        assert!(!b.has_permission("anything"));
    }

    #[test]
    fn cycle_still_finds_held_permission() {
        let a = Role::new("a");
        let b = Role::new("b");
        b.add_permission("edit");
        a.set_parent(&b);
        b.set_parent(&a);

        assert!(a.has_permission("edit"));
        assert!(b.has_permission("edit"));
    }

    #[test]
    fn self_parent_cycle_terminates() {
        let a = Role::new("a");
        a.set_parent(&a);
        assert!(!a.has_permission("anything"));
    }

    // ─── Handles ────────────────────────────────────────────────────

    #[test]
    fn clone_shares_state() {
        let role = Role::new("editor");
        let handle = role.clone();
        handle.add_permission("edit");
        assert!(role.has_permission("edit"));
    }

    #[test]
    fn equality_by_name() {
        assert_eq!(Role::new("a"), Role::new("a"));
        assert_ne!(Role::new("a"), Role::new("b"));
    }

    #[test]
    fn from_str() {
        let role: Role = "editor".into();
        assert_eq!(role.name(), "editor");
    }

    #[test]
    fn display_is_name() {
        assert_eq!(Role::new("editor").to_string(), "editor");
    }

    #[test]
    fn debug_does_not_loop_on_cycles() {
        let a = Role::new("a");
        let b = Role::new("b");
        a.set_parent(&b);
        b.set_parent(&a);

        let debug = format!("{a:?}");
        assert!(debug.contains("\"a\""), "got: {debug}");
        assert!(debug.contains("\"b\""), "got: {debug}");
    }

    #[test]
    fn thread_safety_basic() {
        use std::thread;

        let role = Role::new("shared");
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let role = role.clone();
                thread::spawn(move || {
                    role.add_permission(format!("perm-{i}"));
                    assert!(role.has_permission(&format!("perm-{i}")));
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread panicked");
        }

        assert_eq!(role.permissions().len(), 4);
    }
}
