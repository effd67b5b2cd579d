//! Shared, thread-safe engine wrapper.
//!
//! [`SharedAcl`] exposes an [`Acl`] as a concurrent service: queries take a
//! read lock so concurrent readers never block each other, and the
//! occasional rule edit takes the single writer lock. Rule edits are not a
//! hot path, so one `RwLock` over the whole engine is the right shape.

use crate::acl::AclSnapshot;
use crate::error::Result;
use crate::resource::Resource;
use crate::role::Role;
use crate::Acl;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A clonable, `Send + Sync` handle to a shared [`Acl`].
///
/// Cloning shares the underlying engine; hand one handle to each request
/// worker and another to whatever administers the rules.
///
/// # Example
///
/// ```
/// use warden_acl::{Acl, Role, SharedAcl};
///
/// let editor = Role::new("editor");
/// editor.add_permission("edit");
///
/// let mut acl = Acl::new();
/// acl.add_role(editor);
/// acl.allow("editor", &["article"], &["edit"])?;
///
/// let shared = SharedAcl::new(acl);
/// let worker = shared.clone();
/// assert!(worker.is_allowed("editor", Some("article"), Some("edit"))?);
/// # Ok::<(), warden_acl::AclError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedAcl {
    inner: Arc<RwLock<Acl>>,
}

impl SharedAcl {
    /// Wraps an engine for shared use.
    #[must_use]
    pub fn new(acl: Acl) -> Self {
        Self {
            inner: Arc::new(RwLock::new(acl)),
        }
    }

    /// Acquires the read lock for a batch of queries.
    pub fn read(&self) -> RwLockReadGuard<'_, Acl> {
        self.inner.read()
    }

    /// Acquires the writer lock for a batch of rule edits.
    pub fn write(&self) -> RwLockWriteGuard<'_, Acl> {
        self.inner.write()
    }

    // ─── Registries ─────────────────────────────────────────────────

    /// Registers a role. See [`Acl::add_role`].
    pub fn add_role(&self, role: impl Into<Role>) {
        self.inner.write().add_role(role);
    }

    /// Registers several roles. See [`Acl::add_roles`].
    pub fn add_roles<I>(&self, roles: I)
    where
        I: IntoIterator,
        I::Item: Into<Role>,
    {
        self.inner.write().add_roles(roles);
    }

    /// Registers a resource. See [`Acl::add_resource`].
    pub fn add_resource(&self, resource: impl Into<Resource>) {
        self.inner.write().add_resource(resource);
    }

    /// Registers several resources. See [`Acl::add_resources`].
    pub fn add_resources<I>(&self, resources: I)
    where
        I: IntoIterator,
        I::Item: Into<Resource>,
    {
        self.inner.write().add_resources(resources);
    }

    /// Returns a handle to the registered role, if any.
    #[must_use]
    pub fn get_role(&self, name: &str) -> Option<Role> {
        self.inner.read().get_role(name)
    }

    /// Returns `true` if a role with this name is registered.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.inner.read().has_role(name)
    }

    /// Returns the registered resource, if any.
    #[must_use]
    pub fn get_resource(&self, name: &str) -> Option<Resource> {
        self.inner.read().get_resource(name)
    }

    /// Returns `true` if a resource with this name is registered.
    #[must_use]
    pub fn has_resource(&self, name: &str) -> bool {
        self.inner.read().has_resource(name)
    }

    // ─── Rules ──────────────────────────────────────────────────────

    /// Records an allow rule. See [`Acl::allow`].
    ///
    /// # Errors
    ///
    /// As [`Acl::allow`].
    pub fn allow(&self, role: &str, resources: &[&str], permissions: &[&str]) -> Result<()> {
        self.inner.write().allow(role, resources, permissions)
    }

    /// Records a deny rule. See [`Acl::deny`].
    ///
    /// # Errors
    ///
    /// As [`Acl::deny`].
    pub fn deny(&self, role: &str, resources: &[&str], permissions: &[&str]) -> Result<()> {
        self.inner.write().deny(role, resources, permissions)
    }

    /// Removes allow rules. See [`Acl::remove_allow`].
    ///
    /// # Errors
    ///
    /// As [`Acl::remove_allow`].
    pub fn remove_allow(
        &self,
        role: &str,
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        self.inner.write().remove_allow(role, resources, permissions)
    }

    /// Removes deny rules. See [`Acl::remove_deny`].
    ///
    /// # Errors
    ///
    /// As [`Acl::remove_deny`].
    pub fn remove_deny(
        &self,
        role: &str,
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        self.inner.write().remove_deny(role, resources, permissions)
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Answers the authorization query under a read lock.
    ///
    /// # Errors
    ///
    /// As [`Acl::is_allowed`].
    pub fn is_allowed(
        &self,
        role: &str,
        resource: Option<&str>,
        permission: Option<&str>,
    ) -> Result<bool> {
        self.inner.read().is_allowed(role, resource, permission)
    }

    /// Reports whether a deny rule covers the query, under a read lock.
    ///
    /// # Errors
    ///
    /// As [`Acl::is_denied`].
    pub fn is_denied(
        &self,
        role: &str,
        resource: Option<&str>,
        permission: Option<&str>,
    ) -> Result<bool> {
        self.inner.read().is_denied(role, resource, permission)
    }

    // ─── Persistence ────────────────────────────────────────────────

    /// Captures the rule tables. See [`Acl::snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> AclSnapshot {
        self.inner.read().snapshot()
    }

    /// Replays a snapshot. See [`Acl::restore`].
    ///
    /// # Errors
    ///
    /// As [`Acl::restore`].
    pub fn restore(&self, snapshot: &AclSnapshot) -> Result<()> {
        self.inner.write().restore(snapshot)
    }
}
