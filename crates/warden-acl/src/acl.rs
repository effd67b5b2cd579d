//! The access control engine.
//!
//! [`Acl`] owns the role and resource registries plus two rule tables
//! (allow and deny) keyed by role name. Rules have three specificity tiers,
//! expressed by how much of a table entry is populated:
//!
//! ```text
//! allowed[role] absent              → role never mentioned (no access)
//! allowed[role] = {}                → blanket rule (everything, everywhere)
//! allowed[role][resource] = {}      → unconditional for that resource
//! allowed[role][resource] = {p, ..} → permission-scoped for that resource
//! ```
//!
//! The deny table has the same shape. Evaluation order:
//!
//! ```text
//! is_allowed(role, resource, permission)
//!     ├── role registered?           → error if not
//!     ├── is_denied(..)?             → false (deny always wins)
//!     └── allow tiers, broadest first
//! ```
//!
//! # Example
//!
//! ```
//! use warden_acl::{Acl, Role};
//!
//! let editor = Role::new("editor");
//! editor.add_permission("edit");
//!
//! let mut acl = Acl::new();
//! acl.add_role(editor);
//! acl.allow("editor", &["article"], &["edit"])?;
//!
//! assert!(acl.is_allowed("editor", Some("article"), Some("edit"))?);
//! assert!(!acl.is_allowed("editor", Some("article"), Some("delete"))?);
//!
//! acl.deny("editor", &["article"], &[])?;
//! assert!(!acl.is_allowed("editor", Some("article"), Some("edit"))?);
//! # Ok::<(), warden_acl::AclError>(())
//! ```

use crate::error::{AclError, Result};
use crate::resource::Resource;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Rule rows for one role: resource name → permission labels.
type ResourceRules = HashMap<String, HashSet<String>>;

/// A full rule table: role name → resource rules.
type RuleTable = HashMap<String, ResourceRules>;

/// Which table a rule operation targets.
#[derive(Clone, Copy)]
enum RuleKind {
    Allow,
    Deny,
}

impl RuleKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

/// Role and resource registries with allow/deny rule evaluation.
///
/// Roles must be registered before rules reference them; resources
/// auto-register on first reference in [`allow`](Self::allow) /
/// [`deny`](Self::deny). Queries never mutate the registries.
///
/// An `Acl` is an ordinary owned value. For a shared, concurrently queried
/// service, wrap it in [`SharedAcl`](crate::SharedAcl).
#[derive(Debug, Default)]
pub struct Acl {
    roles: HashMap<String, Role>,
    resources: HashMap<String, Resource>,
    allowed: RuleTable,
    denied: RuleTable,
}

impl Acl {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Registries ─────────────────────────────────────────────────

    /// Registers a role, keyed by name.
    ///
    /// Accepts a [`Role`] handle or a bare name (auto-wrapped). Re-adding a
    /// name overwrites the stored role; rules are not merged.
    pub fn add_role(&mut self, role: impl Into<Role>) -> &mut Self {
        let role = role.into();
        self.roles.insert(role.name(), role);
        self
    }

    /// Registers several roles at once.
    pub fn add_roles<I>(&mut self, roles: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Role>,
    {
        for role in roles {
            self.add_role(role);
        }
        self
    }

    /// Registers a resource, keyed by name.
    pub fn add_resource(&mut self, resource: impl Into<Resource>) -> &mut Self {
        let resource = resource.into();
        self.resources.insert(resource.name().to_string(), resource);
        self
    }

    /// Registers several resources at once.
    pub fn add_resources<I>(&mut self, resources: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Resource>,
    {
        for resource in resources {
            self.add_resource(resource);
        }
        self
    }

    /// Returns a handle to the registered role, if any.
    #[must_use]
    pub fn get_role(&self, name: &str) -> Option<Role> {
        self.roles.get(name).cloned()
    }

    /// Returns `true` if a role with this name is registered.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    /// Returns the registered resource, if any.
    #[must_use]
    pub fn get_resource(&self, name: &str) -> Option<Resource> {
        self.resources.get(name).cloned()
    }

    /// Returns `true` if a resource with this name is registered.
    #[must_use]
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    // ─── Rule Recording ─────────────────────────────────────────────

    /// Records an allow rule for one role.
    ///
    /// An empty `resources` slice records a blanket rule: the role is
    /// allowed everything (permissions are ignored in that case, since
    /// there is no resource entry to scope them to). With resources given,
    /// each resource entry is created (overwriting any previous entry for
    /// it) and scoped to the given permissions; an empty `permissions`
    /// slice leaves the entry unconditional for that resource.
    ///
    /// Unregistered resources auto-register. Each permission must be held
    /// by the role, directly or through inheritance.
    ///
    /// # Errors
    ///
    /// [`AclError::UnknownRole`] if the role is not registered;
    /// [`AclError::UngrantedPermission`] if a permission was never granted
    /// to the role. On error no rule is recorded.
    pub fn allow(&mut self, role: &str, resources: &[&str], permissions: &[&str]) -> Result<()> {
        self.record_rules(RuleKind::Allow, role, resources, permissions)
    }

    /// Records the same allow rule for several roles.
    ///
    /// # Errors
    ///
    /// As [`allow`](Self::allow); roles before the failing one keep their
    /// recorded rules.
    pub fn allow_many(
        &mut self,
        roles: &[&str],
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        for role in roles {
            self.record_rules(RuleKind::Allow, role, resources, permissions)?;
        }
        Ok(())
    }

    /// Records a deny rule for one role. Exact mirror of
    /// [`allow`](Self::allow), writing the deny table.
    ///
    /// # Errors
    ///
    /// As [`allow`](Self::allow).
    pub fn deny(&mut self, role: &str, resources: &[&str], permissions: &[&str]) -> Result<()> {
        self.record_rules(RuleKind::Deny, role, resources, permissions)
    }

    /// Records the same deny rule for several roles.
    ///
    /// # Errors
    ///
    /// As [`allow`](Self::allow).
    pub fn deny_many(
        &mut self,
        roles: &[&str],
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        for role in roles {
            self.record_rules(RuleKind::Deny, role, resources, permissions)?;
        }
        Ok(())
    }

    fn record_rules(
        &mut self,
        kind: RuleKind,
        role: &str,
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        let role_obj = self
            .roles
            .get(role)
            .cloned()
            .ok_or_else(|| AclError::UnknownRole(role.to_string()))?;

        // Permissions only attach to resource entries, so they are neither
        // validated nor recorded without one.
        if !resources.is_empty() {
            for permission in permissions {
                if !role_obj.has_permission(permission) {
                    return Err(AclError::UngrantedPermission {
                        role: role.to_string(),
                        permission: (*permission).to_string(),
                    });
                }
            }
        }

        for resource in resources {
            if !self.resources.contains_key(*resource) {
                self.resources
                    .insert((*resource).to_string(), Resource::new(*resource));
            }
        }

        let table = match kind {
            RuleKind::Allow => &mut self.allowed,
            RuleKind::Deny => &mut self.denied,
        };
        let entry = table.entry(role.to_string()).or_default();
        for resource in resources {
            let perms: HashSet<String> =
                permissions.iter().map(|p| (*p).to_string()).collect();
            entry.insert((*resource).to_string(), perms);
        }

        debug!(
            "acl: {} rule recorded for role '{}' ({} resources, {} permissions)",
            kind.as_str(),
            role,
            resources.len(),
            permissions.len()
        );
        Ok(())
    }

    // ─── Rule Removal ───────────────────────────────────────────────

    /// Removes allow rules for one role.
    ///
    /// No resources → the role's whole allow entry is dropped. Resources
    /// without permissions → those resource entries are dropped. Both →
    /// only the named permissions are removed. Entries emptied by the
    /// removal are pruned, so a fully drained rule reads as "no rule"
    /// rather than flipping into a blanket grant.
    ///
    /// # Errors
    ///
    /// [`AclError::UnknownRole`] if the role is not registered;
    /// [`AclError::NoRuleRecord`] if the role has no allow entry.
    pub fn remove_allow(
        &mut self,
        role: &str,
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        self.remove_rules(RuleKind::Allow, role, resources, permissions)
    }

    /// Removes the same allow rules for several roles.
    ///
    /// # Errors
    ///
    /// As [`remove_allow`](Self::remove_allow).
    pub fn remove_allow_many(
        &mut self,
        roles: &[&str],
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        for role in roles {
            self.remove_rules(RuleKind::Allow, role, resources, permissions)?;
        }
        Ok(())
    }

    /// Removes deny rules for one role. Mirror of
    /// [`remove_allow`](Self::remove_allow).
    ///
    /// # Errors
    ///
    /// As [`remove_allow`](Self::remove_allow).
    pub fn remove_deny(
        &mut self,
        role: &str,
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        self.remove_rules(RuleKind::Deny, role, resources, permissions)
    }

    /// Removes the same deny rules for several roles.
    ///
    /// # Errors
    ///
    /// As [`remove_allow`](Self::remove_allow).
    pub fn remove_deny_many(
        &mut self,
        roles: &[&str],
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        for role in roles {
            self.remove_rules(RuleKind::Deny, role, resources, permissions)?;
        }
        Ok(())
    }

    fn remove_rules(
        &mut self,
        kind: RuleKind,
        role: &str,
        resources: &[&str],
        permissions: &[&str],
    ) -> Result<()> {
        if !self.roles.contains_key(role) {
            return Err(AclError::UnknownRole(role.to_string()));
        }

        let table = match kind {
            RuleKind::Allow => &mut self.allowed,
            RuleKind::Deny => &mut self.denied,
        };
        if !table.contains_key(role) {
            return Err(AclError::NoRuleRecord(role.to_string()));
        }

        if resources.is_empty() {
            table.remove(role);
            debug!("acl: all {} rules removed for role '{role}'", kind.as_str());
            return Ok(());
        }

        if let Some(entry) = table.get_mut(role) {
            let mut resource_entry_removed = false;
            for resource in resources {
                if permissions.is_empty() {
                    resource_entry_removed |= entry.remove(*resource).is_some();
                } else if let Some(perms) = entry.get_mut(*resource) {
                    for permission in permissions {
                        perms.remove(*permission);
                    }
                    if perms.is_empty() {
                        entry.remove(*resource);
                        resource_entry_removed = true;
                    }
                }
            }
            // Prune only entries this call emptied: a deliberately blanket
            // (empty-from-the-start) entry must survive unrelated removals.
            if resource_entry_removed && entry.is_empty() {
                table.remove(role);
            }
        }

        debug!("acl: {} rules removed for role '{role}'", kind.as_str());
        Ok(())
    }

    // ─── Evaluation ─────────────────────────────────────────────────

    /// Answers the authorization query.
    ///
    /// Deny takes absolute precedence: if [`is_denied`](Self::is_denied)
    /// reports `true` for the same arguments the answer is `false`,
    /// regardless of any allow rule. Otherwise the role's allow entry is
    /// consulted, broadest tier first: a blanket entry allows everything,
    /// an unconditional resource entry allows every permission on that
    /// resource, and a permission-scoped entry allows a permission the role
    /// actually holds (directly or through inheritance).
    ///
    /// An absent rule is not an implicit grant: a role with no allow entry
    /// is allowed nothing. Unknown resources are evaluated as-is and are
    /// not registered by the query.
    ///
    /// # Errors
    ///
    /// [`AclError::UnknownRole`] if the role is not registered.
    pub fn is_allowed(
        &self,
        role: &str,
        resource: Option<&str>,
        permission: Option<&str>,
    ) -> Result<bool> {
        let role_obj = self
            .roles
            .get(role)
            .cloned()
            .ok_or_else(|| AclError::UnknownRole(role.to_string()))?;

        if self.is_denied(role, resource, permission)? {
            debug!("acl: deny rule takes precedence for role '{role}'");
            return Ok(false);
        }

        let Some(allowed) = self.allowed.get(role) else {
            return Ok(false);
        };

        let result = match (resource, permission) {
            (Some(res), Some(perm)) => {
                allowed.is_empty()
                    || allowed.get(res).is_some_and(|perms| perms.is_empty())
                    || (role_obj.has_permission(perm)
                        && allowed.get(res).is_some_and(|perms| perms.contains(perm)))
            }
            (Some(res), None) => allowed.is_empty() || allowed.contains_key(res),
            // Any recorded entry at all answers an unscoped query, and a
            // permission without a resource cannot be scoped any further.
            (None, _) => true,
        };
        Ok(result)
    }

    /// Reports whether a deny rule covers the query.
    ///
    /// A totally empty deny entry is a blanket denial of everything. A
    /// non-empty entry denies any unscoped query; with a resource given it
    /// denies when that resource's entry is unconditional (empty set) or
    /// explicitly lists the named permission. Unlike rule recording, no
    /// permission-ownership check applies; a denied permission need never
    /// have been granted.
    ///
    /// # Errors
    ///
    /// [`AclError::UnknownRole`] if the role is not registered.
    pub fn is_denied(
        &self,
        role: &str,
        resource: Option<&str>,
        permission: Option<&str>,
    ) -> Result<bool> {
        if !self.roles.contains_key(role) {
            return Err(AclError::UnknownRole(role.to_string()));
        }

        let Some(denied) = self.denied.get(role) else {
            return Ok(false);
        };
        if denied.is_empty() {
            return Ok(true);
        }
        let Some(resource) = resource else {
            return Ok(true);
        };
        match denied.get(resource) {
            Some(perms) if perms.is_empty() => Ok(true),
            Some(perms) => Ok(permission.is_some_and(|p| perms.contains(p))),
            None => Ok(false),
        }
    }

    // ─── Persistence ────────────────────────────────────────────────

    /// Captures both rule tables for persistence.
    ///
    /// Role and resource registries are not captured: a snapshot is
    /// restored into an engine whose roles are already registered, and
    /// resources re-register during replay.
    #[must_use]
    pub fn snapshot(&self) -> AclSnapshot {
        AclSnapshot {
            allowed: self.allowed.clone(),
            denied: self.denied.clone(),
        }
    }

    /// Replays a snapshot through [`allow`](Self::allow) /
    /// [`deny`](Self::deny).
    ///
    /// Existing rules are preserved (additive merge), and every replayed
    /// rule re-validates against the current role registry.
    ///
    /// # Errors
    ///
    /// [`AclError::UnknownRole`] if a snapshot role is not registered here;
    /// [`AclError::UngrantedPermission`] if a snapshot permission is no
    /// longer held by its role.
    pub fn restore(&mut self, snapshot: &AclSnapshot) -> Result<()> {
        for (kind, rules) in [
            (RuleKind::Allow, &snapshot.allowed),
            (RuleKind::Deny, &snapshot.denied),
        ] {
            for (role, resources) in rules {
                if resources.is_empty() {
                    self.record_rules(kind, role, &[], &[])?;
                }
                for (resource, permissions) in resources {
                    let perms: Vec<&str> = permissions.iter().map(String::as_str).collect();
                    self.record_rules(kind, role, &[resource.as_str()], &perms)?;
                }
            }
        }
        Ok(())
    }
}

/// A serializable capture of an engine's allow and deny tables.
///
/// Produced by [`Acl::snapshot`] and replayed by [`Acl::restore`]; the
/// shape is the rule tables verbatim, so the three specificity tiers
/// survive a round trip through any serde format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclSnapshot {
    /// Allow table: role name → resource name → permission labels.
    pub allowed: HashMap<String, HashMap<String, HashSet<String>>>,
    /// Deny table, same shape.
    pub denied: HashMap<String, HashMap<String, HashSet<String>>>,
}
