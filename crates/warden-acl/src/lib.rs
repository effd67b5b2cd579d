//! Role-based access control with deny-overrides-allow evaluation.
//!
//! This crate provides the `warden` permission engine: role and resource
//! registries, allow/deny rule tables, and the evaluation algorithm that
//! answers authorization queries.
//!
//! # Permission Model
//!
//! ```text
//! Decision = ¬Denied(role, resource, permission)
//!          ∧ Allowed(role, resource, permission)
//! ```
//!
//! | Piece | Type | Holds |
//! |-------|------|-------|
//! | [`Role`] | Shared handle | Permission labels + parent link (inheritance) |
//! | [`Resource`] | Value | A name — rules are scoped to it |
//! | [`Acl`] | Engine | Registries + allow/deny tables + evaluation |
//! | [`SharedAcl`] | Service | `Acl` behind a single writer lock |
//!
//! # Rule Specificity
//!
//! A rule for a role covers one of three tiers, from broadest to narrowest:
//!
//! 1. **Blanket** — no resource named: everything, everywhere.
//! 2. **Resource-scoped** — a resource with no permissions: everything on
//!    that resource.
//! 3. **Permission-scoped** — explicit permissions on a resource.
//!
//! Deny rules share the same tiers and always win over allow rules. An
//! absent rule is not an implicit grant: roles start with no access.
//!
//! # Example
//!
//! ```
//! use warden_acl::{Acl, Role};
//!
//! let admin = Role::new("admin");
//! admin.add_permission("manage");
//!
//! let editor = Role::new("editor");
//! editor.add_permission("edit");
//! editor.inherits_from(&admin);
//!
//! let mut acl = Acl::new();
//! acl.add_roles([admin, editor]);
//! acl.allow("admin", &[], &[])?;                       // blanket
//! acl.allow("editor", &["article"], &["edit"])?;       // permission-scoped
//!
//! assert!(acl.is_allowed("admin", Some("article"), Some("manage"))?);
//! assert!(acl.is_allowed("editor", Some("article"), Some("edit"))?);
//! assert!(!acl.is_allowed("editor", Some("article"), Some("manage"))?);
//!
//! acl.deny("editor", &["article"], &[])?;              // deny wins
//! assert!(!acl.is_allowed("editor", Some("article"), Some("edit"))?);
//! # Ok::<(), warden_acl::AclError>(())
//! ```
//!
//! # Design Principles
//!
//! - **Deny wins** — a deny rule defeats any allow rule for the same query.
//! - **Explicit registry** — the engine is an instantiable object passed to
//!   whatever layer gates access; there is no process-wide singleton.
//! - **Pure queries** — `is_allowed`/`is_denied` never mutate the engine.

pub mod acl;
pub mod error;
pub mod policy;
pub mod resource;
pub mod role;
pub mod shared;

pub use acl::{Acl, AclSnapshot};
pub use error::{AclError, Result};
pub use policy::AccessPolicy;
pub use resource::Resource;
pub use role::Role;
pub use shared::SharedAcl;
