//! Rule violation errors.
//!
//! Every fallible operation on [`Acl`](crate::Acl) raises [`AclError`]
//! synchronously to the caller; there is no retry or recovery inside the
//! engine. The caller decides whether to register the missing role or
//! permission and retry, or to treat the error as a fatal misconfiguration.
//!
//! Note the asymmetry with ordinary denial: `is_allowed(..) == false` is the
//! normal "access denied" outcome and is never an error. An [`AclError`]
//! means the rule set itself was misused.

use thiserror::Error;

/// Result type alias for ACL operations.
pub type Result<T> = std::result::Result<T, AclError>;

/// A violation of the rule-registry contract.
///
/// Callers can match on the variant, or use [`code`](Self::code) for
/// machine-readable handling.
///
/// # Example
///
/// ```
/// use warden_acl::AclError;
///
/// let err = AclError::UnknownRole("ghost".to_string());
/// assert!(err.to_string().contains("ghost"));
/// assert_eq!(err.code(), "ACL_UNKNOWN_ROLE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    /// A referenced role was never added to the registry.
    #[error("role '{0}' has not been added")]
    UnknownRole(String),

    /// An allow/deny rule names a permission the role does not hold,
    /// directly or through inheritance.
    #[error("role '{role}' does not hold permission '{permission}'")]
    UngrantedPermission {
        /// The role the rule was recorded for.
        role: String,
        /// The permission the role never held.
        permission: String,
    },

    /// A removal was attempted for a role with no recorded rules.
    #[error("no rules have been recorded for role '{0}'")]
    NoRuleRecord(String),
}

impl AclError {
    /// Returns a stable, machine-readable error code.
    ///
    /// Codes are UPPER_SNAKE_CASE, `ACL_`-prefixed, and part of the API
    /// contract (changing one is a breaking change).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownRole(_) => "ACL_UNKNOWN_ROLE",
            Self::UngrantedPermission { .. } => "ACL_UNGRANTED_PERMISSION",
            Self::NoRuleRecord(_) => "ACL_NO_RULE_RECORD",
        }
    }

    /// Returns whether the caller can recover by fixing the registry.
    ///
    /// All rule violations are recoverable in that sense: register the
    /// missing role, grant the permission, or record a rule first, then
    /// retry the call.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_display() {
        let err = AclError::UnknownRole("ghost".to_string());
        let msg = err.to_string();
        assert!(msg.contains("ghost"), "got: {msg}");
        assert!(msg.contains("has not been added"), "got: {msg}");
    }

    #[test]
    fn ungranted_permission_display() {
        let err = AclError::UngrantedPermission {
            role: "editor".to_string(),
            permission: "publish".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("editor"), "got: {msg}");
        assert!(msg.contains("publish"), "got: {msg}");
    }

    #[test]
    fn no_rule_record_display() {
        let err = AclError::NoRuleRecord("editor".to_string());
        let msg = err.to_string();
        assert!(msg.contains("no rules"), "got: {msg}");
        assert!(msg.contains("editor"), "got: {msg}");
    }

    #[test]
    fn codes_are_stable_and_prefixed() {
        let errors = [
            AclError::UnknownRole("a".to_string()),
            AclError::UngrantedPermission {
                role: "a".to_string(),
                permission: "b".to_string(),
            },
            AclError::NoRuleRecord("a".to_string()),
        ];
        for err in &errors {
            let code = err.code();
            assert!(code.starts_with("ACL_"), "got: {code}");
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'),
                "got: {code}"
            );
        }
    }

    #[test]
    fn all_variants_recoverable() {
        assert!(AclError::UnknownRole("a".to_string()).is_recoverable());
        assert!(AclError::NoRuleRecord("a".to_string()).is_recoverable());
    }
}
