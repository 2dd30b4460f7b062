//! Role and permission policy
//!
//! Pure predicate functions over an explicit actor. The acting identity is
//! resolved once at the request boundary and threaded through every check;
//! nothing here reads ambient state or touches the database.

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of roles a user profile can carry.
///
/// Stored as text in the database; unknown strings fall back to `User` so
/// policy stays total over whatever rows exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        match self {
            Role::User => false,
            Role::Admin | Role::SuperAdmin => true,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        match self {
            Role::User | Role::Admin => false,
            Role::SuperAdmin => true,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "ADMIN" => Role::Admin,
            "SUPER_ADMIN" => Role::SuperAdmin,
            _ => Role::User,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::User => "USER".to_string(),
            Role::Admin => "ADMIN".to_string(),
            Role::SuperAdmin => "SUPER_ADMIN".to_string(),
        }
    }
}

/// The authenticated identity performing an operation.
///
/// A user without a profile row acts as `Role::User`; the boundary layer is
/// responsible for that defaulting before an `Actor` is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Admins edit published content directly, skipping the request workflow.
pub fn can_edit_directly(actor: &Actor) -> bool {
    actor.role.is_admin()
}

/// Admins delete published content directly, skipping the request workflow.
pub fn can_delete_directly(actor: &Actor) -> bool {
    actor.role.is_admin()
}

/// Ownership of an article, by author id.
pub fn owns(actor: &Actor, author_id: Uuid) -> bool {
    actor.user_id == author_id
}

/// Who may touch an article's mutation surface at all: the owner (whose
/// change becomes a pending request) or an admin (who mutates directly).
pub fn may_submit_edit_request(actor: &Actor, author_id: Uuid) -> bool {
    owns(actor, author_id) || actor.role.is_admin()
}

/// Reviewing pending edit/delete requests and article publication.
pub fn may_review_requests(actor: &Actor) -> bool {
    actor.role.is_admin()
}

/// Assigning and removing the admin role, and the user-management surface.
pub fn may_manage_roles(actor: &Actor) -> bool {
    actor.role.is_super_admin()
}

/// Deny with a descriptive Forbidden error unless the predicate holds.
pub fn require(allowed: bool, message: &str) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden {
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor::new(Uuid::new_v4(), role)
    }

    #[test]
    fn test_role_parsing_falls_back_to_user() {
        assert_eq!(Role::from("ADMIN"), Role::Admin);
        assert_eq!(Role::from("SUPER_ADMIN"), Role::SuperAdmin);
        assert_eq!(Role::from("USER"), Role::User);
        assert_eq!(Role::from("moderator"), Role::User);
        assert_eq!(Role::from(""), Role::User);
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::User, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::from(String::from(role)), role);
        }
    }

    #[test]
    fn test_admin_predicates() {
        assert!(!actor(Role::User).role.is_admin());
        assert!(actor(Role::Admin).role.is_admin());
        assert!(actor(Role::SuperAdmin).role.is_admin());

        assert!(!actor(Role::Admin).role.is_super_admin());
        assert!(actor(Role::SuperAdmin).role.is_super_admin());
    }

    #[test]
    fn test_direct_mutation_requires_admin() {
        let user = actor(Role::User);
        let admin = actor(Role::Admin);

        assert!(!can_edit_directly(&user));
        assert!(!can_delete_directly(&user));
        assert!(can_edit_directly(&admin));
        assert!(can_delete_directly(&admin));
    }

    #[test]
    fn test_ownership() {
        let a = actor(Role::User);
        assert!(owns(&a, a.user_id));
        assert!(!owns(&a, Uuid::new_v4()));
    }

    #[test]
    fn test_submit_edit_request() {
        let owner = actor(Role::User);
        let stranger = actor(Role::User);
        let admin = actor(Role::Admin);

        assert!(may_submit_edit_request(&owner, owner.user_id));
        assert!(!may_submit_edit_request(&stranger, owner.user_id));
        // Admins pass the gate but take the direct path instead
        assert!(may_submit_edit_request(&admin, owner.user_id));
    }

    #[test]
    fn test_review_and_role_management_gates() {
        let user = actor(Role::User);
        let admin = actor(Role::Admin);
        let super_admin = actor(Role::SuperAdmin);

        assert!(!may_review_requests(&user));
        assert!(may_review_requests(&admin));
        assert!(may_review_requests(&super_admin));

        assert!(!may_manage_roles(&user));
        assert!(!may_manage_roles(&admin));
        assert!(may_manage_roles(&super_admin));
    }

    #[test]
    fn test_require_denies_with_message() {
        let err = require(false, "Only admins can approve requests").unwrap_err();
        match err {
            AppError::Forbidden { message } => {
                assert_eq!(message, "Only admins can approve requests")
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
        assert!(require(true, "unused").is_ok());
    }
}
