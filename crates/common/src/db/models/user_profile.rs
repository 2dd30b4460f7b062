//! User profile entity carrying role and ban state
//!
//! One-to-one with users, created lazily on registration (and on first
//! role assignment). A user without a profile row acts as role USER,
//! not banned.

use crate::policy::Role;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub user_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub role: String,

    pub is_banned: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the role as the closed enum (unknown text falls back to USER)
    pub fn role(&self) -> Role {
        Role::from(self.role.as_str())
    }
}

/// Role of a possibly-absent profile: the safe default is USER.
pub fn role_of(profile: Option<&Model>) -> Role {
    profile.map(Model::role).unwrap_or(Role::User)
}

/// Ban flag of a possibly-absent profile: absent means not banned.
pub fn is_banned(profile: Option<&Model>) -> bool {
    profile.map(|p| p.is_banned).unwrap_or(false)
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(role: &str, banned: bool) -> Model {
        Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: role.to_string(),
            is_banned: banned,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(profile("ADMIN", false).role(), Role::Admin);
        assert_eq!(profile("SUPER_ADMIN", false).role(), Role::SuperAdmin);
        assert_eq!(profile("USER", false).role(), Role::User);
        assert_eq!(profile("bogus", false).role(), Role::User);
    }

    #[test]
    fn test_absent_profile_defaults() {
        assert_eq!(role_of(None), Role::User);
        assert!(!is_banned(None));

        let p = profile("ADMIN", true);
        assert_eq!(role_of(Some(&p)), Role::Admin);
        assert!(is_banned(Some(&p)));
    }
}
