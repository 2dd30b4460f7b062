//! Like/dislike reaction entity
//!
//! One row per (article, user); the unique pair makes "never in both the
//! likes and dislikes sets" structural rather than enforced in code.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reaction kind enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// The kind this one is replaced by on an opposite toggle
    pub fn opposite(&self) -> Self {
        match self {
            ReactionKind::Like => ReactionKind::Dislike,
            ReactionKind::Dislike => ReactionKind::Like,
        }
    }
}

impl From<&str> for ReactionKind {
    fn from(s: &str) -> Self {
        match s {
            "dislike" => ReactionKind::Dislike,
            _ => ReactionKind::Like,
        }
    }
}

impl From<String> for ReactionKind {
    fn from(s: String) -> Self {
        ReactionKind::from(s.as_str())
    }
}

impl From<ReactionKind> for String {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => "like".to_string(),
            ReactionKind::Dislike => "dislike".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub article_id: Uuid,

    pub user_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub kind: String,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn kind(&self) -> ReactionKind {
        ReactionKind::from(self.kind.as_str())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::article::Entity",
        from = "Column::ArticleId",
        to = "super::article::Column::Id"
    )]
    Article,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
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

    #[test]
    fn test_kind_roundtrip() {
        for kind in [ReactionKind::Like, ReactionKind::Dislike] {
            assert_eq!(ReactionKind::from(String::from(kind)), kind);
        }
    }

    #[test]
    fn test_opposite() {
        assert_eq!(ReactionKind::Like.opposite(), ReactionKind::Dislike);
        assert_eq!(ReactionKind::Dislike.opposite(), ReactionKind::Like);
    }
}
