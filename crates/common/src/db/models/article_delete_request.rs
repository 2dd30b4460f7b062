//! Article delete request entity
//!
//! Same review shape as an edit request, no payload. The article FK is
//! nullable and detaches on delete so a resolved request survives the
//! article it removed.

use crate::moderation::ReviewStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article_delete_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Detached (NULL) once the article is deleted
    pub article_id: Option<Uuid>,

    /// The owner who submitted the request
    pub user_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    pub reviewed_by: Option<Uuid>,

    pub reviewed_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Get the review status as an enum
    pub fn review_status(&self) -> ReviewStatus {
        ReviewStatus::from(self.status.as_str())
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
