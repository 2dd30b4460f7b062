//! Article edit request entity
//!
//! A full proposed-field snapshot submitted by a non-admin owner. The live
//! article is untouched until an admin approves; pending requests cascade
//! away with their article.

use crate::moderation::{EditSnapshot, ReviewStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article_edit_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub article_id: Uuid,

    /// The owner who submitted the request
    pub user_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    pub category_id: Uuid,

    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub summary: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

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

    /// The proposed fields as a snapshot for the workflow
    pub fn snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            title: self.title.clone(),
            category_id: self.category_id,
            image_url: self.image_url.clone(),
            summary: self.summary.clone(),
            content: self.content.clone(),
        }
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
