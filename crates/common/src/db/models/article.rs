//! Article entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub author_id: Uuid,

    pub category_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    /// Stored-file reference set by the upload collaborator
    #[sea_orm(column_type = "Text", nullable)]
    pub image: Option<String>,

    /// External image fallback, used when no file was uploaded
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,

    /// Short excerpt shown on listing surfaces
    #[sea_orm(column_type = "Text")]
    pub summary: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub is_approved: bool,

    pub is_published: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Visible on public listing surfaces only when approved and published
    pub fn is_public(&self) -> bool {
        self.is_approved && self.is_published
    }

    /// The image to display: an uploaded file takes precedence over the URL
    pub fn display_image(&self) -> Option<&str> {
        self.image.as_deref().or(self.image_url.as_deref())
    }
}

/// An edit that carries no new upload keeps the stored file.
pub fn merge_image(submitted: Option<String>, current: Option<String>) -> Option<String> {
    submitted.or(current)
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,

    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::article_rating::Entity")]
    Ratings,

    #[sea_orm(has_many = "super::reaction::Entity")]
    Reactions,

    #[sea_orm(has_many = "super::bookmark::Entity")]
    Bookmarks,

    #[sea_orm(has_many = "super::article_edit_request::Entity")]
    EditRequests,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::article_rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(approved: bool, published: bool) -> Model {
        Model {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            title: "Title".into(),
            image: None,
            image_url: None,
            summary: "Summary".into(),
            content: "Content".into(),
            is_approved: approved,
            is_published: published,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_public_requires_both_flags() {
        assert!(article(true, true).is_public());
        assert!(!article(true, false).is_public());
        assert!(!article(false, true).is_public());
        assert!(!article(false, false).is_public());
    }

    #[test]
    fn test_uploaded_image_takes_precedence() {
        let mut a = article(true, true);
        assert_eq!(a.display_image(), None);

        a.image_url = Some("https://example.com/fallback.png".into());
        assert_eq!(a.display_image(), Some("https://example.com/fallback.png"));

        a.image = Some("uploads/cover.png".into());
        assert_eq!(a.display_image(), Some("uploads/cover.png"));
    }

    #[test]
    fn test_merge_image_keeps_stored_file_when_absent() {
        assert_eq!(
            merge_image(None, Some("uploads/old.png".into())),
            Some("uploads/old.png".to_string())
        );
        assert_eq!(
            merge_image(Some("uploads/new.png".into()), Some("uploads/old.png".into())),
            Some("uploads/new.png".to_string())
        );
        assert_eq!(merge_image(None, None), None);
    }
}
