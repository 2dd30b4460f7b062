//! SeaORM entity models
//!
//! Database entities for Quillpress

mod article;
mod article_delete_request;
mod article_edit_request;
mod article_rating;
mod bookmark;
mod category;
mod comment;
mod reaction;
mod user;
mod user_profile;

pub use user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as User,
};

pub use user_profile::{
    is_banned as profile_is_banned, role_of as profile_role, ActiveModel as UserProfileActiveModel,
    Column as UserProfileColumn, Entity as UserProfileEntity, Model as UserProfile,
};

pub use category::{
    slugify, ActiveModel as CategoryActiveModel, Column as CategoryColumn,
    Entity as CategoryEntity, Model as Category,
};

pub use article::{
    merge_image, ActiveModel as ArticleActiveModel, Column as ArticleColumn,
    Entity as ArticleEntity, Model as Article,
};

pub use reaction::{
    ActiveModel as ReactionActiveModel, Column as ReactionColumn, Entity as ReactionEntity,
    Model as Reaction, ReactionKind,
};

pub use article_rating::{
    average_score, is_popular, normalize_score, ActiveModel as ArticleRatingActiveModel,
    Column as ArticleRatingColumn, Entity as ArticleRatingEntity, Model as ArticleRating,
    POPULAR_THRESHOLD,
};

pub use bookmark::{
    ActiveModel as BookmarkActiveModel, Column as BookmarkColumn, Entity as BookmarkEntity,
    Model as Bookmark,
};

pub use comment::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as CommentEntity,
    Model as Comment,
};

pub use article_edit_request::{
    ActiveModel as ArticleEditRequestActiveModel, Column as ArticleEditRequestColumn,
    Entity as ArticleEditRequestEntity, Model as ArticleEditRequest,
};

pub use article_delete_request::{
    ActiveModel as ArticleDeleteRequestActiveModel, Column as ArticleDeleteRequestColumn,
    Entity as ArticleDeleteRequestEntity, Model as ArticleDeleteRequest,
};
