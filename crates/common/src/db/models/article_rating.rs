//! Article rating entity
//!
//! One row per (article, user) with upsert semantics: re-rating overwrites
//! the score instead of creating a duplicate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ratings at or above this mean mark an article as popular
pub const POPULAR_THRESHOLD: f64 = 4.0;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article_ratings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub article_id: Uuid,

    pub user_id: Uuid,

    /// Integer score in 1..=5
    pub score: i16,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
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

/// Normalize a submitted score: missing or out-of-range becomes the default 5.
pub fn normalize_score(score: Option<i16>) -> i16 {
    match score {
        Some(s) if (1..=5).contains(&s) => s,
        _ => crate::DEFAULT_RATING_SCORE,
    }
}

/// Arithmetic mean of scores rounded to 2 decimals, 0.0 when unrated.
pub fn average_score(scores: &[i16]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: i64 = scores.iter().map(|&s| s as i64).sum();
    let mean = sum as f64 / scores.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// Popularity cutoff: exactly 4.0 qualifies, anything below does not.
pub fn is_popular(rating: f64) -> bool {
    rating >= POPULAR_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_scores() {
        assert_eq!(average_score(&[5, 3, 4]), 4.0);
        assert_eq!(average_score(&[5]), 5.0);
        assert_eq!(average_score(&[1, 2]), 1.5);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        // 1 + 2 + 5 = 8 / 3 = 2.666... -> 2.67
        assert_eq!(average_score(&[1, 2, 5]), 2.67);
    }

    #[test]
    fn test_average_empty_is_zero() {
        assert_eq!(average_score(&[]), 0.0);
    }

    #[test]
    fn test_popularity_threshold() {
        assert!(is_popular(4.0));
        assert!(is_popular(4.5));
        assert!(!is_popular(3.99));
        assert!(!is_popular(0.0));
    }

    #[test]
    fn test_normalize_score() {
        assert_eq!(normalize_score(Some(3)), 3);
        assert_eq!(normalize_score(Some(1)), 1);
        assert_eq!(normalize_score(Some(5)), 5);
        assert_eq!(normalize_score(Some(0)), 5);
        assert_eq!(normalize_score(Some(6)), 5);
        assert_eq!(normalize_score(Some(-3)), 5);
        assert_eq!(normalize_score(None), 5);
    }
}
