//! Reader interaction handlers: likes, dislikes, bookmarks, ratings,
//! and comments
//!
//! Toggles and ratings work against any existing article; only comments
//! demand public visibility. Responses carry the resulting state plus the
//! counts the caller needs to update its view without a second round trip.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use quillpress_common::{
    auth::AuthContext,
    db::{
        models::{normalize_score, Article, ReactionKind},
        Repository,
    },
    errors::{AppError, Result},
    metrics::record_reaction,
};

use super::redirect_target;

#[derive(Debug, Default, Deserialize)]
pub struct TogglePayload {
    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Serialize)]
pub struct ReactionResponse {
    pub article_id: Uuid,
    /// Whether the toggled membership is active afterwards
    pub active: bool,
    pub likes: u64,
    pub dislikes: u64,
    pub redirect_to: String,
}

/// Toggles only need the article to exist, so a user can still undo a
/// like or bookmark on an article that went back into review.
async fn require_article(repo: &Repository, article_id: Uuid) -> Result<Article> {
    repo.find_article_by_id(article_id)
        .await?
        .ok_or_else(|| AppError::ArticleNotFound {
            id: article_id.to_string(),
        })
}

/// Comments are the one interaction gated on public visibility.
fn ensure_commentable(article: &Article) -> Result<()> {
    if article.is_public() {
        Ok(())
    } else {
        Err(AppError::ArticleNotFound {
            id: article.id.to_string(),
        })
    }
}

async fn require_public_article(repo: &Repository, article_id: Uuid) -> Result<Article> {
    let article = require_article(repo, article_id).await?;
    ensure_commentable(&article)?;
    Ok(article)
}

async fn toggle(
    state: AppState,
    auth: AuthContext,
    article_id: Uuid,
    kind: ReactionKind,
    return_to: Option<String>,
) -> Result<Json<ReactionResponse>> {
    let repo = Repository::new(state.db.clone());
    require_article(&repo, article_id).await?;

    let active = repo.toggle_reaction(article_id, auth.user_id, kind).await?;
    let (likes, dislikes) = repo.reaction_counts(article_id).await?;

    record_reaction(&String::from(kind), active);

    Ok(Json(ReactionResponse {
        article_id,
        active,
        likes,
        dislikes,
        redirect_to: redirect_target(return_to, format!("/api/articles/{article_id}")),
    }))
}

/// Toggle a like; a standing dislike is removed first
pub async fn like_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    payload: Option<Json<TogglePayload>>,
) -> Result<Json<ReactionResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    toggle(state, auth, article_id, ReactionKind::Like, payload.return_to).await
}

/// Toggle a dislike; a standing like is removed first
pub async fn dislike_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    payload: Option<Json<TogglePayload>>,
) -> Result<Json<ReactionResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    toggle(state, auth, article_id, ReactionKind::Dislike, payload.return_to).await
}

#[derive(Serialize)]
pub struct BookmarkResponse {
    pub article_id: Uuid,
    pub bookmarked: bool,
    pub redirect_to: String,
}

/// Toggle a bookmark
pub async fn bookmark_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    payload: Option<Json<TogglePayload>>,
) -> Result<Json<BookmarkResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    let repo = Repository::new(state.db.clone());
    require_article(&repo, article_id).await?;

    let bookmarked = repo.toggle_bookmark(article_id, auth.user_id).await?;

    Ok(Json(BookmarkResponse {
        article_id,
        bookmarked,
        redirect_to: redirect_target(payload.return_to, format!("/api/articles/{article_id}")),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct RatePayload {
    /// Integer 1..=5; anything else falls back to the default
    pub score: Option<i16>,

    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Serialize)]
pub struct RateResponse {
    pub article_id: Uuid,
    /// The score that was stored after normalization
    pub score: i16,
    /// The article's mean rating afterwards
    pub rating: f64,
    pub redirect_to: String,
}

/// Rate an article; re-rating overwrites the previous score
pub async fn rate_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    payload: Option<Json<RatePayload>>,
) -> Result<Json<RateResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    let repo = Repository::new(state.db.clone());
    require_article(&repo, article_id).await?;

    let score = normalize_score(payload.score);
    repo.upsert_rating(article_id, auth.user_id, score).await?;
    let rating = repo.article_rating(article_id).await?;

    Ok(Json(RateResponse {
        article_id,
        score,
        rating,
        redirect_to: redirect_target(payload.return_to, format!("/api/articles/{article_id}")),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub content: String,

    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub article_id: Uuid,
    /// Absent when a blank submission was silently dropped
    pub comment_id: Option<Uuid>,
    pub redirect_to: String,
}

/// Post a comment. A submission that is blank after trimming is silently
/// ignored rather than rejected.
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<CommentResponse>> {
    let repo = Repository::new(state.db.clone());
    require_public_article(&repo, article_id).await?;

    let trimmed = payload.content.trim();
    let comment_id = if trimmed.is_empty() {
        None
    } else {
        let comment = repo
            .add_comment(article_id, auth.user_id, trimmed.to_string())
            .await?;
        metrics::counter!(format!(
            "{}_comments_total",
            quillpress_common::metrics::METRICS_PREFIX
        ))
        .increment(1);
        Some(comment.id)
    };

    Ok(Json(CommentResponse {
        article_id,
        comment_id,
        redirect_to: redirect_target(payload.return_to, format!("/api/articles/{article_id}")),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(approved: bool, published: bool) -> Article {
        Article {
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
    fn test_comments_require_public_article() {
        assert!(ensure_commentable(&article(true, true)).is_ok());
        // Re-locked after an approved edit: no longer commentable
        assert!(ensure_commentable(&article(false, false)).is_err());
        assert!(ensure_commentable(&article(true, false)).is_err());
    }

    #[test]
    fn test_commentable_denial_is_not_found() {
        let err = ensure_commentable(&article(false, false)).unwrap_err();
        assert!(matches!(err, AppError::ArticleNotFound { .. }));
    }
}
