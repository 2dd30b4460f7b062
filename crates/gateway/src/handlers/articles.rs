//! Article handlers: listings, detail, and the mutation surface
//!
//! Reads are public and personalize when a viewer is present. Mutations
//! split on role: admins edit and delete directly, non-admin owners get a
//! pending request an admin resolves later.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use quillpress_common::{
    auth::{AuthContext, OptionalAuthContext},
    db::{
        models::{Article, Category},
        AuthorListing, Repository,
    },
    errors::{AppError, Result},
    metrics::record_review_request,
    moderation::{self, EditSnapshot},
    policy,
};

use super::redirect_target;

/// An article as rendered on listing and detail surfaces
#[derive(Serialize)]
pub struct ArticleView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    /// Uploaded file first, external URL as fallback
    pub image: Option<String>,
    pub summary: String,
    pub content: String,
    pub is_approved: bool,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Article> for ArticleView {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            author_id: article.author_id,
            category_id: article.category_id,
            title: article.title.clone(),
            image: article.display_image().map(str::to_string),
            summary: article.summary.clone(),
            content: article.content.clone(),
            is_approved: article.is_approved,
            is_published: article.is_published,
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleView>,
}

fn list_response(articles: Vec<Article>) -> Json<ArticleListResponse> {
    Json(ArticleListResponse {
        articles: articles.iter().map(ArticleView::from).collect(),
    })
}

/// Public listing: approved and published articles, newest first
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<ArticleListResponse>> {
    let repo = Repository::new(state.db.clone());
    Ok(list_response(repo.list_public_articles().await?))
}

/// Public articles whose mean rating reaches the popularity threshold
pub async fn popular_articles(State(state): State<AppState>) -> Result<Json<ArticleListResponse>> {
    let repo = Repository::new(state.db.clone());
    Ok(list_response(repo.list_popular_articles().await?))
}

/// Public listing scoped to a category, addressed by slug
pub async fn articles_by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleListResponse>> {
    let repo = Repository::new(state.db.clone());

    let category = repo
        .find_category_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound { slug })?;

    Ok(list_response(repo.list_public_by_category(category.id).await?))
}

#[derive(Serialize)]
pub struct AuthorListResponse {
    pub authors: Vec<AuthorListing>,
}

/// Users with at least one public article
pub async fn list_authors(State(state): State<AppState>) -> Result<Json<AuthorListResponse>> {
    let repo = Repository::new(state.db.clone());
    Ok(Json(AuthorListResponse {
        authors: repo.list_authors().await?,
    }))
}

/// Public listing scoped to one author
pub async fn articles_by_author(
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<Json<ArticleListResponse>> {
    let repo = Repository::new(state.db.clone());

    repo.find_user_by_id(author_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound {
            id: author_id.to_string(),
        })?;

    Ok(list_response(repo.list_public_by_author(author_id).await?))
}

/// Public articles the viewer liked or bookmarked
pub async fn favorite_articles(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ArticleListResponse>> {
    let repo = Repository::new(state.db.clone());
    Ok(list_response(repo.list_favorite_articles(auth.user_id).await?))
}

#[derive(Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: Option<String>,
    pub content: String,
    pub created_at: String,
}

/// Viewer-specific state on the detail surface
#[derive(Serialize)]
pub struct ViewerContext {
    pub bookmarked: bool,
    pub rating: Option<i16>,
    pub has_pending_edit_request: bool,
    pub has_pending_delete_request: bool,
    /// Reason from the viewer's most recently rejected edit request
    pub rejected_edit_reason: Option<String>,
    /// Reason from the viewer's most recently rejected delete request
    pub rejected_delete_reason: Option<String>,
}

#[derive(Serialize)]
pub struct ArticleDetailResponse {
    pub article: ArticleView,
    pub author_username: Option<String>,
    pub category: Category,
    pub comments: Vec<CommentView>,
    pub likes: u64,
    pub dislikes: u64,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerContext>,
}

/// Article detail with comments, reaction counts, rating, and the
/// viewer's own state. Drafts and unapproved articles are visible only
/// to their owner and admins.
pub async fn article_detail(
    State(state): State<AppState>,
    OptionalAuthContext(auth): OptionalAuthContext,
    Path(article_id): Path<Uuid>,
) -> Result<Json<ArticleDetailResponse>> {
    let repo = Repository::new(state.db.clone());

    let article = repo
        .find_article_by_id(article_id)
        .await?
        .ok_or_else(|| AppError::ArticleNotFound {
            id: article_id.to_string(),
        })?;

    if !article.is_public() {
        // Hidden from everyone but the owner and admins; 404 keeps the
        // article's existence private
        let allowed = auth.as_ref().is_some_and(|a| {
            policy::owns(&a.actor(), article.author_id) || policy::may_review_requests(&a.actor())
        });
        if !allowed {
            return Err(AppError::ArticleNotFound {
                id: article_id.to_string(),
            });
        }
    }

    let category = repo
        .find_category_by_id(article.category_id)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound {
            slug: article.category_id.to_string(),
        })?;

    let author_username = repo
        .find_user_by_id(article.author_id)
        .await?
        .map(|u| u.username);

    let comments = repo
        .list_comments(article_id)
        .await?
        .into_iter()
        .map(|(comment, user)| CommentView {
            id: comment.id,
            user_id: comment.user_id,
            username: user.map(|u| u.username),
            content: comment.content,
            created_at: comment.created_at.to_rfc3339(),
        })
        .collect();

    let (likes, dislikes) = repo.reaction_counts(article_id).await?;
    let rating = repo.article_rating(article_id).await?;

    let viewer = match auth {
        Some(auth) => Some(ViewerContext {
            bookmarked: repo.is_bookmarked(article_id, auth.user_id).await?,
            rating: repo
                .find_rating(article_id, auth.user_id)
                .await?
                .map(|r| r.score),
            has_pending_edit_request: repo
                .has_pending_edit_request(article_id, auth.user_id)
                .await?,
            has_pending_delete_request: repo
                .has_pending_delete_request(article_id, auth.user_id)
                .await?,
            rejected_edit_reason: repo
                .latest_rejected_edit_request(article_id, auth.user_id)
                .await?
                .and_then(|r| r.rejection_reason),
            rejected_delete_reason: repo
                .latest_rejected_delete_request(article_id, auth.user_id)
                .await?
                .and_then(|r| r.rejection_reason),
        }),
        None => None,
    };

    Ok(Json(ArticleDetailResponse {
        article: ArticleView::from(&article),
        author_username,
        category,
        comments,
        likes,
        dislikes,
        rating,
        viewer,
    }))
}

/// Payload shared by create and update: the full set of content fields
#[derive(Debug, Deserialize, Validate)]
pub struct ArticlePayload {
    #[validate(length(min = 1, max = 300))]
    pub title: String,

    pub category_id: Uuid,

    /// Stored-file reference from the upload collaborator
    pub image: Option<String>,

    /// External image fallback; must be a well-formed URL
    #[validate(url)]
    pub image_url: Option<String>,

    #[validate(length(min = 1, max = 1000))]
    pub summary: String,

    #[validate(length(min = 1))]
    pub content: String,

    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Serialize)]
pub struct ArticleMutationResponse {
    pub article_id: Uuid,
    pub status: String,
    pub redirect_to: String,
}

/// Create a new article; it stays hidden until an admin approves it
pub async fn create_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(payload): Json<ArticlePayload>,
) -> Result<(StatusCode, Json<ArticleMutationResponse>)> {
    payload.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    repo.find_category_by_id(payload.category_id)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound {
            slug: payload.category_id.to_string(),
        })?;

    let article = repo
        .create_article(
            auth.user_id,
            payload.title,
            payload.category_id,
            payload.image,
            payload.image_url,
            payload.summary,
            payload.content,
        )
        .await?;

    metrics::counter!(format!(
        "{}_articles_created_total",
        quillpress_common::metrics::METRICS_PREFIX
    ))
    .increment(1);

    tracing::info!(article_id = %article.id, author_id = %auth.user_id, "Article created");

    let redirect_to = redirect_target(payload.return_to, format!("/api/articles/{}", article.id));
    Ok((
        StatusCode::CREATED,
        Json(ArticleMutationResponse {
            article_id: article.id,
            status: "awaiting_approval".to_string(),
            redirect_to,
        }),
    ))
}

/// Edit an article. Admins mutate directly (the article returns to
/// review); non-admin owners get a pending edit request instead.
pub async fn update_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    Json(payload): Json<ArticlePayload>,
) -> Result<Json<ArticleMutationResponse>> {
    payload.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    let article = repo
        .find_article_by_id(article_id)
        .await?
        .ok_or_else(|| AppError::ArticleNotFound {
            id: article_id.to_string(),
        })?;

    let actor = auth.actor();
    policy::require(
        policy::may_submit_edit_request(&actor, article.author_id),
        "Only the author or an admin can edit this article",
    )?;

    repo.find_category_by_id(payload.category_id)
        .await?
        .ok_or_else(|| AppError::CategoryNotFound {
            slug: payload.category_id.to_string(),
        })?;

    let snapshot = EditSnapshot {
        title: payload.title,
        category_id: payload.category_id,
        image_url: payload.image_url,
        summary: payload.summary,
        content: payload.content,
    };

    let status = if policy::can_edit_directly(&actor) {
        let applied = moderation::apply_edit(snapshot);
        repo.update_article_direct(article_id, applied, payload.image)
            .await?;
        tracing::info!(article_id = %article_id, editor_id = %auth.user_id, "Article edited directly");
        "updated"
    } else {
        repo.create_edit_request(article_id, auth.user_id, snapshot)
            .await?;
        record_review_request("edit");
        tracing::info!(article_id = %article_id, user_id = %auth.user_id, "Edit request submitted");
        "pending_review"
    };

    let redirect_to = redirect_target(payload.return_to, format!("/api/articles/{article_id}"));
    Ok(Json(ArticleMutationResponse {
        article_id,
        status: status.to_string(),
        redirect_to,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeletePayload {
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Delete an article. Admins delete directly; non-admin owners get a
/// pending delete request instead.
pub async fn delete_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    payload: Option<Json<DeletePayload>>,
) -> Result<Json<ArticleMutationResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    let repo = Repository::new(state.db.clone());

    let article = repo
        .find_article_by_id(article_id)
        .await?
        .ok_or_else(|| AppError::ArticleNotFound {
            id: article_id.to_string(),
        })?;

    let actor = auth.actor();
    policy::require(
        policy::may_submit_edit_request(&actor, article.author_id),
        "Only the author or an admin can delete this article",
    )?;

    let (status, canonical) = if policy::can_delete_directly(&actor) {
        repo.delete_article(article_id).await?;
        tracing::info!(article_id = %article_id, deleter_id = %auth.user_id, "Article deleted directly");
        ("deleted", "/api/articles".to_string())
    } else {
        repo.create_delete_request(article_id, auth.user_id).await?;
        record_review_request("delete");
        tracing::info!(article_id = %article_id, user_id = %auth.user_id, "Delete request submitted");
        ("pending_review", format!("/api/articles/{article_id}"))
    };

    let redirect_to = redirect_target(payload.return_to, canonical);
    Ok(Json(ArticleMutationResponse {
        article_id,
        status: status.to_string(),
        redirect_to,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(image_url: Option<&str>) -> ArticlePayload {
        ArticlePayload {
            title: "A title".to_string(),
            category_id: Uuid::new_v4(),
            image: None,
            image_url: image_url.map(str::to_string),
            summary: "A summary".to_string(),
            content: "Some content".to_string(),
            return_to: None,
        }
    }

    #[test]
    fn test_payload_rejects_malformed_image_url() {
        assert!(payload(Some("not a url")).validate().is_err());
        assert!(payload(Some("example.com/no-scheme.png")).validate().is_err());
    }

    #[test]
    fn test_payload_accepts_valid_or_absent_image_url() {
        assert!(payload(Some("https://example.com/cover.png")).validate().is_ok());
        assert!(payload(None).validate().is_ok());
    }

    #[test]
    fn test_payload_rejects_blank_title() {
        let mut p = payload(None);
        p.title = String::new();
        assert!(p.validate().is_err());
    }
}
