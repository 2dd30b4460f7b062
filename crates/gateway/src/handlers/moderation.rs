//! Moderation handlers: publication review and the pending-request queue
//!
//! Everything here is gated on `may_review_requests` (admins and super
//! admins). Approvals run transactionally in the repository; resolving an
//! already-resolved request is a conflict, never a reopen.

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
        models::{ArticleDeleteRequest, ArticleEditRequest},
        Repository,
    },
    errors::Result,
    metrics::record_review_decision,
    policy,
};

use super::redirect_target;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewPayload {
    /// Free-text reason shown to the requester; stored verbatim on reject
    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub status: String,
    pub redirect_to: String,
}

/// Approve an article for publication: both visibility flags go up
pub async fn approve_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    payload: Option<Json<ReviewPayload>>,
) -> Result<Json<ReviewResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    policy::require(
        policy::may_review_requests(&auth.actor()),
        "Only admins can approve articles",
    )?;

    let repo = Repository::new(state.db.clone());
    let article = repo.set_publication(article_id, true).await?;

    metrics::counter!(format!(
        "{}_articles_published_total",
        quillpress_common::metrics::METRICS_PREFIX
    ))
    .increment(1);

    tracing::info!(article_id = %article.id, reviewer_id = %auth.user_id, "Article approved");

    Ok(Json(ReviewResponse {
        id: article.id,
        status: "approved".to_string(),
        redirect_to: redirect_target(payload.return_to, format!("/api/articles/{article_id}")),
    }))
}

/// Reject an article: both visibility flags go down
pub async fn reject_article(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(article_id): Path<Uuid>,
    payload: Option<Json<ReviewPayload>>,
) -> Result<Json<ReviewResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    policy::require(
        policy::may_review_requests(&auth.actor()),
        "Only admins can reject articles",
    )?;

    let repo = Repository::new(state.db.clone());
    let article = repo.set_publication(article_id, false).await?;

    tracing::info!(article_id = %article.id, reviewer_id = %auth.user_id, "Article rejected");

    Ok(Json(ReviewResponse {
        id: article.id,
        status: "rejected".to_string(),
        redirect_to: redirect_target(payload.return_to, format!("/api/articles/{article_id}")),
    }))
}

#[derive(Serialize)]
pub struct AdminPanelResponse {
    pub edit_requests: Vec<ArticleEditRequest>,
    pub delete_requests: Vec<ArticleDeleteRequest>,
}

/// The review queue: all pending edit and delete requests, newest first
pub async fn admin_panel(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<AdminPanelResponse>> {
    policy::require(
        policy::may_review_requests(&auth.actor()),
        "Only admins can view the review queue",
    )?;

    let repo = Repository::new(state.db.clone());

    Ok(Json(AdminPanelResponse {
        edit_requests: repo.list_pending_edit_requests().await?,
        delete_requests: repo.list_pending_delete_requests().await?,
    }))
}

/// Approve an edit request: the snapshot lands on the article, which
/// goes back through review
pub async fn approve_edit_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<ReviewPayload>>,
) -> Result<Json<ReviewResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    policy::require(
        policy::may_review_requests(&auth.actor()),
        "Only admins can approve edit requests",
    )?;

    let repo = Repository::new(state.db.clone());
    let request = repo.approve_edit_request(request_id, auth.user_id).await?;

    record_review_decision("edit", true);
    tracing::info!(request_id = %request.id, reviewer_id = %auth.user_id, "Edit request approved");

    Ok(Json(ReviewResponse {
        id: request.id,
        status: request.status,
        redirect_to: redirect_target(payload.return_to, "/api/admin/panel".to_string()),
    }))
}

/// Reject an edit request; the live article is untouched
pub async fn reject_edit_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<ReviewPayload>>,
) -> Result<Json<ReviewResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    policy::require(
        policy::may_review_requests(&auth.actor()),
        "Only admins can reject edit requests",
    )?;

    let repo = Repository::new(state.db.clone());
    let reason = payload.reason.unwrap_or_default();
    let request = repo
        .reject_edit_request(request_id, auth.user_id, reason)
        .await?;

    record_review_decision("edit", false);
    tracing::info!(request_id = %request.id, reviewer_id = %auth.user_id, "Edit request rejected");

    Ok(Json(ReviewResponse {
        id: request.id,
        status: request.status,
        redirect_to: redirect_target(payload.return_to, "/api/admin/panel".to_string()),
    }))
}

/// Approve a delete request: the request resolves, then the article and
/// its dependents go away
pub async fn approve_delete_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<ReviewPayload>>,
) -> Result<Json<ReviewResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    policy::require(
        policy::may_review_requests(&auth.actor()),
        "Only admins can approve delete requests",
    )?;

    let repo = Repository::new(state.db.clone());
    let request = repo.approve_delete_request(request_id, auth.user_id).await?;

    record_review_decision("delete", true);
    tracing::info!(request_id = %request.id, reviewer_id = %auth.user_id, "Delete request approved");

    Ok(Json(ReviewResponse {
        id: request.id,
        status: request.status,
        redirect_to: redirect_target(payload.return_to, "/api/admin/panel".to_string()),
    }))
}

/// Reject a delete request; the article stays
pub async fn reject_delete_request(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(request_id): Path<Uuid>,
    payload: Option<Json<ReviewPayload>>,
) -> Result<Json<ReviewResponse>> {
    let Json(payload) = payload.unwrap_or_default();
    policy::require(
        policy::may_review_requests(&auth.actor()),
        "Only admins can reject delete requests",
    )?;

    let repo = Repository::new(state.db.clone());
    let reason = payload.reason.unwrap_or_default();
    let request = repo
        .reject_delete_request(request_id, auth.user_id, reason)
        .await?;

    record_review_decision("delete", false);
    tracing::info!(request_id = %request.id, reviewer_id = %auth.user_id, "Delete request rejected");

    Ok(Json(ReviewResponse {
        id: request.id,
        status: request.status,
        redirect_to: redirect_target(payload.return_to, "/api/admin/panel".to_string()),
    }))
}
