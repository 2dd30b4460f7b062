//! Own-profile handler

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::articles::ArticleView;
use crate::AppState;
use quillpress_common::{auth::AuthContext, db::Repository, errors::Result, policy::Role};

#[derive(Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    /// Everything the user wrote, drafts included
    pub articles: Vec<ArticleView>,
    /// Bookmarked articles, newest bookmark first
    pub bookmarks: Vec<ArticleView>,
    /// Most recently liked articles, capped
    pub recently_liked: Vec<ArticleView>,
}

/// The viewer's own profile: their articles in any state, their
/// bookmarks, and their most recently liked articles
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ProfileResponse>> {
    let repo = Repository::new(state.db.clone());

    let articles = repo
        .list_articles_by_author(auth.user_id)
        .await?
        .iter()
        .map(ArticleView::from)
        .collect();

    let bookmarks = repo
        .list_bookmarks_with_articles(auth.user_id)
        .await?
        .iter()
        .filter_map(|(_, article)| article.as_ref())
        .map(ArticleView::from)
        .collect();

    let recently_liked = repo
        .list_recently_liked(auth.user_id, quillpress_common::PROFILE_LIKED_LIMIT)
        .await?
        .iter()
        .map(ArticleView::from)
        .collect();

    Ok(Json(ProfileResponse {
        user_id: auth.user_id,
        username: auth.username.clone(),
        role: auth.role,
        articles,
        bookmarks,
        recently_liked,
    }))
}
