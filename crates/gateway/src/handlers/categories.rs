//! Category handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use quillpress_common::{
    auth::AuthContext,
    db::{models::Category, Repository},
    errors::{AppError, Result},
};

#[derive(Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

/// All categories, alphabetical
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<CategoryListResponse>> {
    let repo = Repository::new(state.db.clone());
    Ok(Json(CategoryListResponse {
        categories: repo.list_categories().await?,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    /// Derived from the name when omitted
    #[validate(length(min = 1, max = 120))]
    pub slug: Option<String>,
}

/// Create a category; any authenticated user may, and a duplicate name
/// or slug is a conflict
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());
    let category = repo.create_category(request.name, request.slug).await?;

    tracing::info!(
        category_id = %category.id,
        slug = %category.slug,
        created_by = %auth.user_id,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(category)))
}
