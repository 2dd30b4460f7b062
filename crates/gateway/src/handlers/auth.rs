//! Registration and login handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use quillpress_common::{
    auth::{hash_password, verify_password, JwtManager},
    db::{models::profile_is_banned, Repository},
    errors::{AppError, Result},
    policy::Role,
};

/// Request to register a new account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued-token response for both register and login
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

fn jwt_manager(state: &AppState) -> Result<JwtManager> {
    let secret = state
        .config
        .jwt_secret()
        .map_err(|e| AppError::Configuration {
            message: e.to_string(),
        })?;
    Ok(JwtManager::new(secret, state.config.auth.jwt_expiration_secs))
}

/// Register a new account; the profile starts as role USER, not banned
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    let password_hash = hash_password(&request.password)?;
    let user = repo
        .create_user(request.username, request.email, password_hash)
        .await
        .map_err(|e| match e {
            AppError::Conflict { .. } => AppError::Conflict {
                message: "Username or email already taken".to_string(),
            },
            other => other,
        })?;
    let profile = repo.get_or_create_profile(user.id).await?;

    let token = jwt_manager(&state)?.generate_token(user.id, &user.username, profile.role())?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            user_id: user.id,
            username: user.username,
            role: profile.role(),
        }),
    ))
}

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let repo = Repository::new(state.db.clone());

    // Same error for unknown user and wrong password
    let invalid = || AppError::Unauthorized {
        message: "Invalid username or password".to_string(),
    };

    let user = repo
        .find_user_by_username(&request.username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(invalid());
    }

    let profile = repo.find_profile(user.id).await?;
    if profile_is_banned(profile.as_ref()) {
        return Err(AppError::AccountBanned);
    }

    let role = quillpress_common::db::models::profile_role(profile.as_ref());
    let token = jwt_manager(&state)?.generate_token(user.id, &user.username, role)?;

    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    Ok(Json(TokenResponse {
        token,
        user_id: user.id,
        username: user.username,
        role,
    }))
}
