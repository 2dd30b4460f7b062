//! Actor resolution middleware
//!
//! Validates the bearer token once per request and resolves the acting
//! identity against the database so role changes and bans take effect
//! immediately, not at the token's next refresh. The resolved
//! `AuthContext` goes into the request extensions for the extractors;
//! requests without a token pass through anonymously and are rejected
//! only by handlers that demand authentication.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use quillpress_common::{
    auth::{extract_bearer_token, AuthContext, JwtManager},
    db::{models::profile_is_banned, Repository},
    errors::AppError,
};
use uuid::Uuid;

use crate::AppState;

/// Resolve the acting identity from the Authorization header
pub async fn resolve_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token);

    if let Some(token) = token {
        let secret = state
            .config
            .jwt_secret()
            .map_err(|e| AppError::Configuration {
                message: e.to_string(),
            })?;
        let manager = JwtManager::new(secret, state.config.auth.jwt_expiration_secs);
        let claims = manager.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        let repo = Repository::new(state.db.clone());
        let user = repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;
        let profile = repo.find_profile(user_id).await?;

        if profile_is_banned(profile.as_ref()) {
            return Err(AppError::AccountBanned);
        }

        // The stored role wins over whatever the token was issued with
        let context = AuthContext {
            user_id: user.id,
            username: user.username,
            role: quillpress_common::db::models::profile_role(profile.as_ref()),
        };

        tracing::debug!(user_id = %context.user_id, role = ?context.role, "Actor resolved");
        request.extensions_mut().insert(context);
    }

    Ok(next.run(request).await)
}
