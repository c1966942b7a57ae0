use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    /// Current username, which may differ from the token subject after a rename.
    pub username: String,
}

impl AuthUser {
    /// Fails with 403 when ownership is enforced and `username` is someone else.
    pub fn ensure_owner(&self, state: &AppState, username: &str) -> Result<(), ApiError> {
        if state.config.security.enforce_ownership && self.username != username {
            tracing::warn!("User '{}' attempted to access '{}'", self.username, username);
            return Err(ApiError::forbidden(format!("Not allowed to access {}", username)));
        }
        Ok(())
    }
}

/// JWT authentication middleware that validates tokens and resolves the user
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    // Validate and decode JWT
    let claims = state.tokens.verify(&token).map_err(|e| ApiError::unauthorized(e.to_string()))?;

    // The user must still exist
    let user = state
        .store
        .find_user_by_id(claims.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(format!("Token user {} no longer exists", claims.user_id)))?;

    request.extensions_mut().insert(AuthUser { id: user.id, username: user.username });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        let token = token.trim();
        if token.is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
