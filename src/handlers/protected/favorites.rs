use axum::extract::{Path, State};
use axum::Extension;
use uuid::Uuid;

use crate::database::models::FavoritesView;
use crate::database::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /users/:username/favs - Favorite drama ids, in insertion order
///
/// Expected Output:
/// ```json
/// { "FavDramas": ["2f1c...", "9ab0..."] }
/// ```
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
) -> ApiResult<FavoritesView> {
    auth.ensure_owner(&state, &username)?;

    let user = state
        .store
        .find_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(username))?;
    Ok(ApiResponse::created(FavoritesView::from(user)))
}

/// POST /users/:username/favs/:drama_id - Append a drama to the favorites
///
/// Neither the drama's existence nor duplicates are checked.
pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((username, drama_id)): Path<(String, Uuid)>,
) -> ApiResult<User> {
    auth.ensure_owner(&state, &username)?;

    let user = state
        .store
        .push_favorite(&username, drama_id)
        .await?
        .ok_or_else(|| ApiError::not_found(username))?;
    Ok(ApiResponse::success(user))
}

/// DELETE /users/:username/favs/:drama_id - Remove every occurrence of a drama
pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((username, drama_id)): Path<(String, Uuid)>,
) -> ApiResult<User> {
    auth.ensure_owner(&state, &username)?;

    let user = state
        .store
        .pull_favorite(&username, drama_id)
        .await?
        .ok_or_else(|| ApiError::not_found(username))?;
    Ok(ApiResponse::success(user))
}
