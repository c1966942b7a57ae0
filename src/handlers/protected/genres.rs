use axum::extract::{Path, State};

use crate::database::Genre;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /genres - All genres
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Genre>> {
    Ok(ApiResponse::created(state.store.list_genres().await?))
}

/// GET /genres/:name - One genre by exact name (e.g. "Thriller")
pub async fn get(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Genre> {
    let genre = state.store.find_genre_by_name(&name).await?.ok_or_else(|| ApiError::not_found(name))?;
    Ok(ApiResponse::created(genre))
}
