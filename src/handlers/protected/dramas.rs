use axum::extract::{Path, State};

use crate::database::models::DramaView;
use crate::database::populate_genres;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /korean-dramas - All dramas with their genres expanded
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<DramaView>> {
    let dramas = state.store.list_dramas().await?;
    let dramas = populate_genres(state.store.as_ref(), dramas).await?;
    Ok(ApiResponse::created(dramas))
}

/// GET /korean-dramas/:title - One drama by exact title
pub async fn get(State(state): State<AppState>, Path(title): Path<String>) -> ApiResult<DramaView> {
    let drama = state
        .store
        .find_drama_by_title(&title)
        .await?
        .ok_or_else(|| ApiError::not_found(title))?;

    let mut dramas = populate_genres(state.store.as_ref(), vec![drama]).await?;
    match dramas.pop() {
        Some(drama) => Ok(ApiResponse::created(drama)),
        None => Err(ApiError::internal_server_error("genre expansion lost the drama")),
    }
}
