use axum::extract::{Path, State};

use crate::database::models::DirectorView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /directors/:name - Director details, taken from the first drama they directed
///
/// Expected Output:
/// ```json
/// { "Director": { "Name": "Lee Jeong-hyo", "Bio": "...", "Birth": "1971" } }
/// ```
pub async fn get(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<DirectorView> {
    let drama = state
        .store
        .find_drama_by_director(&name)
        .await?
        .ok_or_else(|| ApiError::not_found(name))?;
    Ok(ApiResponse::created(DirectorView::from(drama)))
}
