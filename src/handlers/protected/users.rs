use axum::{
    extract::{Path, State},
    Extension,
};

use crate::auth::hash_password;
use crate::database::{User, UserChanges};
use crate::error::ApiError;
use crate::handlers::forms::UserForm;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /users/:username - User profile
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
) -> ApiResult<User> {
    auth.ensure_owner(&state, &username)?;

    let user = state
        .store
        .find_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(username))?;
    Ok(ApiResponse::created(user))
}

/// PUT /users/:username - Replace username, password, email and (if given) birthday
///
/// The body is validated like a registration. The password is always
/// rehashed, so clients must send it even when it does not change.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
    form: UserForm,
) -> ApiResult<User> {
    auth.ensure_owner(&state, &username)?;
    form.check()?;

    let password_hash = hash_password(&form.password, state.config.security.bcrypt_cost).await?;
    let changes = UserChanges {
        username: form.username,
        password_hash,
        email: form.email,
        birthday: form.birthday,
    };

    let user = state
        .store
        .update_user(&username, changes)
        .await?
        .ok_or_else(|| ApiError::not_found(username.clone()))?;

    if user.username != username {
        tracing::info!("User '{}' renamed to '{}'", username, user.username);
    }
    Ok(ApiResponse::success(user))
}

/// DELETE /users/:username - Deregister
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<&'static str, ApiError> {
    auth.ensure_owner(&state, &username)?;

    match state.store.delete_user(&username).await? {
        Some(user) => {
            tracing::info!("Deleted user '{}' ({})", user.username, user.id);
            Ok("Your account was deleted.")
        }
        None => Err(ApiError::bad_request(format!("{} was not found", username))),
    }
}
