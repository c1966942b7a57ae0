use axum::extract::State;

use crate::auth::hash_password;
use crate::database::{NewUser, User};
use crate::error::ApiError;
use crate::handlers::forms::UserForm;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /users - Register a new user
///
/// Expected Input:
/// ```json
/// {
///   "Username": "dramafan1",   // Required: at least 5 alphanumeric characters
///   "Password": "pw123",       // Required
///   "Email": "a@b.com",        // Required
///   "Birthday": "1990-05-17"   // Optional, a date or an RFC 3339 timestamp
/// }
/// ```
///
/// Answers 201 with the stored user (password hashed), 400 if the username is
/// taken, 422 with field errors if validation fails.
pub async fn register(State(state): State<AppState>, form: UserForm) -> ApiResult<User> {
    form.check()?;

    if state.store.find_user_by_username(&form.username).await?.is_some() {
        return Err(ApiError::bad_request(format!("{} already exists", form.username)));
    }

    let password_hash = hash_password(&form.password, state.config.security.bcrypt_cost).await?;
    let user = state
        .store
        .create_user(NewUser {
            username: form.username,
            password_hash,
            email: form.email,
            birthday: form.birthday,
        })
        .await?;

    tracing::info!("Registered user '{}' ({})", user.username, user.id);
    Ok(ApiResponse::created(user))
}
