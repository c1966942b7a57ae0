use axum::extract::State;
use serde::Serialize;

use crate::auth::verify_password;
use crate::database::User;
use crate::error::ApiError;
use crate::handlers::forms::LoginForm;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// POST /login - Authenticate user and receive a bearer token
///
/// Expected Input:
/// ```json
/// { "Username": "dramafan1", "Password": "pw123" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "user": { "_id": "...", "Username": "dramafan1", ... }, "token": "eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// The body may also be url-encoded. An unknown username, a wrong password
/// and an unreadable body all produce the same 400.
pub async fn login(State(state): State<AppState>, form: LoginForm) -> ApiResult<LoginResponse> {
    let user = match state.store.find_user_by_username(&form.username).await? {
        Some(user) => user,
        None => {
            tracing::info!("Login failed for '{}': unknown user", form.username);
            return Err(ApiError::LoginFailed);
        }
    };
    if !verify_password(&form.password, &user.password).await {
        tracing::info!("Login failed for '{}': wrong password", form.username);
        return Err(ApiError::LoginFailed);
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!("User '{}' logged in", user.username);

    Ok(ApiResponse::success(LoginResponse { user, token }))
}
