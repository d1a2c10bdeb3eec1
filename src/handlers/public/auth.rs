use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult, IdResponse, TokenResponse, ValidatedJson};
use crate::routes::AppState;
use crate::services::{SignInInput, SignUpInput};

/// POST /auth/sign-up - register a user
///
/// Body: `{"name", "username", "password"}`. Returns `{"id"}`.
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignUpInput>,
) -> ApiResult<IdResponse> {
    let id = state.services.auth.create_user(input).await?;
    Ok(ApiResponse::id(id))
}

/// POST /auth/sign-in - exchange credentials for a bearer token
///
/// Body: `{"username", "password"}`. Returns `{"token"}`, or 401 without
/// a token when the credentials do not match.
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignInInput>,
) -> ApiResult<TokenResponse> {
    let token = state
        .services
        .auth
        .generate_token(&input.username, &input.password)
        .await?;
    Ok(ApiResponse::ok(TokenResponse { token }))
}
