use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::AppState;

/// Bearer authentication for `/api/*`. A valid token puts an [`AuthUser`]
/// into the request extensions; anything else ends the request with 401.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let auth_user = state.services.auth.parse_token(token)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("empty auth header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "invalid auth header")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("invalid auth header")?
        .trim();

    if token.is_empty() {
        return Err("token is empty");
    }
    Ok(token)
}

/// The principal placed in extensions by [`jwt_auth_middleware`]. Absence
/// means the route was mounted without the middleware, which is a server
/// bug rather than a client error.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::internal_server_error("user id not found"))
    }
}
