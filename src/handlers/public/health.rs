use axum::{extract::State, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::routes::AppState;

/// GET / - service name and version
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "todo-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/auth/sign-up, /auth/sign-in (public)",
            "lists": "/api/lists[/:id] (bearer)",
            "items": "/api/lists/:id/items[/:item_id[/done]] (bearer)",
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.services.health_check().await {
        Ok(()) => ApiResponse::status_ok().into_response(),
        Err(e) => {
            tracing::warn!("health check failed: {}", e);
            ApiError::service_unavailable("database unavailable").into_response()
        }
    }
}
