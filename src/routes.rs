use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::Services;

/// Shared, read-only request state. All mutable state lives in the database.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            services: Arc::new(services),
        }
    }
}

/// The full HTTP surface
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_routes())
        // Protected
        .merge(api_routes(state.clone()))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-up", post(public::sign_up))
        .route("/auth/sign-in", post(public::sign_in))
}

fn api_routes(state: AppState) -> Router<AppState> {
    use protected::{items, lists};

    Router::new()
        .route("/api/lists", post(lists::create_list).get(lists::get_lists))
        .route(
            "/api/lists/:id",
            get(lists::get_list_by_id)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route("/api/lists/:id/items", post(items::create_item).get(items::get_items))
        .route(
            "/api/lists/:id/items/:item_id",
            get(items::get_item_by_id)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/api/lists/:id/items/:item_id/done", patch(items::toggle_item_done))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
