use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

/// Builds the authorization API router.
pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/authorization/check",
            post(handlers::check_access_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_shared_secret,
        ));

    Router::new()
        .route("/api/health", get(handlers::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
