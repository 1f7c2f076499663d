//! Router Configuration
//!
//! Combines the public and protected route groups into the final Axum
//! router. The session middleware wraps only the protected group, so
//! browsing stays cookie-free while everything else answers 401/403
//! uniformly.

use axum::middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::backend::middleware::auth::auth_middleware;
use crate::backend::routes::api_routes::{protected_routes, public_routes};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = protected_routes().route_layer(middleware::from_fn_with_state(
        app_state.clone(),
        auth_middleware,
    ));

    let router = public_routes()
        .merge(protected)
        .layer(TraceLayer::new_for_http());

    // Fallback handler for 404
    let router = router.fallback(|| async {
        (
            axum::http::StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({ "error": "not found" })),
        )
    });

    router.with_state(app_state)
}
