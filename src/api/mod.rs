//! HTTP layer: route handlers, form DTOs, and router composition.

pub mod dto;
pub mod handlers;

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the router with every dynamic endpoint.
pub fn build_router() -> Router<AppState> {
    handlers::routes()
}

/// Builds the complete application: dynamic routes, static files under
/// `/public`, and request tracing.
pub fn build_app(state: AppState, public_dir: &Path) -> Router {
    build_router()
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
