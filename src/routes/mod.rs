pub mod ask;
pub mod extract;
pub mod health;

use axum::{routing::post, Router};

use crate::state::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new().nest("/api", api_routes(state))
}

/// API routes under /api prefix
fn api_routes(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .route("/ask", post(ask::ask))
        .route("/extract", post(extract::extract))
        .with_state(state)
}
