pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyses", post(handlers::handle_create_analysis))
        .route("/api/v1/analyses/:id", get(handlers::handle_get_analysis))
        .route(
            "/api/v1/analyses/:id/reprocess",
            post(handlers::handle_reprocess),
        )
        .route(
            "/api/v1/documents/:document_id/analyses",
            get(handlers::handle_list_document_analyses),
        )
        .with_state(state)
}
