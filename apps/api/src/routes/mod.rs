pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};

use crate::intake::handlers::handle_parse_document;
use crate::intake::validate::MAX_UPLOAD_BYTES;
use crate::profile::handlers::handle_save_profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/profiles/parse-document",
            post(handle_parse_document),
        )
        .route("/api/v1/profiles/save", post(handle_save_profile))
        // Sits above MAX_UPLOAD_BYTES so the validator, not the framework,
        // owns the too-large decision and its error shape.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .with_state(state)
}
