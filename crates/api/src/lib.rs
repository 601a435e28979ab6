//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Image upload, delete and listing routes used by the admin forms
//! - Health check route
//! - Response envelopes

pub mod routes;

use axum::Router;
use shanti_core::storage::{R2Client, UploadService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Image upload service.
    pub uploads: Arc<UploadService<R2Client>>,
    /// Maximum accepted upload body size in bytes.
    pub max_upload_bytes: usize,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
