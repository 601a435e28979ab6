//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod uploads;

/// Creates the API router with all routes.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(uploads::routes(state.max_upload_bytes))
}
