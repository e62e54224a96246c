//! HTTP routes

mod health;
mod uploads;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Creates the router with all handler routes
pub fn handler() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::handler))
        .route("/v1/uploads/presigned-urls", post(uploads::issue_upload_url))
}
