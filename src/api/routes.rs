//! Shortener route configuration.

use crate::api::handlers::{missing_id_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Shortening and redirect routes.
///
/// # Endpoints
///
/// - `POST /shorten`  - Create a short URL
/// - `GET  /r/{*id}`  - Redirect to the original URL
/// - `GET  /r/`       - Rejected: empty id
///
/// Everything after `/r/` is the id, slashes included, so other methods on
/// any `/r/...` path answer `405 Method Not Allowed`.
pub fn shortener_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/r/", get(missing_id_handler))
        .route("/r/{*id}", get(redirect_handler))
}
