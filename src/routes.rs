//! Top-level router combining the shortener routes with the shared middleware.
//!
//! # Route Structure
//!
//! - `GET  /`         - Liveness banner
//! - `POST /shorten`  - Create a short URL
//! - `GET  /r/{id}`   - Redirect to the original URL
//! - anything else    - `404 page not found`
//!
//! # Middleware
//!
//! Outermost first:
//!
//! - **Tracing** - Request spans at debug level
//! - **CORS** - Headers on every response; `OPTIONS` answered directly
//! - **Response timeout** - `408` once a request has run for [`RESPONSE_WRITE_TIMEOUT`]
//! - **Body timeout** - Body reads abandoned after [`REQUEST_READ_TIMEOUT`]

use std::time::Duration;

use crate::api;
use crate::api::handlers::{home_handler, not_found_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

/// Maximum time to receive a request head, and separately its body.
pub const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum time to produce a response.
pub const RESPONSE_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let cors_layer = middleware::from_fn_with_state(state.clone(), cors::layer);

    Router::new()
        .route("/", get(home_handler))
        .merge(api::routes::shortener_routes())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(RequestBodyTimeoutLayer::new(REQUEST_READ_TIMEOUT))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            RESPONSE_WRITE_TIMEOUT,
        ))
        .layer(cors_layer)
        .layer(tracing::layer())
}
