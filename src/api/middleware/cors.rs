//! CORS middleware applied to every response.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

const ALLOWED_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";

const ALLOWED_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

/// Adds CORS headers to every response and answers preflight requests.
///
/// # Behavior
///
/// - `OPTIONS` requests (on any path) short-circuit with `200 OK` and an
///   empty body; the router is never reached
/// - every other request is routed normally and the headers are added to
///   whatever response comes back, errors included
///
/// # Headers
///
/// ```text
/// Access-Control-Allow-Origin: <configured origin>
/// Access-Control-Allow-Methods: POST, GET, OPTIONS, PUT, DELETE
/// Access-Control-Allow-Headers: Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization
/// ```
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .layer(middleware::from_fn_with_state(state.clone(), cors::layer));
/// ```
pub async fn layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        state.cors_allowed_origin.clone(),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    response
}
