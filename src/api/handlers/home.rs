//! Liveness banner.

/// Banner returned by `GET /`.
pub const BANNER: &str = "Hello from Shawty URL Shortener!";

/// Answers `GET /` with a plain-text banner.
pub async fn home_handler() -> &'static str {
    BANNER
}

/// Answers any unrouted path.
pub async fn not_found_handler() -> (axum::http::StatusCode, &'static str) {
    (axum::http::StatusCode::NOT_FOUND, "404 page not found")
}
