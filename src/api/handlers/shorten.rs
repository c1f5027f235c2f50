//! Handler for the link shortening endpoint.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
};
use tracing::{debug, error};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::application::ShortenerError;
use crate::domain::errors::StoreError;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_origin::{request_host, request_scheme};

/// Creates a short URL for a long one.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://www.google.com" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_url": "http://localhost:8080/r/8ffdefbd",
///   "original_url": "https://www.google.com",
///   "creation_date": "2024-05-01T12:00:00Z"
/// }
/// ```
///
/// The body is decoded as JSON whatever its `Content-Type`.
/// Resubmitting a URL returns the record created the first time.
///
/// # Errors
///
/// - `400` for a malformed body, an empty `url`, or a missing host
/// - `409` when the derived id is already used by a different URL
/// - `503` when the store deadline elapsed
/// - `500` on any other failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let payload: ShortenRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("Invalid request body: {e}")))?;
    payload.validate()?;

    let host = request_host(&headers, &uri)?;
    let scheme = request_scheme(&headers, &uri, state.trust_forwarded_proto);

    let record = state
        .shortener
        .create_short_url(&payload.url)
        .await
        .map_err(|err| create_failure(err, &payload.url))?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::new(record, scheme, &host)),
    ))
}

/// Logs a failed creation and maps it to a response.
fn create_failure(err: ShortenerError, original_url: &str) -> AppError {
    if err.is_cancelled() {
        debug!(original_url, error = %err, "Short URL creation cancelled");
        return AppError::unavailable("Request cancelled");
    }

    error!(original_url, error = %err, "Error creating short URL");

    match err {
        ShortenerError::InvalidInput(reason) => AppError::bad_request(reason),
        ShortenerError::HashCollision { .. } => AppError::conflict(
            "Failed to create short URL due to a hash collision. \
             Please try again or modify the URL slightly.",
        ),
        ShortenerError::Store(StoreError::Duplicate { .. }) => AppError::conflict(
            "This URL may have already been shortened or a conflict occurred.",
        ),
        _ => AppError::internal("Failed to create short URL"),
    }
}
