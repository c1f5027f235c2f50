//! Handler for short URL redirects.

use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::application::ShortenerError;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short id to its original URL.
///
/// # Endpoint
///
/// `GET /r/{id}`
///
/// # Response
///
/// `302 Found` with `Location` set to the stored URL. A stored URL without an
/// `http://` or `https://` prefix is redirected to as `http://<url>`.
///
/// # Errors
///
/// - `404` if the id is unknown
/// - `503` when the store deadline elapsed
/// - `500` on store failure
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let original_url = state
        .shortener
        .get_original_url(&id)
        .await
        .map_err(|err| lookup_failure(err, &id))?;

    let target = redirect_target(&original_url);
    let location = HeaderValue::from_bytes(target.as_bytes()).map_err(|_| {
        error!(short_id = %id, "Stored URL is not a valid Location header");
        AppError::internal("Error retrieving URL")
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Answers `GET /r/` where the id segment is empty.
pub async fn missing_id_handler() -> AppError {
    AppError::bad_request("Short URL ID is missing in the path")
}

/// Prefixes `http://` to URLs that carry neither supported scheme.
pub fn redirect_target(original_url: &str) -> Cow<'_, str> {
    if original_url.starts_with("http://") || original_url.starts_with("https://") {
        Cow::Borrowed(original_url)
    } else {
        Cow::Owned(format!("http://{original_url}"))
    }
}

fn lookup_failure(err: ShortenerError, id: &str) -> AppError {
    match err {
        ShortenerError::NotFound { .. } => {
            AppError::not_found(format!("Short URL '{id}' not found"))
        }
        ShortenerError::InvalidInput(reason) => AppError::bad_request(reason),
        err if err.is_cancelled() => {
            debug!(short_id = %id, error = %err, "Redirect lookup cancelled");
            AppError::unavailable("Request cancelled")
        }
        err => {
            error!(short_id = %id, error = %err, "Error retrieving original URL");
            AppError::internal("Error retrieving URL")
        }
    }
}
