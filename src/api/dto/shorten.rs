//! DTOs for the link shortening endpoint.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Request to shorten a URL.
///
/// Unknown fields are ignored; a missing `url` is treated as empty.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "URL field is missing or empty in request body"))]
    pub url: String,
}

/// Successful shortening result.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    /// Absolute short URL, `<scheme>://<host>/r/<id>`.
    pub short_url: String,
    pub original_url: String,
    /// RFC 3339 timestamp with second precision.
    pub creation_date: String,
}

impl ShortenResponse {
    pub fn new(record: UrlRecord, scheme: &str, host: &str) -> Self {
        Self {
            short_url: format!("{scheme}://{host}/r/{}", record.short_url),
            creation_date: record
                .creation_date
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            original_url: record.original_url,
        }
    }
}
