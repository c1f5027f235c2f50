//! Shortener error taxonomy.

use thiserror::Error;

use crate::domain::errors::StoreError;

/// Errors returned by [`ShortenerService`](crate::application::services::ShortenerService).
///
/// Store-level `Duplicate` is reconciled inside the service and only reaches
/// callers as [`ShortenerError::HashCollision`], or wrapped in
/// [`ShortenerError::Reconciliation`] when the follow-up lookup fails.
#[derive(Debug, Error)]
pub enum ShortenerError {
    /// Empty URL or empty id.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// No record exists for the id.
    #[error("short URL '{id}' not found")]
    NotFound { id: String },

    /// The derived id is already taken by a different URL.
    #[error(
        "hash collision detected: short ID '{id}' generated for a different original URL \
         (submitted: '{submitted}', existing: '{existing}')"
    )]
    HashCollision {
        id: String,
        submitted: String,
        existing: String,
    },

    /// The lookup that follows a duplicate insert failed.
    #[error("error retrieving existing URL for short ID '{id}' after duplicate detection: {source}")]
    Reconciliation {
        id: String,
        #[source]
        source: StoreError,
    },

    /// Any other store failure.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
}

impl ShortenerError {
    /// Returns true if the failure was a store deadline rather than a fault.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Reconciliation { source, .. } | Self::Store(source) => source.is_cancelled(),
            _ => false,
        }
    }
}
