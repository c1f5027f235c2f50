//! Storage error taxonomy shared by every [`UrlStore`](crate::domain::repositories::UrlStore)
//! implementation.

use std::time::Duration;

use thiserror::Error;

/// Errors reported by a URL store.
///
/// The variants are what callers branch on: `Duplicate` drives the shortener's
/// reconciliation and `NotFound` becomes a 404, so neither may be folded into
/// `Io`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same id already exists.
    #[error("short URL '{id}' already exists")]
    Duplicate { id: String },

    /// No record has the requested id.
    #[error("URL with ID '{id}' not found")]
    NotFound { id: String },

    /// The operation was abandoned because its deadline elapsed.
    #[error("store operation '{operation}' cancelled after {timeout:?}")]
    Cancelled {
        operation: &'static str,
        timeout: Duration,
    },

    /// Transport or backing-store failure.
    #[error("store I/O error during '{operation}': {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// Wraps a driver error that is neither a uniqueness violation nor a miss.
    pub fn io(operation: &'static str, source: sqlx::Error) -> Self {
        Self::Io { operation, source }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
