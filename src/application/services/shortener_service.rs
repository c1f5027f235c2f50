//! Short URL creation and lookup service.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tracing::instrument;

use crate::application::error::ShortenerError;
use crate::domain::entities::UrlRecord;
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlStore;
use crate::utils::short_id::derive_short_id;

/// Service for creating and resolving short URLs.
///
/// Stateless apart from the shared store handle. Uniqueness is delegated to
/// the store: instead of checking before inserting, the service inserts first
/// and reconciles a duplicate afterwards, which is race-free for concurrent
/// submitters of the same URL.
pub struct ShortenerService {
    store: Arc<dyn UrlStore>,
}

impl ShortenerService {
    /// Creates a new shortener service.
    pub fn new(store: Arc<dyn UrlStore>) -> Self {
        Self { store }
    }

    /// Creates (or returns the existing) short URL record for `original_url`.
    ///
    /// # Reconciliation
    ///
    /// When the insert reports a duplicate id, the stored record is fetched:
    /// - same original URL: the existing record is returned unchanged, so the
    ///   first writer's `creation_date` wins
    /// - different original URL: the derived id collides, and
    ///   [`ShortenerError::HashCollision`] is returned
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::InvalidInput`] if `original_url` is empty
    /// - [`ShortenerError::HashCollision`] on an id clash with another URL
    /// - [`ShortenerError::Reconciliation`] if the post-duplicate lookup fails
    /// - [`ShortenerError::Store`] on any other store failure
    #[instrument(level = "debug", skip(self))]
    pub async fn create_short_url(&self, original_url: &str) -> Result<UrlRecord, ShortenerError> {
        if original_url.is_empty() {
            return Err(ShortenerError::InvalidInput("original URL cannot be empty"));
        }

        let id = derive_short_id(original_url);
        // Microsecond precision so a fresh record equals its stored copy.
        let candidate = UrlRecord::new(
            id,
            original_url.to_string(),
            Utc::now().trunc_subsecs(6),
        );

        match self.store.save(&candidate).await {
            Ok(()) => Ok(candidate),
            Err(StoreError::Duplicate { id }) => self.reconcile(id, original_url).await,
            Err(e) => Err(ShortenerError::Store(e)),
        }
    }

    /// Resolves a short id to the URL it was created for.
    ///
    /// # Errors
    ///
    /// - [`ShortenerError::InvalidInput`] if `id` is empty
    /// - [`ShortenerError::NotFound`] if no record has this id
    /// - [`ShortenerError::Store`] on store failure
    #[instrument(level = "debug", skip(self))]
    pub async fn get_original_url(&self, id: &str) -> Result<String, ShortenerError> {
        if id.is_empty() {
            return Err(ShortenerError::InvalidInput("short ID cannot be empty"));
        }

        match self.store.get_by_id(id).await {
            Ok(record) => Ok(record.original_url),
            Err(StoreError::NotFound { id }) => Err(ShortenerError::NotFound { id }),
            Err(e) => Err(ShortenerError::Store(e)),
        }
    }

    async fn reconcile(&self, id: String, original_url: &str) -> Result<UrlRecord, ShortenerError> {
        let existing = match self.store.get_by_id(&id).await {
            Ok(record) => record,
            Err(source) => return Err(ShortenerError::Reconciliation { id, source }),
        };

        if existing.original_url == original_url {
            return Ok(existing);
        }

        Err(ShortenerError::HashCollision {
            id,
            submitted: original_url.to_string(),
            existing: existing.original_url,
        })
    }
}
