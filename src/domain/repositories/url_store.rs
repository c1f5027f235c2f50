//! Repository trait for URL record persistence.

use async_trait::async_trait;

use crate::domain::entities::UrlRecord;
use crate::domain::errors::StoreError;

/// Durable, unique-keyed storage of [`UrlRecord`]s.
///
/// Implementations must be safe to share across request tasks. Stores report
/// failures and never retry; the caller decides what to do.
///
/// Cancellation follows async Rust semantics: dropping a returned future
/// abandons the operation. Implementations that enforce their own deadline
/// report its expiry as [`StoreError::Cancelled`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Inserts a record.
    ///
    /// Uniqueness is enforced atomically: of two concurrent saves with the same
    /// id, exactly one succeeds and the other gets [`StoreError::Duplicate`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the id is taken, [`StoreError::Io`]
    /// on backend failure.
    async fn save(&self, record: &UrlRecord) -> Result<(), StoreError>;

    /// Looks up a record by exact id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] on a miss, [`StoreError::Io`] on
    /// backend failure.
    async fn get_by_id(&self, id: &str) -> Result<UrlRecord, StoreError>;

    /// Prepares the backing storage. Called once at startup.
    ///
    /// The unique index on `id` comes with the primary key; no secondary
    /// indexes are created.
    async fn ensure_indexes(&self) -> Result<(), StoreError>;
}
