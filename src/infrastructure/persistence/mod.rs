//! URL store implementations.
//!
//! - [`PgUrlStore`] - PostgreSQL table keyed by `_id`
//! - [`MemoryUrlStore`] - concurrent in-process map

pub mod memory_url_store;
pub mod pg_url_store;

pub use memory_url_store::MemoryUrlStore;
pub use pg_url_store::{PgStoreSettings, PgUrlStore};
