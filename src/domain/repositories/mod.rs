//! Repository trait definitions for the domain layer.
//!
//! Concrete implementations live in `crate::infrastructure::persistence`.
//! Mock implementations are generated via `mockall` for unit tests.

pub mod url_store;

pub use url_store::UrlStore;

#[cfg(test)]
pub use url_store::MockUrlStore;
