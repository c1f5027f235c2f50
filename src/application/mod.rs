//! Application layer: URL shortening rules on top of the storage contract.
//!
//! - [`services::ShortenerService`] - id derivation, collision reconciliation, lookup
//! - [`error::ShortenerError`] - what the service reports to the HTTP facade

pub mod error;
pub mod services;

pub use error::ShortenerError;
