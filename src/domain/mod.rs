//! Domain layer: the URL record, the storage contract, and its error taxonomy.
//!
//! The domain layer has no knowledge of HTTP. Repository traits defined here are
//! implemented by [`crate::infrastructure::persistence`].

pub mod entities;
pub mod errors;
pub mod repositories;
