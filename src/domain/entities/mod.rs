//! Core domain entities.
//!
//! Entities are plain data structures; derivation and reconciliation rules
//! live in [`crate::application::services`].

pub mod url_record;

pub use url_record::UrlRecord;
