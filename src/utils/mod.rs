//! Utility functions for id derivation and request handling.
//!
//! - [`short_id`] - MD5-prefix short id derivation
//! - [`request_origin`] - Scheme and host extraction for absolute short URLs

pub mod request_origin;
pub mod short_id;
