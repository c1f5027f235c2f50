//! HTTP middleware.

pub mod cors;
pub mod tracing;
