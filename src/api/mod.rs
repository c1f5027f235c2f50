//! HTTP facade: translates requests into shortener calls and formats
//! responses.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies
//! - [`handlers`] - Endpoint handlers
//! - [`middleware`] - CORS and request tracing
//! - [`routes`] - Route composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
