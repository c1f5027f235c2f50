//! Data Transfer Objects for request and response bodies.

pub mod shorten;
