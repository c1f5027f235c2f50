//! HTTP request handlers.

pub mod home;
pub mod redirect;
pub mod shorten;

pub use home::{home_handler, not_found_handler};
pub use redirect::{missing_id_handler, redirect_handler};
pub use shorten::shorten_handler;
