//! URL handling module for Newsreel
//!
//! Both engines resolve raw `href` values against a page URL and compare
//! hosts. Those helpers live here so malformed links are handled the same
//! way everywhere: they are dropped, never reported.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use resolve::{is_http_url, parse_http_url, resolve_link};
