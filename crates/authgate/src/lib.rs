//! authgate library.
//!
//! Identity gateway deciding per request whether a caller is authenticated
//! through Basic-Auth, a signed session cookie, or an allow-listed GitHub
//! identity, and minting session tokens on success.

pub mod api;
pub mod auth;
pub mod config;
pub mod provider;
