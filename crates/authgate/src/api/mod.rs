//! HTTP API module.
//!
//! Maps authentication outcomes onto HTTP: deny -> 401, tampered token or
//! provider failure -> 500, provider timeout -> 504.

mod credentials;
pub mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, CookieSettings};
