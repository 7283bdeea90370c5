//! Authentication module.
//!
//! Decides whether a caller is authenticated through one of:
//! - Basic-Auth against bcrypt hashes
//! - a signed session token (HS256 JWT) presented as a cookie
//! - a GitHub OAuth2 identity on the allow-list

mod authenticator;
mod basic;
mod claims;
mod clock;
mod config;
mod delegated;
mod error;
mod store;
mod token;

pub use authenticator::{Authenticator, AuthenticatorConfig};
pub use basic::BasicAuthVerifier;
pub use claims::SessionClaims;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AuthConfig, ConfigValidationError, resolve_env_value};
pub use delegated::DelegatedIdentityExchange;
pub use error::{AuthError, AuthErrorResponse};
pub use store::{AllowList, CredentialStore};
pub use token::SessionTokenCodec;
