//! Authentication configuration.

use serde::{Deserialize, Serialize};

use super::authenticator::AuthenticatorConfig;
use super::store::{AllowList, CredentialStore};

/// Authentication configuration as read from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// `iss` claim written into and required from session tokens.
    #[serde(alias = "isser_name")]
    pub issuer_name: String,

    /// HMAC secret for HS256 session tokens. Supports `env:VAR_NAME`.
    pub hmac_secret: Option<String>,

    /// Session token lifetime in seconds (also the cookie Max-Age).
    pub token_lifetime: u64,

    /// Basic-Auth users as `username:bcrypt_hash`.
    pub basicauth: Vec<String>,

    /// GitHub user IDs allowed to sign in through OAuth.
    pub github_allow_id: Vec<u64>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer_name: "authgate".to_string(),
            hmac_secret: Some("env:HMAC_SECRET".to_string()),
            token_lifetime: 60 * 60 * 24,
            basicauth: Vec::new(),
            github_allow_id: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Resolve the HMAC secret, expanding `env:VAR_NAME` syntax.
    pub fn resolve_hmac_secret(&self) -> Result<String, ConfigValidationError> {
        let value = self
            .hmac_secret
            .as_deref()
            .ok_or(ConfigValidationError::MissingHmacSecret)?;
        let secret = resolve_env_value(value)?;
        if secret.is_empty() {
            return Err(ConfigValidationError::MissingHmacSecret);
        }
        Ok(secret)
    }

    /// Validate the configuration and build the immutable authenticator settings.
    pub fn build(&self) -> Result<AuthenticatorConfig, ConfigValidationError> {
        if self.issuer_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyIssuer);
        }

        Ok(AuthenticatorConfig {
            issuer: self.issuer_name.clone(),
            secret: self.resolve_hmac_secret()?,
            credentials: CredentialStore::from_entries(&self.basicauth)?,
            allow_list: self.github_allow_id.iter().copied().collect::<AllowList>(),
        })
    }
}

/// Expand `env:VAR_NAME` to the variable's value; other values pass through.
pub fn resolve_env_value(value: &str) -> Result<String, ConfigValidationError> {
    match value.strip_prefix("env:") {
        Some(var_name) => match std::env::var(var_name) {
            Ok(resolved) if !resolved.is_empty() => Ok(resolved),
            Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
            Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
        },
        None => Ok(value.to_string()),
    }
}

/// Configuration validation errors. All of them abort startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// No HMAC secret configured.
    MissingHmacSecret,
    /// Issuer name is blank.
    EmptyIssuer,
    /// A `basicauth` entry is not `username:hash`.
    InvalidBasicAuthEntry(String),
    /// The same username appears twice in `basicauth`.
    DuplicateUser(String),
    /// Environment variable not found (for `env:VAR_NAME` syntax).
    EnvVarNotFound(String),
    /// Environment variable is empty (for `env:VAR_NAME` syntax).
    EnvVarEmpty(String),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHmacSecret => {
                write!(
                    f,
                    "HMAC secret is required. Set HMAC_SECRET or auth.hmac_secret in config."
                )
            }
            Self::EmptyIssuer => write!(f, "auth.issuer_name must not be empty."),
            Self::InvalidBasicAuthEntry(entry) => {
                write!(
                    f,
                    "Invalid basicauth entry '{}': expected 'username:bcrypt_hash'.",
                    entry
                )
            }
            Self::DuplicateUser(user) => {
                write!(f, "User '{}' appears more than once in basicauth.", user)
            }
            Self::EnvVarNotFound(var) => {
                write!(
                    f,
                    "Environment variable '{}' not found (referenced via env:{} in config).",
                    var, var
                )
            }
            Self::EnvVarEmpty(var) => {
                write!(
                    f,
                    "Environment variable '{}' is empty (referenced via env:{} in config).",
                    var, var
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}
