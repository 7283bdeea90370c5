//! Application configuration.
//!
//! Sources, later ones winning: built-in defaults, the TOML config file,
//! `AUTHGATE_*` environment variables (`__` separates nested keys, e.g.
//! `AUTHGATE_SERVER__PORT=9000`).

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::{AuthConfig, ConfigValidationError, resolve_env_value};
use crate::provider::GitHubConfig;

pub const APP_NAME: &str = "authgate";

/// Top-level configuration. Unknown keys are rejected so a file in the old
/// flat layout fails loudly instead of loading as defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub github: GitHubConfig,
}

/// HTTP listener and cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    #[serde(alias = "server_port")]
    pub port: u16,
    /// Where the OAuth callback sends the browser after login.
    pub base_path: String,
    /// Add the `Secure` attribute to the session cookie.
    pub secure_cookie: bool,
    /// Upper bound on the OAuth callback's provider round trips, in seconds.
    pub provider_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_path: "/".to_string(),
            secure_cookie: false,
            provider_timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (optional file) and the environment.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_from(path, false, None)
    }

    /// Like [`AppConfig::load`], but a missing file is an error. Used for a
    /// path the operator named explicitly.
    pub fn load_required(path: &Path) -> Result<Self> {
        Self::load_from(path, true, None)
    }

    /// `env` replaces the process environment when given.
    fn load_from(path: &Path, required: bool, env: Option<Map<String, String>>) -> Result<Self> {
        let built = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix("AUTHGATE")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
            .with_context(|| format!("reading config from {}", path.display()))?;

        built
            .try_deserialize()
            .with_context(|| format!("parsing config from {}", path.display()))
    }

    /// GitHub settings with `env:` references resolved.
    ///
    /// Missing client credentials are fatal only when someone is actually
    /// allowed to sign in through GitHub.
    pub fn resolve_github(&self) -> Result<GitHubConfig, ConfigValidationError> {
        let resolve = |value: &str| match resolve_env_value(value) {
            Ok(resolved) => Ok(resolved),
            Err(e) if self.auth.github_allow_id.is_empty() => {
                warn!("GitHub login disabled: {}", e);
                Ok(String::new())
            }
            Err(e) => Err(e),
        };

        Ok(GitHubConfig {
            client_id: resolve(&self.github.client_id)?,
            client_secret: resolve(&self.github.client_secret)?,
            ..self.github.clone()
        })
    }

    /// Render as TOML for `config show`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing config to TOML")
    }
}

/// Default config file location: `$XDG_CONFIG_HOME/authgate/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_config_dir()?.join("config.toml"))
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    match path.to_str() {
        Some(text) => {
            let expanded = shellexpand::full(text).context("expanding path")?;
            Ok(PathBuf::from(expanded.to_string()))
        }
        None => Ok(path.to_path_buf()),
    }
}

fn default_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir).join(APP_NAME));
    }

    if let Some(dir) = dirs::config_dir() {
        return Ok(dir.join(APP_NAME));
    }

    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_NAME))
        .ok_or_else(|| anyhow!("unable to determine configuration directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.issuer_name, "authgate");
        assert_eq!(config.auth.hmac_secret.as_deref(), Some("env:HMAC_SECRET"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[server]
server_port = 9090
base_path = "/app/"

[auth]
isser_name = "testprogram"
token_lifetime = 999
hmac_secret = "super_sugoi_secret"
basicauth = ["user:$2a$10$etIpH1oxl4Ky5koV2AzyYe42caqi/tvtme/UTwxA7lHlB2loLDOte"]
github_allow_id = [100000, 100001]

[github]
client_id = "Iv1.test"
client_secret = "shh"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.base_path, "/app/");
        assert_eq!(config.auth.issuer_name, "testprogram");
        assert_eq!(config.auth.token_lifetime, 999);
        assert_eq!(config.auth.github_allow_id, vec![100000, 100001]);

        let built = config.auth.build().unwrap();
        assert_eq!(built.credentials.len(), 1);

        let github = config.resolve_github().unwrap();
        assert_eq!(github.client_id, "Iv1.test");
        assert_eq!(github.token_url, crate::provider::github::DEFAULT_TOKEN_URL);
    }

    #[test]
    fn test_resolve_github_requires_credentials_when_allow_listed() {
        let mut config = AppConfig::default();
        config.github.client_id = "env:AUTHGATE_TEST_UNSET_CLIENT_ID".to_string();
        config.github.client_secret = "literal".to_string();

        let lenient = config.resolve_github().unwrap();
        assert_eq!(lenient.client_id, "");

        config.auth.github_allow_id = vec![1];
        assert_eq!(
            config.resolve_github().unwrap_err(),
            ConfigValidationError::EnvVarNotFound("AUTHGATE_TEST_UNSET_CLIENT_ID".to_string())
        );
    }

    #[test]
    fn test_default_config_renders_as_toml() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("issuer_name"));
    }

    #[test]
    fn test_load_required_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.toml");

        assert!(AppConfig::load_required(&path).is_err());
        assert!(AppConfig::load(&path).is_ok());
    }

    #[test]
    fn test_flat_legacy_layout_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
isser_name = "testprogram"
server_port = 9090
basicauth = ["user:$2a$10$etIpH1oxl4Ky5koV2AzyYe42caqi/tvtme/UTwxA7lHlB2loLDOte"]
github_allow_id = [100000]
"#
        )
        .unwrap();

        let err = AppConfig::load_required(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"), "{err:#}");
    }

    #[test]
    fn test_unknown_key_in_section_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[auth]\nissuer = \"typo\"\n").unwrap();

        assert!(AppConfig::load_required(file.path()).is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            "[server]\nport = 9090\n\n[auth]\nissuer_name = \"from-file\"\ntoken_lifetime = 120\n"
        )
        .unwrap();

        let env = Map::from_iter([
            ("AUTHGATE_SERVER__PORT".to_string(), "7070".to_string()),
            ("AUTHGATE_AUTH__ISSUER_NAME".to_string(), "from-env".to_string()),
            ("UNRELATED".to_string(), "ignored".to_string()),
        ]);
        let config = AppConfig::load_from(file.path(), true, Some(env)).unwrap();

        assert_eq!(config.server.port, 7070);
        assert_eq!(config.auth.issuer_name, "from-env");
        // Keys without an override keep the file value.
        assert_eq!(config.auth.token_lifetime, 120);
    }
}
