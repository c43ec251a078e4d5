//! Configuration for the fleet service
//!
//! Loaded from (later sources override earlier):
//! 1. Default values
//! 2. An optional YAML file
//! 3. Environment variables prefixed with `FLEET__`, nested with `__`
//!    (for example `FLEET__SERVER__BIND_ADDR`)

use crate::domain::ServiceConfig;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FLEET__";

/// Database URL that selects the in-process document store
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Fleet service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// sea-orm connection URL (`sqlite://...`, `postgres://...`) or `memory`
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://fleet.db?mode=rwc".to_owned(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderKind {
    Firebase,
    #[default]
    Static,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirebaseConfig {
    pub project_id: String,
    /// Key id -> PEM-encoded RSA public key
    pub public_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub provider: AuthProviderKind,
    pub firebase: FirebaseConfig,
    /// Token -> subject uid, used by the static provider
    pub static_tokens: HashMap<String, String>,
    /// Pause before re-verifying a token that is not yet valid
    #[serde(with = "humantime_serde")]
    pub clock_skew_retry: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: AuthProviderKind::default(),
            firebase: FirebaseConfig::default(),
            static_tokens: HashMap::new(),
            clock_skew_retry: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Load defaults, then `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::Invalid {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "server.bind_addr must not be empty".to_owned(),
            });
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "database.url must not be empty".to_owned(),
            });
        }
        if self.auth.provider == AuthProviderKind::Firebase {
            if self.auth.firebase.project_id.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: "auth.firebase.project_id is required for the firebase provider"
                        .to_owned(),
                });
            }
            if self.auth.firebase.public_keys.is_empty() {
                return Err(ConfigError::Invalid {
                    message: "auth.firebase.public_keys must list at least one key".to_owned(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8087");
        assert_eq!(config.database.url, "sqlite://fleet.db?mode=rwc");
        assert_eq!(config.auth.provider, AuthProviderKind::Static);
        assert_eq!(config.auth.clock_skew_retry, Duration::from_secs(1));
        assert_eq!(config.service.invoice_prefix, "INV");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn firebase_requires_project_and_keys() {
        let mut config = Config::default();
        config.auth.provider = AuthProviderKind::Firebase;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("project_id"));

        config.auth.firebase.project_id = "fleet-prod".to_owned();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("public_keys"));
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  bind_addr: 0.0.0.0:9000\ndatabase:\n  url: memory\nauth:\n  clock_skew_retry: 250ms\n  static_tokens:\n    dev-token: uid-dev\nservice:\n  invoice_prefix: FLT"
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert!(config.database.is_memory());
        assert_eq!(config.auth.clock_skew_retry, Duration::from_millis(250));
        assert_eq!(config.auth.static_tokens["dev-token"], "uid-dev");
        assert_eq!(config.service.invoice_prefix, "FLT");
        assert_eq!(config.service.communication_prefix, "DGS");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  bind_address: 0.0.0.0:9000").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Load(_))
        ));
    }
}
