//! Runtime configuration resolved from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `PLUGIN_LAB_DB_PATH` | `<tmp>/plugin_lab.sqlite3` |
//! | `PLUGIN_LAB_LOG_LEVEL` | [`default_log_level`] |
//! | `PLUGIN_LAB_LOG_DIR` | unset: logging disabled |
//! | `PLUGIN_LAB_NONCE_SECRET` | random per process |
//! | `PLUGIN_LAB_NONCE_LIFETIME_SECS` | `86400` |
//! | `PLUGIN_LAB_KEYWORD` | `wordpress` |
//!
//! Blank values are treated as unset.

use crate::logging::default_log_level;
use crate::security::NonceManager;
use crate::service::keyword_service::{KeywordMatcher, DEFAULT_KEYWORD};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

pub const ENV_DB_PATH: &str = "PLUGIN_LAB_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PLUGIN_LAB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PLUGIN_LAB_LOG_DIR";
pub const ENV_NONCE_SECRET: &str = "PLUGIN_LAB_NONCE_SECRET";
pub const ENV_NONCE_LIFETIME: &str = "PLUGIN_LAB_NONCE_LIFETIME_SECS";
pub const ENV_KEYWORD: &str = "PLUGIN_LAB_KEYWORD";

const DEFAULT_DB_FILE_NAME: &str = "plugin_lab.sqlite3";
const DEFAULT_NONCE_LIFETIME_SECS: u64 = 86_400;
const MIN_NONCE_LIFETIME_SECS: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub nonce_secret: String,
    pub nonce_lifetime: Duration,
    pub keyword: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, which maps a variable name to its
    /// raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let nonce_lifetime = match get(ENV_NONCE_LIFETIME) {
            None => DEFAULT_NONCE_LIFETIME_SECS,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs >= MIN_NONCE_LIFETIME_SECS => secs,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_NONCE_LIFETIME,
                        value: raw,
                        reason: "must be at least 2 seconds",
                    })
                }
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_NONCE_LIFETIME,
                        value: raw,
                        reason: "must be a whole number of seconds",
                    })
                }
            },
        };

        let keyword = get(ENV_KEYWORD).unwrap_or_else(|| DEFAULT_KEYWORD.to_string());
        if KeywordMatcher::new(&keyword).is_err() {
            return Err(ConfigError::InvalidValue {
                key: ENV_KEYWORD,
                value: keyword,
                reason: "keyword is too long to match",
            });
        }

        Ok(Self {
            db_path: get(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: get(ENV_LOG_DIR),
            nonce_secret: get(ENV_NONCE_SECRET).unwrap_or_else(|| Uuid::new_v4().to_string()),
            nonce_lifetime: Duration::from_secs(nonce_lifetime),
            keyword,
        })
    }

    pub fn nonce_manager(&self) -> NonceManager {
        NonceManager::new(self.nonce_secret.clone(), self.nonce_lifetime)
    }

    pub fn keyword_matcher(&self) -> KeywordMatcher {
        KeywordMatcher::new(&self.keyword).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_DB_PATH, ENV_KEYWORD, ENV_NONCE_LIFETIME};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert!(config.db_path.ends_with("plugin_lab.sqlite3"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.nonce_lifetime, Duration::from_secs(86_400));
        assert_eq!(config.keyword, "wordpress");
        assert!(!config.nonce_secret.is_empty());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            (ENV_DB_PATH, "/var/lib/lab.db"),
            (ENV_NONCE_LIFETIME, "3600"),
            (ENV_KEYWORD, " rust "),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/lab.db"));
        assert_eq!(config.nonce_lifetime, Duration::from_secs(3600));
        assert_eq!(config.keyword, "rust");
        assert_eq!(config.keyword_matcher().count("Rust rust"), 2);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(ENV_KEYWORD, "   ")]).unwrap();
        assert_eq!(config.keyword, "wordpress");
    }

    #[test]
    fn invalid_lifetime_is_rejected() {
        let err = config_from(&[(ENV_NONCE_LIFETIME, "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: ENV_NONCE_LIFETIME, .. }
        ));
        assert!(config_from(&[(ENV_NONCE_LIFETIME, "1")]).is_err());
    }
}
