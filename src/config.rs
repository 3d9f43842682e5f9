use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub marketplace: MarketplaceConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file means defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// `USE_SANDBOX=true` in the process environment wins over the file.
    pub fn apply_env(mut self) -> Self {
        if let Ok(flag) = std::env::var("USE_SANDBOX") {
            self.marketplace.environment = if flag == "true" {
                Environment::Sandbox
            } else {
                Environment::Production
            };
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.marketplace.marketplace_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "marketplace.marketplace_id",
                reason: "cannot be empty".into(),
            }
            .into());
        }
        if self.marketplace.active_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "marketplace.active_limit",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.marketplace.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "marketplace.timeout_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn oauth_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.ebay.com/identity/v1/oauth2/token",
            Environment::Sandbox => "https://api.sandbox.ebay.com/identity/v1/oauth2/token",
        }
    }

    pub fn browse_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.ebay.com/buy/browse/v1/item_summary/search",
            Environment::Sandbox => {
                "https://api.sandbox.ebay.com/buy/browse/v1/item_summary/search"
            }
        }
    }

    pub fn finding_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://svcs.ebay.com/services/search/FindingService/v1",
            Environment::Sandbox => {
                "https://svcs.sandbox.ebay.com/services/search/FindingService/v1"
            }
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Sandbox => f.write_str("sandbox"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub environment: Environment,
    pub marketplace_id: String,
    /// Listings requested per search in the `analyze` flow.
    pub active_limit: u32,
    pub timeout_secs: u64,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            marketplace_id: "EBAY-US".into(),
            active_limit: 20,
            timeout_secs: 15,
        }
    }
}

/// API secrets for one environment. Never read from the config file.
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub app_id: Option<String>,
}

impl Credentials {
    pub fn from_env(environment: Environment) -> Self {
        Self::from_lookup(environment, |name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        match environment {
            Environment::Production => Credentials {
                client_id: get("EBAY_CLIENT_ID"),
                client_secret: get("EBAY_CLIENT_SECRET"),
                app_id: get("EBAY_APP_ID_PROD"),
            },
            Environment::Sandbox => Credentials {
                client_id: get("EBAY_CLIENT_ID_SANDBOX"),
                client_secret: get("EBAY_CLIENT_SECRET_SANDBOX"),
                app_id: get("EBAY_APP_ID_SANDBOX"),
            },
        }
    }

    pub fn oauth_pair(&self) -> Result<(&str, &str)> {
        let id = self
            .client_id
            .as_deref()
            .ok_or(ConfigError::MissingCredential { name: "client_id" })?;
        let secret = self
            .client_secret
            .as_deref()
            .ok_or(ConfigError::MissingCredential { name: "client_secret" })?;
        Ok((id, secret))
    }

    pub fn app_id(&self) -> Result<&str> {
        Ok(self
            .app_id
            .as_deref()
            .ok_or(ConfigError::MissingCredential { name: "app_id" })?)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "set" } else { "not set" };
        f.debug_struct("Credentials")
            .field("client_id", &mask(&self.client_id))
            .field("client_secret", &mask(&self.client_secret))
            .field("app_id", &mask(&self.app_id))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Install the global subscriber. `RUST_LOG` overrides `level`.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                tracing_fmt().json().with_env_filter(filter).with_writer(std::io::stderr).init();
            }
            _ => {
                tracing_fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_partial_file_over_defaults() {
        let file = write_config(
            r#"
            [marketplace]
            environment = "sandbox"

            [logging]
            format = "json"
            "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.marketplace.environment, Environment::Sandbox);
        assert_eq!(config.marketplace.marketplace_id, "EBAY-US");
        assert_eq!(config.marketplace.active_limit, 20);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn rejects_zero_limit() {
        let file = write_config("[marketplace]\nactive_limit = 0\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("active_limit"));
    }

    #[test]
    fn rejects_bad_toml() {
        let file = write_config("[marketplace\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(crate::error::Error::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.marketplace.environment, Environment::Production);
    }

    #[test]
    fn endpoints_follow_environment() {
        assert!(Environment::Sandbox.browse_url().contains("sandbox"));
        assert!(Environment::Sandbox.finding_url().starts_with("https://svcs.sandbox"));
        assert!(!Environment::Production.oauth_url().contains("sandbox"));
    }

    #[test]
    fn credentials_pick_the_environment_specific_names() {
        let lookup = |name: &str| match name {
            "EBAY_CLIENT_ID" => Some("prod-id".to_string()),
            "EBAY_CLIENT_SECRET" => Some("prod-secret".to_string()),
            "EBAY_CLIENT_ID_SANDBOX" => Some("sb-id".to_string()),
            "EBAY_APP_ID_SANDBOX" => Some("  ".to_string()),
            _ => None,
        };

        let prod = Credentials::from_lookup(Environment::Production, lookup);
        assert_eq!(prod.oauth_pair().unwrap(), ("prod-id", "prod-secret"));
        assert!(prod.app_id().is_err());

        let sandbox = Credentials::from_lookup(Environment::Sandbox, lookup);
        assert_eq!(sandbox.client_id.as_deref(), Some("sb-id"));
        assert!(sandbox.oauth_pair().is_err());
        assert!(sandbox.app_id.is_none());
    }

    #[test]
    fn debug_output_masks_secrets() {
        let creds = Credentials {
            client_id: Some("abc".into()),
            client_secret: Some("hunter2".into()),
            app_id: None,
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("not set"));
    }
}
