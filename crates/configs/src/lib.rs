//! # configs
//!
//! Layered application settings: built-in defaults, then optional
//! `config/default.toml` and `config/{LINKSPHERE_ENV}.toml`, then
//! `LINKSPHERE__SECTION__KEY` environment variables. A `.env` file is read
//! first when present.

use config::{Config, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const ENV_PREFIX: &str = "LINKSPHERE";
const ENV_SELECTOR: &str = "LINKSPHERE_ENV";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub log: LogSettings,
    pub store: StoreSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_allow_any_origin: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 5001, cors_allow_any_origin: true }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".into(), format: LogFormat::Pretty }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self { url: None, max_connections: 5 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: Option<SecretString>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Most identities remembered for profile fallback
    pub directory_capacity: usize,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self { jwt_secret: None, issuer: None, audience: None, directory_capacity: 10_000 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_post_chars: usize,
    pub max_comment_chars: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self { max_post_chars: 280, max_comment_chars: 1000 }
    }
}

impl Settings {
    /// Reads `.env`, the config files and the environment, then validates.
    pub fn load() -> Result<Self, SettingsError> {
        if let Some(err) = dotenv_problem(dotenvy::dotenv()) {
            warn!(error = %err, "ignoring unreadable .env file");
        }
        let env = std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".into());
        debug!(env, "loading settings");

        let settings: Settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let secret_missing = self
            .auth
            .jwt_secret
            .as_ref()
            .map_or(true, |s| s.expose_secret().trim().is_empty());
        if secret_missing {
            return Err(SettingsError::Invalid("auth.jwt_secret must be set".into()));
        }
        if self.store.backend == StoreBackend::Postgres && self.database.url.is_none() {
            return Err(SettingsError::Invalid(
                "database.url is required when store.backend = \"postgres\"".into(),
            ));
        }
        if self.limits.max_post_chars == 0 || self.limits.max_comment_chars == 0 {
            return Err(SettingsError::Invalid("content limits must be positive".into()));
        }
        Ok(())
    }
}

/// A missing `.env` is normal; anything else is worth reporting.
fn dotenv_problem<T>(result: Result<T, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => Some(err),
    }
}
