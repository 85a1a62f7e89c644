//! Configuration loading and management

use anyhow::{Context, Result, bail};
use axum::http::{HeaderName, HeaderValue};
use cinelog_auth::{Algorithm, SUPPORTED_ALGORITHMS, parse_algorithm, token_lifetime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Token signing configuration
///
/// `secret_key` and `algorithm` have no defaults; startup fails without them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            algorithm: None,
            access_token_expire_minutes: default_access_token_expire_minutes(),
        }
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API with credentials; empty disables CORS
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Values supplied on the command line or through the environment
///
/// Each set field replaces the corresponding value from the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<String>,
    pub secret_key: Option<String>,
    pub algorithm: Option<String>,
    pub access_token_expire_minutes: Option<i64>,
}

/// Validated token signing settings
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "./data/cinelog.db".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Header the frontend reads for list totals
const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Apply command-line and environment overrides
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = path;
        }
        if let Some(secret_key) = overrides.secret_key {
            self.auth.secret_key = Some(secret_key);
        }
        if let Some(algorithm) = overrides.algorithm {
            self.auth.algorithm = Some(algorithm);
        }
        if let Some(minutes) = overrides.access_token_expire_minutes {
            self.auth.access_token_expire_minutes = minutes;
        }
        self
    }

    /// Validate the signing configuration
    pub fn auth_settings(&self) -> Result<AuthSettings> {
        let secret_key = match self.auth.secret_key.as_deref() {
            Some(secret) if !secret.trim().is_empty() => secret.to_string(),
            _ => bail!("SECRET_KEY is not set"),
        };

        let algorithm = match self.auth.algorithm.as_deref() {
            Some(name) if !name.trim().is_empty() => parse_algorithm(name).with_context(|| {
                format!(
                    "ALGORITHM must be one of {}",
                    SUPPORTED_ALGORITHMS.join(", ")
                )
            })?,
            _ => bail!("ALGORITHM is not set"),
        };

        token_lifetime(self.auth.access_token_expire_minutes).with_context(|| {
            format!(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be a positive, representable lifetime, got {}",
                self.auth.access_token_expire_minutes
            )
        })?;

        Ok(AuthSettings {
            secret_key,
            algorithm,
            access_token_expire_minutes: self.auth.access_token_expire_minutes,
        })
    }
}

impl CorsConfig {
    /// Build the CORS layer, or `None` when no origin is configured
    pub fn layer(&self) -> Result<Option<CorsLayer>> {
        if self.allowed_origins.is_empty() {
            return Ok(None);
        }

        let origins = self
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
                .expose_headers([TOTAL_COUNT_HEADER]),
        ))
    }
}
