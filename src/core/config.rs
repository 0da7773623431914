//! Configuration management for the toolbox server.
//!
//! Configuration is assembled once at startup (defaults, then `.env`, then
//! process environment) and shared as an `Arc<Config>`. Nothing reads the
//! environment after that point.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Main configuration structure for the toolbox server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Database used by the SQL tools.
    pub database: DatabaseConfig,

    /// Outbound HTTP client settings (web_request, get_weather).
    pub http_client: HttpClientConfig,

    /// Upstream weather services.
    pub weather: WeatherConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Database connection settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite://data/app.db`.
    pub url: String,
}

/// The URL may embed credentials, keep it out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .finish()
    }
}

impl DatabaseConfig {
    /// Short label for the database, used in tool output.
    ///
    /// This is the last path segment of the URL without query string or
    /// extension (`sqlite://data/app.db?mode=ro` -> `app`).
    pub fn display_name(&self) -> String {
        let without_query = self.url.split('?').next().unwrap_or_default();
        let last = without_query
            .rsplit(['/', ':'])
            .find(|s| !s.is_empty())
            .unwrap_or("database");
        last.split('.').next().unwrap_or(last).to_string()
    }
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Fixed timeout applied to every outbound request.
    pub timeout_secs: u64,

    /// Maximum number of characters of a fetched body returned by web_request.
    pub max_content_chars: usize,

    /// User-Agent header sent upstream.
    pub user_agent: String,
}

/// Upstream weather services (Open-Meteo compatible).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// City-name to coordinates lookup endpoint.
    pub geocoding_url: String,

    /// Current-weather endpoint.
    pub forecast_url: String,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory for file tools.
    /// If None, no path restrictions are enforced.
    pub root_path: Option<PathBuf>,

    /// Whether file tools may operate on symlinks.
    pub allow_symlinks: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://toolbox.db".to_string(),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_content_chars: 5000,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "toolbox-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            database: DatabaseConfig::default(),
            http_client: HttpClientConfig::default(),
            weather: WeatherConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_DATABASE_URL`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(with_timestamps) = env_parse::<bool>("MCP_LOG_TIMESTAMPS")? {
            config.logging.with_timestamps = with_timestamps;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(url) = std::env::var("MCP_DATABASE_URL") {
            config.database.url = url;
        }

        if let Some(timeout) = env_parse::<u64>("MCP_HTTP_TIMEOUT_SECS")? {
            config.http_client.timeout_secs = timeout;
        }

        if let Some(max_chars) = env_parse::<usize>("MCP_WEB_MAX_CHARS")? {
            config.http_client.max_content_chars = max_chars;
        }

        if let Ok(url) = std::env::var("MCP_GEOCODING_URL") {
            config.weather.geocoding_url = url;
        }

        if let Ok(url) = std::env::var("MCP_FORECAST_URL") {
            config.weather.forecast_url = url;
        }

        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
        }

        if let Some(allow_symlinks) = env_parse::<bool>("MCP_ALLOW_SYMLINKS")? {
            config.security.allow_symlinks = allow_symlinks;
        }

        config.validate()?;
        Ok(config)
    }

    /// Settings worth a warning at startup.
    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.database.url == DatabaseConfig::default().url {
            warnings.push(format!(
                "MCP_DATABASE_URL not set - SQL tools will use {}",
                self.database.url
            ));
        }

        if self.security.root_path.is_none() {
            warnings.push(
                "MCP_ROOT_PATH not set - no path restrictions active. \
                 All filesystem paths will be allowed."
                    .to_string(),
            );
        }

        warnings
    }

    /// Log the effective settings. Call once the subscriber is installed.
    pub fn log_summary(&self) {
        info!("Database: {}", self.database.display_name());

        if let Some(root) = &self.security.root_path {
            info!("Path security enabled: root directory set to {:?}", root);
        }
        info!("Symlinks allowed: {}", self.security.allow_symlinks);

        for warning in self.startup_warnings() {
            warn!("{}", warning);
        }
    }

    /// Reject settings that would make every call of some tool fail.
    pub fn validate(&self) -> Result<()> {
        if self.http_client.timeout_secs == 0 {
            return Err(Error::config("HTTP timeout must be at least one second"));
        }

        if self.database.url.trim().is_empty() {
            return Err(Error::config("database URL must not be empty"));
        }

        for (key, url) in [
            ("geocoding", &self.weather.geocoding_url),
            ("forecast", &self.weather.forecast_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::config(format!(
                    "{} URL must be http(s), got '{}'",
                    key, url
                )));
            }
        }

        Ok(())
    }
}

/// Parse an optional environment variable, failing on unparsable values.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::config(format!("{}='{}': {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}
