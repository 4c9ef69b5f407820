use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub funnel: FunnelConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let funnel = FunnelConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            funnel,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Settings controlling funnel validation, insight display, and collaborators.
#[derive(Debug, Clone)]
pub struct FunnelConfig {
    /// Whether the lead-capture step requires a non-empty location.
    pub location_required: bool,
    /// Maximum number of insights surfaced as "top" recommendations.
    pub insight_display_cap: usize,
    /// Upper bound on the optional enrichment call.
    pub enrichment_timeout_ms: u64,
    /// Sender address for report delivery; mail is skipped when unset.
    pub mail_sender: Option<String>,
}

impl FunnelConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let location_required = env::var("FUNNEL_LOCATION_REQUIRED")
            .map(|value| parse_flag(&value))
            .unwrap_or(true);

        let insight_display_cap = match env::var("FUNNEL_INSIGHT_CAP") {
            Ok(value) => value.parse::<usize>().map_err(|_| ConfigError::InvalidNumber {
                key: "FUNNEL_INSIGHT_CAP",
            })?,
            Err(_) => 5,
        };

        let enrichment_timeout_ms = match env::var("FUNNEL_ENRICHMENT_TIMEOUT_MS") {
            Ok(value) => value.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                key: "FUNNEL_ENRICHMENT_TIMEOUT_MS",
            })?,
            Err(_) => 1500,
        };

        let mail_sender = env::var("FUNNEL_MAIL_SENDER")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            location_required,
            insight_display_cap,
            enrichment_timeout_ms,
            mail_sender,
        })
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            location_required: true,
            insight_display_cap: 5,
            enrichment_timeout_ms: 1500,
            mail_sender: None,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidNumber { .. } => None,
        }
    }
}
