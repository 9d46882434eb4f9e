use chrono_tz::Tz;

use crate::utils::{AppError, AppResult, ErrorCode};

/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden from the environment (a `.env` file is
/// loaded first by the binary):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | order-server.db | SQLite file (`:memory:` for an in-memory store) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | TIMEZONE | UTC | Business timezone for today/week/month boundaries |
/// | ENVIRONMENT | development | development, staging or production |
/// | LOG_LEVEL | info | Default log filter when RUST_LOG is unset |
/// | LOG_DIR | (unset) | Directory for daily rolling log files |
/// | LOG_JSON | false | Emit JSON log lines |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | DEFAULT_PAGE_SIZE | 15 | Page size when a listing omits `per_page` |
///
/// # Example
///
/// ```ignore
/// TIMEZONE=Asia/Jakarta HTTP_PORT=8080 cargo run -p order-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Business timezone
    pub timezone: Tz,
    /// Runtime environment: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// Request timeout (ms)
    pub request_timeout_ms: u64,
    pub default_page_size: u32,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults; an unknown timezone name is an error.
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let timezone = match std::env::var("TIMEZONE") {
            Ok(name) => parse_timezone(&name)?,
            Err(_) => defaults.timezone,
        };

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.http_port),
            timezone,
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_json),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            default_page_size: std::env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.default_page_size),
        })
    }

    /// Is this a production deployment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Is this a development deployment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "order-server.db".into(),
            http_port: 3000,
            timezone: chrono_tz::UTC,
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            log_json: false,
            request_timeout_ms: 30_000,
            default_page_size: 15,
        }
    }
}

/// Parse an IANA timezone name such as `Asia/Jakarta`
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>().map_err(|_| {
        AppError::with_message(ErrorCode::ConfigError, format!("Unknown timezone: {name}"))
    })
}
