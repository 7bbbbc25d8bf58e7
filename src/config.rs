//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), read once at startup.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Default browser origins allowed to call the HTTP API.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "https://desafio-tecnico-furia-front.vercel.app",
];

/// Default chat-completions endpoint.
pub const DEFAULT_PROVIDER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_PROVIDER_MODEL: &str = "mistralai/mistral-7b-instruct";

/// Configuration errors. Only the listen address is strict; every other
/// setting falls back to its default.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `HOST` is not an IP address.
    #[error("invalid HOST {value:?}: {source}")]
    InvalidHost {
        /// Raw value.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// `PORT` is not a port number.
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        /// Raw value.
        value: String,
        /// Parse failure.
        source: std::num::ParseIntError,
    },
}

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local or staging use; upstream error details are exposed.
    #[default]
    Development,
    /// Error details are withheld from clients.
    Production,
}

impl Environment {
    /// Parses `APP_ENV`. `production` and `prod` (any case) select
    /// [`Environment::Production`]; anything else is development.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Returns `true` in production.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Settings for the external chat-completions provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Chat-completions endpoint.
    pub api_url: String,
    /// Bearer credential.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Value of the `HTTP-Referer` header.
    pub referer: String,
    /// Value of the `X-Title` header.
    pub title: String,
    /// Whole-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PROVIDER_URL.to_string(),
            api_key: "free".to_string(),
            model: DEFAULT_PROVIDER_MODEL.to_string(),
            referer: "http://localhost:5173".to_string(),
            title: "FURIA Fan Chat".to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address shared by the HTTP API and the `/ws` endpoint.
    pub listen_addr: SocketAddr,

    /// Deployment mode.
    pub environment: Environment,

    /// Browser origins allowed to call the HTTP API.
    pub allowed_origins: Vec<String>,

    /// External provider settings.
    pub provider: ProviderConfig,

    /// Per-connection outbound queue size for the relay.
    pub ws_outbound_capacity: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `HOST` or `PORT` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `HOST` or `PORT` cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host_raw = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let host: IpAddr = host_raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                value: host_raw.clone(),
                source,
            })?;

        let port_raw = lookup("PORT").unwrap_or_else(|| "3002".to_string());
        let port: u16 = port_raw
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidPort {
                value: port_raw.clone(),
                source,
            })?;

        let environment = lookup("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let allowed_origins = lookup("ALLOWED_ORIGINS").map_or_else(
            || {
                DEFAULT_ALLOWED_ORIGINS
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            },
            |raw| parse_origins(&raw),
        );

        let defaults = ProviderConfig::default();
        let timeout_secs: u64 = parse_or(lookup("PROVIDER_TIMEOUT_SECS"), 30);
        let provider = ProviderConfig {
            api_url: lookup("OPENROUTER_API_URL").unwrap_or(defaults.api_url),
            api_key: lookup("OPENROUTER_API_KEY").unwrap_or(defaults.api_key),
            model: lookup("OPENROUTER_MODEL").unwrap_or(defaults.model),
            referer: lookup("OPENROUTER_REFERER").unwrap_or(defaults.referer),
            title: lookup("OPENROUTER_TITLE").unwrap_or(defaults.title),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        };

        let ws_outbound_capacity = parse_or(lookup("WS_OUTBOUND_CAPACITY"), 64_usize).max(1);

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            environment,
            allowed_origins,
            provider,
            ws_outbound_capacity,
            log_format,
        })
    }
}

/// Splits a comma-separated origin list, dropping blanks and wildcards.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != "*")
        .map(ToString::to_string)
        .collect()
}

/// Parses an optional value as `T`, returning `default` on missing or
/// invalid input.
fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
