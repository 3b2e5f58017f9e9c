use std::time::Duration;

use crate::GenericError;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_ROUTER_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:5000";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Process configuration, read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub geocoder_url: String,
    pub router_url: String,
    pub proxy_url: String,
    pub user_agent: String,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, GenericError> {
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Missing keys take their defaults; present but unparseable values are
    /// an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GenericError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("invalid PORT `{}`: {}", port, e))?,
            None => DEFAULT_PORT,
        };
        let upstream_timeout = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid UPSTREAM_TIMEOUT_SECS `{}`: {}", secs, e))?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Config {
            port,
            geocoder_url: base_url(var("GEOCODER_URL"), DEFAULT_GEOCODER_URL),
            router_url: base_url(var("ROUTER_URL"), DEFAULT_ROUTER_URL),
            proxy_url: base_url(var("PROXY_URL"), DEFAULT_PROXY_URL),
            user_agent: var("USER_AGENT").unwrap_or_else(|| {
                format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            }),
            upstream_timeout: Duration::from_secs(upstream_timeout),
        })
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .as_deref()
        .unwrap_or(default)
        .trim()
        .trim_end_matches('/')
        .to_string()
}
