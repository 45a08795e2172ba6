//! Runtime configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_PORTAL_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TOKEN_FILE: &str = ".portal-storage.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set or is empty.
    #[error("missing config: env var {var} not set")]
    Missing { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

impl HttpTimeouts {
    /// Read `HTTP_REQUEST_TIMEOUT_SECS` and `HTTP_CONNECT_TIMEOUT_SECS`,
    /// falling back to defaults when unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            request_secs: parse_u64(get("HTTP_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(get("HTTP_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Build a `reqwest` client with these timeouts applied.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the TLS backend fails to
    /// initialise.
    pub fn client(self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.request_secs))
            .connect_timeout(Duration::from_secs(self.connect_secs))
            .build()
    }
}

/// Settings for the HR portal client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub base_url: String,
    pub token_file: String,
    pub timeouts: HttpTimeouts,
}

impl PortalConfig {
    /// Build portal config from the environment.
    ///
    /// Optional:
    /// - `PORTAL_BASE_URL`: default `http://127.0.0.1:8000`
    /// - `PORTAL_TOKEN_FILE`: default `.portal-storage.json`
    /// - `HTTP_REQUEST_TIMEOUT_SECS` / `HTTP_CONNECT_TIMEOUT_SECS`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Self {
        let base_url = get("PORTAL_BASE_URL").unwrap_or_else(|| DEFAULT_PORTAL_BASE_URL.to_owned());
        let token_file = get("PORTAL_TOKEN_FILE").unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_owned());
        Self { base_url: trim_base_url(&base_url), token_file, timeouts: HttpTimeouts::from_lookup(get) }
    }
}

/// Settings for the donation REST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeouts: HttpTimeouts,
}

impl DonationsConfig {
    /// Build donation backend config from the environment.
    ///
    /// Required:
    /// - `DONATIONS_URL`: project URL, e.g. `https://xyz.supabase.co`
    /// - `DONATIONS_API_KEY`: static service key sent as `apikey` and bearer
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when either required variable is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = required(get, "DONATIONS_URL")?;
        let api_key = required(get, "DONATIONS_API_KEY")?;
        Ok(Self { base_url: trim_base_url(&base_url), api_key, timeouts: HttpTimeouts::from_lookup(get) })
    }
}

/// Strip any trailing `/` so paths can be appended with a leading slash.
#[must_use]
pub fn trim_base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_owned()
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn required(get: &dyn Fn(&str) -> Option<String>, var: &'static str) -> Result<String, ConfigError> {
    match get(var) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing { var }),
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
