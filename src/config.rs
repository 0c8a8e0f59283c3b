use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::{db::sessions::DEFAULT_IDLE_TTL_SECS, services::http::RetryPolicy};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL (size segment is appended per request)
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Directory holding `movie_list.json` and `similarity.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Retries after the first attempt for each TMDB request
    #[serde(default = "default_http_max_retries")]
    pub http_max_retries: u32,

    /// Backoff factor in milliseconds; retry n sleeps factor * 2^(n-1)
    #[serde(default = "default_http_backoff_ms")]
    pub http_backoff_ms: u64,

    /// Per-attempt connect timeout
    #[serde(default = "default_http_connect_timeout_secs")]
    pub http_connect_timeout_secs: u64,

    /// Per-attempt total timeout (connect + read)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Idle seconds before a session is evicted
    #[serde(default = "default_session_idle_ttl_secs")]
    pub session_idle_ttl_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_http_max_retries() -> u32 {
    5
}

fn default_http_backoff_ms() -> u64 {
    1000
}

fn default_http_connect_timeout_secs() -> u64 {
    5
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_session_idle_ttl_secs() -> u64 {
    DEFAULT_IDLE_TTL_SECS as u64
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Retry policy for outbound TMDB requests
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.http_max_retries,
            backoff_factor: Duration::from_millis(self.http_backoff_ms),
            ..RetryPolicy::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http_connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn session_idle_ttl(&self) -> chrono::Duration {
        i64::try_from(self.session_idle_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
