use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for a harvest run, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Storefront host, e.g. `https://smartstore.naver.com`. No trailing slash.
    pub base_url: String,
    /// Directory holding one SQLite file per resolved channel.
    pub db_dir: PathBuf,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Total attempts per request, including the first one.
    pub max_attempts: u32,
    /// Linear backoff unit: the wait before attempt `n + 1` is `n * retry_backoff_base_ms`.
    pub retry_backoff_base_ms: u64,
    pub inter_page_delay_ms: u64,
    /// Extra wait the harvest loop applies after a page comes back rate limited.
    pub rate_limit_cooldown_ms: u64,
    pub max_concurrent_writes: usize,
}
