use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://smartstore.naver.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let at_least_one = |var: &str, value: u32| -> Result<u32, ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("SFHARVEST_ENV", "development"))?;
    let log_level = or_default("SFHARVEST_LOG_LEVEL", "info");

    let base_url = or_default("SFHARVEST_BASE_URL", DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SFHARVEST_BASE_URL".to_string(),
            reason: format!("\"{base_url}\" is not an http(s) URL"),
        });
    }

    let db_dir = PathBuf::from(or_default("SFHARVEST_DB_DIR", "./db"));

    let page_size = at_least_one(
        "SFHARVEST_PAGE_SIZE",
        parse_u32("SFHARVEST_PAGE_SIZE", "40")?,
    )?;
    let request_timeout_secs = parse_u64("SFHARVEST_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "SFHARVEST_USER_AGENT",
        "sfharvest/0.1 (storefront-catalog-harvester)",
    );
    let max_attempts = at_least_one(
        "SFHARVEST_MAX_ATTEMPTS",
        parse_u32("SFHARVEST_MAX_ATTEMPTS", "3")?,
    )?;
    let retry_backoff_base_ms = parse_u64("SFHARVEST_RETRY_BACKOFF_BASE_MS", "1000")?;
    let inter_page_delay_ms = parse_u64("SFHARVEST_INTER_PAGE_DELAY_MS", "500")?;
    let rate_limit_cooldown_ms = parse_u64("SFHARVEST_RATE_LIMIT_COOLDOWN_MS", "5000")?;
    let max_concurrent_writes = parse_usize("SFHARVEST_MAX_CONCURRENT_WRITES", "8")?.max(1);

    Ok(AppConfig {
        env,
        log_level,
        base_url,
        db_dir,
        page_size,
        request_timeout_secs,
        user_agent,
        max_attempts,
        retry_backoff_base_ms,
        inter_page_delay_ms,
        rate_limit_cooldown_ms,
        max_concurrent_writes,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SFHARVEST_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
