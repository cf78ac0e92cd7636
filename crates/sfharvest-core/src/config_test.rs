use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SFHARVEST_ENV"));
}

#[test]
fn build_app_config_uses_defaults_on_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.base_url, "https://smartstore.naver.com");
    assert_eq!(cfg.db_dir, PathBuf::from("./db"));
    assert_eq!(cfg.page_size, 40);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(
        cfg.user_agent,
        "sfharvest/0.1 (storefront-catalog-harvester)"
    );
    assert_eq!(cfg.max_attempts, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 1000);
    assert_eq!(cfg.inter_page_delay_ms, 500);
    assert_eq!(cfg.rate_limit_cooldown_ms, 5000);
    assert_eq!(cfg.max_concurrent_writes, 8);
}

#[test]
fn build_app_config_strips_trailing_slash_from_base_url() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_BASE_URL", "http://127.0.0.1:8080/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_BASE_URL", "smartstore.naver.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SFHARVEST_BASE_URL"),
        "expected InvalidEnvVar(SFHARVEST_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_page_size_override() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_PAGE_SIZE", "80");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.page_size, 80);
}

#[test]
fn build_app_config_rejects_zero_page_size() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SFHARVEST_PAGE_SIZE"),
        "expected InvalidEnvVar(SFHARVEST_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_max_attempts() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SFHARVEST_MAX_ATTEMPTS"),
        "expected InvalidEnvVar(SFHARVEST_MAX_ATTEMPTS), got: {result:?}"
    );
}

#[test]
fn build_app_config_request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SFHARVEST_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SFHARVEST_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_inter_page_delay_override() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_INTER_PAGE_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.inter_page_delay_ms, 0);
}

#[test]
fn build_app_config_max_concurrent_writes_clamped_to_one() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_MAX_CONCURRENT_WRITES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_writes, 1);
}

#[test]
fn build_app_config_db_dir_override() {
    let mut map = HashMap::new();
    map.insert("SFHARVEST_DB_DIR", "/var/lib/sfharvest");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.db_dir, PathBuf::from("/var/lib/sfharvest"));
}
