use std::collections::HashMap;
use std::env::VarError;

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
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CATBRIDGE_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.scoring_profile, "default");
    assert!(cfg.profiles_path.is_none());
    assert_eq!(cfg.barcode_delimiters, vec![';', ',', '|', '\n', '\t']);
    assert_eq!(cfg.per_item_max, 25);
    assert_eq!(cfg.progress_chunk, 50);
    assert_eq!(cfg.max_concurrent_groups, 4);
    assert_eq!(cfg.cache_ttl_secs, 300);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("CATBRIDGE_ENV", "production");
    map.insert("CATBRIDGE_LOG_LEVEL", "debug");
    map.insert("CATBRIDGE_SCORING_PROFILE", "strict");
    map.insert("CATBRIDGE_PROFILES_PATH", "./config/profiles.yaml");
    map.insert("CATBRIDGE_PER_ITEM_MAX", "5");
    map.insert("CATBRIDGE_CACHE_TTL_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.scoring_profile, "strict");
    assert_eq!(
        cfg.profiles_path.as_deref(),
        Some(std::path::Path::new("./config/profiles.yaml"))
    );
    assert_eq!(cfg.per_item_max, 5);
    assert_eq!(cfg.cache_ttl_secs, 60);
}

#[test]
fn blank_profiles_path_is_none() {
    let mut map = HashMap::new();
    map.insert("CATBRIDGE_PROFILES_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.profiles_path.is_none());
}

#[test]
fn per_item_max_invalid() {
    let mut map = HashMap::new();
    map.insert("CATBRIDGE_PER_ITEM_MAX", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATBRIDGE_PER_ITEM_MAX"
        ),
        "expected InvalidEnvVar(CATBRIDGE_PER_ITEM_MAX), got: {result:?}"
    );
}

#[test]
fn cache_ttl_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("CATBRIDGE_CACHE_TTL_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATBRIDGE_CACHE_TTL_SECS"
        ),
        "expected InvalidEnvVar(CATBRIDGE_CACHE_TTL_SECS), got: {result:?}"
    );
}

#[test]
fn progress_chunk_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("CATBRIDGE_PROGRESS_CHUNK", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATBRIDGE_PROGRESS_CHUNK"
        ),
        "got: {result:?}"
    );
}

#[test]
fn delimiters_are_deduplicated_and_whitespace_skipped() {
    let mut map = HashMap::new();
    map.insert("CATBRIDGE_BARCODE_DELIMITERS", "; ;/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.barcode_delimiters, vec![';', '/', '\n', '\t']);
}

#[test]
fn alphanumeric_delimiter_is_rejected() {
    let mut map = HashMap::new();
    map.insert("CATBRIDGE_BARCODE_DELIMITERS", ";0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CATBRIDGE_BARCODE_DELIMITERS"
        ),
        "got: {result:?}"
    );
}

#[test]
fn empty_delimiters_are_rejected() {
    let mut map = HashMap::new();
    map.insert("CATBRIDGE_BARCODE_DELIMITERS", "   ");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}
