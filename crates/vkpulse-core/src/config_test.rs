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
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.taxonomy_path,
        std::path::PathBuf::from("./config/taxonomy.yaml")
    );
    assert_eq!(cfg.utc_offset_hours, 3);
    assert_eq!(cfg.top_n, 10);
    assert_eq!(cfg.best_hours, 3);
    assert_eq!(cfg.min_age, 14);
    assert_eq!(cfg.max_age, 80);
    assert_eq!(cfg.max_concurrent_loads, 4);
}

#[test]
fn defaults_match_default_impl() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let default = AppConfig::default();
    assert_eq!(cfg.utc_offset_hours, default.utc_offset_hours);
    assert_eq!(cfg.top_n, default.top_n);
    assert_eq!(cfg.taxonomy_path, default.taxonomy_path);
}

#[test]
fn utc_offset_override() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_UTC_OFFSET_HOURS", "-5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.utc_offset_hours, -5);
    assert_eq!(cfg.utc_offset().local_minus_utc(), -5 * 3600);
}

#[test]
fn utc_offset_out_of_range_is_rejected() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_UTC_OFFSET_HOURS", "15");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VKPULSE_UTC_OFFSET_HOURS"),
        "expected InvalidEnvVar(VKPULSE_UTC_OFFSET_HOURS), got: {result:?}"
    );
}

#[test]
fn utc_offset_not_a_number_is_rejected() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_UTC_OFFSET_HOURS", "msk");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn top_n_override() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_TOP_N", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.top_n, 25);
}

#[test]
fn top_n_invalid() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_TOP_N", "ten");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VKPULSE_TOP_N"),
        "expected InvalidEnvVar(VKPULSE_TOP_N), got: {result:?}"
    );
}

#[test]
fn age_bounds_must_be_ordered() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_MIN_AGE", "60");
    map.insert("VKPULSE_MAX_AGE", "18");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VKPULSE_MIN_AGE"),
        "expected InvalidEnvVar(VKPULSE_MIN_AGE), got: {result:?}"
    );
}

#[test]
fn zero_concurrent_loads_is_rejected() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_MAX_CONCURRENT_LOADS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn taxonomy_path_override() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_TAXONOMY_PATH", "/etc/vkpulse/taxonomy.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.taxonomy_path,
        std::path::PathBuf::from("/etc/vkpulse/taxonomy.yaml")
    );
}

#[test]
fn build_app_config_trims_numeric_values() {
    let mut map = HashMap::new();
    map.insert("VKPULSE_TOP_N", " 5 ");
    map.insert("VKPULSE_BEST_HOURS", "2\n");
    map.insert("VKPULSE_MIN_AGE", " 18");
    map.insert("VKPULSE_MAX_AGE", "65 ");
    map.insert("VKPULSE_MAX_CONCURRENT_LOADS", "\t8");
    map.insert("VKPULSE_UTC_OFFSET_HOURS", " 0 ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.top_n, 5);
    assert_eq!(cfg.best_hours, 2);
    assert_eq!((cfg.min_age, cfg.max_age), (18, 65));
    assert_eq!(cfg.max_concurrent_loads, 8);
    assert_eq!(cfg.utc_offset_hours, 0);
}
