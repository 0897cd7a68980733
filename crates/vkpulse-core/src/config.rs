use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Every variable is optional; parsing is decoupled from the real environment
/// so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim().parse::<usize>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim().parse::<u32>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("VKPULSE_ENV", "development"));
    let log_level = or_default("VKPULSE_LOG_LEVEL", "info");
    let taxonomy_path = PathBuf::from(or_default(
        "VKPULSE_TAXONOMY_PATH",
        "./config/taxonomy.yaml",
    ));

    let raw_offset = or_default("VKPULSE_UTC_OFFSET_HOURS", "3");
    let utc_offset_hours = raw_offset
        .trim()
        .parse::<i32>()
        .map_err(|e| invalid("VKPULSE_UTC_OFFSET_HOURS", e.to_string()))?;
    if !(-12..=14).contains(&utc_offset_hours) {
        return Err(invalid(
            "VKPULSE_UTC_OFFSET_HOURS",
            format!("{utc_offset_hours} is outside -12..=14"),
        ));
    }

    let top_n = parse_usize("VKPULSE_TOP_N", "10")?;
    let best_hours = parse_usize("VKPULSE_BEST_HOURS", "3")?;
    let min_age = parse_u32("VKPULSE_MIN_AGE", "14")?;
    let max_age = parse_u32("VKPULSE_MAX_AGE", "80")?;
    if min_age > max_age {
        return Err(invalid(
            "VKPULSE_MIN_AGE",
            format!("min age {min_age} exceeds max age {max_age}"),
        ));
    }

    let max_concurrent_loads = parse_usize("VKPULSE_MAX_CONCURRENT_LOADS", "4")?;
    if max_concurrent_loads == 0 {
        return Err(invalid(
            "VKPULSE_MAX_CONCURRENT_LOADS",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        taxonomy_path,
        utc_offset_hours,
        top_n,
        best_hours,
        min_age,
        max_age,
        max_concurrent_loads,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
