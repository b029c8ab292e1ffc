use crate::app_config::{AppConfig, EngineConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

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

    let parse_positive_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        let raw = or_default(var, &default.to_string());
        match raw.parse::<usize>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("TRENDSCOPE_ENV", "development"));
    let log_level = or_default("TRENDSCOPE_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default(
        "TRENDSCOPE_SOURCES_PATH",
        "./config/sources.yaml",
    ));

    let db_max_connections = parse_u32("TRENDSCOPE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TRENDSCOPE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TRENDSCOPE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let parse_positive_i32 = |var: &str, default: i32| -> Result<i32, ConfigError> {
        let raw = or_default(var, &default.to_string());
        match raw.parse::<i32>() {
            Ok(value) if value > 0 => Ok(value),
            Ok(_) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            Err(e) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let defaults = EngineConfig::default();
    let engine = EngineConfig {
        confirmation_min_brands: parse_positive_usize(
            "TRENDSCOPE_CONFIRMATION_MIN_BRANDS",
            defaults.confirmation_min_brands,
        )?,
        saturation_score: parse_positive_i32(
            "TRENDSCOPE_SATURATION_SCORE",
            defaults.saturation_score,
        )?,
        prediction_window: parse_positive_usize(
            "TRENDSCOPE_PREDICTION_WINDOW",
            defaults.prediction_window,
        )?,
        listing_overfetch: parse_positive_usize(
            "TRENDSCOPE_LISTING_OVERFETCH",
            defaults.listing_overfetch,
        )?,
        confirmation_scan_limit: parse_positive_usize(
            "TRENDSCOPE_CONFIRMATION_SCAN_LIMIT",
            defaults.confirmation_scan_limit,
        )?,
    };

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        sources_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        engine,
    })
}

/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
