use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
pub(crate) fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let env = parse_environment(&or_default("CATBRIDGE_ENV", "development"))?;
    let log_level = or_default("CATBRIDGE_LOG_LEVEL", "info");
    let scoring_profile = or_default("CATBRIDGE_SCORING_PROFILE", "default");
    let profiles_path = lookup("CATBRIDGE_PROFILES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let barcode_delimiters = parse_delimiters(&or_default("CATBRIDGE_BARCODE_DELIMITERS", ";,|"))?;

    let per_item_max = parse_usize("CATBRIDGE_PER_ITEM_MAX", "25")?;
    let progress_chunk = parse_usize("CATBRIDGE_PROGRESS_CHUNK", "50")?;
    let max_concurrent_groups = parse_usize("CATBRIDGE_MAX_CONCURRENT_GROUPS", "4")?;
    let cache_ttl_secs = parse_u64("CATBRIDGE_CACHE_TTL_SECS", "300")?;

    if progress_chunk == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CATBRIDGE_PROGRESS_CHUNK".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        scoring_profile,
        profiles_path,
        barcode_delimiters,
        per_item_max,
        progress_chunk,
        max_concurrent_groups,
        cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CATBRIDGE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Each non-whitespace character of `raw` is one delimiter; `\t` and `\n`
/// are always included.
fn parse_delimiters(raw: &str) -> Result<Vec<char>, ConfigError> {
    let mut delimiters: Vec<char> = Vec::new();
    for c in raw.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_alphanumeric() {
            return Err(ConfigError::InvalidEnvVar {
                var: "CATBRIDGE_BARCODE_DELIMITERS".to_string(),
                reason: format!("'{c}' cannot be a barcode delimiter"),
            });
        }
        if !delimiters.contains(&c) {
            delimiters.push(c);
        }
    }
    if delimiters.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "CATBRIDGE_BARCODE_DELIMITERS".to_string(),
            reason: "at least one delimiter is required".to_string(),
        });
    }
    delimiters.extend(['\n', '\t']);
    Ok(delimiters)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
