use crate::app_config::AppConfig;
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
/// Every variable is optional; absent ones fall back to [`AppConfig::default`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let defaults = AppConfig::default();

    let log_level = or_default("COSME_LOG_LEVEL", &defaults.log_level);
    let layouts_path = lookup("COSME_LAYOUTS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let scraper_request_timeout_secs = parse_u64(
        "COSME_SCRAPER_REQUEST_TIMEOUT_SECS",
        defaults.scraper_request_timeout_secs,
    )?;
    if scraper_request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COSME_SCRAPER_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    let scraper_user_agent = or_default("COSME_SCRAPER_USER_AGENT", &defaults.scraper_user_agent);
    let scraper_accept_language = or_default(
        "COSME_SCRAPER_ACCEPT_LANGUAGE",
        &defaults.scraper_accept_language,
    );
    let scraper_detail_delay_ms = parse_u64(
        "COSME_SCRAPER_DETAIL_DELAY_MS",
        defaults.scraper_detail_delay_ms,
    )?;
    let scraper_max_retries = parse_u32("COSME_SCRAPER_MAX_RETRIES", defaults.scraper_max_retries)?;
    let scraper_retry_backoff_base_secs = parse_u64(
        "COSME_SCRAPER_RETRY_BACKOFF_BASE_SECS",
        defaults.scraper_retry_backoff_base_secs,
    )?;

    let default_max_pages = parse_u32("COSME_DEFAULT_MAX_PAGES", defaults.default_max_pages)?;
    if !(1..=10).contains(&default_max_pages) {
        return Err(ConfigError::InvalidEnvVar {
            var: "COSME_DEFAULT_MAX_PAGES".to_string(),
            reason: format!("must be between 1 and 10, got {default_max_pages}"),
        });
    }

    Ok(AppConfig {
        log_level,
        layouts_path,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_accept_language,
        scraper_detail_delay_ms,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        default_max_pages,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
