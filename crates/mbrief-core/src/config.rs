use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default source pages scanned by the collector when `MBRIEF_SOURCES` is unset.
const DEFAULT_SOURCES: &str = "https://www.moneycontrol.com/indian-indices/nifty-50-9.html,https://economictimes.indiatimes.com/markets/stocks";

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let tei_url = require("MBRIEF_TEI_URL")?;
    let index_url = require("MBRIEF_INDEX_URL")?;

    let env = parse_environment(&or_default("MBRIEF_ENV", "development"));
    let bind_addr = parse_addr("MBRIEF_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("MBRIEF_LOG_LEVEL", "info");

    let index_collection = or_default("MBRIEF_INDEX_COLLECTION", "market_news");
    let default_results = parse_usize("MBRIEF_DEFAULT_RESULTS", "3")?;
    let http_timeout_secs = parse_u64("MBRIEF_HTTP_TIMEOUT_SECS", "20")?;
    let user_agent = or_default("MBRIEF_USER_AGENT", "mbrief/0.1 (market-news-research)");

    let sources = or_default("MBRIEF_SOURCES", DEFAULT_SOURCES)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    let corpus_dir = PathBuf::from(or_default("MBRIEF_CORPUS_DIR", "./data"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        tei_url,
        index_url,
        index_collection,
        default_results,
        http_timeout_secs,
        user_agent,
        sources,
        corpus_dir,
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
