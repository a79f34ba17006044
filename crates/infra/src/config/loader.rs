//! Configuration loader
//!
//! Builds the application [`Config`] from a file and environment overrides.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file if one is present (via `dotenvy`)
//! 2. Loads the first config file found by [`probe_config_paths`], or the
//!    built-in defaults when none exists
//! 3. Applies `CAMPUSCAL_*` environment overrides on top
//! 4. Validates the result
//!
//! ## Environment Variables
//! - `CAMPUSCAL_DB_PATH`: Database file path
//! - `CAMPUSCAL_DB_POOL_SIZE`: Connection pool size
//! - `CAMPUSCAL_SCRAPE_TTL_SECS`: Cache freshness window in seconds
//! - `CAMPUSCAL_REQUEST_TIMEOUT_SECS`: Per-request HTTP timeout in seconds
//! - `CAMPUSCAL_MAX_ATTEMPTS`: Total HTTP attempts per fetch
//! - `CAMPUSCAL_USER_AGENT`: User agent sent with every request
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./campuscal.json` or `./campuscal.toml` (current working directory)
//! 3. `../config.{json,toml}` and `../../config.{json,toml}`
//! 4. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use campuscal_domain::{CampusCalError, Config, Result};

pub const ENV_DB_PATH: &str = "CAMPUSCAL_DB_PATH";
pub const ENV_DB_POOL_SIZE: &str = "CAMPUSCAL_DB_POOL_SIZE";
pub const ENV_SCRAPE_TTL_SECS: &str = "CAMPUSCAL_SCRAPE_TTL_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CAMPUSCAL_REQUEST_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "CAMPUSCAL_MAX_ATTEMPTS";
pub const ENV_USER_AGENT: &str = "CAMPUSCAL_USER_AGENT";

/// Load configuration with the full fallback strategy
///
/// # Errors
/// Returns `CampusCalError::Config` if a config file exists but cannot be
/// parsed, an override has an invalid value, or validation fails.
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Could not load .env file"),
    }

    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(&path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    let config = apply_env_overrides(base)?;
    config.validate()?;
    tracing::info!(
        db_path = %config.database.path,
        sources = config.sources.len(),
        ttl_seconds = config.scrape.ttl_seconds,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from defaults plus environment variables only
///
/// # Errors
/// Returns `CampusCalError::Config` if a variable has an invalid value or
/// the result fails validation.
pub fn load_from_env() -> Result<Config> {
    let config = apply_env_overrides(Config::default())?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports JSON and TOML
/// (detected by file extension). Sections missing from the file keep their
/// defaults.
///
/// # Errors
/// Returns `CampusCalError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CampusCalError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => probe_config_paths().ok_or_else(|| {
            CampusCalError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CampusCalError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CampusCalError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CampusCalError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CampusCalError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Apply every `CAMPUSCAL_*` variable that is set.
fn apply_env_overrides(mut config: Config) -> Result<Config> {
    if let Some(path) = env_var(ENV_DB_PATH) {
        config.database.path = path;
    }
    if let Some(pool_size) = env_parse(ENV_DB_POOL_SIZE)? {
        config.database.pool_size = pool_size;
    }
    if let Some(ttl) = env_parse(ENV_SCRAPE_TTL_SECS)? {
        config.scrape.ttl_seconds = ttl;
    }
    if let Some(timeout) = env_parse(ENV_REQUEST_TIMEOUT_SECS)? {
        config.scrape.request_timeout_seconds = timeout;
    }
    if let Some(attempts) = env_parse(ENV_MAX_ATTEMPTS)? {
        config.scrape.max_attempts = attempts;
    }
    if let Some(agent) = env_var(ENV_USER_AGENT) {
        config.scrape.user_agent = agent;
    }
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("campuscal.json"),
        dir.join("campuscal.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Non-empty value of an environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| CampusCalError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
