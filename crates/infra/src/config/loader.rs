//! Configuration loader
//!
//! Loads [`ClientSettings`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `COURIER_BASE_URL` is missing or a value is invalid, falls back to a
//!    file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `COURIER_BASE_URL`: API base URL (required)
//! - `COURIER_TIMEOUT_SECS`: Request timeout in seconds
//! - `COURIER_USER_AGENT`: User agent override
//! - `COURIER_TOKEN_SECRET`: Shared secret; enables self-signed tokens
//! - `COURIER_TOKEN_ISSUER`: `iss` claim
//! - `COURIER_TOKEN_AUDIENCE`: `aud` claim
//! - `COURIER_TOKEN_TTL_SECS`: Token lifetime in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./courier.json` or `./courier.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. The same names relative to the executable location

use std::path::{Path, PathBuf};

use courier_domain::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_TTL_SECS};
use courier_domain::ConfigError;

use super::settings::{ClientSettings, TokenSettings};

const CONFIG_FILE_NAMES: [&str; 4] = ["courier.json", "courier.toml", "config.json", "config.toml"];

/// Load settings with automatic fallback strategy
///
/// # Errors
/// Returns a [`ConfigError`] if settings cannot be loaded from either source.
pub fn load() -> Result<ClientSettings, ConfigError> {
    match load_from_env() {
        Ok(settings) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(settings)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load settings from environment variables
///
/// # Errors
/// Returns [`ConfigError::MissingVariable`] without `COURIER_BASE_URL` and
/// [`ConfigError::InvalidValue`] for unparsable numbers.
pub fn load_from_env() -> Result<ClientSettings, ConfigError> {
    let base_url = env_var("COURIER_BASE_URL")?;
    let timeout_secs = env_u64("COURIER_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
    let user_agent = env_opt("COURIER_USER_AGENT");

    let token = match env_opt("COURIER_TOKEN_SECRET") {
        Some(secret) => Some(TokenSettings {
            secret,
            issuer: env_opt("COURIER_TOKEN_ISSUER"),
            audience: env_opt("COURIER_TOKEN_AUDIENCE"),
            ttl_secs: env_u64("COURIER_TOKEN_TTL_SECS")?.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        }),
        None => None,
    };

    Ok(ClientSettings { base_url, timeout_secs, user_agent, token })
}

/// Load settings from a file
///
/// If `path` is `None`, probes the standard locations (see
/// [`probe_config_paths`]). The format is chosen by extension.
///
/// # Errors
/// Returns [`ConfigError::FileNotFound`] when no file exists,
/// [`ConfigError::Io`] when it cannot be read and [`ConfigError::Parse`] or
/// [`ConfigError::UnsupportedFormat`] when its contents are unusable.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientSettings, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::FileNotFound(p.display().to_string()));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConfigError::FileNotFound("no config file in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents =
        std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io(e.to_string()))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientSettings, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Parse { format: "TOML", reason: e.to_string() }),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Parse { format: "JSON", reason: e.to_string() }),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    probe_in(&roots)
}

fn probe_in(roots: &[PathBuf]) -> Option<PathBuf> {
    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get a required environment variable
fn env_var(key: &str) -> Result<String, ConfigError> {
    env_opt(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    env_opt(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
