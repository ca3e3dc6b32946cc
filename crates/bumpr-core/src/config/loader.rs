//! Configuration loading
//!
//! Configuration is layered, later sources winning key by key:
//! the user file in the home directory, the project file found by walking up
//! from the working directory, then an explicit `--config` path or inline JSON.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::{config_file_names, user_config_file_names};
use super::types::Config;
use super::validation::validate_config;

/// Where the effective configuration came from
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Files merged, in order
    pub files: Vec<PathBuf>,
    /// Whether inline JSON was merged last
    pub inline: bool,
}

/// Parse a configuration file into a generic value, by extension
fn read_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    debug!(path = %path.display(), format = ext, "reading config file");

    let value = match ext {
        "toml" => {
            let table: toml::Value = toml::from_str(&content).map_err(ConfigError::TomlError)?;
            serde_json::to_value(table).map_err(ConfigError::JsonError)?
        }
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?,
        "json" => serde_json::from_str(&content).map_err(ConfigError::JsonError)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf()).into()),
    };

    Ok(value)
}

/// Recursively merge `overlay` into `base`; objects merge, nulls are ignored,
/// everything else replaces
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Load a single configuration file
pub fn load_config(path: &Path) -> Result<Config> {
    info!(path = %path.display(), "loading config");
    let config = config_from_value(read_value(path)?)?;
    validate_config(&config)?;
    Ok(config)
}

fn config_from_value(value: Value) -> Result<Config> {
    let mut config: Config = if value.is_null() {
        Config::default()
    } else {
        serde_json::from_value(value).map_err(|e| ConfigError::ParseError(e.to_string()))?
    };
    config.normalize();
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`          (e.g. `bumpr.toml`)
///   2. `<dir>/.github/<name>`  (e.g. `.github/bumpr.toml`)
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(&name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let github_path = current.join(".github").join(&name);
            if github_path.is_file() {
                info!(path = %github_path.display(), "found config file in .github/");
                return Some(github_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// The user-level configuration file, if any
pub fn find_user_config() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    user_config_file_names()
        .into_iter()
        .map(|name| home.join(name))
        .find(|path| path.is_file())
}

/// Load the layered configuration for `dir`.
///
/// `explicit` is the `--config` argument: a path (relative to `dir`) or an
/// inline JSON object. Environment overrides are applied last.
pub fn load_layered(dir: &Path, explicit: Option<&str>) -> Result<(Config, ConfigSources)> {
    let user = find_user_config();
    let project = find_config(dir);
    load_from_sources(user.as_deref(), project.as_deref(), dir, explicit)
}

fn load_from_sources(
    user: Option<&Path>,
    project: Option<&Path>,
    dir: &Path,
    explicit: Option<&str>,
) -> Result<(Config, ConfigSources)> {
    let mut merged = Value::Object(Default::default());
    let mut sources = ConfigSources::default();

    for path in user.into_iter().chain(project) {
        merge_values(&mut merged, read_value(path)?);
        sources.files.push(path.to_path_buf());
    }

    if let Some(arg) = explicit {
        let candidate = dir.join(arg);
        if candidate.is_file() {
            merge_values(&mut merged, read_value(&candidate)?);
            sources.files.push(candidate);
        } else {
            let inline: Value = serde_json::from_str(arg)
                .map_err(|_| ConfigError::NotFound(candidate.clone()))?;
            merge_values(&mut merged, inline);
            sources.inline = true;
        }
    }

    let mut config = config_from_value(merged)?;
    config.apply_env();
    validate_config(&config)?;

    info!(
        files = sources.files.len(),
        inline = sources.inline,
        "configuration loaded"
    );
    Ok((config, sources))
}
