// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the raw `ConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (engine names, dimension sanity). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {:?}", path))?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the config file when it exists, falling back to defaults otherwise.
///
/// The config file is optional; a run with no `Htmlshot.toml` uses built-in
/// defaults for everything.
pub fn load_optional(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    load_and_validate(path)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Htmlshot.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Htmlshot.toml")
}
