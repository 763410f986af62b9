// src/config/validate.rs

use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::config::model::ConfigFile;
use crate::engine::Engine;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `[render]` dimensions and timeout are nonzero
/// - every `[engine.<name>]` key names a known engine
///
/// It does **not** check that configured executable paths exist; that
/// happens at run time, once, for the engines the run actually requests.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_render(cfg)?;
    validate_engines(cfg)?;
    Ok(())
}

fn validate_render(cfg: &ConfigFile) -> Result<()> {
    if cfg.render.width == 0 {
        return Err(anyhow!("[render].width must be >= 1 (got 0)"));
    }
    if cfg.render.height == 0 {
        return Err(anyhow!("[render].height must be >= 1 (got 0)"));
    }
    if cfg.render.timeout_secs == 0 {
        return Err(anyhow!("[render].timeout_secs must be >= 1 (got 0)"));
    }
    Ok(())
}

fn validate_engines(cfg: &ConfigFile) -> Result<()> {
    for name in cfg.engine.keys() {
        Engine::from_str(name)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("invalid [engine.{name}] section"))?;
    }
    Ok(())
}
