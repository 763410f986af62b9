// src/errors.rs

//! Crate-wide error types.
//!
//! Configuration problems abort the whole run before any engine is spawned
//! and map to exit code 1, so they get a structured type. Everything else
//! flows through `anyhow` with context attached at the failure site.

use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::{Error, Result};

/// Errors that invalidate a run up front.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The engine executable is missing, not a file, or not executable.
    #[error("engine executable not found or not executable: {path}")]
    EngineNotFound { path: PathBuf },

    /// Input discovery produced nothing to render.
    #[error("no HTML files found in {path}")]
    NoInputs { path: PathBuf },
}
