// src/config/mod.rs

//! Configuration loading and validation for htmlshot.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like engine names (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_optional};
pub use model::{ConfigFile, EngineSection, ProjectSection, RenderSection};
pub use validate::validate_config;
