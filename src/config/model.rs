// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::Engine;

/// Top-level configuration as read from a TOML file.
///
/// A minimal file looks like:
///
/// ```toml
/// [project]
/// root = "/work/htmlshot"
///
/// [render]
/// width = 1024
/// height = 768
/// timeout_secs = 60
///
/// [engine.pro]
/// path = "/work/htmlshot/htmlshot-pro/build/htmlshot-pro"
/// ```
///
/// All sections are optional and have reasonable defaults; the file itself
/// is optional too.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Directory layout from `[project]`.
    #[serde(default)]
    pub project: ProjectSection,

    /// Render defaults from `[render]`.
    #[serde(default)]
    pub render: RenderSection,

    /// Per-engine overrides from `[engine.<name>]`.
    ///
    /// Keys are the *engine names* (`"mini"`, `"pro"`).
    #[serde(default)]
    pub engine: BTreeMap<String, EngineSection>,
}

impl ConfigFile {
    /// Configured executable override for an engine, if any.
    pub fn engine_path(&self, engine: Engine) -> Option<PathBuf> {
        self.engine
            .get(engine.name())
            .and_then(|section| section.path.clone())
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectSection {
    /// Root of the tree the engines are built under.
    ///
    /// If `None`, the parent directory of the tool is used.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Directory the tool considers its own (per-engine default output
    /// directories are created here).
    ///
    /// If `None`, the directory containing the running binary is used.
    #[serde(default)]
    pub tool_dir: Option<PathBuf>,
}

/// `[render]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderSection {
    /// Default render width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Default render height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Default per-invocation timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_width() -> u32 {
    2048
}

fn default_height() -> u32 {
    2048
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[engine.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EngineSection {
    /// Path to the engine executable, overriding the build-tree default
    /// (`<root>/htmlshot-<name>/build/htmlshot-<name>`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}
