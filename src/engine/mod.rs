// src/engine/mod.rs

//! The closed set of rendering engines this tool drives.
//!
//! Engines are external executables consumed over a small command-line
//! contract: positional HTML input path, `--svg`/`--png <output>`,
//! `--width <px>`, `--height <px>`. Exit code 0 means success.
//!
//! Behavioural differences between engines live here as data on the
//! variant (environment, output-path quirks, build-tree layout), so the
//! runner and the reconciler stay engine-agnostic and a third engine can
//! be added without touching them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;

/// Engine identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Engine {
    /// The lightweight renderer.
    Mini,
    /// The full renderer. Known to intermittently write output relative to
    /// its working directory instead of the requested absolute path.
    Pro,
}

impl Engine {
    /// Both engines, in the order runs process them.
    pub const ALL: [Engine; 2] = [Engine::Mini, Engine::Pro];

    /// Lowercase engine name as used on the CLI and in file names.
    pub fn name(self) -> &'static str {
        match self {
            Engine::Mini => "mini",
            Engine::Pro => "pro",
        }
    }

    /// Directory of the engine's build tree under the project root.
    pub fn build_dir(self) -> &'static str {
        match self {
            Engine::Mini => "htmlshot-mini",
            Engine::Pro => "htmlshot-pro",
        }
    }

    fn binary_name(self) -> &'static str {
        match self {
            Engine::Mini => "htmlshot-mini",
            Engine::Pro => "htmlshot-pro",
        }
    }

    /// Default executable path under the project root, used when the config
    /// file does not override it.
    pub fn default_executable(self, project_root: &Path) -> PathBuf {
        project_root
            .join(self.build_dir())
            .join("build")
            .join(self.binary_name())
    }

    /// True for engines that sometimes ignore the requested absolute output
    /// path and write relative to their working directory instead. Such
    /// engines are asked to write into the working directory up front, and
    /// the reconciler moves the file afterwards.
    pub fn writes_to_working_dir(self) -> bool {
        matches!(self, Engine::Pro)
    }

    /// Environment applied to the spawned engine process.
    ///
    /// Set per-`Command`, never on the parent process, so the runner stays
    /// safe inside a longer-lived host process.
    pub fn child_env(self) -> Vec<(&'static str, &'static str)> {
        let mut env = vec![
            // Headless rendering without a display server.
            ("QT_QPA_PLATFORM", "offscreen"),
            ("QT_SCALE_FACTOR", "1"),
            ("HTMLSHOT_SKIP_DEFAULT_LOAD", "1"),
            ("HTMLSHOT_DEBUG", "1"),
        ];
        if matches!(self, Engine::Pro) {
            env.push(("HTMLSHOT_EXPORT_DEBUG", "1"));
            env.push(("HTMLSHOT_VERBOSE", "1"));
        }
        env
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mini" => Ok(Engine::Mini),
            "pro" => Ok(Engine::Pro),
            other => Err(format!(
                "unknown engine '{other}' (expected 'mini' or 'pro')"
            )),
        }
    }
}

/// Output format an engine can produce.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Both formats, in the order runs produce them.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Svg, OutputFormat::Png];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }

    /// The engine command-line flag selecting this format.
    pub fn flag(self) -> &'static str {
        match self {
            OutputFormat::Svg => "--svg",
            OutputFormat::Png => "--png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
