// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::engine::Engine;

/// Command-line arguments for `htmlshot`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "htmlshot",
    version,
    about = "Render HTML files to SVG/PNG images through the htmlshot engines.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Htmlshot.toml` in the current working directory. The file
    /// is optional; built-in defaults apply when it does not exist.
    #[arg(long, value_name = "PATH", default_value = "Htmlshot.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HTMLSHOT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render HTML inputs with the selected engines and formats.
    Run(RunArgs),

    /// Render the default input directory with both engines and both formats.
    All,

    /// Render a generated single-page fixture with both engines and both
    /// formats.
    Test,
}

/// Options for the `run` subcommand.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Engine to use. When omitted, both engines run.
    #[arg(long, value_enum, value_name = "ENGINE")]
    pub engine: Option<Engine>,

    /// Input HTML file or directory.
    ///
    /// Default: the `examples` directory under the project root.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output directory.
    ///
    /// Default: a per-engine folder next to the tool itself.
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Generate SVG output.
    #[arg(long)]
    pub svg: bool,

    /// Generate PNG output.
    ///
    /// When neither `--svg` nor `--png` is given, both formats are produced.
    #[arg(long)]
    pub png: bool,

    /// Render width in pixels (default 2048).
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Render height in pixels (default 2048).
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Per-invocation timeout in seconds (default 120).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Generate and render a simple built-in test page instead of real
    /// inputs.
    #[arg(long)]
    pub test_simple: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
