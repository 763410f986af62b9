// src/lib.rs

pub mod cli;
pub mod config;
pub mod discover;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod reconcile;
pub mod render;

use anyhow::Result;

use crate::cli::{CliArgs, Command};
use crate::render::{RenderRequest, RunStatus};

/// High-level entry point used by `main.rs`.
///
/// Loads the (optional) config file, translates the subcommand into a
/// [`RenderRequest`], and hands it to the render driver.
pub async fn run(args: CliArgs) -> Result<RunStatus> {
    let cfg = config::load_optional(&args.config)?;

    let request = match args.command {
        Command::Run(run_args) => RenderRequest::from_run_args(run_args),
        Command::All => RenderRequest::all(),
        Command::Test => RenderRequest::simple_test(),
    };

    render::execute(&cfg, request).await
}
