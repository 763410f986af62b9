// src/render/mod.rs

//! Sequential render driver.
//!
//! One engine at a time, one input at a time, one format per engine
//! invocation. Engine executables are validated before the first job; any
//! missing engine aborts the run. Per-job failures are logged and reflected
//! in the returned status instead of stopping the remaining jobs, and
//! nothing is retried.

pub mod fixture;
pub mod job;

use std::collections::BTreeMap;
use std::fs;
use std::path::{self, Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::RunArgs;
use crate::config::ConfigFile;
use crate::discover;
use crate::engine::{Engine, OutputFormat};
use crate::errors::ConfigError;
use crate::exec::{check_executable, run_with_timeout, ProcessStatus};
use crate::reconcile::{reconcile_output, Reconciliation, SearchDirs};
use crate::render::job::{
    job_succeeded, FailureReason, FormatResult, JobResults, RenderJob,
};

/// Subdirectory of the project root rendered when no `--input` is given.
const DEFAULT_INPUT_SUBDIR: &str = "examples";

/// Overall outcome of a run, mapped to the process exit code.
///
/// Configuration failures never get here; they surface as errors and exit 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every job produced every requested output.
    Success,
    /// At least one job timed out, exited nonzero, or finished without its
    /// output file.
    PartialFailure,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::PartialFailure => 2,
        }
    }
}

/// What to render, as requested on the command line.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub engines: Vec<Engine>,
    pub formats: Vec<OutputFormat>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub test_simple: bool,
}

impl RenderRequest {
    pub fn from_run_args(args: RunArgs) -> Self {
        let engines = match args.engine {
            Some(engine) => vec![engine],
            None => Engine::ALL.to_vec(),
        };
        let formats = match (args.svg, args.png) {
            (true, false) => vec![OutputFormat::Svg],
            (false, true) => vec![OutputFormat::Png],
            _ => OutputFormat::ALL.to_vec(),
        };
        Self {
            engines,
            formats,
            input: args.input,
            output: args.output,
            width: args.width,
            height: args.height,
            timeout_secs: args.timeout,
            test_simple: args.test_simple,
        }
    }

    /// Both engines, both formats, default input directory.
    pub fn all() -> Self {
        Self {
            engines: Engine::ALL.to_vec(),
            formats: OutputFormat::ALL.to_vec(),
            input: None,
            output: None,
            width: None,
            height: None,
            timeout_secs: None,
            test_simple: false,
        }
    }

    /// Both engines, both formats, generated fixture.
    pub fn simple_test() -> Self {
        Self {
            test_simple: true,
            ..Self::all()
        }
    }
}

/// Everything the driver needs besides the job list.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Directory the tool considers its own; per-engine default output
    /// directories live here.
    pub tool_dir: PathBuf,
    /// Root of the tree the engines are built under.
    pub project_root: PathBuf,
    /// Resolved executable per engine, validated before any job runs.
    pub executables: BTreeMap<Engine, PathBuf>,
}

impl RenderContext {
    /// Executable for an engine. The caller populates every requested engine
    /// up front, so a miss here is a driver bug.
    pub fn executable(&self, engine: Engine) -> &Path {
        &self.executables[&engine]
    }

    fn search_dirs(&self, engine: Engine) -> SearchDirs {
        SearchDirs::standard(
            &self.tool_dir,
            &self.project_root,
            &self.project_root.join(engine.build_dir()),
        )
    }
}

/// Drive a full render run.
pub async fn execute(cfg: &ConfigFile, request: RenderRequest) -> Result<RunStatus> {
    let ctx = resolve_context(cfg, &request.engines)?;

    let width = request.width.unwrap_or(cfg.render.width);
    let height = request.height.unwrap_or(cfg.render.height);
    let timeout = Duration::from_secs(request.timeout_secs.unwrap_or(cfg.render.timeout_secs));

    info!(
        engines = ?request.engines.iter().map(|e| e.name()).collect::<Vec<_>>(),
        formats = ?request.formats.iter().map(|f| f.extension()).collect::<Vec<_>>(),
        width,
        height,
        timeout_secs = timeout.as_secs(),
        "starting render run"
    );

    let inputs = if request.test_simple {
        vec![fixture::write_simple_fixture(&ctx.tool_dir)?]
    } else {
        let input_path = request
            .input
            .clone()
            .unwrap_or_else(|| ctx.project_root.join(DEFAULT_INPUT_SUBDIR));
        let files = discover::find_html_files(&input_path);
        if files.is_empty() {
            return Err(ConfigError::NoInputs { path: input_path }.into());
        }
        info!(count = files.len(), "found HTML files to process");
        files
    };

    let mut all_ok = true;

    for &engine in &request.engines {
        let output_dir = engine_output_dir(&request, &ctx, engine);
        let output_dir = path::absolute(&output_dir).with_context(|| {
            format!("resolving output directory {}", output_dir.display())
        })?;
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("creating output directory {}", output_dir.display())
        })?;

        info!(engine = %engine, output_dir = %output_dir.display(), "processing with engine");

        for input in &inputs {
            let input = path::absolute(input)
                .with_context(|| format!("resolving input path {}", input.display()))?;
            let job = RenderJob {
                engine,
                input,
                output_dir: output_dir.clone(),
                formats: request.formats.clone(),
                width,
                height,
                timeout,
            };

            let results = run_job(&ctx, &job).await?;

            if job_succeeded(&results) {
                info!(
                    engine = %engine,
                    input = %job.input.display(),
                    "all outputs rendered"
                );
            } else {
                warn!(
                    engine = %engine,
                    input = %job.input.display(),
                    "some output files were not created correctly"
                );
                all_ok = false;
            }
        }
    }

    summarize_outputs(&request, &ctx);

    Ok(if all_ok {
        RunStatus::Success
    } else {
        RunStatus::PartialFailure
    })
}

/// Run one job: one engine invocation per requested format.
pub async fn run_job(ctx: &RenderContext, job: &RenderJob) -> Result<JobResults> {
    let mut results = JobResults::new();

    for &format in &job.formats {
        let result = run_format(ctx, job, format).await?;
        results.insert(format, result);
    }

    Ok(results)
}

async fn run_format(
    ctx: &RenderContext,
    job: &RenderJob,
    format: OutputFormat,
) -> Result<FormatResult> {
    let output_file = job.output_file(format);

    // Engines with the working-directory quirk are asked to write relative
    // to the current directory; the reconciler moves the file afterwards.
    let requested = if job.engine.writes_to_working_dir() {
        job.working_dir_request(format)
    } else {
        output_file.clone()
    };

    let args = build_args(job, format, &requested);
    let program = ctx.executable(job.engine);

    info!(
        engine = %job.engine,
        format = %format,
        input = %job.input.display(),
        output = %output_file.display(),
        "rendering"
    );
    debug!(cmd = %format_command(program, &args), "invoking engine");

    let launched_at = SystemTime::now();
    let outcome = run_with_timeout(program, &args, &job.engine.child_env(), job.timeout).await?;

    match outcome.status {
        ProcessStatus::TimedOut => {
            warn!(
                engine = %job.engine,
                format = %format,
                timeout_secs = job.timeout.as_secs(),
                "render timed out"
            );
            Ok(FormatResult {
                format,
                failure: Some(FailureReason::Timeout),
                duration: outcome.elapsed,
                output_file,
            })
        }
        ProcessStatus::Exited(code) if code != 0 => {
            warn!(
                engine = %job.engine,
                format = %format,
                exit_code = code,
                stderr = %outcome.stderr.trim(),
                "render failed"
            );
            Ok(FormatResult {
                format,
                failure: Some(FailureReason::Process { exit_code: code }),
                duration: outcome.elapsed,
                output_file,
            })
        }
        ProcessStatus::Exited(_) => {
            debug!(
                engine = %job.engine,
                format = %format,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "engine exited cleanly"
            );

            let failure = finalize_output(ctx, job, format, &requested, &output_file, launched_at);

            Ok(FormatResult {
                format,
                failure,
                duration: outcome.elapsed,
                output_file,
            })
        }
    }
}

/// Confirm the output landed where it should, recovering strays if needed.
fn finalize_output(
    ctx: &RenderContext,
    job: &RenderJob,
    format: OutputFormat,
    requested: &Path,
    output_file: &Path,
    launched_at: SystemTime,
) -> Option<FailureReason> {
    let preferred = job
        .engine
        .writes_to_working_dir()
        .then(|| requested.to_path_buf());
    let search = ctx.search_dirs(job.engine);

    let reconciliation = reconcile_output(
        output_file,
        preferred.as_deref(),
        &job.input_stem(),
        format.extension(),
        launched_at,
        &search,
    );

    match reconciliation {
        Ok(Reconciliation::AlreadyInPlace) | Ok(Reconciliation::Relocated { .. }) => {
            match fs::metadata(output_file) {
                Ok(meta) => {
                    info!(
                        path = %output_file.display(),
                        bytes = meta.len(),
                        "output file verified"
                    );
                    None
                }
                Err(err) => {
                    warn!(
                        path = %output_file.display(),
                        error = %err,
                        "output file vanished after reconciliation"
                    );
                    Some(FailureReason::MissingOutput)
                }
            }
        }
        Ok(Reconciliation::Missing) => {
            warn!(
                engine = %job.engine,
                format = %format,
                path = %output_file.display(),
                "engine reported success but no output file was found"
            );
            Some(FailureReason::MissingOutput)
        }
        Err(err) => {
            warn!(
                engine = %job.engine,
                format = %format,
                error = %err,
                "reconciliation failed"
            );
            Some(FailureReason::MissingOutput)
        }
    }
}

/// Engine invocation: `--<format> <output> --width N --height N <input>`.
fn build_args(job: &RenderJob, format: OutputFormat, requested: &Path) -> Vec<String> {
    vec![
        format.flag().to_string(),
        requested.display().to_string(),
        "--width".to_string(),
        job.width.to_string(),
        "--height".to_string(),
        job.height.to_string(),
        job.input.display().to_string(),
    ]
}

fn format_command(program: &Path, args: &[String]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

fn engine_output_dir(request: &RenderRequest, ctx: &RenderContext, engine: Engine) -> PathBuf {
    match &request.output {
        Some(dir) => dir.clone(),
        None => ctx.tool_dir.join(engine.name()),
    }
}

/// Resolve directories and engine executables for a run.
///
/// Every requested engine is validated here, before any subprocess is
/// spawned; a missing executable fails the whole run.
fn resolve_context(cfg: &ConfigFile, engines: &[Engine]) -> Result<RenderContext> {
    let tool_dir = match &cfg.project.tool_dir {
        Some(dir) => path::absolute(dir)
            .with_context(|| format!("resolving tool directory {}", dir.display()))?,
        None => default_tool_dir()?,
    };

    let project_root = match &cfg.project.root {
        Some(root) => path::absolute(root)
            .with_context(|| format!("resolving project root {}", root.display()))?,
        None => tool_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| tool_dir.clone()),
    };

    let mut executables = BTreeMap::new();
    for &engine in engines {
        let exe = cfg
            .engine_path(engine)
            .unwrap_or_else(|| engine.default_executable(&project_root));
        check_executable(&exe)?;
        info!(engine = %engine, path = %exe.display(), "found engine executable");
        executables.insert(engine, exe);
    }

    Ok(RenderContext {
        tool_dir,
        project_root,
        executables,
    })
}

/// Directory containing the running binary, falling back to the current
/// directory when the executable path cannot be resolved.
fn default_tool_dir() -> Result<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return Ok(dir.to_path_buf());
        }
    }
    std::env::current_dir().context("resolving current directory")
}

/// Log the final contents of each engine's output directory.
fn summarize_outputs(request: &RenderRequest, ctx: &RenderContext) {
    for &engine in &request.engines {
        let output_dir = engine_output_dir(request, ctx, engine);

        let Ok(entries) = fs::read_dir(&output_dir) else {
            warn!(
                engine = %engine,
                dir = %output_dir.display(),
                "output directory does not exist"
            );
            continue;
        };

        let mut count = 0usize;
        for entry in entries.flatten() {
            let size = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
            info!(
                engine = %engine,
                file = %entry.path().display(),
                bytes = size,
                "output file"
            );
            count += 1;
        }

        if count == 0 {
            warn!(
                engine = %engine,
                dir = %output_dir.display(),
                "no files in output directory"
            );
        } else {
            info!(
                engine = %engine,
                dir = %output_dir.display(),
                count,
                "output directory summary"
            );
        }
    }
}
