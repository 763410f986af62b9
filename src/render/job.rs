// src/render/job.rs

//! Per-job data carried through a render run.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::{Engine, OutputFormat};

/// One engine × one HTML input, with everything needed to invoke the engine.
///
/// Immutable once built; the driver constructs one per engine per input.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub engine: Engine,
    /// Absolute path to the input HTML file.
    pub input: PathBuf,
    /// Absolute path to the directory the outputs belong in.
    pub output_dir: PathBuf,
    /// Formats to produce, one engine invocation each.
    pub formats: Vec<OutputFormat>,
    pub width: u32,
    pub height: u32,
    pub timeout: Duration,
}

impl RenderJob {
    /// Base name of the input file without extension.
    pub fn input_stem(&self) -> String {
        self.input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `<stem>-<engine>`, the base name shared by all outputs of this job.
    pub fn output_stem(&self) -> String {
        format!("{}-{}", self.input_stem(), self.engine)
    }

    /// Expected output path for one format.
    pub fn output_file(&self, format: OutputFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.output_stem(), format.extension()))
    }

    /// Working-directory-relative path handed to engines with the stray
    /// output quirk.
    pub fn working_dir_request(&self, format: OutputFormat) -> PathBuf {
        PathBuf::from(format!(
            "./output-{}.{}",
            self.output_stem(),
            format.extension()
        ))
    }
}

/// Why a format failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The engine process exceeded the job timeout.
    Timeout,
    /// The engine exited with a nonzero code.
    Process { exit_code: i32 },
    /// The engine exited zero but its output never appeared on disk, even
    /// after reconciliation.
    MissingOutput,
}

/// Result of one (job, format) pair.
#[derive(Debug, Clone)]
pub struct FormatResult {
    pub format: OutputFormat,
    pub failure: Option<FailureReason>,
    pub duration: Duration,
    /// Where the output was expected and, on success, found.
    pub output_file: PathBuf,
}

impl FormatResult {
    pub fn ok(&self) -> bool {
        self.failure.is_none()
    }
}

/// All format results for one job, keyed by format.
pub type JobResults = BTreeMap<OutputFormat, FormatResult>;

/// Whether every requested format succeeded with its file present on disk.
///
/// A zero exit code alone is not enough evidence; the file itself is
/// re-checked here.
pub fn job_succeeded(results: &JobResults) -> bool {
    !results.is_empty()
        && results
            .values()
            .all(|result| result.ok() && result.output_file.is_file())
}
