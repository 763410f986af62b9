// src/exec/process.rs

//! Bounded subprocess execution.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::ConfigError;

/// Conventional exit code reported for a timed-out command.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// How a bounded process finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    /// The process exited on its own with this code.
    Exited(i32),
    /// The process outlived its timeout and was killed.
    TimedOut,
}

impl ProcessStatus {
    pub fn success(&self) -> bool {
        matches!(self, ProcessStatus::Exited(0))
    }

    /// Exit code under shell conventions (124 for a timeout).
    pub fn code(&self) -> i32 {
        match self {
            ProcessStatus::Exited(code) => *code,
            ProcessStatus::TimedOut => TIMEOUT_EXIT_CODE,
        }
    }
}

/// Captured result of one bounded invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub status: ProcessStatus,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Check that `path` points at something we can actually invoke.
///
/// Done once, before any spawn, so a missing engine build fails the whole
/// run up front instead of surfacing as a confusing per-job spawn error.
pub fn check_executable(path: &Path) -> Result<(), ConfigError> {
    if path.is_file() && is_executable(path) {
        return Ok(());
    }
    Err(ConfigError::EngineNotFound {
        path: path.to_path_buf(),
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Run `program` with `args` and `env`, capturing stdout/stderr as text,
/// killing the child if it outlives `timeout`.
///
/// On timeout the child is killed and fully reaped before returning; the
/// outcome carries empty stdout and a synthetic stderr line naming the
/// limit, with [`ProcessStatus::TimedOut`] distinguishable from any real
/// exit code.
pub async fn run_with_timeout(
    program: &Path,
    args: &[String],
    env: &[(&str, &str)],
    timeout: Duration,
) -> Result<ProcessOutcome> {
    let started = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .envs(env.iter().copied())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning {}", program.display()))?;

    let stdout = drain_lines(child.stdout.take(), "stdout");
    let stderr = drain_lines(child.stderr.take(), "stderr");

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status_res) => {
            let status = status_res
                .with_context(|| format!("waiting for {}", program.display()))?;
            let code = status.code().unwrap_or(-1);

            let stdout = stdout.await.unwrap_or_default();
            let stderr = stderr.await.unwrap_or_default();

            Ok(ProcessOutcome {
                status: ProcessStatus::Exited(code),
                stdout,
                stderr,
                elapsed: started.elapsed(),
            })
        }
        Err(_elapsed) => {
            // kill() sends the signal and waits, so no zombie is left behind.
            if let Err(err) = child.kill().await {
                warn!(
                    program = %program.display(),
                    error = %err,
                    "failed to kill timed-out process"
                );
            }
            stdout.abort();
            stderr.abort();

            Ok(ProcessOutcome {
                status: ProcessStatus::TimedOut,
                stdout: String::new(),
                stderr: format!("command timed out after {}s", timeout.as_secs()),
                elapsed: started.elapsed(),
            })
        }
    }
}

/// Drain a child stream line-by-line so pipe buffers never fill, logging each
/// line at debug and returning the accumulated text.
fn drain_lines<R>(stream: Option<R>, label: &'static str) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut collected = String::new();
        let Some(stream) = stream else {
            return collected;
        };

        let reader = BufReader::new(stream);
        let mut lines = reader.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            debug!("{label}: {line}");
            collected.push_str(&line);
            collected.push('\n');
        }
        collected
    })
}
