// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs one engine invocation at a time with `tokio::process::Command`,
//! captures stdout/stderr, and enforces the per-job timeout. The child is
//! killed and reaped when the timeout expires; it is never left running.

pub mod process;

pub use process::{
    check_executable, run_with_timeout, ProcessOutcome, ProcessStatus, TIMEOUT_EXIT_CODE,
};
