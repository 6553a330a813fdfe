// crates/hypro-bench-core/src/runner.rs
// ============================================================================
// Module: Bounded Process Runner
// Description: Launches a child process and waits for it up to a deadline.
// Purpose: Capture exit status and output, or kill the child on timeout.
// Dependencies: async-trait, thiserror, tokio
// ============================================================================

//! ## Overview
//! [`run_bounded`] spawns exactly one child process with stdout and stderr
//! piped, drains both pipes while waiting for the child, and races the whole
//! wait against a deadline. When the deadline wins, the child is killed and
//! reaped, partial output is discarded, and the timeout sentinel is returned.
//!
//! ## Invariants
//! - At most one spawn and at most one kill per call; there is no retry.
//! - A child that was not reaped is killed when its guard is dropped, on every
//!   exit path including errors and cancellation of the calling future.
//! - A launch failure is an error, never a timeout sentinel.
//! - `exit_status` is `None` only for the timeout sentinel; a child ended by a
//!   signal reports `128 + signal`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::process::Command;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of bytes retained per captured stream.
pub const MAX_CAPTURE_BYTES: usize = 16 * 1024 * 1024;
/// Read buffer size used while draining child pipes.
const READ_CHUNK_BYTES: usize = 8 * 1024;
/// Exit code base for signal-terminated children (shell convention).
#[cfg(unix)]
const SIGNAL_EXIT_BASE: i32 = 128;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of one runner invocation.
///
/// # Invariants
/// - `exit_status == None` marks the timeout sentinel; `stdout` and `stderr`
///   are then empty and `elapsed` must not be reported as a timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Process exit code, or `None` when the deadline elapsed first.
    pub exit_status: Option<i32>,
    /// Captured stdout, decoded as UTF-8 and trimmed.
    pub stdout: String,
    /// Captured stderr, decoded as UTF-8 and trimmed.
    pub stderr: String,
    /// Wall-clock time from launch to completion.
    pub elapsed: Duration,
}

impl RunOutcome {
    /// Builds the timeout sentinel.
    #[must_use]
    pub const fn timed_out(elapsed: Duration) -> Self {
        Self {
            exit_status: None,
            stdout: String::new(),
            stderr: String::new(),
            elapsed,
        }
    }

    /// Returns true when this outcome is the timeout sentinel.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        self.exit_status.is_none()
    }
}

/// Runner failures that are not timeouts.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The command vector had no program.
    #[error("command is empty")]
    EmptyCommand,
    /// The program could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        source: io::Error,
    },
    /// A piped stream was not available after spawn.
    #[error("child {0} pipe unavailable")]
    PipeUnavailable(&'static str),
    /// Waiting on the child or reading its output failed.
    #[error("failed while waiting for child: {0}")]
    Wait(io::Error),
    /// The child could not be killed after the deadline.
    #[error("failed to kill timed-out child: {0}")]
    Kill(io::Error),
}

/// Executes one command with a deadline.
///
/// The driver only depends on this seam so tests can substitute scripted
/// outcomes for real processes.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` and waits at most `timeout` for it.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the command cannot be launched or its
    /// lifecycle cannot be observed.
    async fn run(&self, command: &[String], timeout: Duration) -> Result<RunOutcome, RunnerError>;
}

/// Production runner backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedRunner;

#[async_trait]
impl ProcessRunner for BoundedRunner {
    async fn run(&self, command: &[String], timeout: Duration) -> Result<RunOutcome, RunnerError> {
        run_bounded(command, timeout).await
    }
}

/// Child handle that is killed on drop unless it was reaped.
struct ChildGuard {
    /// Spawned child process.
    child: Child,
    /// Set once the child's exit status has been collected.
    reaped: bool,
}

impl ChildGuard {
    /// Wraps a freshly spawned child.
    const fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    /// Kills the child and waits for it to be reaped.
    async fn terminate(&mut self) -> Result<(), RunnerError> {
        // The child may have exited while a grandchild still held its pipes open.
        if let Ok(Some(_)) = self.child.try_wait() {
            self.reaped = true;
            return Ok(());
        }
        self.child.kill().await.map_err(RunnerError::Kill)?;
        self.reaped = true;
        Ok(())
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        if let Ok(Some(_)) = self.child.try_wait() {
            return;
        }
        let _ = self.child.start_kill();
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs `command[0]` with `command[1..]` as arguments, bounded by `timeout`.
///
/// # Errors
///
/// Returns [`RunnerError::EmptyCommand`] or [`RunnerError::Launch`] when the
/// process cannot be started, and [`RunnerError::Wait`] or
/// [`RunnerError::Kill`] when its lifecycle cannot be completed.
pub async fn run_bounded(command: &[String], timeout: Duration) -> Result<RunOutcome, RunnerError> {
    let (program, args) = command.split_first().ok_or(RunnerError::EmptyCommand)?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let started = Instant::now();
    let child = cmd.spawn().map_err(|source| RunnerError::Launch {
        program: program.clone(),
        source,
    })?;
    let mut guard = ChildGuard::new(child);
    let mut stdout = guard.child.stdout.take().ok_or(RunnerError::PipeUnavailable("stdout"))?;
    let mut stderr = guard.child.stderr.take().ok_or(RunnerError::PipeUnavailable("stderr"))?;

    let completed = tokio::time::timeout(timeout, async {
        tokio::try_join!(guard.child.wait(), read_capped(&mut stdout), read_capped(&mut stderr))
    })
    .await;

    match completed {
        Ok(Ok((status, out, err))) => {
            guard.reaped = true;
            Ok(RunOutcome {
                exit_status: Some(exit_code(status)),
                stdout: decode_trimmed(&out),
                stderr: decode_trimmed(&err),
                elapsed: started.elapsed(),
            })
        }
        Ok(Err(err)) => Err(RunnerError::Wait(err)),
        Err(_) => {
            guard.terminate().await?;
            Ok(RunOutcome::timed_out(started.elapsed()))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Drains `reader` to EOF, keeping at most [`MAX_CAPTURE_BYTES`].
async fn read_capped<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut kept = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_BYTES];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            return Ok(kept);
        }
        let room = MAX_CAPTURE_BYTES.saturating_sub(kept.len());
        if room > 0 {
            kept.extend_from_slice(&chunk[.. read.min(room)]);
        }
    }
}

/// Decodes captured bytes (lossy UTF-8) and trims surrounding whitespace.
fn decode_trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

/// Maps an exit status to a numeric code, folding signals into `128 + n`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return SIGNAL_EXIT_BASE.saturating_add(signal);
        }
    }
    -1
}

// ============================================================================
// SECTION: Tests
// ============================================================================
