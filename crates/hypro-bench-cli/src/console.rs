// crates/hypro-bench-cli/src/console.rs
// ============================================================================
// Module: Console Report Sink
// Description: Streams suite results to stdout and diagnostics to stderr.
// Purpose: Render the bit-width grouped benchmark report as results arrive.
// Dependencies: hypro-bench-core
// ============================================================================

//! ## Overview
//! [`ConsoleReportSink`] implements [`ReportSink`] over any pair of writers.
//! In [`ReportFormat::Text`] each group is framed by a separator line and a
//! `Bitwidth: N` header, with one line per instance:
//!
//! ```text
//! ========================================================
//! Bitwidth: 1
//! Time: 0.412 seconds (UNSAT)
//! TO
//! ========================================================
//!
//! ```
//!
//! In [`ReportFormat::Json`] the stdout stream stays silent so the caller can
//! print the full report once the run ends. Tool-error and protocol-violation
//! diagnostics go to the error stream in both formats.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;

use hypro_bench_core::Instance;
use hypro_bench_core::InstanceGroup;
use hypro_bench_core::ReportSink;
use hypro_bench_core::VerificationResult;

use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Line framing each bit-width group.
pub const SEPARATOR: &str = "========================================================";
/// Report token for a timed-out instance.
pub const TIMEOUT_TOKEN: &str = "TO";
/// Report token for an inconclusive tool run.
pub const TOOL_ERROR_TOKEN: &str = "ERR";
/// Report token for output that is neither SAT nor UNSAT.
pub const PROTOCOL_VIOLATION_TOKEN: &str = "INVALID";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Output format for the primary report channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable lines streamed per instance.
    Text,
    /// A single JSON document written after the run.
    Json,
}

/// Report sink writing to a primary stream and a diagnostic stream.
pub struct ConsoleReportSink<O, E> {
    /// Primary report stream (stdout in the CLI).
    out: O,
    /// Diagnostic stream (stderr in the CLI).
    err: E,
    /// Selected report format.
    format: ReportFormat,
}

impl<O: Write, E: Write> ConsoleReportSink<O, E> {
    /// Creates a sink over the given streams.
    pub const fn new(out: O, err: E, format: ReportFormat) -> Self {
        Self {
            out,
            err,
            format,
        }
    }

    /// Consumes the sink and returns its streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Writes a report line when streaming text.
    fn report_line(&mut self, line: &str) -> io::Result<()> {
        if self.format == ReportFormat::Text {
            writeln!(self.out, "{line}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Writes the diagnostic block for failed instances.
    fn diagnose(&mut self, instance: &Instance, result: &VerificationResult) -> io::Result<()> {
        match result {
            VerificationResult::ToolError {
                exit_status,
                stdout,
                stderr,
            } => {
                writeln!(
                    self.err,
                    "{}",
                    t!("run.diag.tool_error", system = instance.system, status = exit_status)
                )?;
                writeln!(self.err, "{}", t!("run.diag.stdout", output = stdout))?;
                writeln!(self.err, "{}", t!("run.diag.stderr", output = stderr))?;
            }
            VerificationResult::ProtocolViolation {
                stdout,
            } => {
                writeln!(
                    self.err,
                    "{}",
                    t!("run.diag.protocol_violation", system = instance.system)
                )?;
                writeln!(self.err, "{}", t!("run.diag.stdout", output = stdout))?;
            }
            VerificationResult::Timeout | VerificationResult::Verified { .. } => return Ok(()),
        }
        self.err.flush()
    }
}

impl<O: Write, E: Write> ReportSink for ConsoleReportSink<O, E> {
    fn group_started(&mut self, group: &InstanceGroup) -> io::Result<()> {
        self.report_line(SEPARATOR)?;
        self.report_line(&format!("Bitwidth: {}", group.bitwidth))
    }

    fn instance_finished(
        &mut self,
        _group: &InstanceGroup,
        instance: &Instance,
        result: &VerificationResult,
    ) -> io::Result<()> {
        self.diagnose(instance, result)?;
        self.report_line(&render_result(result))
    }

    fn group_finished(&mut self, _group: &InstanceGroup) -> io::Result<()> {
        self.report_line(SEPARATOR)?;
        self.report_line("")
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the report line for one instance result.
#[must_use]
pub fn render_result(result: &VerificationResult) -> String {
    match result {
        VerificationResult::Timeout => TIMEOUT_TOKEN.to_string(),
        VerificationResult::ToolError { .. } => TOOL_ERROR_TOKEN.to_string(),
        VerificationResult::ProtocolViolation { .. } => PROTOCOL_VIOLATION_TOKEN.to_string(),
        VerificationResult::Verified {
            elapsed,
            satisfiable,
        } => {
            let verdict = if *satisfiable { "SAT" } else { "UNSAT" };
            format!("Time: {:.3} seconds ({verdict})", elapsed.as_secs_f64())
        }
    }
}
