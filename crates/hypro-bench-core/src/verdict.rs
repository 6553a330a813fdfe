// crates/hypro-bench-core/src/verdict.rs
// ============================================================================
// Module: Verdict Classification
// Description: Maps a runner outcome onto a reportable verification result.
// Purpose: Enforce the tool's output contract without guessing verdicts.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`classify`] applies the tool contract in a fixed order:
//! 1. timeout sentinel → [`VerificationResult::Timeout`];
//! 2. non-zero exit or any stderr text → [`VerificationResult::ToolError`];
//! 3. stdout containing `UNSAT` → unsatisfiable;
//! 4. stdout containing `SAT` → satisfiable;
//! 5. anything else → [`VerificationResult::ProtocolViolation`].
//!
//! `UNSAT` contains `SAT`, so step 3 must run before step 4.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;
use serde::Serializer;

use crate::runner::RunOutcome;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Token printed by the tool for an unsatisfiable instance.
pub const UNSAT_TOKEN: &str = "UNSAT";
/// Token printed by the tool for a satisfiable instance.
pub const SAT_TOKEN: &str = "SAT";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Terminal classification of one instance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationResult {
    /// The tool did not finish before the deadline.
    Timeout,
    /// The tool exited non-zero or wrote to stderr.
    ToolError {
        /// Exit code reported by the tool.
        exit_status: i32,
        /// Captured stdout for diagnostics.
        stdout: String,
        /// Captured stderr for diagnostics.
        stderr: String,
    },
    /// The tool exited cleanly but printed neither verdict token.
    ProtocolViolation {
        /// Captured stdout that failed the contract.
        stdout: String,
    },
    /// The tool produced a verdict.
    Verified {
        /// Wall-clock time of the run, in seconds when serialized.
        #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
        elapsed: Duration,
        /// True for `SAT`, false for `UNSAT`.
        satisfiable: bool,
    },
}

impl VerificationResult {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ToolError {
                ..
            } => "tool_error",
            Self::ProtocolViolation {
                ..
            } => "protocol_violation",
            Self::Verified {
                satisfiable: true,
                ..
            } => "sat",
            Self::Verified {
                satisfiable: false,
                ..
            } => "unsat",
        }
    }

    /// Returns the elapsed time when it is meaningful for reporting.
    #[must_use]
    pub const fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::Verified {
                elapsed,
                ..
            } => Some(*elapsed),
            _ => None,
        }
    }

    /// Returns true when the tool broke its output contract.
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation { .. })
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies a runner outcome.
#[must_use]
pub fn classify(outcome: RunOutcome) -> VerificationResult {
    let RunOutcome {
        exit_status,
        stdout,
        stderr,
        elapsed,
    } = outcome;
    let Some(exit_status) = exit_status else {
        return VerificationResult::Timeout;
    };
    if exit_status != 0 || !stderr.is_empty() {
        return VerificationResult::ToolError {
            exit_status,
            stdout,
            stderr,
        };
    }
    if stdout.contains(UNSAT_TOKEN) {
        return VerificationResult::Verified {
            elapsed,
            satisfiable: false,
        };
    }
    if stdout.contains(SAT_TOKEN) {
        return VerificationResult::Verified {
            elapsed,
            satisfiable: true,
        };
    }
    VerificationResult::ProtocolViolation {
        stdout,
    }
}

/// Serializes a duration as fractional seconds.
fn serialize_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
