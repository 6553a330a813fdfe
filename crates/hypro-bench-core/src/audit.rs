// crates/hypro-bench-core/src/audit.rs
// ============================================================================
// Module: Bench Audit Logging
// Description: Structured audit events for suite and instance execution.
// Purpose: Emit JSON-lines run records without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The driver reports suite and instance lifecycle events to a
//! [`BenchAuditSink`]. Sinks serialize each event as one JSON line, either to
//! stderr or to an append-only file, so runs can be post-processed without
//! scraping the human-readable report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::suite::Instance;
use crate::verdict::VerificationResult;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Suite-level audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Number of groups in the suite.
    pub groups: usize,
    /// Number of instances in the suite.
    pub instances: usize,
    /// Per-instance timeout in milliseconds.
    pub timeout_ms: u128,
    /// Protocol violations observed (set on completion only).
    pub protocol_violations: Option<usize>,
}

impl SuiteAuditEvent {
    /// Builds the event recorded before the first instance runs.
    #[must_use]
    pub fn started(groups: usize, instances: usize, timeout: Duration) -> Self {
        Self {
            event: "suite_started",
            timestamp_ms: now_ms(),
            groups,
            instances,
            timeout_ms: timeout.as_millis(),
            protocol_violations: None,
        }
    }

    /// Builds the event recorded after the last instance finished.
    #[must_use]
    pub fn finished(
        groups: usize,
        instances: usize,
        timeout: Duration,
        protocol_violations: usize,
    ) -> Self {
        Self {
            event: "suite_finished",
            timestamp_ms: now_ms(),
            groups,
            instances,
            timeout_ms: timeout.as_millis(),
            protocol_violations: Some(protocol_violations),
        }
    }
}

/// Instance-level audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Bit-width of the enclosing group.
    pub bitwidth: u32,
    /// System-description path.
    pub system: String,
    /// Formula path.
    pub formula: String,
    /// Full argument vector (start events only).
    pub command: Option<Vec<String>>,
    /// Outcome label (finish events only).
    pub outcome: Option<&'static str>,
    /// Elapsed milliseconds when the outcome carries a timing.
    pub elapsed_ms: Option<u128>,
    /// Tool exit code for tool errors.
    pub exit_status: Option<i32>,
}

impl InstanceAuditEvent {
    /// Builds the event recorded just before the tool is launched.
    #[must_use]
    pub fn started(bitwidth: u32, instance: &Instance, command: &[String]) -> Self {
        Self {
            event: "instance_started",
            timestamp_ms: now_ms(),
            bitwidth,
            system: instance.system.clone(),
            formula: instance.formula.clone(),
            command: Some(command.to_vec()),
            outcome: None,
            elapsed_ms: None,
            exit_status: None,
        }
    }

    /// Builds the event recorded once the instance is classified.
    #[must_use]
    pub fn finished(bitwidth: u32, instance: &Instance, result: &VerificationResult) -> Self {
        let exit_status = match result {
            VerificationResult::ToolError {
                exit_status,
                ..
            } => Some(*exit_status),
            _ => None,
        };
        Self {
            event: "instance_finished",
            timestamp_ms: now_ms(),
            bitwidth,
            system: instance.system.clone(),
            formula: instance.formula.clone(),
            command: None,
            outcome: Some(result.label()),
            elapsed_ms: result.elapsed().map(|elapsed| elapsed.as_millis()),
            exit_status,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for bench run events.
pub trait BenchAuditSink: Send + Sync {
    /// Record a suite lifecycle event.
    fn record_suite(&self, event: &SuiteAuditEvent);

    /// Record an instance lifecycle event.
    fn record_instance(&self, event: &InstanceAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl BenchAuditSink for StderrAuditSink {
    fn record_suite(&self, event: &SuiteAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_instance(&self, event: &InstanceAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized payload.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl BenchAuditSink for FileAuditSink {
    fn record_suite(&self, event: &SuiteAuditEvent) {
        self.append(event);
    }

    fn record_instance(&self, event: &InstanceAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl BenchAuditSink for NoopAuditSink {
    fn record_suite(&self, _event: &SuiteAuditEvent) {}

    fn record_instance(&self, _event: &InstanceAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current wall-clock time in milliseconds since epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
