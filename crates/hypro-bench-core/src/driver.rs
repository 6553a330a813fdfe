// crates/hypro-bench-core/src/driver.rs
// ============================================================================
// Module: Instance Suite Driver
// Description: Runs every suite instance once and folds results by bit-width.
// Purpose: Sequence runner calls, classify outcomes, and stream the report.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`run_suite`] walks groups in declaration order and, inside each group,
//! instances in declaration order. Each instance is launched exactly once
//! through a [`ProcessRunner`], classified, pushed to the [`ReportSink`], and
//! recorded in the returned [`SuiteReport`].
//!
//! ## Invariants
//! - Runner calls are strictly sequential; the next instance starts only after
//!   the previous one is classified.
//! - Timeouts, tool errors, and protocol violations never stop the suite.
//! - A launch failure aborts the run: it means the harness itself is
//!   misconfigured, and every later instance would fail the same way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::audit::BenchAuditSink;
use crate::audit::InstanceAuditEvent;
use crate::audit::SuiteAuditEvent;
use crate::runner::ProcessRunner;
use crate::runner::RunnerError;
use crate::suite::BenchPlan;
use crate::suite::Instance;
use crate::suite::InstanceGroup;
use crate::verdict::VerificationResult;
use crate::verdict::classify;

// ============================================================================
// SECTION: Report Types
// ============================================================================

/// Result for a single instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceReport {
    /// System-description path.
    pub system: String,
    /// Formula path.
    pub formula: String,
    /// Classified result.
    pub result: VerificationResult,
}

/// Results for one bit-width group, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    /// Bit-width label.
    pub bitwidth: u32,
    /// Per-instance results.
    pub instances: Vec<InstanceReport>,
}

/// Results for the whole suite, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Per-group results.
    pub groups: Vec<GroupReport>,
}

impl SuiteReport {
    /// Returns the number of instances that broke the tool's output contract.
    #[must_use]
    pub fn protocol_violations(&self) -> usize {
        self.results().filter(|report| report.result.is_protocol_violation()).count()
    }

    /// Iterates every instance result across groups.
    pub fn results(&self) -> impl Iterator<Item = &InstanceReport> {
        self.groups.iter().flat_map(|group| group.instances.iter())
    }
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Receives results as they are produced.
///
/// Implementations render the streamed report; the driver never buffers
/// output on their behalf.
pub trait ReportSink {
    /// Called before the first instance of a group runs.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the report cannot be written.
    fn group_started(&mut self, group: &InstanceGroup) -> io::Result<()>;

    /// Called once per instance after classification.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the report cannot be written.
    fn instance_finished(
        &mut self,
        group: &InstanceGroup,
        instance: &Instance,
        result: &VerificationResult,
    ) -> io::Result<()>;

    /// Called after the last instance of a group.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the report cannot be written.
    fn group_finished(&mut self, group: &InstanceGroup) -> io::Result<()>;
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures that abort a suite run.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The tool could not be started for an instance.
    #[error("failed to launch {program} for {system}: {source}")]
    Launch {
        /// Program that failed to start.
        program: String,
        /// Instance being launched.
        system: String,
        /// Underlying spawn error.
        source: io::Error,
    },
    /// The runner failed after launch.
    #[error("runner failed for {system}: {source}")]
    Runner {
        /// Instance being run.
        system: String,
        /// Underlying runner error.
        source: RunnerError,
    },
    /// The report sink could not be written.
    #[error("report output failed: {0}")]
    Report(io::Error),
}

impl DriverError {
    /// Attaches instance context to a runner error.
    fn from_runner(system: &str, error: RunnerError) -> Self {
        match error {
            RunnerError::Launch {
                program,
                source,
            } => Self::Launch {
                program,
                system: system.to_string(),
                source,
            },
            other => Self::Runner {
                system: system.to_string(),
                source: other,
            },
        }
    }
}

// ============================================================================
// SECTION: Driver
// ============================================================================

/// Runs every instance in `plan` once and returns the grouped report.
///
/// # Errors
///
/// Returns [`DriverError`] when the tool cannot be launched, the runner
/// cannot complete an invocation, or the sink fails to write.
pub async fn run_suite<R, S>(
    plan: &BenchPlan,
    runner: &R,
    sink: &mut S,
    audit: &dyn BenchAuditSink,
) -> Result<SuiteReport, DriverError>
where
    R: ProcessRunner + ?Sized,
    S: ReportSink + ?Sized,
{
    let group_count = plan.suite.groups.len();
    let instance_count = plan.suite.instance_count();
    audit.record_suite(&SuiteAuditEvent::started(group_count, instance_count, plan.timeout));

    let mut report = SuiteReport {
        groups: Vec::with_capacity(group_count),
    };
    for group in &plan.suite.groups {
        sink.group_started(group).map_err(DriverError::Report)?;
        let mut instances = Vec::with_capacity(group.instances.len());
        for instance in &group.instances {
            let result = run_instance(plan, runner, group, instance, audit).await?;
            sink.instance_finished(group, instance, &result).map_err(DriverError::Report)?;
            instances.push(InstanceReport {
                system: instance.system.clone(),
                formula: instance.formula.clone(),
                result,
            });
        }
        sink.group_finished(group).map_err(DriverError::Report)?;
        report.groups.push(GroupReport {
            bitwidth: group.bitwidth,
            instances,
        });
    }

    audit.record_suite(&SuiteAuditEvent::finished(
        group_count,
        instance_count,
        plan.timeout,
        report.protocol_violations(),
    ));
    Ok(report)
}

/// Launches and classifies a single instance.
async fn run_instance<R>(
    plan: &BenchPlan,
    runner: &R,
    group: &InstanceGroup,
    instance: &Instance,
    audit: &dyn BenchAuditSink,
) -> Result<VerificationResult, DriverError>
where
    R: ProcessRunner + ?Sized,
{
    let command = plan.tool.command_for(instance);
    audit.record_instance(&InstanceAuditEvent::started(group.bitwidth, instance, &command));
    let outcome = runner
        .run(&command, plan.timeout)
        .await
        .map_err(|err| DriverError::from_runner(&instance.system, err))?;
    let result = classify(outcome);
    audit.record_instance(&InstanceAuditEvent::finished(group.bitwidth, instance, &result));
    Ok(result)
}
