// crates/hypro-bench-core/tests/driver.rs
// ============================================================================
// Module: Suite Driver Tests
// Description: Exercises run_suite with a scripted process runner.
// Purpose: Ensure ordering, totality, and classification of suite runs.
// Dependencies: hypro-bench-core, tokio
// ============================================================================

//! ## Overview
//! Drives [`run_suite`] with an in-memory runner that replays canned outcomes
//! and records every command it was asked to run. Validates:
//! - each instance is run exactly once, in declaration order;
//! - timeouts, tool errors, and protocol violations never stop the suite;
//! - launch failures abort the run as a distinct error.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use hypro_bench_core::BenchPlan;
use hypro_bench_core::DriverError;
use hypro_bench_core::Instance;
use hypro_bench_core::InstanceGroup;
use hypro_bench_core::NoopAuditSink;
use hypro_bench_core::ProcessRunner;
use hypro_bench_core::ReportSink;
use hypro_bench_core::RunOutcome;
use hypro_bench_core::RunnerError;
use hypro_bench_core::SuiteSpec;
use hypro_bench_core::ToolSpec;
use hypro_bench_core::VerificationResult;
use hypro_bench_core::run_suite;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runner that replays scripted results and records each command.
struct ScriptedRunner {
    script: Mutex<VecDeque<Result<RunOutcome, RunnerError>>>,
    calls: Mutex<Vec<(Vec<String>, Duration)>>,
}

impl ScriptedRunner {
    fn new(script: Vec<Result<RunOutcome, RunnerError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(Vec<String>, Duration)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, command: &[String], timeout: Duration) -> Result<RunOutcome, RunnerError> {
        self.calls.lock().unwrap().push((command.to_vec(), timeout));
        self.script.lock().unwrap().pop_front().expect("runner called more often than scripted")
    }
}

/// Sink that records the event stream as strings.
#[derive(Default)]
struct RecordingSink {
    events: Vec<String>,
}

impl ReportSink for RecordingSink {
    fn group_started(&mut self, group: &InstanceGroup) -> io::Result<()> {
        self.events.push(format!("start {}", group.bitwidth));
        Ok(())
    }

    fn instance_finished(
        &mut self,
        _group: &InstanceGroup,
        instance: &Instance,
        result: &VerificationResult,
    ) -> io::Result<()> {
        self.events.push(format!("{} {}", instance.system, result.label()));
        Ok(())
    }

    fn group_finished(&mut self, group: &InstanceGroup) -> io::Result<()> {
        self.events.push(format!("end {}", group.bitwidth));
        Ok(())
    }
}

/// Sink whose writes always fail.
struct BrokenSink;

impl ReportSink for BrokenSink {
    fn group_started(&mut self, _group: &InstanceGroup) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn instance_finished(
        &mut self,
        _group: &InstanceGroup,
        _instance: &Instance,
        _result: &VerificationResult,
    ) -> io::Result<()> {
        Ok(())
    }

    fn group_finished(&mut self, _group: &InstanceGroup) -> io::Result<()> {
        Ok(())
    }
}

fn plan(groups: Vec<(u32, Vec<&str>)>) -> BenchPlan {
    BenchPlan {
        tool: ToolSpec {
            binary: "tool".to_string(),
            verification_flag: "--bp".to_string(),
        },
        suite: SuiteSpec {
            groups: groups
                .into_iter()
                .map(|(bitwidth, systems)| InstanceGroup {
                    bitwidth,
                    instances: systems
                        .into_iter()
                        .map(|system| Instance::new(system, "formula.txt"))
                        .collect(),
                })
                .collect(),
        },
        timeout: Duration::from_secs(180),
    }
}

fn exited(code: i32, stdout: &str, stderr: &str) -> Result<RunOutcome, RunnerError> {
    Ok(RunOutcome {
        exit_status: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        elapsed: Duration::from_millis(40),
    })
}

fn timed_out() -> Result<RunOutcome, RunnerError> {
    Ok(RunOutcome::timed_out(Duration::from_secs(180)))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies every instance runs once, in order, with the tool command contract.
#[tokio::test]
async fn runs_each_instance_once_in_declared_order() {
    let plan = plan(vec![(1, vec!["p1_1bit", "p2_1bit"]), (2, vec!["p1_2bit"])]);
    let runner = ScriptedRunner::new(vec![
        exited(0, "UNSAT", ""),
        exited(0, "SAT", ""),
        exited(0, "UNSAT", ""),
    ]);
    let mut sink = RecordingSink::default();

    let report = run_suite(&plan, &runner, &mut sink, &NoopAuditSink).await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].0, vec!["tool", "--bp", "p1_1bit", "formula.txt"]);
    assert_eq!(calls[1].0[2], "p2_1bit");
    assert_eq!(calls[2].0[2], "p1_2bit");
    assert!(calls.iter().all(|(_, timeout)| *timeout == Duration::from_secs(180)));
    assert_eq!(
        sink.events,
        vec![
            "start 1",
            "p1_1bit unsat",
            "p2_1bit sat",
            "end 1",
            "start 2",
            "p1_2bit unsat",
            "end 2",
        ]
    );
    assert_eq!(report.groups.len(), 2);
    assert_eq!(report.groups[0].bitwidth, 1);
    assert_eq!(report.groups[0].instances.len(), 2);
    assert_eq!(report.groups[1].instances[0].system, "p1_2bit");
}

/// Verifies failures of every kind are recorded and the suite keeps going.
#[tokio::test]
async fn continues_after_timeout_tool_error_and_protocol_violation() {
    let plan = plan(vec![(3, vec!["a", "b", "c", "d"])]);
    let runner = ScriptedRunner::new(vec![
        timed_out(),
        exited(1, "", "parse error"),
        exited(0, "unknown", ""),
        exited(0, "SAT", ""),
    ]);
    let mut sink = RecordingSink::default();

    let report = run_suite(&plan, &runner, &mut sink, &NoopAuditSink).await.unwrap();

    assert_eq!(runner.calls().len(), 4);
    let results: Vec<&VerificationResult> = report.results().map(|entry| &entry.result).collect();
    assert_eq!(results[0], &VerificationResult::Timeout);
    assert_eq!(
        results[1],
        &VerificationResult::ToolError {
            exit_status: 1,
            stdout: String::new(),
            stderr: "parse error".to_string(),
        }
    );
    assert!(results[2].is_protocol_violation());
    assert_eq!(results[3].label(), "sat");
    assert_eq!(report.protocol_violations(), 1);
}

/// Verifies a clean exit with stderr output is never reported as a verdict.
#[tokio::test]
async fn stderr_with_unsat_stdout_is_tool_error() {
    let plan = plan(vec![(1, vec!["a"])]);
    let runner = ScriptedRunner::new(vec![exited(0, "UNSAT", "warning")]);
    let mut sink = RecordingSink::default();

    let report = run_suite(&plan, &runner, &mut sink, &NoopAuditSink).await.unwrap();

    assert_eq!(report.groups[0].instances[0].result.label(), "tool_error");
}

/// Verifies launch failures abort the suite instead of becoming timeouts.
#[tokio::test]
async fn launch_failure_aborts_with_distinct_error() {
    let plan = plan(vec![(1, vec!["a", "b"])]);
    let runner = ScriptedRunner::new(vec![Err(RunnerError::Launch {
        program: "tool".to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
    })]);
    let mut sink = RecordingSink::default();

    let err = run_suite(&plan, &runner, &mut sink, &NoopAuditSink).await.unwrap_err();

    match err {
        DriverError::Launch {
            program,
            system,
            ..
        } => {
            assert_eq!(program, "tool");
            assert_eq!(system, "a");
        }
        other => panic!("expected launch failure, got {other}"),
    }
    assert_eq!(runner.calls().len(), 1);
}

/// Verifies report write failures surface as driver errors.
#[tokio::test]
async fn sink_failure_is_reported() {
    let plan = plan(vec![(1, vec!["a"])]);
    let runner = ScriptedRunner::new(vec![]);

    let err = run_suite(&plan, &runner, &mut BrokenSink, &NoopAuditSink).await.unwrap_err();

    assert!(matches!(err, DriverError::Report(_)));
    assert!(runner.calls().is_empty());
}

/// Verifies an empty group still produces its header and separator.
#[tokio::test]
async fn empty_group_is_reported() {
    let plan = plan(vec![(4, vec![])]);
    let runner = ScriptedRunner::new(vec![]);
    let mut sink = RecordingSink::default();

    let report = run_suite(&plan, &runner, &mut sink, &NoopAuditSink).await.unwrap();

    assert_eq!(sink.events, vec!["start 4", "end 4"]);
    assert!(report.groups[0].instances.is_empty());
}

/// Verifies the report serializes in declaration order with outcome tags.
#[tokio::test]
async fn report_serializes_as_grouped_json() {
    let plan = plan(vec![(1, vec!["a"]), (2, vec!["b"])]);
    let runner = ScriptedRunner::new(vec![exited(0, "UNSAT", ""), timed_out()]);
    let mut sink = RecordingSink::default();

    let report = run_suite(&plan, &runner, &mut sink, &NoopAuditSink).await.unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["groups"][0]["bitwidth"], 1);
    assert_eq!(value["groups"][0]["instances"][0]["result"]["outcome"], "verified");
    assert_eq!(value["groups"][0]["instances"][0]["result"]["satisfiable"], false);
    assert_eq!(value["groups"][1]["instances"][0]["result"]["outcome"], "timeout");
}
