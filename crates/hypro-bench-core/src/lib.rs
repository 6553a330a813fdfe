// crates/hypro-bench-core/src/lib.rs
// ============================================================================
// Module: HyPro Bench Core Library
// Description: Bounded process runner, verdict classification, and suite driver.
// Purpose: Run an external verification tool over a grouped instance suite.
// Dependencies: async-trait, serde, serde_json, thiserror, tokio
// ============================================================================

//! ## Overview
//! `hypro-bench-core` launches the verification tool once per benchmark
//! instance, bounds each launch with a timeout, classifies the captured output
//! into a [`VerificationResult`], and folds the results into a [`SuiteReport`]
//! grouped by bit-width.
//!
//! Execution is strictly sequential: the driver awaits each runner call before
//! issuing the next one. The only race is inside the runner, between the
//! child's natural exit and its deadline.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod driver;
pub mod runner;
pub mod suite;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::BenchAuditSink;
pub use audit::FileAuditSink;
pub use audit::InstanceAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::SuiteAuditEvent;
pub use driver::DriverError;
pub use driver::GroupReport;
pub use driver::InstanceReport;
pub use driver::ReportSink;
pub use driver::SuiteReport;
pub use driver::run_suite;
pub use runner::BoundedRunner;
pub use runner::MAX_CAPTURE_BYTES;
pub use runner::ProcessRunner;
pub use runner::RunOutcome;
pub use runner::RunnerError;
pub use runner::run_bounded;
pub use suite::BenchPlan;
pub use suite::Instance;
pub use suite::InstanceGroup;
pub use suite::SuiteSpec;
pub use suite::ToolSpec;
pub use verdict::VerificationResult;
pub use verdict::classify;
