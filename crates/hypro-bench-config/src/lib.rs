// crates/hypro-bench-config/src/lib.rs
// ============================================================================
// Module: HyPro Bench Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for hypro-bench.toml semantics.
// Dependencies: hypro-bench-core, serde, toml
// ============================================================================

//! ## Overview
//! `hypro-bench-config` defines the benchmark configuration: the tool
//! invocation contract, the per-instance timeout, the shared formula, and the
//! bit-width grouped instance table. Validation is strict and fail-closed; a
//! validated config converts into a [`hypro_bench_core::BenchPlan`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
