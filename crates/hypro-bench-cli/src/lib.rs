// crates/hypro-bench-cli/src/lib.rs
// ============================================================================
// Module: HyPro Bench CLI Library
// Description: Shared helpers for the HyPro Bench command-line interface.
// Purpose: Provide reusable components (i18n, console report) for the binary and tests.
// Dependencies: hypro-bench-core
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities: the internationalized
//! message catalog and the console report sink that streams suite results.
//! The binary entry point (`src/main.rs`) imports these helpers to keep all
//! user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Console rendering of suite results.
pub mod console;
/// Internationalization helpers and message catalog.
pub mod i18n;
