// crates/hypro-bench-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for hypro-bench-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use hypro_bench_config::BenchConfig;
use hypro_bench_config::ConfigError;

/// Smallest config that passes validation.
pub const MINIMAL_TOML: &str = r#"
[tool]
binary = "../app/HyPro"

[run]
formula = "gni/gni.txt"

[[groups]]
bitwidth = 1
instances = ["gni/p1_1bit.txt"]
"#;

/// Parses a TOML string into a `BenchConfig` for tests without validating.
pub fn config_from_toml(toml_str: &str) -> Result<BenchConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns the minimal config with defaults applied.
pub fn minimal_config() -> Result<BenchConfig, toml::de::Error> {
    config_from_toml(MINIMAL_TOML)
}

/// Asserts that validation failed with a message containing `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}
