// crates/hypro-bench-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic starting point for new benchmark configs.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `hypro-bench.toml`: the GNI suite at bit-widths one
//! through six, four systems per width, checked against a shared formula.

/// Returns a canonical example `hypro-bench.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    let mut toml = String::from(
        r#"[tool]
binary = "../app/HyPro"
verification_flag = "--bp"

[run]
timeout_secs = 180
formula = "gni/gni.txt"

[audit]
enabled = false
# path = "hypro-bench.audit.jsonl"
"#,
    );
    for bitwidth in 1..=6 {
        toml.push_str(&format!("\n[[groups]]\nbitwidth = {bitwidth}\ninstances = [\n"));
        for system in 1..=4 {
            toml.push_str(&format!("  \"gni/p{system}_{bitwidth}bit.txt\",\n"));
        }
        toml.push_str("]\n");
    }
    toml
}
