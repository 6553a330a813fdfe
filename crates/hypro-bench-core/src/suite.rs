// crates/hypro-bench-core/src/suite.rs
// ============================================================================
// Module: Benchmark Suite Model
// Description: Instances, bit-width groups, and the tool invocation contract.
// Purpose: Describe what the driver runs, independent of how it was configured.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`SuiteSpec`] is an ordered list of [`InstanceGroup`]s, each labelled by
//! the bit-width of the modelled system. A [`ToolSpec`] turns one [`Instance`]
//! into the argument vector handed to the runner.
//!
//! ## Invariants
//! - Group and instance ordering is declaration order and is preserved in
//!   every report.
//! - Every instance carries a resolved formula path; suite-wide defaults are
//!   applied before a `SuiteSpec` is built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One (system description, formula) pair submitted to the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    /// Path to the system-description file; identifies the instance.
    pub system: String,
    /// Path to the formula file checked against the system.
    pub formula: String,
}

impl Instance {
    /// Creates an instance from a system path and formula path.
    pub fn new(system: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            formula: formula.into(),
        }
    }
}

/// Instances sharing one bit-width label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceGroup {
    /// Bit-width of the modelled system.
    pub bitwidth: u32,
    /// Instances in declaration order.
    pub instances: Vec<Instance>,
}

/// Ordered set of instance groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteSpec {
    /// Groups in declaration order.
    pub groups: Vec<InstanceGroup>,
}

impl SuiteSpec {
    /// Returns the total number of instances across all groups.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(|group| group.instances.len()).sum()
    }
}

/// Command-line contract of the verification tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    /// Path to the tool binary.
    pub binary: String,
    /// Flag selecting the verification mode (for example `--bp`).
    pub verification_flag: String,
}

impl ToolSpec {
    /// Builds `<binary> <flag> <system> <formula>` for one instance.
    #[must_use]
    pub fn command_for(&self, instance: &Instance) -> Vec<String> {
        vec![
            self.binary.clone(),
            self.verification_flag.clone(),
            instance.system.clone(),
            instance.formula.clone(),
        ]
    }
}

/// Everything the driver needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchPlan {
    /// Tool invocation contract.
    pub tool: ToolSpec,
    /// Instance table.
    pub suite: SuiteSpec,
    /// Per-instance timeout.
    pub timeout: Duration,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::Instance;
    use super::InstanceGroup;
    use super::SuiteSpec;
    use super::ToolSpec;

    #[test]
    fn command_for_orders_flag_before_paths() {
        let tool = ToolSpec {
            binary: "../app/HyPro".to_string(),
            verification_flag: "--bp".to_string(),
        };
        let instance = Instance::new("gni/p1_1bit.txt", "gni/gni.txt");
        assert_eq!(
            tool.command_for(&instance),
            vec!["../app/HyPro", "--bp", "gni/p1_1bit.txt", "gni/gni.txt"]
        );
    }

    #[test]
    fn instance_count_sums_groups() {
        let suite = SuiteSpec {
            groups: vec![
                InstanceGroup {
                    bitwidth: 1,
                    instances: vec![Instance::new("a", "f"), Instance::new("b", "f")],
                },
                InstanceGroup {
                    bitwidth: 2,
                    instances: vec![Instance::new("c", "f")],
                },
            ],
        };
        assert_eq!(suite.instance_count(), 3);
    }
}
