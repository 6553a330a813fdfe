// crates/hypro-bench-config/src/config.rs
// ============================================================================
// Module: HyPro Bench Configuration
// Description: Configuration loading and validation for benchmark runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: hypro-bench-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The instance table is an ordered list of `[[groups]]`, each holding a
//! bit-width and an ordered list of instances. An instance is either a bare
//! system path (using the suite formula) or a `{ system, formula }` table.
//!
//! ## Invariants
//! - Every string field is non-empty after trimming and within path limits.
//! - Bit-widths are unique; system paths are unique across the whole suite.
//! - `timeout_secs` lies in `1..=86400`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use hypro_bench_core::BenchPlan;
use hypro_bench_core::Instance;
use hypro_bench_core::InstanceGroup;
use hypro_bench_core::SuiteSpec;
use hypro_bench_core::ToolSpec;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "hypro-bench.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "HYPRO_BENCH_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default verification-mode flag passed to the tool.
pub const DEFAULT_VERIFICATION_FLAG: &str = "--bp";
/// Default per-instance timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;
/// Maximum per-instance timeout in seconds (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;
/// Maximum number of instance groups.
pub const MAX_GROUPS: usize = 256;
/// Maximum number of instances in one group.
pub const MAX_INSTANCES_PER_GROUP: usize = 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Benchmark run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Verification tool settings.
    pub tool: ToolConfig,
    /// Run-wide settings.
    pub run: RunConfig,
    /// Instance groups in report order.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    /// Audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl BenchConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        Self::from_bytes(&bytes)
    }

    /// Parses and validates configuration bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the payload is oversized, not UTF-8, not
    /// valid TOML, or fails validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tool.validate()?;
        self.run.validate()?;
        self.audit.validate()?;
        validate_groups(&self.groups)
    }

    /// Returns the per-instance timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.run.timeout_secs)
    }

    /// Converts the configuration into the driver's run plan.
    ///
    /// Bare instance paths inherit `run.formula`.
    #[must_use]
    pub fn to_plan(&self) -> BenchPlan {
        let groups = self
            .groups
            .iter()
            .map(|group| InstanceGroup {
                bitwidth: group.bitwidth,
                instances: group
                    .instances
                    .iter()
                    .map(|entry| {
                        Instance::new(
                            entry.system().trim(),
                            entry.formula().unwrap_or(&self.run.formula).trim(),
                        )
                    })
                    .collect(),
            })
            .collect();
        BenchPlan {
            tool: ToolSpec {
                binary: self.tool.binary.trim().to_string(),
                verification_flag: self.tool.verification_flag.trim().to_string(),
            },
            suite: SuiteSpec {
                groups,
            },
            timeout: self.timeout(),
        }
    }
}

/// Verification tool settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Path to the tool binary.
    pub binary: String,
    /// Verification-mode flag passed before the instance paths.
    #[serde(default = "default_verification_flag")]
    pub verification_flag: String,
}

impl ToolConfig {
    /// Validates tool settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("tool.binary", &self.binary)?;
        let flag = self.verification_flag.trim();
        if flag.is_empty() {
            return Err(ConfigError::Invalid("tool.verification_flag must be non-empty".to_string()));
        }
        if !flag.starts_with('-') {
            return Err(ConfigError::Invalid(
                "tool.verification_flag must start with '-'".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run-wide settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Per-instance timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Formula path shared by instances that do not override it.
    pub formula: String,
}

impl RunConfig {
    /// Validates run settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "run.timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}"
            )));
        }
        validate_path_string("run.formula", &self.formula)
    }
}

/// One bit-width group of instances.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Bit-width label of the group.
    pub bitwidth: u32,
    /// Instances in report order.
    #[serde(default)]
    pub instances: Vec<InstanceConfig>,
}

/// Instance entry: a bare system path or a table with an optional formula.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InstanceConfig {
    /// System path using the suite formula.
    Path(String),
    /// System path with an optional formula override.
    Detailed(InstanceEntry),
}

impl InstanceConfig {
    /// Returns the system-description path.
    #[must_use]
    pub fn system(&self) -> &str {
        match self {
            Self::Path(system) => system,
            Self::Detailed(entry) => &entry.system,
        }
    }

    /// Returns the formula override, if any.
    #[must_use]
    pub fn formula(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Detailed(entry) => entry.formula.as_deref(),
        }
    }
}

/// Table form of an instance entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceEntry {
    /// System-description path.
    pub system: String,
    /// Formula override for this instance.
    #[serde(default)]
    pub formula: Option<String>,
}

/// Audit log settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enables JSON-lines audit records.
    #[serde(default)]
    pub enabled: bool,
    /// Audit log file; stderr when omitted.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default verification flag for serde.
fn default_verification_flag() -> String {
    DEFAULT_VERIFICATION_FLAG.to_string()
}

/// Default timeout for serde.
const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Validates the instance table.
fn validate_groups(groups: &[GroupConfig]) -> Result<(), ConfigError> {
    if groups.is_empty() {
        return Err(ConfigError::Invalid("groups must be non-empty".to_string()));
    }
    if groups.len() > MAX_GROUPS {
        return Err(ConfigError::Invalid(format!("groups exceeds max of {MAX_GROUPS}")));
    }
    let mut bitwidths = BTreeSet::new();
    let mut systems = BTreeSet::new();
    for group in groups {
        if !bitwidths.insert(group.bitwidth) {
            return Err(ConfigError::Invalid(format!(
                "groups.bitwidth {} is declared more than once",
                group.bitwidth
            )));
        }
        if group.instances.len() > MAX_INSTANCES_PER_GROUP {
            return Err(ConfigError::Invalid(format!(
                "groups.instances for bitwidth {} exceeds max of {MAX_INSTANCES_PER_GROUP}",
                group.bitwidth
            )));
        }
        for entry in &group.instances {
            validate_path_string("groups.instances.system", entry.system())?;
            if let Some(formula) = entry.formula() {
                validate_path_string("groups.instances.formula", formula)?;
            }
            if !systems.insert(entry.system().trim()) {
                return Err(ConfigError::Invalid(format!(
                    "groups.instances.system {} is declared more than once",
                    entry.system().trim()
                )));
            }
        }
    }
    Ok(())
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
