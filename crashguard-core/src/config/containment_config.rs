//! Top-level containment configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, PolicyError};
use crate::failure::FailureKind;
use crate::policy::SelectionPolicy;

/// Selection rules: which namespaces are in scope.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PolicyConfig {
    /// Namespace prefixes whose methods and constructors are wrapped.
    pub include: Vec<String>,
    /// Namespace prefixes carved out of the include set.
    pub exclude: Vec<String>,
}

/// The enabled classification catch-set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatchConfig {
    /// Failure kinds the guard suppresses. `None` means the compiled default:
    /// `["none-unwrap"]`, and nothing else. Widening this list suppresses
    /// real programmer errors; review it like production code.
    pub enabled: Option<Vec<FailureKind>>,
}

/// Terminal (uncaught-failure) handler settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TerminalConfig {
    /// Whether the host should install the uncaught-failure sink at startup.
    pub report_uncaught: Option<bool>,
}

/// Top-level configuration aggregating all sections.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CRASHGUARD_*`)
/// 2. Project config (`crashguard.toml` in the project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContainmentConfig {
    pub policy: PolicyConfig,
    pub catch: CatchConfig,
    pub terminal: TerminalConfig,
}

impl ContainmentConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_path = root.join("crashguard.toml");
        if project_path.exists() {
            Self::merge_toml_file(&mut config, &project_path)?;
        }

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// The effective catch-set after applying the compiled default.
    pub fn effective_catch_set(&self) -> Vec<FailureKind> {
        self.catch
            .enabled
            .clone()
            .unwrap_or_else(|| vec![FailureKind::NoneUnwrap])
    }

    /// Whether the uncaught-failure sink should be installed.
    pub fn effective_report_uncaught(&self) -> bool {
        self.terminal.report_uncaught.unwrap_or(true)
    }

    /// Convert the resolved configuration into an immutable selection policy.
    pub fn into_policy(self) -> Result<SelectionPolicy, PolicyError> {
        let catch_set = self.effective_catch_set();
        SelectionPolicy::new(self.policy.include, self.policy.exclude, catch_set)
    }

    /// Validate the configuration values.
    pub fn validate(config: &ContainmentConfig) -> Result<(), ConfigError> {
        if let Some(ref enabled) = config.catch.enabled {
            if enabled.contains(&FailureKind::Uncaught) {
                return Err(ConfigError::ValidationFailed {
                    field: "catch.enabled".to_string(),
                    message: "\"uncaught\" is reserved for the terminal handler".to_string(),
                });
            }
        }
        for prefix in config.policy.include.iter().chain(config.policy.exclude.iter()) {
            if prefix.is_empty() || prefix.split('.').any(str::is_empty) {
                return Err(ConfigError::ValidationFailed {
                    field: "policy".to_string(),
                    message: format!("malformed namespace prefix {prefix:?}"),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ContainmentConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: ContainmentConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` actually sets them.
    fn merge(base: &mut ContainmentConfig, other: &ContainmentConfig) {
        if !other.policy.include.is_empty() {
            base.policy.include = other.policy.include.clone();
        }
        if !other.policy.exclude.is_empty() {
            base.policy.exclude = other.policy.exclude.clone();
        }
        if other.catch.enabled.is_some() {
            base.catch.enabled = other.catch.enabled.clone();
        }
        if other.terminal.report_uncaught.is_some() {
            base.terminal.report_uncaught = other.terminal.report_uncaught;
        }
    }

    /// Apply environment variable overrides.
    /// List-valued variables are comma-separated; unparsable entries are
    /// skipped.
    fn apply_env_overrides(config: &mut ContainmentConfig) {
        if let Ok(val) = std::env::var("CRASHGUARD_POLICY_INCLUDE") {
            config.policy.include = split_list(&val);
        }
        if let Ok(val) = std::env::var("CRASHGUARD_POLICY_EXCLUDE") {
            config.policy.exclude = split_list(&val);
        }
        if let Ok(val) = std::env::var("CRASHGUARD_CATCH_ENABLED") {
            let kinds: Vec<FailureKind> = split_list(&val)
                .iter()
                .filter_map(|s| FailureKind::from_str(s).ok())
                .collect();
            config.catch.enabled = Some(kinds);
        }
        if let Ok(val) = std::env::var("CRASHGUARD_TERMINAL_REPORT_UNCAUGHT") {
            if let Ok(v) = val.parse::<bool>() {
                config.terminal.report_uncaught = Some(v);
            }
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
