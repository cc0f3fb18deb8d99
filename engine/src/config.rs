//! Engine configuration.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Behavior toggles for detection and patch building.
///
/// Defaults mirror production behavior: automatic patches stay on the
/// low-risk allow-list, and beneficiary diffing stays off until the
/// external projection actually supplies beneficiary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Restrict automatically built patches to low-risk change kinds
    /// (asset/guardian add and modify). Removals and beneficiary changes
    /// are then summary-only.
    pub safe_mode: bool,

    /// Diff beneficiaries against external state. Off by default: today's
    /// providers always supply an empty beneficiary list, so drift is
    /// structurally undetectable. Capability flag, not a policy choice.
    pub supports_beneficiary_diff: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            safe_mode: true,
            supports_beneficiary_diff: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}
