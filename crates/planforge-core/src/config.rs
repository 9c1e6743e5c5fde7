//! Planner configuration and the session settings read during construction.
//!
//! Configuration is loaded once (TOML) and turned into immutable
//! `SessionVars`; constructors never read configuration directly.

use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid allow_batch_cop level {0} (expected 0, 1 or 2)")]
    InvalidBatchCopPolicy(u8),
}

///
/// BatchCopPolicy
///
/// Session-level batching policy for columnar reads.
/// Serialized as the integer level `0`, `1` or `2`.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BatchCopPolicy {
    /// Level 0: never upgrade to batched coprocessor requests.
    Never,
    /// Level 1: upgrade only chains that aggregate or compute a top-N.
    #[default]
    AggOrTopN,
    /// Level 2: always upgrade.
    Always,
}

impl BatchCopPolicy {
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Never => 0,
            Self::AggOrTopN => 1,
            Self::Always => 2,
        }
    }
}

impl TryFrom<u8> for BatchCopPolicy {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Never),
            1 => Ok(Self::AggOrTopN),
            2 => Ok(Self::Always),
            other => Err(ConfigError::InvalidBatchCopPolicy(other)),
        }
    }
}

impl From<BatchCopPolicy> for u8 {
    fn from(policy: BatchCopPolicy) -> Self {
        policy.level()
    }
}

impl fmt::Display for BatchCopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

///
/// SessionVars
///
/// Immutable session settings consulted by plan constructors.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SessionVars {
    pub allow_batch_cop: BatchCopPolicy,
}

impl SessionVars {
    #[must_use]
    pub const fn with_batch_cop(allow_batch_cop: BatchCopPolicy) -> Self {
        Self { allow_batch_cop }
    }
}

///
/// SessionConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Batching policy level for columnar reads (0, 1 or 2).
    pub allow_batch_cop: BatchCopPolicy,
}

///
/// PlannerConfig
///
/// Top-level planner configuration file.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub session: SessionConfig,
}

impl PlannerConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;

        Self::from_toml_str(&text)
    }

    /// Render configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    #[must_use]
    pub const fn session_vars(&self) -> SessionVars {
        SessionVars {
            allow_batch_cop: self.session.allow_batch_cop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = PlannerConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config.session_vars().allow_batch_cop, BatchCopPolicy::AggOrTopN);
    }

    #[test]
    fn batch_cop_level_parses_from_integer() {
        let config = PlannerConfig::from_toml_str("[session]\nallow_batch_cop = 2\n")
            .expect("level 2 should parse");

        assert_eq!(config.session.allow_batch_cop, BatchCopPolicy::Always);
    }

    #[test]
    fn out_of_range_batch_cop_level_is_rejected() {
        let err = PlannerConfig::from_toml_str("[session]\nallow_batch_cop = 3\n")
            .expect_err("level 3 is not a policy");

        assert!(err.to_string().contains("allow_batch_cop"));
    }

    #[test]
    fn config_renders_back_to_toml() {
        let config = PlannerConfig {
            session: SessionConfig {
                allow_batch_cop: BatchCopPolicy::Never,
            },
        };
        let text = config.to_toml().expect("config should render");
        let parsed = PlannerConfig::from_toml_str(&text).expect("rendered config should parse");

        assert_eq!(parsed, config);
        assert!(text.contains("allow_batch_cop = 0"));
    }
}
