use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

const DEFAULT_INITIAL_CAPACITY: usize = 16;
const DEFAULT_BACKLOG_WARN_THRESHOLD: usize = 1024;

/// Tuning knobs for a bridge instance.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Queue capacity reserved up front.
    pub initial_capacity: usize,
    /// Backlog length at which a warning is logged. The warning latches until
    /// the backlog falls back under the threshold. `None` disables it.
    pub backlog_warn_threshold: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            backlog_warn_threshold: Some(DEFAULT_BACKLOG_WARN_THRESHOLD),
        }
    }
}

impl BridgeConfig {
    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.backlog_warn_threshold == Some(0) {
            return Err(ConfigError::Invalid(
                "backlog_warn_threshold must be at least 1",
            ));
        }
        Ok(())
    }
}
