use event_bridge::{ConfigError, ConfigResult};
use serde::Deserialize;

const DEFAULT_MAX_CHECKPOINTS_PER_FLUSH: usize = 50;

/// Scheduler limits.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Upper bound on checkpoints run by one `flush` before it gives up.
    pub max_checkpoints_per_flush: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_checkpoints_per_flush: DEFAULT_MAX_CHECKPOINTS_PER_FLUSH,
        }
    }
}

impl HostConfig {
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_checkpoints_per_flush == 0 {
            return Err(ConfigError::Invalid(
                "max_checkpoints_per_flush must be at least 1",
            ));
        }
        Ok(())
    }
}
