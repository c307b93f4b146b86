use event_bridge::ConfigError;
use thiserror::Error;

pub type HostResult<T> = Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A flush kept committing new state past the configured limit, which
    /// usually means a consumer updates state on every checkpoint.
    #[error("flush exceeded {limit} checkpoints without settling")]
    CheckpointLimit { limit: usize },
}
