//! Cooperative checkpoint scheduler used to host event bridges.
//!
//! The scheduler owns a state value and runs *checkpoints*: points where it
//! hands the committed state to its consumer, collects a staged update and
//! commits it. Producers outside the scheduler's turn ask for a checkpoint
//! through a [`CheckpointWaker`]; the waker implements
//! [`event_bridge::CheckpointRequester`], so it plugs straight into a bridge's
//! dirty signal.

mod checkpoint;
mod config;
mod error;
mod health;
mod scheduler;
mod state;
mod wake;

pub use checkpoint::{Checkpoint, Consumer};
pub use config::HostConfig;
pub use error::{HostError, HostResult};
pub use health::HostHealth;
pub use scheduler::{Scheduler, SchedulerBuilder, Setup};
pub use state::StateHandle;
pub use wake::{CheckpointWaker, WakeChannel};
