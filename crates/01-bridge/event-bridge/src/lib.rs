//! Bridge between event producers that live outside a cooperative scheduler
//! and the checkpoints that scheduler runs.
//!
//! * [`EventQueue`] – unbounded FIFO of pending payloads.
//! * [`DirtySignal`] – generation token that asks the host for a checkpoint,
//!   coalescing repeated requests until the next drain acknowledges them.
//! * [`EventBridge`] – owns both; exposes `register_event` to producers and
//!   `process_next` / `process_next_batch` to the per-checkpoint consumer.
//! * [`Registrar`] – cloneable, thread-safe producer handle.
//!
//! A handler bound once at setup would close over stale state. Deferring the
//! handling to the drain call, which the consumer makes inside every
//! checkpoint, means each handler runs against the state that checkpoint
//! committed.

mod bridge;
mod config;
mod error;
mod mode;
mod queue;
pub mod signal;

pub use bridge::{BridgeState, BridgeStats, EventBridge, Registrar};
pub use config::BridgeConfig;
pub use error::{ConfigError, ConfigResult};
pub use mode::{Batch, DrainKind, DrainMode, Single};
pub use queue::{Backlog, EventQueue};
pub use signal::{CheckpointRequester, Detached, DirtySignal, SignalOutcome};
