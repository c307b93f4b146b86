//! Wake channel used by producers to request a checkpoint.
//!
//! The channel holds at most one token. A full channel means a checkpoint is
//! already requested, so repeated wakes collapse into one.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use event_bridge::CheckpointRequester;
use log::trace;

/// Host side of the wake channel.
pub struct WakeChannel {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl WakeChannel {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { tx, rx }
    }

    pub fn waker(&self) -> CheckpointWaker {
        CheckpointWaker {
            tx: self.tx.clone(),
        }
    }

    /// Consumes a pending wake token without blocking.
    pub fn take(&self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Blocks up to `timeout` for a wake token.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.rx.recv_timeout(timeout).is_ok()
    }

    pub fn is_pending(&self) -> bool {
        !self.rx.is_empty()
    }
}

impl Default for WakeChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable, thread-safe handle that asks the host for a checkpoint.
#[derive(Clone, Debug)]
pub struct CheckpointWaker {
    tx: Sender<()>,
}

impl CheckpointWaker {
    /// Returns `true` when this call queued a new wake token.
    pub fn wake(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => false,
            Err(TrySendError::Disconnected(())) => {
                trace!("wake dropped: scheduler is gone");
                false
            }
        }
    }
}

impl CheckpointRequester for CheckpointWaker {
    fn request_checkpoint(&self) {
        self.wake();
    }
}
