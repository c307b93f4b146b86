//! State writes issued from outside the scheduler's turn.

use crossbeam_channel::{Receiver, Sender};
use log::trace;

use crate::wake::CheckpointWaker;

pub(crate) enum StateWrite<S> {
    Replace(S),
    Update(Box<dyn FnOnce(&S) -> S + Send>),
}

impl<S> StateWrite<S> {
    pub(crate) fn apply(self, current: &S) -> S {
        match self {
            StateWrite::Replace(next) => next,
            StateWrite::Update(f) => f(current),
        }
    }
}

/// Setter for scheduler-owned state, usable from any thread.
///
/// Writes are queued and applied in order at the start of the next
/// checkpoint. `set` replaces the state with a value computed by the caller,
/// which may be stale by the time it lands; `update` receives the state as it
/// stands when the write is applied.
pub struct StateHandle<S> {
    tx: Sender<StateWrite<S>>,
    waker: CheckpointWaker,
}

impl<S> Clone for StateHandle<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            waker: self.waker.clone(),
        }
    }
}

impl<S> StateHandle<S> {
    pub(crate) fn new(tx: Sender<StateWrite<S>>, waker: CheckpointWaker) -> Self {
        Self { tx, waker }
    }

    pub fn set(&self, next: S) {
        self.send(StateWrite::Replace(next));
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&S) -> S + Send + 'static,
    {
        self.send(StateWrite::Update(Box::new(f)));
    }

    fn send(&self, write: StateWrite<S>) {
        if self.tx.send(write).is_err() {
            trace!("state write dropped: scheduler is gone");
            return;
        }
        self.waker.wake();
    }
}

/// Applies every queued write over `state`. Returns how many were applied.
pub(crate) fn apply_writes<S>(rx: &Receiver<StateWrite<S>>, state: &mut S) -> usize {
    let mut applied = 0;
    for write in rx.try_iter() {
        *state = write.apply(state);
        applied += 1;
    }
    applied
}
