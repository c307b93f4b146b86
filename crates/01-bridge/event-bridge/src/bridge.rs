//! Composition root tying the queue, the dirty signal and the drain protocol
//! together.
//!
//! Producers call [`Registrar::register_event`] (or
//! [`EventBridge::register_event`]) from wherever their events arrive. The
//! consumer calls the mode's drain operation once per checkpoint, inside the
//! scope where the host hands it the latest committed state, so handlers never
//! act on a snapshot captured at setup.
//!
//! Draining is a caller obligation: a bridge that is never drained grows its
//! backlog without bound. The bridge does not drop payloads to compensate; it
//! logs a warning once the backlog crosses
//! [`BridgeConfig::backlog_warn_threshold`].

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{trace, warn};
use parking_lot::Mutex;

use crate::config::BridgeConfig;
use crate::mode::{Batch, DrainKind, DrainMode, Single};
use crate::queue::{Backlog, EventQueue};
use crate::signal::{CheckpointRequester, DirtySignal};

/// Whether the bridge has anything to drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeState {
    /// Queue empty.
    Idle,
    /// At least one payload waiting.
    Pending,
}

/// Point-in-time counters for a bridge instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Payloads accepted by `register_event`.
    pub registered: u64,
    /// Payloads handed to handlers.
    pub drained: u64,
    /// Drain operations invoked, including no-op calls on an empty queue.
    pub drain_calls: u64,
    /// Handler invocations.
    pub handler_calls: u64,
    /// Checkpoint requests forwarded to the host.
    pub checkpoint_requests: u64,
    /// Signals absorbed by an already outstanding request.
    pub coalesced_signals: u64,
    /// Times the backlog crossed the warning threshold.
    pub backlog_warnings: u64,
    /// Longest backlog observed.
    pub high_water: usize,
}

struct Slot<T> {
    queue: EventQueue<T>,
    over_threshold: bool,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    signal: DirtySignal,
    warn_threshold: Option<usize>,
    registered: AtomicU64,
    drained: AtomicU64,
    drain_calls: AtomicU64,
    handler_calls: AtomicU64,
    backlog_warnings: AtomicU64,
}

impl<T> Shared<T> {
    fn new(requester: Arc<dyn CheckpointRequester>, config: &BridgeConfig) -> Self {
        Self {
            slot: Mutex::new(Slot {
                queue: EventQueue::with_capacity(config.initial_capacity),
                over_threshold: false,
            }),
            signal: DirtySignal::new(requester),
            warn_threshold: config.backlog_warn_threshold,
            registered: AtomicU64::new(0),
            drained: AtomicU64::new(0),
            drain_calls: AtomicU64::new(0),
            handler_calls: AtomicU64::new(0),
            backlog_warnings: AtomicU64::new(0),
        }
    }

    fn register(&self, payload: T) {
        let pending = {
            let mut slot = self.slot.lock();
            let pending = slot.queue.push(payload);
            if let Some(threshold) = self.warn_threshold {
                if pending >= threshold && !slot.over_threshold {
                    slot.over_threshold = true;
                    self.backlog_warnings.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "event backlog reached {pending} (threshold {threshold}); \
                         is the drain operation being called every checkpoint?"
                    );
                }
            }
            pending
        };
        self.registered.fetch_add(1, Ordering::Relaxed);
        // Fire after the push so a checkpoint triggered by this signal always
        // observes the payload.
        let outcome = self.signal.fire();
        trace!("event registered: pending={pending} signal={outcome:?}");
    }

    /// Checkpoint-scoped prologue shared by both drain modes.
    fn begin_drain(&self) {
        self.drain_calls.fetch_add(1, Ordering::Relaxed);
        self.signal.acknowledge();
    }

    /// Runs `f` under the queue lock. Returns its result and the backlog
    /// left behind.
    fn take<R>(&self, f: impl FnOnce(&mut EventQueue<T>) -> R) -> (R, usize) {
        let mut slot = self.slot.lock();
        let taken = f(&mut slot.queue);
        let remaining = slot.queue.len();
        if let Some(threshold) = self.warn_threshold {
            if slot.over_threshold && remaining < threshold {
                slot.over_threshold = false;
            }
        }
        (taken, remaining)
    }

    fn finish_drain(&self, kind: DrainKind, count: usize) {
        self.drained.fetch_add(count as u64, Ordering::Relaxed);
        self.handler_calls.fetch_add(1, Ordering::Relaxed);
        trace!("drained {count} event(s) in {} mode", kind.as_str());
    }

    fn pending(&self) -> usize {
        self.slot.lock().queue.len()
    }

    fn stats(&self) -> BridgeStats {
        BridgeStats {
            registered: self.registered.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            drain_calls: self.drain_calls.load(Ordering::Relaxed),
            handler_calls: self.handler_calls.load(Ordering::Relaxed),
            checkpoint_requests: self.signal.requests_issued(),
            coalesced_signals: self.signal.coalesced(),
            backlog_warnings: self.backlog_warnings.load(Ordering::Relaxed),
            high_water: self.slot.lock().queue.high_water(),
        }
    }
}

/// Event bridge drained in mode `M`.
///
/// The bridge is meant to be created once, at setup, and kept for the lifetime
/// of the consumer that drains it.
pub struct EventBridge<T, M: DrainMode = Single> {
    shared: Arc<Shared<T>>,
    _mode: PhantomData<M>,
}

impl<T, M: DrainMode> EventBridge<T, M> {
    /// Creates a bridge with the default configuration.
    pub fn new(requester: Arc<dyn CheckpointRequester>) -> Self {
        Self::with_config(requester, &BridgeConfig::default())
    }

    /// Creates a bridge with an explicit configuration.
    pub fn with_config(requester: Arc<dyn CheckpointRequester>, config: &BridgeConfig) -> Self {
        Self {
            shared: Arc::new(Shared::new(requester, config)),
            _mode: PhantomData,
        }
    }

    /// Creates a bridge whose checkpoint requests go nowhere; the caller drives
    /// checkpoints by hand.
    pub fn detached() -> Self {
        Self::new(Arc::new(crate::signal::Detached))
    }

    /// Returns a cloneable producer handle that can move to other threads.
    pub fn registrar(&self) -> Registrar<T> {
        Registrar {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Queues `payload` and requests a checkpoint.
    pub fn register_event(&self, payload: T) {
        self.shared.register(payload);
    }

    /// Number of payloads waiting. This is the drain dependency key: it changes
    /// on every registration and every successful drain.
    pub fn pending(&self) -> usize {
        self.shared.pending()
    }

    /// `Pending` while anything is queued, `Idle` otherwise.
    pub fn state(&self) -> BridgeState {
        if self.pending() == 0 {
            BridgeState::Idle
        } else {
            BridgeState::Pending
        }
    }

    /// Dirty-signal generation; bumps once per registration.
    pub fn generation(&self) -> u64 {
        self.shared.signal.generation()
    }

    /// True while a checkpoint request is waiting for the next drain call.
    pub fn checkpoint_requested(&self) -> bool {
        self.shared.signal.is_outstanding()
    }

    /// Drain mode this bridge was created in.
    pub fn mode(&self) -> DrainKind {
        M::KIND
    }

    /// Snapshot of the bridge counters.
    pub fn stats(&self) -> BridgeStats {
        self.shared.stats()
    }
}

impl<T> EventBridge<T, Single> {
    /// Creates a bridge that delivers one payload per checkpoint.
    pub fn single(requester: Arc<dyn CheckpointRequester>) -> Self {
        Self::new(requester)
    }

    /// Removes the oldest payload, if any, and hands it to `handler`.
    ///
    /// Must be called on every checkpoint. Returns the number of payloads
    /// delivered (0 or 1). The queue lock is released before `handler` runs,
    /// so the handler may register further events. When payloads remain
    /// after the pop, another checkpoint is requested for the next one.
    pub fn process_next<F>(&self, handler: F) -> usize
    where
        F: FnOnce(T),
    {
        self.shared.begin_drain();
        let (head, remaining) = self.shared.take(EventQueue::pop_front);
        let Some(head) = head else {
            return 0;
        };
        if remaining > 0 {
            let outcome = self.shared.signal.rearm();
            trace!("{remaining} event(s) left after drain: signal={outcome:?}");
        }
        handler(head);
        self.shared.finish_drain(DrainKind::Single, 1);
        1
    }
}

impl<T> EventBridge<T, Batch> {
    /// Creates a bridge that delivers the whole backlog per checkpoint.
    pub fn batch(requester: Arc<dyn CheckpointRequester>) -> Self {
        Self::new(requester)
    }

    /// Takes the current backlog, if non-empty, and hands it to `handler` in
    /// one call.
    ///
    /// Must be called on every checkpoint. Payloads registered while `handler`
    /// runs are left for a later checkpoint.
    pub fn process_next_batch<F>(&self, handler: F) -> usize
    where
        F: FnOnce(Backlog<T>),
    {
        self.shared.begin_drain();
        let (backlog, _) = self.shared.take(EventQueue::take_all);
        let count = backlog.len();
        if count == 0 {
            return 0;
        }
        handler(backlog);
        self.shared.finish_drain(DrainKind::Batch, count);
        count
    }
}

impl<T, M: DrainMode> std::fmt::Debug for EventBridge<T, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridge")
            .field("mode", &M::KIND)
            .field("pending", &self.pending())
            .field("signal", &self.shared.signal)
            .finish()
    }
}

/// Producer-facing handle onto a bridge's queue.
///
/// Registration never blocks on the host scheduler and never fails.
pub struct Registrar<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Registrar<T> {
    /// Queues `payload` and requests a checkpoint.
    pub fn register_event(&self, payload: T) {
        self.shared.register(payload);
    }

    /// Number of payloads waiting in the bridge.
    pub fn pending(&self) -> usize {
        self.shared.pending()
    }
}

impl<T> Clone for Registrar<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for Registrar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrar")
            .field("pending", &self.pending())
            .finish()
    }
}
