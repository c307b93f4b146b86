use std::sync::Arc;

use checkpoint_host::{Checkpoint, Consumer, Setup};
use event_bridge::{Batch, BridgeConfig, DrainMode, EventBridge, Single};
use log::debug;
use parking_lot::Mutex;

use crate::relay::RelayMock;

/// Scheduler state for the message logs: the messages received so far.
///
/// Held behind an `Arc` so a transition's `next` and the state committed from
/// it are the same allocation.
pub type Messages = Arc<Vec<String>>;

/// One state change proposed by a message handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateTransition {
    /// State the handler read.
    pub current: Messages,
    /// State the handler asked to commit.
    pub next: Messages,
}

/// Shared, append-only record of [`StateTransition`]s.
#[derive(Clone, Debug, Default)]
pub struct TransitionLog {
    entries: Arc<Mutex<Vec<StateTransition>>>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, current: Messages, next: Messages) {
        self.entries.lock().push(StateTransition { current, next });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<StateTransition> {
        self.entries.lock().get(index).cloned()
    }

    pub fn snapshot(&self) -> Vec<StateTransition> {
        self.entries.lock().clone()
    }
}

fn appended<I>(current: &Messages, messages: I) -> Messages
where
    I: IntoIterator<Item = String>,
{
    let mut next = Vec::clone(current);
    next.extend(messages);
    Arc::new(next)
}

/// Message log that handles relay messages directly in the listener it
/// subscribed at setup.
///
/// The listener closes over the state as it was at setup, so every message is
/// appended to that snapshot rather than to the latest state. Later messages
/// overwrite earlier ones.
pub struct StaleMessageLog {
    snapshot: Messages,
}

impl StaleMessageLog {
    pub fn subscribe(setup: &Setup<'_, Messages>, relay: &RelayMock, log: TransitionLog) -> Self {
        let snapshot = Arc::clone(setup.initial_state());
        let handle = setup.state_handle();
        let captured = Arc::clone(&snapshot);
        relay.on_message(move |message| {
            let next = appended(&captured, [message.to_owned()]);
            log.record(Arc::clone(&captured), Arc::clone(&next));
            handle.set(next);
        });
        Self { snapshot }
    }

    /// State captured by the listener at setup.
    pub fn snapshot(&self) -> &Messages {
        &self.snapshot
    }
}

impl Consumer<Messages> for StaleMessageLog {
    fn on_checkpoint(&mut self, _cx: &mut Checkpoint<'_, Messages>) {}
}

/// Message log that routes relay messages through an [`EventBridge`] and
/// appends them to the committed state at the next checkpoint.
pub struct BridgedMessageLog<M: DrainMode> {
    bridge: EventBridge<String, M>,
    log: TransitionLog,
}

impl<M: DrainMode> BridgedMessageLog<M> {
    pub fn subscribe(setup: &Setup<'_, Messages>, relay: &RelayMock, log: TransitionLog) -> Self {
        Self::subscribe_with_config(setup, relay, log, &BridgeConfig::default())
    }

    pub fn subscribe_with_config(
        setup: &Setup<'_, Messages>,
        relay: &RelayMock,
        log: TransitionLog,
        config: &BridgeConfig,
    ) -> Self {
        let bridge = EventBridge::with_config(setup.requester(), config);
        let registrar = bridge.registrar();
        relay.on_message(move |message| registrar.register_event(message.to_owned()));
        debug!("message log subscribed in {} mode", M::KIND.as_str());
        Self { bridge, log }
    }

    pub fn bridge(&self) -> &EventBridge<String, M> {
        &self.bridge
    }
}

impl Consumer<Messages> for BridgedMessageLog<Single> {
    fn on_checkpoint(&mut self, cx: &mut Checkpoint<'_, Messages>) {
        let log = &self.log;
        self.bridge.process_next(|message| {
            let current = Arc::clone(cx.state());
            let next = appended(&current, [message]);
            log.record(current, Arc::clone(&next));
            cx.set_state(next);
        });
    }
}

impl Consumer<Messages> for BridgedMessageLog<Batch> {
    fn on_checkpoint(&mut self, cx: &mut Checkpoint<'_, Messages>) {
        let log = &self.log;
        self.bridge.process_next_batch(|messages| {
            let current = Arc::clone(cx.state());
            let next = appended(&current, messages);
            log.record(current, Arc::clone(&next));
            cx.set_state(next);
        });
    }
}
