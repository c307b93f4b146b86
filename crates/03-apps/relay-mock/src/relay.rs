use std::sync::Arc;

use log::trace;
use parking_lot::Mutex;

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// In-process relay that fans messages out to subscribed listeners.
///
/// Listeners run synchronously on the sending thread, in subscription order.
/// The listener list is snapshotted before delivery, so a listener may
/// subscribe further listeners without deadlocking; those only see later
/// messages.
#[derive(Clone, Default)]
pub struct RelayMock {
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl RelayMock {
    /// Creates a relay with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `listener` to every subsequent message.
    pub fn on_message<F>(&self, listener: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.listeners.lock().push(Arc::new(listener));
    }

    /// Delivers `message` to every listener. Returns how many were called.
    pub fn send_message(&self, message: &str) -> usize {
        let listeners: Vec<Listener> = self.listeners.lock().clone();
        for listener in &listeners {
            listener(message);
        }
        trace!("relayed {message:?} to {} listener(s)", listeners.len());
        listeners.len()
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}
