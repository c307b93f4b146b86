//! Ordered buffer of payloads waiting for the next drain.

use smallvec::SmallVec;
use std::collections::VecDeque;

/// Payloads handed to a batch handler in registration order.
pub type Backlog<T> = SmallVec<[T; 8]>;

/// Unbounded FIFO of pending payloads.
///
/// The queue never reorders and never deduplicates: every push is a distinct
/// element, and every pop removes exactly what it returns.
#[derive(Debug)]
pub struct EventQueue<T> {
    inner: VecDeque<T>,
    high_water: usize,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty queue with room for `capacity` payloads before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: VecDeque::with_capacity(capacity),
            high_water: 0,
        }
    }

    /// Appends `item` at the tail and returns the new length.
    pub fn push(&mut self, item: T) -> usize {
        self.inner.push_back(item);
        let len = self.inner.len();
        if len > self.high_water {
            self.high_water = len;
        }
        len
    }

    /// Removes the head, if any.
    pub fn pop_front(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    /// Removes the whole backlog as one ordered batch, leaving the queue empty.
    pub fn take_all(&mut self) -> Backlog<T> {
        self.inner.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Largest length the queue has reached since creation.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}
