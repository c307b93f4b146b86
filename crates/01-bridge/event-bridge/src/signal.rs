//! Dirty signal: forces the host to schedule a checkpoint.
//!
//! Queue mutations are invisible to whatever change detection the host runs
//! over its own state, so every registration bumps a generation token and asks
//! the host for a checkpoint through a [`CheckpointRequester`]. Requests are
//! latched: while one is outstanding, further signals only bump the generation.
//! The latch is released when the next checkpoint acknowledges it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Host-side hook invoked when the bridge needs a new checkpoint.
///
/// Implementations must be non-blocking; they are called from whatever thread
/// registered the event.
pub trait CheckpointRequester: Send + Sync {
    fn request_checkpoint(&self);
}

impl<F> CheckpointRequester for F
where
    F: Fn() + Send + Sync,
{
    fn request_checkpoint(&self) {
        self()
    }
}

/// Requester that drops every request. Useful when the caller drives
/// checkpoints itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl CheckpointRequester for Detached {
    fn request_checkpoint(&self) {}
}

/// Outcome of firing the signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalOutcome {
    /// No request was outstanding; the host was asked for a checkpoint.
    Requested,
    /// A request was already outstanding and absorbed this one.
    Coalesced,
}

/// Generation token plus an outstanding-request latch.
pub struct DirtySignal {
    generation: AtomicU64,
    outstanding: AtomicBool,
    requests: AtomicU64,
    coalesced: AtomicU64,
    requester: Arc<dyn CheckpointRequester>,
}

impl DirtySignal {
    pub fn new(requester: Arc<dyn CheckpointRequester>) -> Self {
        Self {
            generation: AtomicU64::new(0),
            outstanding: AtomicBool::new(false),
            requests: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            requester,
        }
    }

    /// Signal whose requests go nowhere.
    pub fn detached() -> Self {
        Self::new(Arc::new(Detached))
    }

    /// Bumps the generation and requests a checkpoint unless one is already
    /// outstanding.
    pub fn fire(&self) -> SignalOutcome {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.request()
    }

    /// Requests a checkpoint for work already queued, without bumping the
    /// generation. Coalesces with an outstanding request like [`fire`].
    ///
    /// [`fire`]: DirtySignal::fire
    pub fn rearm(&self) -> SignalOutcome {
        self.request()
    }

    fn request(&self) -> SignalOutcome {
        if self.outstanding.swap(true, Ordering::AcqRel) {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
            return SignalOutcome::Coalesced;
        }
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.requester.request_checkpoint();
        SignalOutcome::Requested
    }

    /// Releases the latch. Called at the start of each checkpoint's drain so
    /// that signals fired from then on request a fresh checkpoint.
    pub fn acknowledge(&self) -> bool {
        self.outstanding.swap(false, Ordering::AcqRel)
    }

    /// Monotonic count of signals fired.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn is_outstanding(&self) -> bool {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Number of checkpoint requests forwarded to the host.
    pub fn requests_issued(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Number of signals absorbed by an outstanding request.
    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for DirtySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirtySignal")
            .field("generation", &self.generation())
            .field("outstanding", &self.is_outstanding())
            .field("requests", &self.requests_issued())
            .finish_non_exhaustive()
    }
}
