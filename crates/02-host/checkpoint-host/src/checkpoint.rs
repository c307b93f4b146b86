//! Per-checkpoint view handed to consumers.

/// Work performed by the host on every checkpoint.
///
/// Consumers that own an [`event_bridge::EventBridge`] call its drain
/// operation from here, unconditionally, so the bridge's handler sees the
/// state committed for this checkpoint.
pub trait Consumer<S> {
    fn on_checkpoint(&mut self, cx: &mut Checkpoint<'_, S>);
}

impl<S, F> Consumer<S> for F
where
    F: FnMut(&mut Checkpoint<'_, S>),
{
    fn on_checkpoint(&mut self, cx: &mut Checkpoint<'_, S>) {
        self(cx)
    }
}

/// Committed state for the running checkpoint plus any staged update.
///
/// Staged updates are committed when the checkpoint returns, and only if they
/// differ from the committed state.
pub struct Checkpoint<'a, S> {
    committed: &'a S,
    staged: Option<S>,
    index: u64,
}

impl<'a, S> Checkpoint<'a, S> {
    pub(crate) fn new(committed: &'a S, index: u64) -> Self {
        Self {
            committed,
            staged: None,
            index,
        }
    }

    /// State committed before this checkpoint started.
    pub fn state(&self) -> &S {
        self.committed
    }

    /// Staged state if any, otherwise the committed state.
    pub fn latest(&self) -> &S {
        self.staged.as_ref().unwrap_or(self.committed)
    }

    /// 1-based sequence number of this checkpoint.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Replaces any staged state with `next`.
    pub fn set_state(&mut self, next: S) {
        self.staged = Some(next);
    }

    /// Stages `f(latest)`.
    pub fn update(&mut self, f: impl FnOnce(&S) -> S) {
        let next = f(self.latest());
        self.staged = Some(next);
    }

    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    pub(crate) fn into_staged(self) -> Option<S> {
        self.staged
    }
}
