/// Latch-style indicators describing how the last flushes went.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HostHealth {
    /// Checkpoints run by the most recent flush.
    pub last_flush: usize,
    /// Longest flush observed since mount.
    pub longest_flush: usize,
    /// Set when a flush hit the checkpoint limit. Cleared by the next flush
    /// that settles on its own.
    pub runaway: bool,
    /// External state writes applied since mount.
    pub external_writes: u64,
}

impl HostHealth {
    pub(crate) fn record_flush(&mut self, ran: usize) {
        self.last_flush = ran;
        self.longest_flush = self.longest_flush.max(ran);
        self.runaway = false;
    }

    pub(crate) fn record_runaway(&mut self, ran: usize) {
        self.last_flush = ran;
        self.longest_flush = self.longest_flush.max(ran);
        self.runaway = true;
    }
}
