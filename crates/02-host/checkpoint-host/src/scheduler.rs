use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver};
use event_bridge::CheckpointRequester;
use log::{debug, trace};

use crate::checkpoint::{Checkpoint, Consumer};
use crate::config::HostConfig;
use crate::error::{HostError, HostResult};
use crate::health::HostHealth;
use crate::state::{apply_writes, StateHandle, StateWrite};
use crate::wake::{CheckpointWaker, WakeChannel};

/// Handles available to the consumer while it is being built.
pub struct Setup<'a, S> {
    initial: &'a S,
    waker: &'a CheckpointWaker,
    state: &'a StateHandle<S>,
}

impl<S> Setup<'_, S> {
    /// State the scheduler is mounted with. Anything that keeps a copy of it
    /// past setup is holding a snapshot that will go stale.
    pub fn initial_state(&self) -> &S {
        self.initial
    }

    pub fn waker(&self) -> CheckpointWaker {
        self.waker.clone()
    }

    /// Waker as a type-erased requester, ready to hand to an event bridge.
    pub fn requester(&self) -> Arc<dyn CheckpointRequester> {
        Arc::new(self.waker.clone())
    }

    pub fn state_handle(&self) -> StateHandle<S> {
        self.state.clone()
    }
}

/// Cooperative, single-threaded checkpoint scheduler.
///
/// Owns the committed state `S` and a consumer `C`. A checkpoint applies
/// queued external writes, runs the consumer against the committed state and
/// commits whatever the consumer staged if it differs from what is already
/// committed. A commit makes the scheduler dirty, so `flush` keeps running
/// checkpoints until nothing is staged and no wake is pending.
pub struct Scheduler<S, C> {
    state: S,
    consumer: C,
    wake: WakeChannel,
    writes: Receiver<StateWrite<S>>,
    handle: StateHandle<S>,
    config: HostConfig,
    checkpoints: u64,
    dirty: bool,
    health: HostHealth,
}

impl<S, C> Scheduler<S, C>
where
    S: PartialEq,
    C: Consumer<S>,
{
    /// Builds the consumer through `setup`, runs the first checkpoint and
    /// flushes any follow-up work.
    pub fn mount<F>(state: S, config: HostConfig, setup: F) -> HostResult<Self>
    where
        F: FnOnce(&Setup<'_, S>) -> C,
    {
        config.validate()?;
        let wake = WakeChannel::new();
        let waker = wake.waker();
        let (tx, writes) = unbounded();
        let handle = StateHandle::new(tx, waker.clone());
        let consumer = setup(&Setup {
            initial: &state,
            waker: &waker,
            state: &handle,
        });

        let mut scheduler = Self {
            state,
            consumer,
            wake,
            writes,
            handle,
            config,
            checkpoints: 0,
            dirty: true,
            health: HostHealth::default(),
        };
        scheduler.flush()?;
        debug!("scheduler mounted after {} checkpoint(s)", scheduler.checkpoints);
        Ok(scheduler)
    }

    /// Runs checkpoints until the scheduler settles. Returns how many ran.
    pub fn flush(&mut self) -> HostResult<usize> {
        let limit = self.config.max_checkpoints_per_flush;
        let mut ran = 0;
        loop {
            let woken = self.wake.take();
            if !woken && !self.dirty {
                break;
            }
            if ran == limit {
                self.dirty = true;
                self.health.record_runaway(ran);
                return Err(HostError::CheckpointLimit { limit });
            }
            self.dirty = self.run_checkpoint();
            ran += 1;
        }
        self.health.record_flush(ran);
        if ran > 0 {
            debug!("flush settled after {ran} checkpoint(s)");
        }
        Ok(ran)
    }

    /// Blocks up to `timeout` for a wake, then flushes. Returns 0 on timeout.
    pub fn wait_and_flush(&mut self, timeout: Duration) -> HostResult<usize> {
        if !self.dirty && !self.wake.wait(timeout) {
            return Ok(0);
        }
        // The wait consumed the token; make sure the flush still runs.
        self.dirty = true;
        self.flush()
    }

    fn run_checkpoint(&mut self) -> bool {
        let external = apply_writes(&self.writes, &mut self.state);
        self.health.external_writes += external as u64;
        self.checkpoints += 1;
        let index = self.checkpoints;
        trace!("checkpoint {index} start (external writes={external})");

        let mut cx = Checkpoint::new(&self.state, index);
        self.consumer.on_checkpoint(&mut cx);
        match cx.into_staged() {
            Some(next) if next != self.state => {
                self.state = next;
                debug!("checkpoint {index} committed new state");
                true
            }
            _ => false,
        }
    }
}

impl<S, C> Scheduler<S, C> {
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn consumer_mut(&mut self) -> &mut C {
        &mut self.consumer
    }

    /// Total checkpoints run since mount, the first one included.
    pub fn checkpoints(&self) -> u64 {
        self.checkpoints
    }

    /// True when a wake is waiting or the last checkpoint committed state.
    pub fn needs_flush(&self) -> bool {
        self.dirty || self.wake.is_pending()
    }

    pub fn health(&self) -> HostHealth {
        self.health
    }

    pub fn waker(&self) -> CheckpointWaker {
        self.wake.waker()
    }

    pub fn state_handle(&self) -> StateHandle<S> {
        self.handle.clone()
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }
}

/// Builder for mounting a [`Scheduler`].
pub struct SchedulerBuilder<S> {
    state: Option<S>,
    config: HostConfig,
}

impl<S> SchedulerBuilder<S> {
    pub fn new() -> Self {
        Self {
            state: None,
            config: HostConfig::default(),
        }
    }

    pub fn state(mut self, state: S) -> Self {
        self.state = Some(state);
        self
    }

    pub fn config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses the configuration from TOML text.
    pub fn config_toml(mut self, text: &str) -> Result<Self> {
        self.config = HostConfig::from_toml_str(text)?;
        Ok(self)
    }

    /// Mounts the scheduler, returning an error if no initial state was set.
    pub fn mount<C, F>(self, setup: F) -> Result<Scheduler<S, C>>
    where
        S: PartialEq,
        C: Consumer<S>,
        F: FnOnce(&Setup<'_, S>) -> C,
    {
        let state = self
            .state
            .ok_or_else(|| anyhow!("missing initial state"))?;
        Ok(Scheduler::mount(state, self.config, setup)?)
    }
}

impl<S> Default for SchedulerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
