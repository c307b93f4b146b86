use std::sync::Arc;

use checkpoint_host::{HostConfig, Scheduler};
use event_bridge::DrainMode;
use relay_mock::{BridgedMessageLog, Messages, RelayMock, StaleMessageLog, TransitionLog};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn messages(items: &[&str]) -> Messages {
    Arc::new(items.iter().map(|s| s.to_string()).collect())
}

pub fn mount_stale(
    relay: &RelayMock,
    log: &TransitionLog,
) -> Scheduler<Messages, StaleMessageLog> {
    Scheduler::mount(messages(&[]), HostConfig::default(), |setup| {
        StaleMessageLog::subscribe(setup, relay, log.clone())
    })
    .expect("mount stale log")
}

pub fn mount_bridged<M: DrainMode>(
    relay: &RelayMock,
    log: &TransitionLog,
) -> Scheduler<Messages, BridgedMessageLog<M>>
where
    BridgedMessageLog<M>: checkpoint_host::Consumer<Messages>,
{
    Scheduler::mount(messages(&[]), HostConfig::default(), |setup| {
        BridgedMessageLog::subscribe(setup, relay, log.clone())
    })
    .expect("mount bridged log")
}
