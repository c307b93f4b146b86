//! One message per checkpoint through a single-mode bridge.

use std::sync::Arc;

use event_bridge::{BridgeState, Single};
use relay_mock::{RelayMock, TransitionLog};

use crate::support::{init_logging, messages, mount_bridged};

#[test]
fn each_message_is_appended_to_fresh_state() {
    init_logging();
    let relay = RelayMock::new();
    let log = TransitionLog::new();
    let mut scheduler = mount_bridged::<Single>(&relay, &log);
    assert_eq!(scheduler.checkpoints(), 1);
    assert!(log.is_empty());

    relay.send_message("Message 1");
    scheduler.flush().expect("flush");
    assert_eq!(scheduler.checkpoints(), 3);
    let first = log.get(0).expect("first transition");
    assert_eq!(first.current, messages(&[]));
    assert_eq!(first.next, messages(&["Message 1"]));

    relay.send_message("Message 2");
    scheduler.flush().expect("flush");
    assert_eq!(scheduler.checkpoints(), 5);
    let second = log.get(1).expect("second transition");
    assert!(
        Arc::ptr_eq(&second.current, &first.next),
        "handler reads the state committed from the previous message"
    );
    assert_eq!(second.next, messages(&["Message 1", "Message 2"]));
    assert_eq!(scheduler.state(), &second.next);
}

#[test]
fn messages_in_one_turn_drain_one_per_checkpoint() {
    let relay = RelayMock::new();
    let log = TransitionLog::new();
    let mut scheduler = mount_bridged::<Single>(&relay, &log);

    relay.send_message("Message 1");
    relay.send_message("Message 2");
    assert_eq!(scheduler.consumer().bridge().state(), BridgeState::Pending);
    assert_eq!(scheduler.consumer().bridge().stats().checkpoint_requests, 1);

    assert_eq!(scheduler.flush().expect("flush"), 3);
    assert_eq!(scheduler.checkpoints(), 4);
    assert_eq!(log.len(), 2);
    assert_eq!(
        scheduler.state(),
        &messages(&["Message 1", "Message 2"])
    );
    assert_eq!(scheduler.consumer().bridge().state(), BridgeState::Idle);
}

#[test]
fn duplicate_messages_are_kept() {
    let relay = RelayMock::new();
    let log = TransitionLog::new();
    let mut scheduler = mount_bridged::<Single>(&relay, &log);

    relay.send_message("ping");
    relay.send_message("ping");
    scheduler.flush().expect("flush");

    assert_eq!(scheduler.state(), &messages(&["ping", "ping"]));
    assert_eq!(scheduler.consumer().bridge().stats().drained, 2);
}
