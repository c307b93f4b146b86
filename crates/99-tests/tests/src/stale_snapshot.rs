//! Handling messages straight from a listener registered at setup.

use std::sync::Arc;

use relay_mock::{RelayMock, TransitionLog};

use crate::support::{init_logging, messages, mount_stale};

#[test]
fn listener_sees_the_state_captured_at_setup() {
    init_logging();
    let relay = RelayMock::new();
    let log = TransitionLog::new();
    let mut scheduler = mount_stale(&relay, &log);
    assert_eq!(scheduler.checkpoints(), 1);

    relay.send_message("Message 1");
    scheduler.flush().expect("flush");
    assert_eq!(scheduler.checkpoints(), 2);
    assert_eq!(log.len(), 1);
    let first = log.get(0).expect("first transition");
    assert_eq!(first.current, messages(&[]));
    assert_eq!(first.next, messages(&["Message 1"]));

    relay.send_message("Message 2");
    scheduler.flush().expect("flush");
    assert_eq!(scheduler.checkpoints(), 3);
    let second = log.get(1).expect("second transition");
    assert!(
        Arc::ptr_eq(&second.current, &first.current),
        "second message still reads the setup snapshot"
    );
    assert_eq!(second.next, messages(&["Message 2"]));
    assert_eq!(scheduler.state(), &messages(&["Message 2"]), "Message 1 was lost");
}

#[test]
fn messages_in_one_turn_overwrite_each_other() {
    let relay = RelayMock::new();
    let log = TransitionLog::new();
    let mut scheduler = mount_stale(&relay, &log);

    relay.send_message("Message 1");
    relay.send_message("Message 2");
    scheduler.flush().expect("flush");

    assert_eq!(scheduler.checkpoints(), 2);
    assert_eq!(log.len(), 2);
    assert!(log.snapshot().iter().all(|t| t.current.is_empty()));
    assert_eq!(scheduler.state(), &messages(&["Message 2"]));
    assert!(scheduler.consumer().snapshot().is_empty());
}
