//! Whole backlog per checkpoint through a batch-mode bridge.

use event_bridge::Batch;
use relay_mock::{RelayMock, TransitionLog};

use crate::support::{messages, mount_bridged};

#[test]
fn messages_in_one_turn_arrive_as_one_batch() {
    let relay = RelayMock::new();
    let log = TransitionLog::new();
    let mut scheduler = mount_bridged::<Batch>(&relay, &log);
    assert_eq!(scheduler.checkpoints(), 1);

    relay.send_message("Message 1");
    relay.send_message("Message 2");
    assert_eq!(scheduler.flush().expect("flush"), 2);

    assert_eq!(scheduler.checkpoints(), 3);
    assert_eq!(log.len(), 1);
    let only = log.get(0).expect("one transition");
    assert_eq!(only.current, messages(&[]));
    assert_eq!(only.next, messages(&["Message 1", "Message 2"]));
    assert_eq!(scheduler.consumer().bridge().stats().handler_calls, 1);
}

#[test]
fn separate_turns_give_separate_batches() {
    let relay = RelayMock::new();
    let log = TransitionLog::new();
    let mut scheduler = mount_bridged::<Batch>(&relay, &log);

    relay.send_message("a");
    scheduler.flush().expect("flush");
    relay.send_message("b");
    relay.send_message("c");
    scheduler.flush().expect("flush");

    assert_eq!(scheduler.checkpoints(), 5);
    let transitions = log.snapshot();
    assert_eq!(transitions.len(), 2);
    assert_eq!(transitions[1].current, messages(&["a"]));
    assert_eq!(scheduler.state(), &messages(&["a", "b", "c"]));
}
