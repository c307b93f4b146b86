//! Producer on another thread; the scheduler waits for wakes.

use std::thread;
use std::time::{Duration, Instant};

use event_bridge::Single;
use relay_mock::{RelayMock, TransitionLog};

use crate::support::{init_logging, mount_bridged};

#[test]
fn messages_from_another_thread_arrive_in_order() {
    init_logging();
    let relay = RelayMock::new();
    let log = TransitionLog::new();
    let mut scheduler = mount_bridged::<Single>(&relay, &log);

    let producer = {
        let relay = relay.clone();
        thread::spawn(move || {
            for i in 0..20 {
                relay.send_message(&format!("m{i}"));
            }
        })
    };

    let deadline = Instant::now() + Duration::from_secs(5);
    while scheduler.state().len() < 20 && Instant::now() < deadline {
        scheduler
            .wait_and_flush(Duration::from_millis(50))
            .expect("flush");
    }
    producer.join().expect("producer");
    scheduler.flush().expect("flush");

    let expected: Vec<String> = (0..20).map(|i| format!("m{i}")).collect();
    assert_eq!(scheduler.state().as_slice(), expected.as_slice());
    assert_eq!(log.len(), 20);
    assert_eq!(scheduler.consumer().bridge().pending(), 0);
}
