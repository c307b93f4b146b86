use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use relay_mock::RelayMock;

#[test]
fn listeners_run_in_subscription_order() {
    let relay = RelayMock::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    for id in 0..3 {
        let seen = Arc::clone(&seen);
        relay.on_message(move |msg| seen.lock().push(format!("{id}:{msg}")));
    }

    assert_eq!(relay.send_message("a"), 3);
    assert_eq!(relay.send_message("b"), 3);
    assert_eq!(
        *seen.lock(),
        vec!["0:a", "1:a", "2:a", "0:b", "1:b", "2:b"]
    );
}

#[test]
fn sending_without_listeners_reaches_nobody() {
    let relay = RelayMock::new();
    assert_eq!(relay.send_message("lost"), 0);
    assert_eq!(relay.listener_count(), 0);
}

#[test]
fn listener_may_subscribe_during_delivery() {
    let relay = RelayMock::new();
    let late_calls = Arc::new(AtomicUsize::new(0));
    let inner = relay.clone();
    let counter = Arc::clone(&late_calls);
    relay.on_message(move |_| {
        let counter = Arc::clone(&counter);
        inner.on_message(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    });

    assert_eq!(relay.send_message("first"), 1);
    assert_eq!(late_calls.load(Ordering::SeqCst), 0, "new listener misses the current message");
    assert_eq!(relay.listener_count(), 2);

    relay.send_message("second");
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn relay_can_be_driven_from_other_threads() {
    let relay = RelayMock::new();
    let total = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&total);
    relay.on_message(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let producers: Vec<_> = (0..4)
        .map(|_| {
            let relay = relay.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    relay.send_message("tick");
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().expect("producer");
    }

    assert_eq!(total.load(Ordering::SeqCst), 100);
}
