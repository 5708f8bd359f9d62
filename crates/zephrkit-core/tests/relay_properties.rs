//! Property tests for relay bus delivery guarantees.
//!
//! Checks, over arbitrary operation sequences, that every subscriber
//! receives exactly the events published during its registration window (in
//! publish order), prefixed by the replay of the latest event at the time
//! it joined.

use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use zephrkit_core::relay::{RelayBus, SubscriptionId};

#[derive(Debug, Clone)]
enum Op {
    Subscribe,
    Unsubscribe(usize),
    Publish(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Subscribe),
        1 => (0usize..8).prop_map(Op::Unsubscribe),
        4 => (0u32..1000).prop_map(Op::Publish),
    ]
}

struct TrackedSubscriber {
    id: SubscriptionId,
    actual: Arc<Mutex<Vec<u32>>>,
    expected: Vec<u32>,
    live: bool,
}

proptest! {
    #[test]
    fn subscribers_receive_exactly_their_window(
        ops in proptest::collection::vec(op_strategy(), 0..48)
    ) {
        let bus: RelayBus<u32> = RelayBus::new();
        let mut subs: Vec<TrackedSubscriber> = Vec::new();
        let mut latest: Option<u32> = None;

        for op in ops {
            match op {
                Op::Subscribe => {
                    let actual = Arc::new(Mutex::new(Vec::new()));
                    let sink = actual.clone();
                    let id = bus.subscribe(move |v| sink.lock().unwrap().push(v));
                    // A joiner first sees the replay of the latest event
                    let expected = latest.into_iter().collect();
                    subs.push(TrackedSubscriber { id, actual, expected, live: true });
                }
                Op::Unsubscribe(i) => {
                    if !subs.is_empty() {
                        let i = i % subs.len();
                        if subs[i].live {
                            prop_assert!(bus.unsubscribe(subs[i].id));
                            subs[i].live = false;
                        } else {
                            // Removing twice is a no-op
                            prop_assert!(!bus.unsubscribe(subs[i].id));
                        }
                    }
                }
                Op::Publish(v) => {
                    latest = Some(v);
                    let live_count = subs.iter().filter(|s| s.live).count();
                    prop_assert_eq!(bus.publish(v), live_count);
                    for sub in subs.iter_mut().filter(|s| s.live) {
                        sub.expected.push(v);
                    }
                }
            }
        }

        prop_assert_eq!(bus.latest(), latest);
        for sub in subs {
            let actual = sub.actual.lock().unwrap().clone();
            prop_assert_eq!(actual, sub.expected);
        }
    }
}
