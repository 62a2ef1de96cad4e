//! Property-based invariant tests for streams.
//!
//! 1. `current_value` equals the last pushed value (cold and hot).
//! 2. Every live subscriber sees every push, in push order.
//! 3. A hot stream replays exactly its current value once, first.
//! 4. A cold stream never replays; an empty one stays empty until pushed.
//! 5. Disposed subscribers see nothing after disposal.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use reaqt_core::{BehaviorStream, Observer, Stream, Subscribable};

fn log<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Observer<T>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = Rc::clone(&log);
    (log, move |v: &T| log_clone.borrow_mut().push(v.clone()))
}

proptest! {
    #[test]
    fn cold_current_value_is_last_push(values in proptest::collection::vec(any::<i64>(), 0..50)) {
        let stream = Stream::<i64>::new();
        for v in &values {
            stream.on_next(v);
        }
        prop_assert_eq!(stream.current_value(), values.last().copied());
    }

    #[test]
    fn hot_current_value_is_last_push(
        initial in any::<i64>(),
        values in proptest::collection::vec(any::<i64>(), 0..50),
    ) {
        let stream = BehaviorStream::new(initial);
        for v in &values {
            stream.on_next(v);
        }
        prop_assert_eq!(stream.current_value(), values.last().copied().unwrap_or(initial));
    }

    #[test]
    fn every_subscriber_sees_every_push(
        subscribers in 1usize..6,
        values in proptest::collection::vec(any::<i32>(), 0..30),
    ) {
        let stream = Stream::<i32>::new();
        let logs: Vec<_> = (0..subscribers)
            .map(|_| {
                let (log, obs) = log::<i32>();
                let _ = stream.subscribe(obs);
                log
            })
            .collect();

        for v in &values {
            stream.on_next(v);
        }
        for log in logs {
            prop_assert_eq!(&*log.borrow(), &values);
        }
    }

    #[test]
    fn hot_replay_comes_first_and_once(
        before in proptest::collection::vec(any::<i32>(), 0..10),
        after in proptest::collection::vec(any::<i32>(), 0..10),
    ) {
        let stream = BehaviorStream::new(-1);
        for v in &before {
            stream.on_next(v);
        }
        let current = stream.current_value();
        let (log, obs) = log::<i32>();
        let _sub = stream.subscribe(obs);
        for v in &after {
            stream.on_next(v);
        }

        let mut expected = vec![current];
        expected.extend(after.iter().copied());
        prop_assert_eq!(&*log.borrow(), &expected);
    }

    #[test]
    fn cold_never_replays(
        before in proptest::collection::vec(any::<i32>(), 0..10),
        after in proptest::collection::vec(any::<i32>(), 0..10),
    ) {
        let stream = Stream::<i32>::new();
        for v in &before {
            stream.on_next(v);
        }
        let (log, obs) = log::<i32>();
        let _sub = stream.subscribe(obs);
        for v in &after {
            stream.on_next(v);
        }
        prop_assert_eq!(&*log.borrow(), &after);
    }

    #[test]
    fn disposed_subscriber_sees_prefix_only(
        values in proptest::collection::vec(any::<i32>(), 0..30),
        cut in 0usize..30,
    ) {
        let cut = cut.min(values.len());
        let stream = Stream::<i32>::new();
        let (log, obs) = log::<i32>();
        let sub = stream.subscribe(obs);

        for (i, v) in values.iter().enumerate() {
            if i == cut {
                sub.dispose();
            }
            stream.on_next(v);
        }
        if cut == values.len() {
            sub.dispose();
        }
        prop_assert_eq!(&*log.borrow(), &values[..cut].to_vec());
        prop_assert_eq!(stream.subscriber_count(), 0);
    }
}

#[test]
fn empty_cold_stream_stays_empty_until_first_push() {
    let stream = Stream::<i32>::new();
    let (log, obs) = log::<i32>();
    let _sub = stream.subscribe(obs);
    assert_eq!(stream.current_value(), None);
    assert!(log.borrow().is_empty());

    stream.on_next(&1);
    assert_eq!(stream.current_value(), Some(1));
    assert_eq!(*log.borrow(), vec![1]);
}
