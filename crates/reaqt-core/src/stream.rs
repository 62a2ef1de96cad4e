#![forbid(unsafe_code)]

//! Multicast streams that remember their last pushed value.
//!
//! # Design
//!
//! Both stream kinds share one interior (`Rc<RefCell<..>>`) holding the
//! current value and the ordered observer list. Cloning a stream handle
//! shares that interior, exactly like cloning an `Rc`.
//!
//! - [`Stream<T>`] is cold: it records the current value but never replays it.
//!   It may start empty (`current_value() == None`).
//! - [`BehaviorStream<T>`] is hot: it always holds a value and replays it to
//!   every new subscriber inside `subscribe`.
//! - [`StateStream<T>`] is either of the two, chosen at construction.
//!
//! # Invariants
//!
//! 1. After `on_next(v)`, `current_value()` equals `v`.
//! 2. Observers are called in subscription order.
//! 3. No interior borrow is held while an observer runs, so observers may
//!    subscribe, dispose, read, or push re-entrantly.
//! 4. A disposed observer is skipped even if disposal happens mid-round.
//!
//! # Failure Modes
//!
//! - **Panicking observer**: the panic is caught, delivery continues with
//!   the remaining observers, and the first panic is resumed once the round
//!   is complete.
//! - **Unsuppressed feedback cycle**: a stream that is (indirectly) subscribed
//!   to itself recurses until the stack is exhausted. Nothing here detects
//!   it; binding controllers break such cycles by suppressing the consumer.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::config::ErrorPolicy;
use crate::observer::{Observer, StreamError, report_error};
use crate::subscribable::Subscribable;
use crate::subscription::Subscription;

struct Entry<T> {
    id: u64,
    observer: Rc<dyn Observer<T>>,
    active: Rc<Cell<bool>>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            observer: Rc::clone(&self.observer),
            active: Rc::clone(&self.active),
        }
    }
}

struct SubjectCore<T> {
    current: Option<T>,
    entries: Vec<Entry<T>>,
    next_id: u64,
    policy: ErrorPolicy,
}

/// Shared interior of both stream kinds.
struct Subject<T> {
    inner: Rc<RefCell<SubjectCore<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Subject<T> {
    fn new(current: Option<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SubjectCore {
                current,
                entries: Vec::new(),
                next_id: 0,
                policy: ErrorPolicy::global(),
            })),
        }
    }

    fn set_policy(&self, policy: ErrorPolicy) {
        self.inner.borrow_mut().policy = policy;
    }

    fn policy(&self) -> ErrorPolicy {
        self.inner.borrow().policy
    }

    fn current(&self) -> Option<T> {
        self.inner.borrow().current.clone()
    }

    fn with_current<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.borrow().current.as_ref())
    }

    fn subscriber_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    fn attach(&self, observer: Rc<dyn Observer<T>>) -> Subscription {
        let active = Rc::new(Cell::new(true));
        let id = {
            let mut core = self.inner.borrow_mut();
            let id = core.next_id;
            core.next_id += 1;
            core.entries.push(Entry {
                id,
                observer,
                active: Rc::clone(&active),
            });
            id
        };

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(active, move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|entry| entry.id != id);
            }
        })
    }

    fn push(&self, value: &T) {
        let entries = {
            let mut core = self.inner.borrow_mut();
            core.current = Some(value.clone());
            core.entries.clone()
        };
        tracing::trace!(subscribers = entries.len(), "stream push");
        deliver(&entries, |observer| observer.on_next(value));
    }

    fn fail(&self, error: &StreamError) {
        report_error(error);
        let entries = {
            let core = self.inner.borrow();
            match core.policy {
                ErrorPolicy::Report => return,
                ErrorPolicy::Forward => core.entries.clone(),
            }
        };
        deliver(&entries, |observer| observer.on_error(error));
    }

    fn complete(&self) {
        tracing::trace!("stream completion ignored");
    }
}

/// Call every still-active observer, isolating panics.
fn deliver<T>(entries: &[Entry<T>], call: impl Fn(&dyn Observer<T>)) {
    let mut first_panic: Option<Box<dyn Any + Send>> = None;
    for entry in entries {
        if !entry.active.get() {
            continue;
        }
        let observer = &*entry.observer;
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| call(observer))) {
            tracing::warn!(subscriber = entry.id, "observer panicked during delivery");
            if first_panic.is_none() {
                first_panic = Some(payload);
            }
        }
    }
    if let Some(payload) = first_panic {
        panic::resume_unwind(payload);
    }
}

// ---------------------------------------------------------------------------
// Cold stream
// ---------------------------------------------------------------------------

/// A cold multicast stream that remembers the last pushed value.
///
/// Late subscribers only see pushes that happen after they subscribed; the
/// current value is available through [`current_value`](Self::current_value).
pub struct Stream<T> {
    subject: Subject<T>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.subject.inner.borrow();
        f.debug_struct("Stream")
            .field("current", &core.current)
            .field("subscriber_count", &core.entries.len())
            .finish()
    }
}

impl<T: Clone + 'static> Default for Stream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Create an empty stream. `current_value()` is `None` until the first push.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subject: Subject::new(None),
        }
    }

    /// Create a cold stream whose current value starts at `value`.
    /// The value is still not replayed to subscribers.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        Self {
            subject: Subject::new(Some(value)),
        }
    }

    /// Override the error policy for this stream.
    #[must_use]
    pub fn with_policy(self, policy: ErrorPolicy) -> Self {
        self.subject.set_policy(policy);
        self
    }

    /// The error policy in effect.
    #[must_use]
    pub fn policy(&self) -> ErrorPolicy {
        self.subject.policy()
    }

    /// The last pushed value, or `None` if nothing was pushed yet.
    #[must_use]
    pub fn current_value(&self) -> Option<T> {
        self.subject.current()
    }

    /// Whether a value has been pushed (or seeded).
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.with_current(|v| v.is_some())
    }

    /// Access the current value by reference without cloning.
    pub fn with_current<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        self.subject.with_current(f)
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }
}

impl<T: Clone + 'static> Observer<T> for Stream<T> {
    fn on_next(&self, value: &T) {
        self.subject.push(value);
    }

    fn on_completed(&self) {
        self.subject.complete();
    }

    fn on_error(&self, error: &StreamError) {
        self.subject.fail(error);
    }
}

impl<T: Clone + 'static> Subscribable<T> for Stream<T> {
    fn subscribe_rc(&self, observer: Rc<dyn Observer<T>>) -> Subscription {
        self.subject.attach(observer)
    }
}

// ---------------------------------------------------------------------------
// Hot stream
// ---------------------------------------------------------------------------

/// A hot stream: always holds a value and replays it on subscribe.
///
/// The replay happens synchronously inside `subscribe`, so a subscriber sees
/// the current value before any later push.
pub struct BehaviorStream<T> {
    subject: Subject<T>,
}

impl<T> Clone for BehaviorStream<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BehaviorStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.subject.inner.borrow();
        f.debug_struct("BehaviorStream")
            .field("current", &core.current)
            .field("subscriber_count", &core.entries.len())
            .finish()
    }
}

impl<T: Clone + 'static> BehaviorStream<T> {
    /// Create a hot stream holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            subject: Subject::new(Some(initial)),
        }
    }

    /// Override the error policy for this stream.
    #[must_use]
    pub fn with_policy(self, policy: ErrorPolicy) -> Self {
        self.subject.set_policy(policy);
        self
    }

    /// The error policy in effect.
    #[must_use]
    pub fn policy(&self) -> ErrorPolicy {
        self.subject.policy()
    }

    /// The latest value.
    #[must_use]
    pub fn current_value(&self) -> T {
        self.with_current(T::clone)
    }

    /// Access the latest value by reference without cloning.
    pub fn with_current<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.subject.with_current(|current| match current {
            Some(value) => f(value),
            None => unreachable!("behavior stream constructed without a value"),
        })
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }
}

impl<T: Clone + 'static> Observer<T> for BehaviorStream<T> {
    fn on_next(&self, value: &T) {
        self.subject.push(value);
    }

    fn on_completed(&self) {
        self.subject.complete();
    }

    fn on_error(&self, error: &StreamError) {
        self.subject.fail(error);
    }
}

impl<T: Clone + 'static> Subscribable<T> for BehaviorStream<T> {
    fn subscribe_rc(&self, observer: Rc<dyn Observer<T>>) -> Subscription {
        let subscription = self.subject.attach(Rc::clone(&observer));
        if let Some(current) = self.subject.current()
            && let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| observer.on_next(&current)))
        {
            // The caller never sees the handle, so nobody else could dispose it.
            subscription.dispose();
            panic::resume_unwind(payload);
        }
        subscription
    }
}

// ---------------------------------------------------------------------------
// Either kind
// ---------------------------------------------------------------------------

/// A stream whose kind was picked at construction: cold when it starts
/// empty, hot when it starts with a value.
pub enum StateStream<T> {
    /// Starts empty, never replays.
    Cold(Stream<T>),
    /// Holds a value, replays it on subscribe.
    Hot(BehaviorStream<T>),
}

impl<T> Clone for StateStream<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Cold(stream) => Self::Cold(stream.clone()),
            Self::Hot(stream) => Self::Hot(stream.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cold(stream) => stream.fmt(f),
            Self::Hot(stream) => stream.fmt(f),
        }
    }
}

impl<T: Clone + 'static> StateStream<T> {
    /// Cold when `initial` is `None`, hot otherwise.
    #[must_use]
    pub fn from_initial(initial: Option<T>) -> Self {
        match initial {
            Some(value) => Self::Hot(BehaviorStream::new(value)),
            None => Self::Cold(Stream::new()),
        }
    }

    /// Whether this stream replays on subscribe.
    #[must_use]
    pub fn is_hot(&self) -> bool {
        matches!(self, Self::Hot(_))
    }

    /// The last pushed value, or `None` for a cold stream that is still empty.
    #[must_use]
    pub fn current_value(&self) -> Option<T> {
        match self {
            Self::Cold(stream) => stream.current_value(),
            Self::Hot(stream) => Some(stream.current_value()),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        match self {
            Self::Cold(stream) => stream.subscriber_count(),
            Self::Hot(stream) => stream.subscriber_count(),
        }
    }
}

impl<T: Clone + 'static> Observer<T> for StateStream<T> {
    fn on_next(&self, value: &T) {
        match self {
            Self::Cold(stream) => stream.on_next(value),
            Self::Hot(stream) => stream.on_next(value),
        }
    }

    fn on_completed(&self) {
        match self {
            Self::Cold(stream) => stream.on_completed(),
            Self::Hot(stream) => stream.on_completed(),
        }
    }

    fn on_error(&self, error: &StreamError) {
        match self {
            Self::Cold(stream) => stream.on_error(error),
            Self::Hot(stream) => stream.on_error(error),
        }
    }
}

impl<T: Clone + 'static> Subscribable<T> for StateStream<T> {
    fn subscribe_rc(&self, observer: Rc<dyn Observer<T>>) -> Subscription {
        match self {
            Self::Cold(stream) => stream.subscribe_rc(observer),
            Self::Hot(stream) => stream.subscribe_rc(observer),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Observer<T>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = Rc::clone(&log);
        (log, move |v: &T| log_clone.borrow_mut().push(v.clone()))
    }

    #[test]
    fn cold_stream_starts_empty() {
        let stream = Stream::<i32>::new();
        assert_eq!(stream.current_value(), None);
        assert!(!stream.has_value());

        stream.on_next(&5);
        assert_eq!(stream.current_value(), Some(5));
        assert!(stream.has_value());
    }

    #[test]
    fn cold_stream_does_not_replay() {
        let stream = Stream::with_value(1);
        let (log, obs) = recorder::<i32>();
        let _sub = stream.subscribe(obs);
        assert!(log.borrow().is_empty());

        stream.on_next(&2);
        assert_eq!(*log.borrow(), vec![2]);
    }

    #[test]
    fn behavior_stream_replays_once_then_live() {
        let stream = BehaviorStream::new(10);
        stream.on_next(&11);

        let (log, obs) = recorder::<i32>();
        let _sub = stream.subscribe(obs);
        assert_eq!(*log.borrow(), vec![11]);

        stream.on_next(&12);
        assert_eq!(*log.borrow(), vec![11, 12]);
        assert_eq!(stream.current_value(), 12);
    }

    #[test]
    fn delivery_in_subscription_order() {
        let stream = Stream::<u8>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ['A', 'B', 'C'] {
            let log = Rc::clone(&log);
            let _ = stream.subscribe(move |_: &u8| log.borrow_mut().push(tag));
        }
        stream.on_next(&0);
        assert_eq!(*log.borrow(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn dispose_stops_delivery() {
        let stream = Stream::<i32>::new();
        let (log, obs) = recorder::<i32>();
        let sub = stream.subscribe(obs);

        stream.on_next(&1);
        sub.dispose();
        stream.on_next(&2);

        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(stream.subscriber_count(), 0);
    }

    #[test]
    fn dispose_during_round_skips_disposed_observer() {
        let stream = Stream::<i32>::new();
        let late: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let late_clone = Rc::clone(&late);
        let _first = stream.subscribe(move |_: &i32| {
            if let Some(sub) = late_clone.borrow().as_ref() {
                sub.dispose();
            }
        });
        let (log, obs) = recorder::<i32>();
        *late.borrow_mut() = Some(stream.subscribe(obs));

        stream.on_next(&1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn streams_chain() {
        let upstream = Stream::<&'static str>::new();
        let downstream = Stream::<&'static str>::new();
        let _link = upstream.subscribe(downstream.clone());

        let (log, obs) = recorder::<&'static str>();
        let _sub = downstream.subscribe(obs);

        upstream.on_next(&"hi");
        assert_eq!(downstream.current_value(), Some("hi"));
        assert_eq!(*log.borrow(), vec!["hi"]);
    }

    #[test]
    fn reentrant_push_from_observer() {
        let stream = Stream::<i32>::new();
        let echo = stream.clone();
        let _sub = stream.subscribe(move |v: &i32| {
            if *v < 3 {
                echo.on_next(&(v + 1));
            }
        });
        stream.on_next(&0);
        assert_eq!(stream.current_value(), Some(3));
    }

    #[test]
    fn panicking_replay_leaves_no_subscriber() {
        let stream = BehaviorStream::new(5);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            stream.subscribe(|v: &i32| {
                if *v == 5 {
                    panic!("replay rejected");
                }
            })
        }));
        assert!(result.is_err());
        assert_eq!(stream.subscriber_count(), 0);

        let (log, obs) = recorder::<i32>();
        let _sub = stream.subscribe(obs);
        stream.on_next(&6);
        assert_eq!(*log.borrow(), vec![5, 6]);
    }

    #[test]
    fn panicking_observer_does_not_block_others() {
        let stream = Stream::<i32>::new();
        let _bad = stream.subscribe(|v: &i32| {
            if *v == 1 {
                panic!("bad observer");
            }
        });
        let (log, obs) = recorder::<i32>();
        let _good = stream.subscribe(obs);

        let result = panic::catch_unwind(AssertUnwindSafe(|| stream.on_next(&1)));
        assert!(result.is_err());
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(stream.current_value(), Some(1));

        stream.on_next(&2);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    struct ErrorCounter(Rc<Cell<u32>>);

    impl Observer<i32> for ErrorCounter {
        fn on_next(&self, _value: &i32) {}

        fn on_error(&self, _error: &StreamError) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn report_policy_keeps_errors_local() {
        let stream = Stream::<i32>::new().with_policy(ErrorPolicy::Report);
        let errors = Rc::new(Cell::new(0));
        let _sub = stream.subscribe(ErrorCounter(Rc::clone(&errors)));

        stream.on_error(&StreamError::new("boom"));
        assert_eq!(errors.get(), 0);

        // Still live after an error.
        stream.on_next(&4);
        assert_eq!(stream.current_value(), Some(4));
    }

    #[test]
    fn forward_policy_reaches_subscribers() {
        let stream = BehaviorStream::new(0).with_policy(ErrorPolicy::Forward);
        let errors = Rc::new(Cell::new(0));
        let _sub = stream.subscribe(ErrorCounter(Rc::clone(&errors)));

        stream.on_error(&StreamError::new("boom"));
        assert_eq!(errors.get(), 1);
        assert_eq!(stream.policy(), ErrorPolicy::Forward);
    }

    #[test]
    fn completion_is_a_no_op() {
        let stream = Stream::<i32>::new();
        let (log, obs) = recorder::<i32>();
        let _sub = stream.subscribe(obs);
        stream.on_completed();
        stream.on_next(&9);
        assert_eq!(*log.borrow(), vec![9]);
    }

    #[test]
    fn state_stream_kind_follows_initial() {
        let cold = StateStream::<i32>::from_initial(None);
        assert!(!cold.is_hot());
        assert_eq!(cold.current_value(), None);

        let hot = StateStream::from_initial(Some(3));
        assert!(hot.is_hot());
        let (log, obs) = recorder::<i32>();
        let _sub = hot.subscribe(obs);
        assert_eq!(*log.borrow(), vec![3]);

        cold.on_next(&8);
        assert_eq!(cold.current_value(), Some(8));
    }

    #[test]
    fn debug_format() {
        let stream = Stream::with_value(42);
        let dbg = format!("{stream:?}");
        assert!(dbg.contains("Stream"));
        assert!(dbg.contains("42"));
        assert!(dbg.contains("subscriber_count"));
    }
}
