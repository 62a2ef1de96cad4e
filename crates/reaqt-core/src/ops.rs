#![forbid(unsafe_code)]

//! Derived streams.
//!
//! Each operator returns a [`Derived`] stream fed by subscriptions on its
//! sources. The derived stream owns those subscriptions: it stays attached
//! while a handle to it or a subscriber on it is alive, and detaches from
//! its sources when the last of them goes away. [`Derived::dispose`]
//! detaches it at once.
//!
//! Subscribing to a [`BehaviorStream`](crate::BehaviorStream) source replays
//! its value, so a derived stream built on hot sources may emit during
//! construction. Grab a subscription on the result before building if that
//! first value matters, or read `current_value()` afterwards.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::observer::{Observer, StreamError};
use crate::stream::Stream;
use crate::subscribable::Subscribable;
use crate::subscription::Subscription;

/// Subscriptions a derived stream holds on its sources.
struct Upstream {
    subscriptions: Vec<Subscription>,
    disposed: Cell<bool>,
}

impl Upstream {
    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        for subscription in &self.subscriptions {
            subscription.dispose();
        }
        tracing::trace!(sources = self.subscriptions.len(), "derived stream detached");
    }
}

impl Drop for Upstream {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Wraps a subscriber of a derived stream so the upstream outlives it.
struct Downstream<T> {
    observer: Rc<dyn Observer<T>>,
    _upstream: Rc<Upstream>,
}

impl<T> Observer<T> for Downstream<T> {
    fn on_next(&self, value: &T) {
        self.observer.on_next(value);
    }

    fn on_completed(&self) {
        self.observer.on_completed();
    }

    fn on_error(&self, error: &StreamError) {
        self.observer.on_error(error);
    }
}

/// The output of an operator: a cold stream plus its source subscriptions.
///
/// Clones share the same upstream.
pub struct Derived<T> {
    stream: Stream<T>,
    upstream: Rc<Upstream>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            stream: self.stream.clone(),
            upstream: Rc::clone(&self.upstream),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived")
            .field("stream", &self.stream)
            .field("disposed", &self.upstream.disposed.get())
            .finish()
    }
}

impl<T: Clone + 'static> Derived<T> {
    fn new(stream: Stream<T>, subscriptions: Vec<Subscription>) -> Self {
        Self {
            stream,
            upstream: Rc::new(Upstream {
                subscriptions,
                disposed: Cell::new(false),
            }),
        }
    }

    /// Last value emitted, if any.
    #[must_use]
    pub fn current_value(&self) -> Option<T> {
        self.stream.current_value()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.stream.subscriber_count()
    }

    /// Detach from every source. Subscribers stay attached but receive
    /// nothing further. Calling this more than once has no effect.
    pub fn dispose(&self) {
        self.upstream.dispose();
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.upstream.disposed.get()
    }
}

impl<T: Clone + 'static> Subscribable<T> for Derived<T> {
    fn subscribe_rc(&self, observer: Rc<dyn Observer<T>>) -> Subscription {
        self.stream.subscribe_rc(Rc::new(Downstream {
            observer,
            _upstream: Rc::clone(&self.upstream),
        }))
    }
}

/// Emit `f(v)` for every `v` pushed by `source`.
pub fn map<S, A, B>(source: &S, f: impl Fn(&A) -> B + 'static) -> Derived<B>
where
    S: Subscribable<A> + ?Sized,
    A: 'static,
    B: Clone + 'static,
{
    let out = Stream::new();
    let target = out.clone();
    let subscription = source.subscribe_rc(Rc::new(move |value: &A| target.on_next(&f(value))));
    Derived::new(out, vec![subscription])
}

/// Forward only the values for which `predicate` holds.
pub fn filter<S, A>(source: &S, predicate: impl Fn(&A) -> bool + 'static) -> Derived<A>
where
    S: Subscribable<A> + ?Sized,
    A: Clone + 'static,
{
    let out = Stream::new();
    let target = out.clone();
    let subscription = source.subscribe_rc(Rc::new(move |value: &A| {
        if predicate(value) {
            target.on_next(value);
        }
    }));
    Derived::new(out, vec![subscription])
}

/// Forward values from either source in arrival order.
pub fn merge<S1, S2, A>(a: &S1, b: &S2) -> Derived<A>
where
    S1: Subscribable<A> + ?Sized,
    S2: Subscribable<A> + ?Sized,
    A: Clone + 'static,
{
    let out = Stream::new();
    let from_a = a.subscribe_rc(Rc::new(out.clone()));
    let from_b = b.subscribe_rc(Rc::new(out.clone()));
    Derived::new(out, vec![from_a, from_b])
}

/// Emit `f(a, b)` whenever either source pushes, once both have pushed at
/// least once.
pub fn combine_latest<S1, S2, A, B, C>(
    a: &S1,
    b: &S2,
    f: impl Fn(&A, &B) -> C + 'static,
) -> Derived<C>
where
    S1: Subscribable<A> + ?Sized,
    S2: Subscribable<B> + ?Sized,
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let out = Stream::new();
    let latest: Rc<RefCell<(Option<A>, Option<B>)>> = Rc::new(RefCell::new((None, None)));
    let f = Rc::new(f);

    let (slots, target, combine) = (Rc::clone(&latest), out.clone(), Rc::clone(&f));
    let from_a = a.subscribe_rc(Rc::new(move |value: &A| {
        let combined = {
            let mut slots = slots.borrow_mut();
            slots.0 = Some(value.clone());
            slots.1.as_ref().map(|other| combine(value, other))
        };
        if let Some(combined) = combined {
            target.on_next(&combined);
        }
    }));

    let (slots, target, combine) = (latest, out.clone(), f);
    let from_b = b.subscribe_rc(Rc::new(move |value: &B| {
        let combined = {
            let mut slots = slots.borrow_mut();
            slots.1 = Some(value.clone());
            slots.0.as_ref().map(|other| combine(other, value))
        };
        if let Some(combined) = combined {
            target.on_next(&combined);
        }
    }));

    Derived::new(out, vec![from_a, from_b])
}

/// Emit `f(t, o)` for each push `t` of `trigger`, using the latest value `o`
/// of `other`. Pushes on `other` alone emit nothing; triggers before `other`
/// has a value are dropped.
pub fn with_latest_from<S1, S2, A, B, C>(
    trigger: &S1,
    other: &S2,
    f: impl Fn(&A, &B) -> C + 'static,
) -> Derived<C>
where
    S1: Subscribable<A> + ?Sized,
    S2: Subscribable<B> + ?Sized,
    A: 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let out = Stream::new();
    let latest: Rc<RefCell<Option<B>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&latest);
    let from_other = other.subscribe_rc(Rc::new(move |value: &B| {
        *slot.borrow_mut() = Some(value.clone());
    }));

    let target = out.clone();
    let from_trigger = trigger.subscribe_rc(Rc::new(move |value: &A| {
        let combined = latest.borrow().as_ref().map(|other| f(value, other));
        if let Some(combined) = combined {
            target.on_next(&combined);
        }
    }));

    Derived::new(out, vec![from_other, from_trigger])
}
