#![forbid(unsafe_code)]

//! The `Subscribable` capability shared by streams, ports and signals.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::observer::Observer;
use crate::subscription::Subscription;

/// A source of pushed values.
///
/// The trait is object safe; `subscribe` is the sized convenience over
/// [`subscribe_rc`](Self::subscribe_rc).
pub trait Subscribable<T> {
    /// Register a shared observer for future pushes.
    fn subscribe_rc(&self, observer: Rc<dyn Observer<T>>) -> Subscription;

    /// Register an observer for future pushes.
    fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<T> + 'static,
        Self: Sized,
    {
        self.subscribe_rc(Rc::new(observer))
    }
}

/// A source that never emits.
///
/// Stands in for the outbound side of consumers that only accept values
/// (labels, bounds) so they can still be wrapped in a port.
pub struct Never<T> {
    _marker: PhantomData<fn(&T)>,
}

impl<T> Never<T> {
    /// Create a silent source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Never<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Never<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Never<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Never")
    }
}

impl<T> Subscribable<T> for Never<T> {
    fn subscribe_rc(&self, _observer: Rc<dyn Observer<T>>) -> Subscription {
        Subscription::empty()
    }
}
