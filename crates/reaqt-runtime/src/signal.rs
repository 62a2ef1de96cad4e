#![forbid(unsafe_code)]

//! Outbound notifications of a consumer.

use std::fmt;
use std::rc::Rc;

use reaqt_core::{Observer, Stream, Subscribable, Subscription};

use crate::suppress::{SuppressFlag, Suppressible};

/// The "value changed" notification of a consumer, as a stream.
///
/// A consumer calls [`emit`](Self::emit) whenever its value changes locally.
/// While suppressed (a controller is applying a value) emissions are
/// dropped, which is what keeps two-way bindings from looping.
///
/// Clones share subscribers and suppression state.
pub struct Signal<T> {
    stream: Stream<T>,
    flag: SuppressFlag,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            stream: self.stream.clone(),
            flag: self.flag.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("stream", &self.stream)
            .field("suppressed", &self.flag.is_suppressed())
            .finish()
    }
}

impl<T: Clone + 'static> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stream: Stream::new(),
            flag: SuppressFlag::new(),
        }
    }

    /// Notify subscribers unless suppressed. Returns whether the value was
    /// delivered.
    pub fn emit(&self, value: &T) -> bool {
        if self.flag.is_suppressed() {
            tracing::debug!("signal emission suppressed");
            return false;
        }
        self.stream.on_next(value);
        true
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.flag.is_suppressed()
    }

    /// The last value that got through.
    #[must_use]
    pub fn last_emitted(&self) -> Option<T> {
        self.stream.current_value()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.stream.subscriber_count()
    }
}

impl<T> Suppressible for Signal<T> {
    fn set_suppressed(&self, suppressed: bool) -> bool {
        self.flag.set_suppressed(suppressed)
    }
}

impl<T: Clone + 'static> Subscribable<T> for Signal<T> {
    fn subscribe_rc(&self, observer: Rc<dyn Observer<T>>) -> Subscription {
        self.stream.subscribe_rc(observer)
    }
}
