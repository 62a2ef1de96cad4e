#![forbid(unsafe_code)]

//! Applying pushed values to a consumer.

use std::fmt;
use std::rc::Rc;

use reaqt_core::{Observer, StreamError};

use crate::suppress::{SuppressionGuard, Suppressible};

/// Observer that applies each value to a consumer with the consumer's
/// outbound notifications suppressed.
///
/// This is the inbound half of a [`Port`](crate::Port): bind a state stream
/// to it and every push lands on the consumer without echoing back.
pub struct Controller<T> {
    target: Rc<dyn Suppressible>,
    apply: Rc<dyn Fn(&T)>,
}

impl<T> Clone for Controller<T> {
    fn clone(&self) -> Self {
        Self {
            target: Rc::clone(&self.target),
            apply: Rc::clone(&self.apply),
        }
    }
}

impl<T> fmt::Debug for Controller<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller").finish_non_exhaustive()
    }
}

impl<T: 'static> Controller<T> {
    /// Apply values to `consumer` through `apply`.
    pub fn new<C>(consumer: Rc<C>, apply: impl Fn(&C, &T) + 'static) -> Self
    where
        C: Suppressible + 'static,
    {
        let target: Rc<dyn Suppressible> = consumer.clone();
        Self {
            target,
            apply: Rc::new(move |value: &T| apply(&consumer, value)),
        }
    }

    /// A controller for values of type `U`, converted by `f` before being
    /// applied.
    #[must_use]
    pub fn map_input<U: 'static>(self, f: impl Fn(&U) -> T + 'static) -> Controller<U> {
        let apply = self.apply;
        Controller {
            target: self.target,
            apply: Rc::new(move |value: &U| apply(&f(value))),
        }
    }
}

impl<T> Observer<T> for Controller<T> {
    fn on_next(&self, value: &T) {
        let _guard = SuppressionGuard::new(&*self.target);
        (self.apply)(value);
    }

    fn on_error(&self, error: &StreamError) {
        tracing::warn!(error = %error, "controller received error");
    }
}
