#![forbid(unsafe_code)]

//! Ports: the bindable face of a consumer field.
//!
//! A [`Port`] pairs an inbound controller with an outbound stream. It is an
//! [`Observer`] (pushes go to the controller) and a [`Subscribable`]
//! (subscriptions go to the stream), so a port can be wired exactly like a
//! plain stream.
//!
//! Consumers declare their ports as struct fields:
//!
//! ```
//! use std::rc::Rc;
//! use reaqt_runtime::{Controller, Port, SuppressFlag};
//!
//! struct Label {
//!     text: Port<String>,
//! }
//!
//! let flag = Rc::new(SuppressFlag::new());
//! let label = Label {
//!     text: Port::controller_only(Controller::new(flag, |_, text: &String| {
//!         println!("{text}");
//!     })),
//! };
//! # let _ = label.text;
//! ```

use std::fmt;
use std::rc::Rc;

use reaqt_core::{Never, Observer, StreamError, Subscribable, Subscription};

/// A value transform applied along one direction of a binding.
pub type Transform<T> = Rc<dyn Fn(&T) -> T>;

/// Wrap a closure as a [`Transform`].
pub fn transform<T>(f: impl Fn(&T) -> T + 'static) -> Transform<T> {
    Rc::new(f)
}

/// A `(controller, stream)` pair for one consumer field.
pub struct Port<T> {
    controller: Rc<dyn Observer<T>>,
    stream: Rc<dyn Subscribable<T>>,
}

impl<T> Clone for Port<T> {
    fn clone(&self) -> Self {
        Self {
            controller: Rc::clone(&self.controller),
            stream: Rc::clone(&self.stream),
        }
    }
}

impl<T> fmt::Debug for Port<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port").finish_non_exhaustive()
    }
}

impl<T: 'static> Port<T> {
    pub fn new<C, S>(controller: C, stream: S) -> Self
    where
        C: Observer<T> + 'static,
        S: Subscribable<T> + 'static,
    {
        Self {
            controller: Rc::new(controller),
            stream: Rc::new(stream),
        }
    }

    /// A port over already shared halves.
    pub fn from_shared(controller: Rc<dyn Observer<T>>, stream: Rc<dyn Subscribable<T>>) -> Self {
        Self { controller, stream }
    }

    /// A port for a field that accepts values but never reports changes
    /// (labels, bounds).
    pub fn controller_only<C>(controller: C) -> Self
    where
        C: Observer<T> + 'static,
    {
        Self::new(controller, Never::new())
    }

    #[must_use]
    pub fn controller(&self) -> &Rc<dyn Observer<T>> {
        &self.controller
    }

    #[must_use]
    pub fn stream(&self) -> &Rc<dyn Subscribable<T>> {
        &self.stream
    }
}

impl<T> Observer<T> for Port<T> {
    fn on_next(&self, value: &T) {
        self.controller.on_next(value);
    }

    fn on_completed(&self) {
        self.controller.on_completed();
    }

    fn on_error(&self, error: &StreamError) {
        self.controller.on_error(error);
    }
}

impl<T> Subscribable<T> for Port<T> {
    fn subscribe_rc(&self, observer: Rc<dyn Observer<T>>) -> Subscription {
        self.stream.subscribe_rc(observer)
    }
}
