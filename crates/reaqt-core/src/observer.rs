#![forbid(unsafe_code)]

//! The observer contract and the error type carried by `on_error`.
//!
//! Any `Fn(&T)` closure is an [`Observer<T>`]: it receives `on_next` pushes and
//! inherits the default `on_completed` (no-op) and `on_error` (report to the
//! log) behavior.

use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// Receiver of pushed values.
///
/// Methods take `&self`: observers are shared behind `Rc` by every stream
/// they are subscribed to, so state lives behind interior mutability.
pub trait Observer<T> {
    /// Receive the next value.
    fn on_next(&self, value: &T);

    /// Terminal hook. Streams in this crate never complete, so the default
    /// does nothing.
    fn on_completed(&self) {}

    /// Receive a reported error. The default logs it and returns.
    fn on_error(&self, error: &StreamError) {
        report_error(error);
    }
}

impl<T, F> Observer<T> for F
where
    F: Fn(&T),
{
    fn on_next(&self, value: &T) {
        self(value);
    }
}

/// Log a reported error without propagating it.
pub fn report_error(error: &StreamError) {
    tracing::error!(error = %error, "stream error reported");
}

/// An error delivered through [`Observer::on_error`].
///
/// Cheap to clone so a stream can hand the same error to every subscriber.
#[derive(Clone)]
pub struct StreamError {
    message: Rc<str>,
    source: Option<Rc<dyn Error + 'static>>,
}

impl StreamError {
    /// Create an error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Rc::from(message.into()),
            source: None,
        }
    }

    /// Wrap an existing error, keeping it reachable through `source()`.
    #[must_use]
    pub fn from_error<E: Error + 'static>(error: E) -> Self {
        Self {
            message: Rc::from(error.to_string()),
            source: Some(Rc::new(error)),
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamError")
            .field("message", &self.message)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref()
    }
}

/// Observer adaptor that transforms each value before forwarding it.
///
/// Completion and errors pass through unchanged.
pub struct MapObserver<S, T> {
    target: Rc<dyn Observer<T>>,
    map: Rc<dyn Fn(&S) -> T>,
}

impl<S, T> Clone for MapObserver<S, T> {
    fn clone(&self) -> Self {
        Self {
            target: Rc::clone(&self.target),
            map: Rc::clone(&self.map),
        }
    }
}

impl<S, T> fmt::Debug for MapObserver<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapObserver").finish_non_exhaustive()
    }
}

impl<S, T> MapObserver<S, T> {
    /// Forward `map(value)` to `target` for every pushed value.
    pub fn new(target: Rc<dyn Observer<T>>, map: impl Fn(&S) -> T + 'static) -> Self {
        Self {
            target,
            map: Rc::new(map),
        }
    }

    /// Like [`MapObserver::new`] with an already shared transform.
    pub fn from_shared(target: Rc<dyn Observer<T>>, map: Rc<dyn Fn(&S) -> T>) -> Self {
        Self { target, map }
    }
}

impl<S, T> Observer<S> for MapObserver<S, T> {
    fn on_next(&self, value: &S) {
        let mapped = (self.map)(value);
        self.target.on_next(&mapped);
    }

    fn on_completed(&self) {
        self.target.on_completed();
    }

    fn on_error(&self, error: &StreamError) {
        self.target.on_error(error);
    }
}

/// Wrap `target` so it receives `map(value)` instead of `value`.
pub fn with_map<S: 'static, T: 'static>(
    target: Rc<dyn Observer<T>>,
    map: impl Fn(&S) -> T + 'static,
) -> Rc<dyn Observer<S>> {
    Rc::new(MapObserver::new(target, map))
}
