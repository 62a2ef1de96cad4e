#![forbid(unsafe_code)]

//! Helpers for tests in this workspace.
//!
//! Enabled with the `test-helpers` feature.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::Level;

use crate::observer::{Observer, StreamError};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

/// Observer that records everything it receives.
///
/// Clones share the same log, so keep one handle and subscribe another.
pub struct Recorder<T> {
    values: Rc<RefCell<Vec<T>>>,
    errors: Rc<RefCell<Vec<String>>>,
    completions: Rc<Cell<usize>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            values: Rc::clone(&self.values),
            errors: Rc::clone(&self.errors),
            completions: Rc::clone(&self.completions),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Recorder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("values", &self.values.borrow().len())
            .field("errors", &self.errors.borrow().len())
            .field("completions", &self.completions.get())
            .finish()
    }
}

impl<T> Recorder<T> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Rc::new(RefCell::new(Vec::new())),
            errors: Rc::new(RefCell::new(Vec::new())),
            completions: Rc::new(Cell::new(0)),
        }
    }

    /// Number of values received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether no value was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Messages of the errors received.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    /// Number of completions received.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.completions.get()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.values.borrow_mut().clear();
        self.errors.borrow_mut().clear();
        self.completions.set(0);
    }
}

impl<T: Clone> Recorder<T> {
    /// Values received, in order.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.values.borrow().clone()
    }

    /// The last value received.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.values.borrow().last().cloned()
    }
}

impl<T: Clone> Observer<T> for Recorder<T> {
    fn on_next(&self, value: &T) {
        self.values.borrow_mut().push(value.clone());
    }

    fn on_completed(&self) {
        self.completions.set(self.completions.get() + 1);
    }

    fn on_error(&self, error: &StreamError) {
        self.errors.borrow_mut().push(error.to_string());
    }
}
