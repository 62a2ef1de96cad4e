#![forbid(unsafe_code)]

//! Scoped feedback suppression.
//!
//! Two-way binding closes a loop: state pushes a value into a consumer, the
//! consumer reports the change, the report flows back into state. The loop is
//! cut at the consumer: while a controller applies a value, the consumer's
//! outbound notifications are suppressed.
//!
//! Suppression is a scope, not a flag the caller toggles. [`SuppressionGuard`]
//! restores the previous state when dropped, so the consumer is re-enabled
//! on every exit path: normal return, early return, or an unwinding panic.
//! Guards nest; an inner guard restores "still suppressed".

use std::cell::Cell;
use std::rc::Rc;

/// A consumer whose outbound notifications can be switched off.
pub trait Suppressible {
    /// Set the suppression state, returning the previous one.
    fn set_suppressed(&self, suppressed: bool) -> bool;
}

impl<S: Suppressible + ?Sized> Suppressible for Rc<S> {
    fn set_suppressed(&self, suppressed: bool) -> bool {
        (**self).set_suppressed(suppressed)
    }
}

impl<S: Suppressible + ?Sized> Suppressible for &S {
    fn set_suppressed(&self, suppressed: bool) -> bool {
        (**self).set_suppressed(suppressed)
    }
}

/// Shared on/off switch; the simplest [`Suppressible`].
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct SuppressFlag {
    suppressed: Rc<Cell<bool>>,
}

impl SuppressFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether notifications are currently suppressed.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.get()
    }
}

impl Suppressible for SuppressFlag {
    fn set_suppressed(&self, suppressed: bool) -> bool {
        self.suppressed.replace(suppressed)
    }
}

/// RAII scope that keeps a consumer suppressed until dropped.
#[must_use = "suppression ends when the guard is dropped"]
pub struct SuppressionGuard<'a> {
    target: &'a dyn Suppressible,
    previous: bool,
}

impl<'a> SuppressionGuard<'a> {
    /// Suppress `target` for the lifetime of the guard.
    pub fn new(target: &'a dyn Suppressible) -> Self {
        let previous = target.set_suppressed(true);
        Self { target, previous }
    }

    /// State that will be restored on drop.
    #[must_use]
    pub fn previous(&self) -> bool {
        self.previous
    }
}

impl Drop for SuppressionGuard<'_> {
    fn drop(&mut self) {
        self.target.set_suppressed(self.previous);
    }
}

impl std::fmt::Debug for SuppressionGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuppressionGuard")
            .field("previous", &self.previous)
            .finish()
    }
}

/// Run `f` with `target` suppressed.
pub fn suppressed<R>(target: &dyn Suppressible, f: impl FnOnce() -> R) -> R {
    let _guard = SuppressionGuard::new(target);
    f()
}
