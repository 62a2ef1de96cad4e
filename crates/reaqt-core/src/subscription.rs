#![forbid(unsafe_code)]

//! Subscription handles.
//!
//! A [`Subscription`] is the only way to detach an observer from a stream.
//! Unlike a guard, dropping the handle leaves the observer attached: wiring
//! calls create subscriptions and forget them, and the observer lives as long
//! as the stream does. [`Subscription::guard`] opts into RAII disposal.
//!
//! # Invariants
//!
//! 1. `dispose()` is idempotent.
//! 2. After `dispose()` returns, the observer receives no further values, even
//!    when disposal happens in the middle of a delivery round.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Detach = Box<dyn FnOnce()>;

/// Handle to an observer registration.
pub struct Subscription {
    /// Shared with the stream entry; delivery skips entries whose flag is off.
    active: Rc<Cell<bool>>,
    /// Removes the entry from the stream's observer list.
    detach: RefCell<Option<Detach>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl Subscription {
    pub(crate) fn new(active: Rc<Cell<bool>>, detach: impl FnOnce() + 'static) -> Self {
        Self {
            active,
            detach: RefCell::new(Some(Box::new(detach))),
        }
    }

    /// A subscription that is already disposed. Returned by sources that
    /// never emit.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            active: Rc::new(Cell::new(false)),
            detach: RefCell::new(None),
        }
    }

    /// Detach the observer. Calling this more than once has no effect.
    pub fn dispose(&self) {
        self.active.set(false);
        let detach = self.detach.borrow_mut().take();
        if let Some(detach) = detach {
            detach();
        }
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        !self.active.get()
    }

    /// Convert into a guard that disposes on drop.
    #[must_use]
    pub fn guard(self) -> SubscriptionGuard {
        SubscriptionGuard {
            subscription: Some(self),
        }
    }
}

/// RAII guard that disposes its subscription when dropped.
#[derive(Debug)]
pub struct SubscriptionGuard {
    subscription: Option<Subscription>,
}

impl SubscriptionGuard {
    /// Release the subscription without disposing it.
    #[must_use]
    pub fn into_inner(mut self) -> Subscription {
        self.subscription.take().unwrap_or_else(Subscription::empty)
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.dispose();
        }
    }
}
