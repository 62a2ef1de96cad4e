#![forbid(unsafe_code)]

//! Reactive list.
//!
//! # Design
//!
//! [`RxList<T>`] owns its `Vec<T>` exclusively, behind a shared handle.
//! Nothing hands out a mutable reference to the storage: every change goes
//! through a named operation, and every operation emits one [`ListEvent`]
//! on [`events`](RxList::events) followed by the new length on
//! [`length`](RxList::length).
//!
//! # Invariants
//!
//! 1. Exactly one event per mutating call, then one length push.
//! 2. Replaying the events on an independent `Vec` reproduces `freeze()`.
//! 3. Reads never emit.
//! 4. The storage borrow is released before any observer runs.
//! 5. A panicking event observer does not skip the length push; the panic
//!    resumes after it.
//!
//! # Failure Modes
//!
//! - **Comparator touching the list**: `sort_by`/`sort_by_key` run the
//!   user callback while the storage is borrowed; reading the list from it
//!   panics.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use reaqt_core::{Observer, Stream, Subscribable, Subscription};

use crate::container::Container;
use crate::error::{StateError, StateResult};
use crate::event::{Deleted, Deletion, ListEvent, SliceSpec};

struct ListInner<T> {
    items: RefCell<Vec<T>>,
    events: Stream<ListEvent<T>>,
    length: Stream<usize>,
}

/// An ordered sequence that reports each mutation as a [`ListEvent`].
///
/// Cloning an `RxList` creates a new handle to the **same** list. Use
/// [`copy`](Self::copy) for an independent list.
pub struct RxList<T> {
    inner: Rc<ListInner<T>>,
}

impl<T> Clone for RxList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RxList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RxList")
            .field("items", &self.inner.items.borrow())
            .finish()
    }
}

impl<T: Clone + 'static> Default for RxList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone + 'static> From<Vec<T>> for RxList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Clone + 'static> FromIterator<T> for RxList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Resolve a possibly negative index against `len`, failing outside `0..len`.
fn resolve_index(index: isize, len: usize) -> StateResult<usize> {
    let resolved = if index < 0 {
        index + len as isize
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(StateError::IndexOutOfRange { index, len });
    }
    Ok(resolved as usize)
}

impl<T: Clone + 'static> RxList<T> {
    /// Take ownership of `items`.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(ListInner {
                items: RefCell::new(items),
                events: Stream::new(),
                length: Stream::new(),
            }),
        }
    }

    // -- reads -------------------------------------------------------------

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    /// Item at `index`; negative indices count from the end.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::IndexOutOfRange`] outside the list.
    pub fn get(&self, index: isize) -> StateResult<T> {
        let items = self.inner.items.borrow();
        let resolved = resolve_index(index, items.len())?;
        Ok(items[resolved].clone())
    }

    /// Items covered by a slice.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidSlice`] for a zero step.
    pub fn slice(&self, spec: impl Into<SliceSpec>) -> StateResult<Vec<T>> {
        let items = self.inner.items.borrow();
        let resolved = spec.into().resolve(items.len())?;
        Ok(resolved.positions().map(|i| items[i].clone()).collect())
    }

    /// Borrow the items for reading.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.items.borrow())
    }

    /// Stream of mutation events.
    #[must_use]
    pub fn events(&self) -> &Stream<ListEvent<T>> {
        &self.inner.events
    }

    /// Stream of lengths, pushed after every mutation event.
    #[must_use]
    pub fn length(&self) -> &Stream<usize> {
        &self.inner.length
    }

    /// Push the current length without mutating.
    pub fn broadcast_length(&self) {
        let len = self.len();
        self.inner.length.on_next(&len);
    }

    /// An independent list with the same items. Emits nothing on `self`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self::new(self.freeze())
    }

    // -- mutations ---------------------------------------------------------

    fn commit(&self, event: ListEvent<T>) {
        tracing::trace!(kind = ?event.kind(), "list mutation");
        // A panicking observer must not leave the length stream behind the
        // storage: both rounds run, then the first panic resumes.
        let events = panic::catch_unwind(AssertUnwindSafe(|| self.inner.events.on_next(&event)));
        let len = self.len();
        let lengths = panic::catch_unwind(AssertUnwindSafe(|| self.inner.length.on_next(&len)));
        if let Err(payload) = events.and(lengths) {
            panic::resume_unwind(payload);
        }
    }

    pub fn append(&self, item: T) {
        self.inner.items.borrow_mut().push(item.clone());
        self.commit(ListEvent::Append(item));
    }

    pub fn extend(&self, items: impl IntoIterator<Item = T>) {
        let items: Vec<T> = items.into_iter().collect();
        self.inner.items.borrow_mut().extend(items.iter().cloned());
        self.commit(ListEvent::Extend(items));
    }

    /// Insert before `index`. Like a sequence insert, negative indices count
    /// from the end and out-of-range indices clamp to the ends. The event
    /// carries the resolved index and the items after the new one.
    pub fn insert(&self, index: isize, item: T) {
        let (index, tail) = {
            let mut items = self.inner.items.borrow_mut();
            let len = items.len() as isize;
            let resolved = if index < 0 {
                (index + len).max(0)
            } else {
                index.min(len)
            } as usize;
            items.insert(resolved, item.clone());
            (resolved, items[resolved + 1..].to_vec())
        };
        self.commit(ListEvent::Insert { index, item, tail });
    }

    /// Remove and return the item at `index` (negative counts from the end).
    ///
    /// # Errors
    ///
    /// Returns [`StateError::IndexOutOfRange`] outside the list, including on
    /// an empty list. Nothing is emitted then.
    pub fn pop(&self, index: isize) -> StateResult<T> {
        let (resolved, item) = {
            let mut items = self.inner.items.borrow_mut();
            let resolved = resolve_index(index, items.len())?;
            (resolved, items.remove(resolved))
        };
        self.commit(ListEvent::Pop { index: resolved });
        Ok(item)
    }

    /// Remove and return the last item.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::IndexOutOfRange`] on an empty list.
    pub fn pop_last(&self) -> StateResult<T> {
        self.pop(-1)
    }

    pub fn clear(&self) {
        self.inner.items.borrow_mut().clear();
        self.commit(ListEvent::Clear);
    }

    pub fn reverse(&self) {
        let snapshot = {
            let mut items = self.inner.items.borrow_mut();
            items.reverse();
            items.clone()
        };
        self.commit(ListEvent::Reverse(snapshot));
    }

    /// Stable sort with a comparator. With `reverse`, the order is descending
    /// and equal items keep their original relative order.
    pub fn sort_by(&self, mut compare: impl FnMut(&T, &T) -> Ordering, reverse: bool) {
        let snapshot = {
            let mut items = self.inner.items.borrow_mut();
            if reverse {
                items.sort_by(|a, b| compare(b, a));
            } else {
                items.sort_by(|a, b| compare(a, b));
            }
            items.clone()
        };
        self.commit(ListEvent::Sort(snapshot));
    }

    /// Stable sort by a key.
    pub fn sort_by_key<K: Ord>(&self, mut key: impl FnMut(&T) -> K, reverse: bool) {
        self.sort_by(|a, b| key(a).cmp(&key(b)), reverse);
    }

    /// Delete one index or every position of a slice.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::IndexOutOfRange`] for a bad index and
    /// [`StateError::InvalidSlice`] for a zero step. Nothing is emitted then.
    pub fn del_item(&self, target: impl Into<Deletion>) -> StateResult<()> {
        let deleted = {
            let mut items = self.inner.items.borrow_mut();
            match target.into() {
                Deletion::Index(index) => {
                    let resolved = resolve_index(index, items.len())?;
                    items.remove(resolved);
                    Deleted::Index(resolved)
                }
                Deletion::Slice(spec) => {
                    let resolved = spec.resolve(items.len())?;
                    for position in resolved.positions_descending() {
                        items.remove(position);
                    }
                    Deleted::Slice(resolved)
                }
            }
        };
        self.commit(ListEvent::DelItem(deleted));
        Ok(())
    }

    /// Always fails: a slot cannot be overwritten in place.
    ///
    /// # Errors
    ///
    /// Always returns [`StateError::ItemAssignment`].
    pub fn set_item(&self, index: isize, _item: T) -> StateResult<()> {
        Err(StateError::ItemAssignment { index })
    }
}

impl<T: Clone + PartialEq + 'static> RxList<T> {
    /// Position of the first item equal to `item`.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.inner.items.borrow().iter().position(|x| x == item)
    }

    /// Remove the first item equal to `item`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ValueNotFound`] when no item matches.
    pub fn remove(&self, item: &T) -> StateResult<()> {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            let index = items
                .iter()
                .position(|x| x == item)
                .ok_or(StateError::ValueNotFound)?;
            items.remove(index);
            index
        };
        self.commit(ListEvent::Remove { index });
        Ok(())
    }
}

impl<T: Clone + Ord + 'static> RxList<T> {
    /// Stable sort by the natural order.
    pub fn sort(&self, reverse: bool) {
        self.sort_by(T::cmp, reverse);
    }
}

impl<T: Clone + 'static> Container for RxList<T> {
    type Snapshot = Vec<T>;

    fn freeze(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }
}

impl<T: Clone + 'static> Subscribable<ListEvent<T>> for RxList<T> {
    fn subscribe_rc(&self, observer: Rc<dyn Observer<ListEvent<T>>>) -> Subscription {
        self.inner.events.subscribe_rc(observer)
    }
}
