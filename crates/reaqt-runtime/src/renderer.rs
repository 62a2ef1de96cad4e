#![forbid(unsafe_code)]

//! Rendering a reactive list as a sequence of children.
//!
//! [`ListRenderer`] keeps a [`ChildHost`] in step with an
//! [`RxList`](reaqt_state::RxList): one child per item, updated from the
//! list's events instead of being rebuilt on every change.
//!
//! | Event              | Children                                          |
//! |--------------------|---------------------------------------------------|
//! | `Append`/`Extend`  | new children at the end                           |
//! | `Insert`           | new child at the index, following ones rebuilt    |
//! | `Pop`/`Remove`     | child at the index removed                        |
//! | `DelItem`          | the index, or every slice position highest first  |
//! | `Clear`            | all removed                                       |
//! | `Sort`/`Reverse`   | all rebuilt from the new order                    |
//!
//! Children after an insert are rebuilt because the builder receives each
//! item's index. Removals leave the remaining children untouched.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use reaqt_core::{Observer, Subscribable, Subscription};
use reaqt_state::{Container, Deleted, ListEvent, RxList};

/// A container of ordered children, such as a box layout.
pub trait ChildHost {
    type Child;

    fn child_count(&self) -> usize;

    /// Insert `child` at `index` (`index <= child_count()`).
    fn insert_child(&mut self, index: usize, child: Self::Child);

    /// Remove the child at `index` (`index < child_count()`).
    fn remove_child(&mut self, index: usize);

    fn clear_children(&mut self);

    fn push_child(&mut self, child: Self::Child) {
        let index = self.child_count();
        self.insert_child(index, child);
    }
}

type Build<T, C> = dyn Fn(usize, &T) -> C;

struct Reconciler<T, H: ChildHost> {
    host: Rc<RefCell<H>>,
    build: Box<Build<T, H::Child>>,
}

impl<T, H: ChildHost> Reconciler<T, H> {
    fn remove_at(host: &mut H, index: usize) {
        if index < host.child_count() {
            host.remove_child(index);
        } else {
            tracing::warn!(
                index,
                children = host.child_count(),
                "renderer out of step with list"
            );
        }
    }

    fn rebuild(&self, items: &[T]) {
        let children: Vec<H::Child> = items
            .iter()
            .enumerate()
            .map(|(index, item)| (self.build)(index, item))
            .collect();
        let mut host = self.host.borrow_mut();
        host.clear_children();
        for child in children {
            host.push_child(child);
        }
    }
}

impl<T, H: ChildHost> Observer<ListEvent<T>> for Reconciler<T, H> {
    fn on_next(&self, event: &ListEvent<T>) {
        tracing::trace!("renderer reconciling list event");
        match event {
            ListEvent::Append(item) => {
                let index = self.host.borrow().child_count();
                let child = (self.build)(index, item);
                self.host.borrow_mut().push_child(child);
            }
            ListEvent::Extend(items) => {
                let start = self.host.borrow().child_count();
                let children: Vec<H::Child> = items
                    .iter()
                    .enumerate()
                    .map(|(offset, item)| (self.build)(start + offset, item))
                    .collect();
                let mut host = self.host.borrow_mut();
                for child in children {
                    host.push_child(child);
                }
            }
            ListEvent::Insert { index, item, tail } => {
                let index = *index;
                let child = (self.build)(index, item);
                let rebuilt: Vec<H::Child> = tail
                    .iter()
                    .enumerate()
                    .map(|(offset, item)| (self.build)(index + 1 + offset, item))
                    .collect();
                let mut host = self.host.borrow_mut();
                let index = index.min(host.child_count());
                host.insert_child(index, child);
                for (offset, child) in rebuilt.into_iter().enumerate() {
                    let position = index + 1 + offset;
                    Self::remove_at(&mut host, position);
                    host.insert_child(position, child);
                }
            }
            ListEvent::Remove { index }
            | ListEvent::Pop { index }
            | ListEvent::DelItem(Deleted::Index(index)) => {
                Self::remove_at(&mut self.host.borrow_mut(), *index);
            }
            ListEvent::DelItem(Deleted::Slice(slice)) => {
                let mut host = self.host.borrow_mut();
                for index in slice.positions_descending() {
                    Self::remove_at(&mut host, index);
                }
            }
            ListEvent::Clear => self.host.borrow_mut().clear_children(),
            ListEvent::Sort(items) | ListEvent::Reverse(items) => self.rebuild(items),
        }
    }
}

/// Keeps a host's children matching a list.
///
/// The builder must not touch the host; it runs before the host is borrowed.
pub struct ListRenderer<T, H: ChildHost> {
    reconciler: Rc<Reconciler<T, H>>,
    subscription: Subscription,
}

impl<T, H: ChildHost> fmt::Debug for ListRenderer<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListRenderer")
            .field("children", &self.reconciler.host.borrow().child_count())
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl<T, H> ListRenderer<T, H>
where
    T: Clone + 'static,
    H: ChildHost + 'static,
{
    /// Build one child per current item, then follow the list's events.
    pub fn attach(
        list: &RxList<T>,
        host: H,
        build: impl Fn(usize, &T) -> H::Child + 'static,
    ) -> Self {
        let reconciler = Rc::new(Reconciler {
            host: Rc::new(RefCell::new(host)),
            build: Box::new(build),
        });
        reconciler.rebuild(&list.freeze());
        let observer: Rc<dyn Observer<ListEvent<T>>> = reconciler.clone();
        let subscription = list.events().subscribe_rc(observer);
        tracing::debug!(children = list.len(), "list renderer attached");
        Self {
            reconciler,
            subscription,
        }
    }

    /// Borrow the host.
    pub fn host(&self) -> Ref<'_, H> {
        self.reconciler.host.borrow()
    }

    /// Stop following the list. The children stay as they are.
    pub fn detach(&self) {
        self.subscription.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reaqt_state::SliceSpec;

    /// Children are `"index:item"` labels.
    #[derive(Default)]
    struct Column {
        children: Vec<String>,
        inserts: usize,
    }

    impl ChildHost for Column {
        type Child = String;

        fn child_count(&self) -> usize {
            self.children.len()
        }

        fn insert_child(&mut self, index: usize, child: String) {
            self.inserts += 1;
            self.children.insert(index, child);
        }

        fn remove_child(&mut self, index: usize) {
            self.children.remove(index);
        }

        fn clear_children(&mut self) {
            self.children.clear();
        }
    }

    fn label(index: usize, item: &char) -> String {
        format!("{index}:{item}")
    }

    fn rendered(list: &RxList<char>) -> ListRenderer<char, Column> {
        ListRenderer::attach(list, Column::default(), label)
    }

    #[test]
    fn initial_children() {
        let list = RxList::new(vec!['a', 'b']);
        let renderer = rendered(&list);
        assert_eq!(renderer.host().children, vec!["0:a", "1:b"]);
    }

    #[test]
    fn append_and_extend_add_at_end() {
        let list = RxList::new(vec!['a']);
        let renderer = rendered(&list);
        list.append('b');
        list.extend(['c', 'd']);
        assert_eq!(renderer.host().children, vec!["0:a", "1:b", "2:c", "3:d"]);
    }

    #[test]
    fn insert_rebuilds_tail_only() {
        let list = RxList::new(vec!['a', 'b', 'c']);
        let renderer = rendered(&list);
        let before = renderer.host().inserts;

        list.insert(1, 'x');

        assert_eq!(renderer.host().children, vec!["0:a", "1:x", "2:b", "3:c"]);
        // The new child plus the two shifted ones.
        assert_eq!(renderer.host().inserts - before, 3);
    }

    #[test]
    fn removals() {
        let list = RxList::new(vec!['a', 'b', 'c', 'd', 'e']);
        let renderer = rendered(&list);

        list.pop(0).expect("non-empty");
        assert_eq!(renderer.host().children, vec!["1:b", "2:c", "3:d", "4:e"]);

        list.remove(&'d').expect("present");
        assert_eq!(renderer.host().children, vec!["1:b", "2:c", "4:e"]);

        list.del_item(SliceSpec::default().with_step(2)).expect("valid");
        assert_eq!(renderer.host().children, vec!["2:c"]);

        list.clear();
        assert!(renderer.host().children.is_empty());
    }

    #[test]
    fn sort_and_reverse_rebuild() {
        let list = RxList::new(vec!['c', 'a', 'b']);
        let renderer = rendered(&list);
        list.sort(false);
        assert_eq!(renderer.host().children, vec!["0:a", "1:b", "2:c"]);
        list.reverse();
        assert_eq!(renderer.host().children, vec!["0:c", "1:b", "2:a"]);
    }

    #[test]
    fn child_count_tracks_list_length() {
        let list = RxList::new(Vec::new());
        let renderer = rendered(&list);
        list.extend(['a', 'b', 'c']);
        list.insert(-1, 'z');
        list.pop_last().expect("non-empty");
        list.del_item(0isize).expect("in range");
        assert_eq!(renderer.host().child_count(), list.len());
    }

    #[test]
    fn detach_stops_updates() {
        let list = RxList::new(vec!['a']);
        let renderer = rendered(&list);
        renderer.detach();
        list.append('b');
        assert_eq!(renderer.host().children, vec!["0:a"]);
    }
}
