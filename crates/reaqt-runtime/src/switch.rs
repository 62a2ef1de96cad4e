#![forbid(unsafe_code)]

//! Conditional content.
//!
//! A [`Switch`] observes a value and replaces a host's content with the
//! first branch that matches it. Branches build their content lazily, each
//! time they are selected. When nothing matches and there is no fallback the
//! content is left as it was.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use reaqt_core::{Observer, Subscribable, Subscription};

/// Something whose whole content can be swapped.
pub trait BranchHost {
    type Content;

    fn replace_content(&mut self, content: Self::Content);
}

/// Branch test.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool>;

/// Content factory of a branch.
pub type Builder<C> = Box<dyn Fn() -> C>;

struct SwitchInner<T, H: BranchHost> {
    host: RefCell<H>,
    branches: Vec<(Predicate<T>, Builder<H::Content>)>,
    otherwise: Option<Builder<H::Content>>,
}

/// Observer that selects a host's content from each pushed value.
///
/// Clones share the host.
pub struct Switch<T, H: BranchHost> {
    inner: Rc<SwitchInner<T, H>>,
}

impl<T, H: BranchHost> Clone for Switch<T, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, H: BranchHost> fmt::Debug for Switch<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switch")
            .field("branches", &self.inner.branches.len())
            .field("otherwise", &self.inner.otherwise.is_some())
            .finish()
    }
}

impl<T: 'static, H: BranchHost> Switch<T, H> {
    /// First predicate that holds wins; `otherwise` when none does.
    pub fn matching(
        host: H,
        branches: Vec<(Predicate<T>, Builder<H::Content>)>,
        otherwise: Option<Builder<H::Content>>,
    ) -> Self {
        Self {
            inner: Rc::new(SwitchInner {
                host: RefCell::new(host),
                branches,
                otherwise,
            }),
        }
    }

    /// First branch whose value equals the pushed one wins.
    pub fn case(
        host: H,
        branches: Vec<(T, Builder<H::Content>)>,
        otherwise: Option<Builder<H::Content>>,
    ) -> Self
    where
        T: PartialEq,
    {
        let branches = branches
            .into_iter()
            .map(|(expected, build)| {
                let predicate: Predicate<T> = Box::new(move |value: &T| *value == expected);
                (predicate, build)
            })
            .collect();
        Self::matching(host, branches, otherwise)
    }

    /// Borrow the host.
    pub fn host(&self) -> Ref<'_, H> {
        self.inner.host.borrow()
    }
}

impl<H: BranchHost> Switch<bool, H> {
    /// `then` on `true`, `otherwise` (if any) on `false`.
    pub fn if_else(
        host: H,
        then: Builder<H::Content>,
        otherwise: Option<Builder<H::Content>>,
    ) -> Self {
        let is_true: Predicate<bool> = Box::new(|value: &bool| *value);
        Self::matching(host, vec![(is_true, then)], otherwise)
    }
}

impl<T, H: BranchHost> Observer<T> for Switch<T, H> {
    fn on_next(&self, value: &T) {
        let inner = &*self.inner;
        let selected = inner
            .branches
            .iter()
            .position(|(predicate, _)| predicate(value));
        let content = match selected {
            Some(index) => {
                tracing::trace!(branch = index, "switch branch selected");
                (inner.branches[index].1)()
            }
            None => match &inner.otherwise {
                Some(build) => {
                    tracing::trace!("switch fallback selected");
                    build()
                }
                None => return,
            },
        };
        inner.host.borrow_mut().replace_content(content);
    }
}

/// Content chosen by several boolean streams.
///
/// Whenever a branch's stream pushes `true` the content is replaced with
/// that branch; `false` pushes are ignored.
pub struct Cond<H> {
    host: Rc<RefCell<H>>,
    subscriptions: Vec<Subscription>,
}

impl<H> fmt::Debug for Cond<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cond")
            .field("branches", &self.subscriptions.len())
            .finish()
    }
}

impl<H: BranchHost + 'static> Cond<H> {
    pub fn host(&self) -> Ref<'_, H> {
        self.host.borrow()
    }

    /// Stop following the branch streams.
    pub fn dispose(&self) {
        for subscription in &self.subscriptions {
            subscription.dispose();
        }
    }
}

/// Subscribe each branch's stream and switch `host` to the branch that last
/// pushed `true`.
pub fn cond<H>(branches: Vec<(&dyn Subscribable<bool>, Builder<H::Content>)>, host: H) -> Cond<H>
where
    H: BranchHost + 'static,
{
    let host = Rc::new(RefCell::new(host));
    let subscriptions = branches
        .into_iter()
        .map(|(condition, build)| {
            let host = Rc::clone(&host);
            let observer = move |active: &bool| {
                if *active {
                    let content = build();
                    host.borrow_mut().replace_content(content);
                }
            };
            condition.subscribe_rc(Rc::new(observer))
        })
        .collect();
    Cond {
        host,
        subscriptions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reaqt_core::Stream;
    use reaqt_core::ops;

    /// Records every content it is given.
    #[derive(Default)]
    struct Slot {
        shown: Vec<&'static str>,
    }

    impl BranchHost for Slot {
        type Content = &'static str;

        fn replace_content(&mut self, content: &'static str) {
            self.shown.push(content);
        }
    }

    fn text(s: &'static str) -> Builder<&'static str> {
        Box::new(move || s)
    }

    #[test]
    fn if_else_follows_condition() {
        let visible = Stream::new();
        let switch = Switch::if_else(Slot::default(), text("shown"), Some(text("hidden")));
        let _sub = visible.subscribe(switch.clone());

        visible.on_next(&true);
        visible.on_next(&false);
        assert_eq!(switch.host().shown, vec!["shown", "hidden"]);
    }

    #[test]
    fn if_without_else_keeps_content() {
        let switch = Switch::if_else(Slot::default(), text("shown"), None);
        switch.on_next(&true);
        switch.on_next(&false);
        assert_eq!(switch.host().shown, vec!["shown"]);
    }

    #[test]
    fn case_matches_values() {
        let switch = Switch::case(
            Slot::default(),
            vec![
                (String::new(), text("No input.")),
                ("A".to_string(), text("Letter A.")),
                ("B".to_string(), text("Letter B.")),
            ],
            Some(text("Not recognized.")),
        );
        for input in ["", "B", "z", "A"] {
            switch.on_next(&input.to_string());
        }
        assert_eq!(
            switch.host().shown,
            vec!["No input.", "Letter B.", "Not recognized.", "Letter A."]
        );
    }

    #[test]
    fn matching_first_branch_wins() {
        let is_small: Predicate<i32> = Box::new(|n: &i32| *n < 10);
        let is_even: Predicate<i32> = Box::new(|n: &i32| n % 2 == 0);
        let switch = Switch::matching(
            Slot::default(),
            vec![(is_small, text("small")), (is_even, text("even"))],
            None,
        );
        switch.on_next(&4);
        switch.on_next(&12);
        switch.on_next(&13);
        assert_eq!(switch.host().shown, vec!["small", "even"]);
    }

    #[test]
    fn cond_switches_on_true() {
        let text_state = Stream::<String>::new();
        let is_empty = ops::map(&text_state, |s: &String| s.is_empty());
        let is_a = ops::map(&text_state, |s: &String| s == "A");

        let shown = cond(
            vec![
                (&is_empty as &dyn Subscribable<bool>, text("No input.")),
                (&is_a as &dyn Subscribable<bool>, text("Letter A.")),
            ],
            Slot::default(),
        );

        text_state.on_next(&String::new());
        text_state.on_next(&"A".to_string());
        text_state.on_next(&"q".to_string());
        assert_eq!(shown.host().shown, vec!["No input.", "Letter A."]);

        shown.dispose();
        text_state.on_next(&String::new());
        assert_eq!(shown.host().shown.len(), 2);
    }
}
