//! Property-based invariant tests for `RxList`.
//!
//! 1. Replaying the event stream on a mirror reproduces `freeze()` after any
//!    sequence of operations, including failing ones.
//! 2. One event and one length push per successful mutation, none on failure.
//! 3. The pushed length always equals the list length.
//! 4. `pop(-1)` and `pop(len - 1)` remove the same item.
//! 5. An insert event's tail equals the items after the inserted position.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use reaqt_core::Subscribable;
use reaqt_state::{Container, ListEvent, RxList, SliceSpec};

#[derive(Debug, Clone)]
enum Op {
    Append(u8),
    Extend(Vec<u8>),
    Insert(isize, u8),
    Remove(u8),
    Pop(isize),
    Clear,
    Reverse,
    Sort(bool),
    DelIndex(isize),
    DelSlice(Option<isize>, Option<isize>, Option<isize>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let index = -12isize..12;
    let bound = proptest::option::of(-12isize..12);
    prop_oneof![
        any::<u8>().prop_map(Op::Append),
        proptest::collection::vec(any::<u8>(), 0..5).prop_map(Op::Extend),
        (index.clone(), any::<u8>()).prop_map(|(i, x)| Op::Insert(i, x)),
        (0u8..8).prop_map(Op::Remove),
        index.clone().prop_map(Op::Pop),
        Just(Op::Clear),
        Just(Op::Reverse),
        any::<bool>().prop_map(Op::Sort),
        index.prop_map(Op::DelIndex),
        (bound.clone(), bound, proptest::option::of(-3isize..4))
            .prop_map(|(start, stop, step)| Op::DelSlice(start, stop, step)),
    ]
}

/// Run `op`, reporting whether it mutated.
fn run(list: &RxList<u8>, op: &Op) -> bool {
    match op {
        Op::Append(x) => {
            list.append(*x);
            true
        }
        Op::Extend(xs) => {
            list.extend(xs.iter().copied());
            true
        }
        Op::Insert(i, x) => {
            list.insert(*i, *x);
            true
        }
        Op::Remove(x) => list.remove(x).is_ok(),
        Op::Pop(i) => list.pop(*i).is_ok(),
        Op::Clear => {
            list.clear();
            true
        }
        Op::Reverse => {
            list.reverse();
            true
        }
        Op::Sort(reverse) => {
            list.sort(*reverse);
            true
        }
        Op::DelIndex(i) => list.del_item(*i).is_ok(),
        Op::DelSlice(start, stop, step) => list
            .del_item(SliceSpec::new(*start, *stop, *step))
            .is_ok(),
    }
}

proptest! {
    #[test]
    fn mirror_tracks_list(
        initial in proptest::collection::vec(0u8..8, 0..10),
        ops in proptest::collection::vec(op_strategy(), 0..40),
    ) {
        let list = RxList::new(initial.clone());
        let mirror = Rc::new(RefCell::new(initial));
        let replay_failed = Rc::new(RefCell::new(false));
        let event_count = Rc::new(RefCell::new(0usize));
        let lengths = Rc::new(RefCell::new(Vec::new()));

        let _events = {
            let mirror = Rc::clone(&mirror);
            let replay_failed = Rc::clone(&replay_failed);
            let event_count = Rc::clone(&event_count);
            list.events().subscribe(move |event: &ListEvent<u8>| {
                *event_count.borrow_mut() += 1;
                if event.apply_to(&mut mirror.borrow_mut()).is_err() {
                    *replay_failed.borrow_mut() = true;
                }
            })
        };
        let _lengths = {
            let lengths = Rc::clone(&lengths);
            list.length().subscribe(move |len: &usize| lengths.borrow_mut().push(*len))
        };

        let mut mutations = 0usize;
        for op in &ops {
            let len_before = lengths.borrow().len();
            if run(&list, op) {
                mutations += 1;
                prop_assert_eq!(lengths.borrow().len(), len_before + 1);
                prop_assert_eq!(lengths.borrow().last().copied(), Some(list.len()));
            } else {
                prop_assert_eq!(lengths.borrow().len(), len_before);
            }
            prop_assert!(!*replay_failed.borrow());
            prop_assert_eq!(&*mirror.borrow(), &list.freeze());
        }
        prop_assert_eq!(*event_count.borrow(), mutations);
    }

    #[test]
    fn pop_negative_matches_pop_last_index(items in proptest::collection::vec(any::<u8>(), 1..20)) {
        let a = RxList::new(items.clone());
        let b = RxList::new(items.clone());
        let last = items.len() as isize - 1;
        prop_assert_eq!(a.pop(-1), b.pop(last));
        prop_assert_eq!(a.freeze(), b.freeze());
    }

    #[test]
    fn insert_tail_is_suffix(
        items in proptest::collection::vec(any::<u8>(), 0..20),
        index in -25isize..25,
        item in any::<u8>(),
    ) {
        let list = RxList::new(items);
        let seen = Rc::new(RefCell::new(None));
        let seen_clone = Rc::clone(&seen);
        let _sub = list.events().subscribe(move |event: &ListEvent<u8>| {
            seen_clone.borrow_mut().replace(event.clone());
        });

        list.insert(index, item);
        let frozen = list.freeze();
        match seen.borrow().clone() {
            Some(ListEvent::Insert { index, item: inserted, tail }) => {
                prop_assert_eq!(frozen[index], inserted);
                prop_assert_eq!(&frozen[index + 1..], tail.as_slice());
            }
            other => prop_assert!(false, "expected insert event, got {:?}", other),
        }
    }
}

#[test]
fn observer_sees_post_mutation_state() {
    let list = RxList::new(vec![3u8, 1, 2]);
    let reader = list.clone();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let observer = move |_: &ListEvent<u8>| seen_clone.borrow_mut().push(reader.freeze());
    let _sub = list.events().subscribe(observer);

    list.sort(false);
    list.pop_last().expect("non-empty");
    assert_eq!(*seen.borrow(), vec![vec![1, 2, 3], vec![1, 2]]);
}
