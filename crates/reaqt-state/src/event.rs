#![forbid(unsafe_code)]

//! List mutation events.
//!
//! Every mutating [`RxList`](crate::RxList) operation emits exactly one
//! [`ListEvent`]. The payload carries enough to replay the mutation on a
//! mirror without re-reading the list:
//!
//! | Kind      | Payload                                          |
//! |-----------|--------------------------------------------------|
//! | `Append`  | the item                                         |
//! | `Extend`  | the items                                        |
//! | `Insert`  | resolved index, item, tail after the insert      |
//! | `Remove`  | resolved index of the removed item               |
//! | `Pop`     | resolved index                                   |
//! | `Clear`   | none                                             |
//! | `Sort`    | the whole resulting sequence                     |
//! | `Reverse` | the whole resulting sequence                     |
//! | `DelItem` | resolved index or resolved slice                 |
//!
//! `Sort` and `Reverse` carry the full sequence because every position may
//! have changed.

use std::ops::Range;

use crate::error::{StateError, StateResult};

/// Discriminant of a [`ListEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListEventKind {
    Append,
    Extend,
    Insert,
    Remove,
    Pop,
    Clear,
    Sort,
    Reverse,
    /// Reserved. `copy()` does not mutate and emits nothing.
    Copy,
    DelItem,
}

/// A structured list mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<T> {
    Append(T),
    Extend(Vec<T>),
    Insert { index: usize, item: T, tail: Vec<T> },
    Remove { index: usize },
    Pop { index: usize },
    Clear,
    Sort(Vec<T>),
    Reverse(Vec<T>),
    DelItem(Deleted),
}

/// What a `del_item` call removed, with all indices resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Index(usize),
    Slice(ResolvedSlice),
}

impl<T> ListEvent<T> {
    #[must_use]
    pub fn kind(&self) -> ListEventKind {
        match self {
            Self::Append(_) => ListEventKind::Append,
            Self::Extend(_) => ListEventKind::Extend,
            Self::Insert { .. } => ListEventKind::Insert,
            Self::Remove { .. } => ListEventKind::Remove,
            Self::Pop { .. } => ListEventKind::Pop,
            Self::Clear => ListEventKind::Clear,
            Self::Sort(_) => ListEventKind::Sort,
            Self::Reverse(_) => ListEventKind::Reverse,
            Self::DelItem(_) => ListEventKind::DelItem,
        }
    }
}

impl<T: Clone> ListEvent<T> {
    /// Replay this event on `mirror`.
    ///
    /// # Errors
    ///
    /// Returns a bounds error if `mirror` has drifted from the list and an
    /// index no longer fits.
    pub fn apply_to(&self, mirror: &mut Vec<T>) -> StateResult<()> {
        let check = |index: usize, len: usize| {
            if index < len {
                Ok(index)
            } else {
                Err(StateError::IndexOutOfRange {
                    index: index as isize,
                    len,
                })
            }
        };

        match self {
            Self::Append(item) => mirror.push(item.clone()),
            Self::Extend(items) => mirror.extend(items.iter().cloned()),
            Self::Insert { index, item, .. } => {
                check(*index, mirror.len() + 1)?;
                mirror.insert(*index, item.clone());
            }
            Self::Remove { index } | Self::Pop { index } => {
                let index = check(*index, mirror.len())?;
                mirror.remove(index);
            }
            Self::Clear => mirror.clear(),
            Self::Sort(items) | Self::Reverse(items) => mirror.clone_from(items),
            Self::DelItem(Deleted::Index(index)) => {
                let index = check(*index, mirror.len())?;
                mirror.remove(index);
            }
            Self::DelItem(Deleted::Slice(slice)) => {
                for index in slice.positions_descending() {
                    let index = check(index, mirror.len())?;
                    mirror.remove(index);
                }
            }
        }
        Ok(())
    }
}

/// Argument of `del_item`: a single (possibly negative) index or a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Index(isize),
    Slice(SliceSpec),
}

impl From<isize> for Deletion {
    fn from(index: isize) -> Self {
        Self::Index(index)
    }
}

impl From<SliceSpec> for Deletion {
    fn from(spec: SliceSpec) -> Self {
        Self::Slice(spec)
    }
}

impl From<Range<usize>> for Deletion {
    fn from(range: Range<usize>) -> Self {
        Self::Slice(range.into())
    }
}

/// An unresolved slice: optional start, stop and step, where negative bounds
/// count from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceSpec {
    #[must_use]
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// Everything from `start` to the end.
    #[must_use]
    pub fn from_start(start: isize) -> Self {
        Self::new(Some(start), None, None)
    }

    /// Set the step.
    #[must_use]
    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve against a sequence of length `len`.
    ///
    /// Missing bounds default by the sign of the step, negative bounds count
    /// from the end, and out-of-range bounds are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidSlice`] for a zero step.
    pub fn resolve(&self, len: usize) -> StateResult<ResolvedSlice> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(StateError::InvalidSlice);
        }
        let len = len as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };

        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(lower),
            Some(b) => b.min(upper),
        };

        let start = clamp(self.start, if step > 0 { lower } else { upper });
        let stop = clamp(self.stop, if step > 0 { upper } else { lower });
        Ok(ResolvedSlice { start, stop, step })
    }
}

impl From<Range<usize>> for SliceSpec {
    fn from(range: Range<usize>) -> Self {
        Self::new(Some(range.start as isize), Some(range.end as isize), None)
    }
}

/// A slice with concrete bounds. `stop` is exclusive and may be `-1` for a
/// descending slice that runs to the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSlice {
    pub start: isize,
    pub stop: isize,
    pub step: isize,
}

impl ResolvedSlice {
    /// Positions covered, in slice order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + use<> {
        let ResolvedSlice { start, stop, step } = *self;
        std::iter::successors(Some(start), move |i| Some(i + step))
            .take_while(move |&i| if step > 0 { i < stop } else { i > stop })
            .map(|i| i as usize)
    }

    /// Positions covered, highest first: the order in which they can be
    /// removed one at a time without shifting the ones still to go.
    #[must_use]
    pub fn positions_descending(&self) -> Vec<usize> {
        let mut positions: Vec<usize> = self.positions().collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        positions
    }

    /// Number of positions covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(spec: SliceSpec, len: usize) -> Vec<usize> {
        spec.resolve(len).expect("valid slice").positions().collect()
    }

    #[test]
    fn kind_does_not_need_clonable_items() {
        struct Handle;
        assert_eq!(ListEvent::Append(Handle).kind(), ListEventKind::Append);
        assert_eq!(ListEvent::<Handle>::Clear.kind(), ListEventKind::Clear);
        assert_eq!(
            ListEvent::<Handle>::DelItem(Deleted::Index(0)).kind(),
            ListEventKind::DelItem
        );
    }

    #[test]
    fn resolve_defaults() {
        assert_eq!(positions(SliceSpec::default(), 4), vec![0, 1, 2, 3]);
        assert_eq!(
            positions(SliceSpec::default().with_step(-1), 4),
            vec![3, 2, 1, 0]
        );
        assert_eq!(positions(SliceSpec::default().with_step(2), 5), vec![0, 2, 4]);
    }

    #[test]
    fn resolve_negative_and_clamped_bounds() {
        assert_eq!(positions(SliceSpec::from_start(-2), 5), vec![3, 4]);
        assert_eq!(positions(SliceSpec::new(Some(-10), Some(2), None), 5), vec![0, 1]);
        assert_eq!(positions(SliceSpec::new(Some(3), Some(100), None), 5), vec![3, 4]);
        assert!(positions(SliceSpec::new(Some(4), Some(1), None), 5).is_empty());
        assert_eq!(
            positions(SliceSpec::new(Some(4), Some(1), Some(-2)), 6),
            vec![4, 2]
        );
    }

    #[test]
    fn zero_step_is_invalid() {
        assert_eq!(
            SliceSpec::default().with_step(0).resolve(3),
            Err(StateError::InvalidSlice)
        );
    }

    #[test]
    fn range_conversion() {
        assert_eq!(positions((1usize..3).into(), 5), vec![1, 2]);
        assert_eq!(Deletion::from(1usize..3), Deletion::Slice(SliceSpec::from(1usize..3)));
    }

    #[test]
    fn apply_slice_deletion() {
        let mut mirror = vec!['a', 'b', 'c', 'd', 'e'];
        let slice = SliceSpec::default().with_step(2).resolve(5).expect("valid");
        ListEvent::DelItem(Deleted::Slice(slice))
            .apply_to(&mut mirror)
            .expect("in bounds");
        assert_eq!(mirror, vec!['b', 'd']);
    }

    #[test]
    fn apply_detects_drift() {
        let mut mirror: Vec<u8> = Vec::new();
        let err = ListEvent::Pop { index: 0 }.apply_to(&mut mirror);
        assert_eq!(err, Err(StateError::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn kinds() {
        assert_eq!(ListEvent::Append(1).kind(), ListEventKind::Append);
        assert_eq!(ListEvent::<i32>::Clear.kind(), ListEventKind::Clear);
        assert_eq!(
            ListEvent::<i32>::DelItem(Deleted::Index(0)).kind(),
            ListEventKind::DelItem
        );
    }
}
