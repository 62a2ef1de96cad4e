#![forbid(unsafe_code)]

//! Errors raised by container operations.

use std::fmt;

/// Broad class of a [`StateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The operation is not allowed on this container or slot.
    Misuse,
    /// An index or slice fell outside the container.
    Bounds,
    /// A value looked up by equality is not present.
    NotFound,
}

/// Error returned by [`RxList`](crate::RxList) and [`RxMap`](crate::RxMap)
/// operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Direct index assignment on a list. Use a named operation instead.
    ItemAssignment { index: isize },
    /// The map has no such key.
    UnknownKey(String),
    /// The key exists but holds a different kind of slot.
    SlotMismatch { key: String, expected: &'static str },
    /// The key already exists; a key's slot never changes once created.
    DuplicateKey(String),
    /// Index outside `0..len` after resolving negative indices.
    IndexOutOfRange { index: isize, len: usize },
    /// Slice with a zero step.
    InvalidSlice,
    /// `remove` found no equal element.
    ValueNotFound,
}

impl StateError {
    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ItemAssignment { .. }
            | Self::UnknownKey(_)
            | Self::SlotMismatch { .. }
            | Self::DuplicateKey(_) => ErrorKind::Misuse,
            Self::IndexOutOfRange { .. } | Self::InvalidSlice => ErrorKind::Bounds,
            Self::ValueNotFound => ErrorKind::NotFound,
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemAssignment { index } => write!(
                f,
                "cannot assign to list index {index}; use a mutating operation"
            ),
            Self::UnknownKey(key) => write!(f, "unknown key '{key}'"),
            Self::SlotMismatch { key, expected } => {
                write!(f, "key '{key}' does not hold a {expected}")
            }
            Self::DuplicateKey(key) => write!(f, "key '{key}' already exists"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (length {len})")
            }
            Self::InvalidSlice => write!(f, "slice step cannot be zero"),
            Self::ValueNotFound => write!(f, "value not found in list"),
        }
    }
}

impl std::error::Error for StateError {}

/// Result alias for container operations.
pub type StateResult<T> = Result<T, StateError>;
