#![forbid(unsafe_code)]

//! Reactive map.
//!
//! An [`RxMap`] gives every key its own slot, created once when the key is
//! added: a stream for plain values, or a nested container. Writing a key
//! pushes to the existing stream, so subscriptions taken on a key stay valid
//! for the lifetime of the map.
//!
//! Seeding decides the slot kind:
//!
//! | Seed                   | Slot                         |
//! |------------------------|------------------------------|
//! | `Value::Nothing`       | cold stream, no value yet    |
//! | any other `Value`      | hot stream seeded with it    |
//! | `RxList<Value>`        | the list, stored as-is       |
//! | `RxMap`                | the map, stored as-is        |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use reaqt_core::{Observer, StateStream};

use crate::container::Container;
use crate::error::{StateError, StateResult};
use crate::list::RxList;
use crate::value::Value;

/// What a key holds.
#[derive(Clone)]
pub enum Slot {
    Stream(StateStream<Value>),
    List(RxList<Value>),
    Map(RxMap),
}

impl Slot {
    /// Name used in mismatch errors.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Stream(_) => "stream",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Plain snapshot of the slot.
    #[must_use]
    pub fn freeze(&self) -> Value {
        match self {
            Self::Stream(stream) => stream.current_value().unwrap_or_default(),
            Self::List(list) => Value::List(list.freeze()),
            Self::Map(map) => map.freeze_value(),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(stream) => f.debug_tuple("Stream").field(stream).finish(),
            Self::List(list) => f.debug_tuple("List").field(list).finish(),
            Self::Map(map) => f.debug_tuple("Map").field(map).finish(),
        }
    }
}

/// Initial content for a key.
#[derive(Debug, Clone)]
pub enum Seed {
    Value(Value),
    List(RxList<Value>),
    Map(RxMap),
}

impl Seed {
    fn into_slot(self) -> Slot {
        match self {
            Self::Value(Value::Nothing) => Slot::Stream(StateStream::from_initial(None)),
            Self::Value(value) => Slot::Stream(StateStream::from_initial(Some(value))),
            Self::List(list) => Slot::List(list),
            Self::Map(map) => Slot::Map(map),
        }
    }
}

impl From<Value> for Seed {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<RxList<Value>> for Seed {
    fn from(list: RxList<Value>) -> Self {
        Self::List(list)
    }
}

impl From<RxMap> for Seed {
    fn from(map: RxMap) -> Self {
        Self::Map(map)
    }
}

impl From<bool> for Seed {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for Seed {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Seed {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for Seed {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

/// A keyed record whose fields are streams or nested containers.
///
/// Cloning an `RxMap` creates a new handle to the **same** map.
#[derive(Clone, Default)]
pub struct RxMap {
    slots: Rc<RefCell<IndexMap<String, Slot>>>,
}

impl fmt::Debug for RxMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.slots.borrow().iter()).finish()
    }
}

impl RxMap {
    /// Build a map from `(key, seed)` pairs, in order.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::DuplicateKey`] if a key repeats.
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> StateResult<Self>
    where
        K: Into<String>,
        V: Into<Seed>,
    {
        let map = Self::default();
        map.add_items(entries)?;
        Ok(map)
    }

    /// Add keys. Keys before the first duplicate are kept.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::DuplicateKey`] for a key that already exists.
    pub fn add_items<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> StateResult<()>
    where
        K: Into<String>,
        V: Into<Seed>,
    {
        for (key, seed) in entries {
            let key = key.into();
            let mut slots = self.slots.borrow_mut();
            if slots.contains_key(&key) {
                tracing::warn!(key = %key, "duplicate map key");
                return Err(StateError::DuplicateKey(key));
            }
            let slot = seed.into().into_slot();
            tracing::trace!(key = %key, slot = slot.kind_name(), "map key added");
            slots.insert(key, slot);
        }
        Ok(())
    }

    /// The slot for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownKey`] if the key is absent.
    pub fn get(&self, key: &str) -> StateResult<Slot> {
        self.slots
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| StateError::UnknownKey(key.to_owned()))
    }

    /// The stream for `key`.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownKey`] or [`StateError::SlotMismatch`].
    pub fn stream(&self, key: &str) -> StateResult<StateStream<Value>> {
        match self.get(key)? {
            Slot::Stream(stream) => Ok(stream),
            _ => Err(mismatch(key, "stream")),
        }
    }

    /// The nested list for `key`.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownKey`] or [`StateError::SlotMismatch`].
    pub fn list(&self, key: &str) -> StateResult<RxList<Value>> {
        match self.get(key)? {
            Slot::List(list) => Ok(list),
            _ => Err(mismatch(key, "list")),
        }
    }

    /// The nested map for `key`.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownKey`] or [`StateError::SlotMismatch`].
    pub fn map(&self, key: &str) -> StateResult<RxMap> {
        match self.get(key)? {
            Slot::Map(map) => Ok(map),
            _ => Err(mismatch(key, "map")),
        }
    }

    /// Push `value` on the stream of `key`.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownKey`], or [`StateError::SlotMismatch`] when the
    /// key holds a container.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> StateResult<()> {
        let stream = self.stream(key)?;
        stream.on_next(&value.into());
        Ok(())
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.slots.borrow().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.borrow().contains_key(key)
    }

    /// [`freeze`](Container::freeze) wrapped as a [`Value::Map`].
    #[must_use]
    pub fn freeze_value(&self) -> Value {
        Value::Map(self.freeze())
    }
}

fn mismatch(key: &str, expected: &'static str) -> StateError {
    StateError::SlotMismatch {
        key: key.to_owned(),
        expected,
    }
}

impl Container for RxMap {
    type Snapshot = IndexMap<String, Value>;

    fn freeze(&self) -> IndexMap<String, Value> {
        // Clone the slots first so nested freezes never overlap this borrow.
        let slots: Vec<(String, Slot)> = self
            .slots
            .borrow()
            .iter()
            .map(|(key, slot)| (key.clone(), slot.clone()))
            .collect();
        slots
            .into_iter()
            .map(|(key, slot)| (key, slot.freeze()))
            .collect()
    }
}
