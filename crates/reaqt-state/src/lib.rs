#![forbid(unsafe_code)]

//! Reactive containers for reaqt.
//!
//! # Role in reaqt
//! `reaqt-state` turns in-place mutation into streams. An [`RxList`]
//! reports each change as a structured [`ListEvent`]; an [`RxMap`] gives each
//! field its own stream (or nested container). Both can be frozen into plain
//! [`Value`] snapshots.
//!
//! # Primary responsibilities
//! - **RxList**: named mutations only, one event per mutation, then the new
//!   length. Events replay exactly on a mirror (`ListEvent::apply_to`).
//! - **RxMap**: fixed per-key slots; writing a key pushes to its stream.
//! - **Container**: `freeze` and `debug` for both.
//! - **StateError**: misuse, bounds and lookup failures.
//!
//! # Example
//! ```
//! use reaqt_state::{Container, ListEventKind, RxList};
//! use reaqt_core::Subscribable;
//!
//! let list = RxList::new(Vec::<char>::new());
//! let _sub = list
//!     .events()
//!     .subscribe(|event: &reaqt_state::ListEvent<char>| {
//!         assert_eq!(event.kind(), ListEventKind::Append);
//!     });
//! list.append('x');
//! assert_eq!(list.freeze(), vec!['x']);
//! ```

pub mod container;
pub mod error;
pub mod event;
pub mod list;
pub mod map;
pub mod value;

pub use container::Container;
pub use error::{ErrorKind, StateError, StateResult};
pub use event::{Deleted, Deletion, ListEvent, ListEventKind, ResolvedSlice, SliceSpec};
pub use list::RxList;
pub use map::{RxMap, Seed, Slot};
pub use value::Value;
