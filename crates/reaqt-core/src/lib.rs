#![forbid(unsafe_code)]

//! Core: the observer contract and the streams of the reaqt engine.
//!
//! # Role in reaqt
//! `reaqt-core` is the bottom layer. It defines how values are pushed
//! ([`Observer`]), how they are received ([`Subscribable`], [`Subscription`]),
//! and the two stream kinds every other layer is built from.
//!
//! # Primary responsibilities
//! - **Stream** / **BehaviorStream**: cold and hot multicast streams that
//!   remember their last value.
//! - **StateStream**: either kind, picked from whether a seed value exists.
//! - **ops**: derived streams (`map`, `filter`, `merge`, `combine_latest`,
//!   `with_latest_from`), each a [`Derived`] that owns its source
//!   subscriptions.
//! - **ErrorPolicy**: what `on_error` does (report or forward).
//!
//! # How it fits in the system
//! `reaqt-state` stores its per-field values in [`StateStream`]s and emits
//! container mutations on [`Stream`]s. `reaqt-runtime` builds ports and
//! bindings on the [`Observer`] and [`Subscribable`] traits only.
//!
//! The engine is single-threaded and synchronous: every push runs to
//! completion, depth first, before the call that triggered it returns.
//!
//! # Logging
//! Every crate logs through `tracing` under its own module path, so
//! `RUST_LOG=reaqt_core=trace` shows every push.
//!
//! | Level   | Events |
//! |---------|--------|
//! | `trace` | stream pushes, list mutations, derived streams detaching |
//! | `debug` | binding creation, container snapshots, suppressed emissions |
//! | `warn`  | observer panics caught during delivery, controller errors |
//! | `error` | errors reported through `on_error` |

pub mod config;
pub mod observer;
pub mod ops;
pub mod stream;
pub mod subscribable;
pub mod subscription;

#[cfg(feature = "test-helpers")]
pub mod testing;

pub use config::ErrorPolicy;
pub use observer::{MapObserver, Observer, StreamError, report_error, with_map};
pub use ops::Derived;
pub use stream::{BehaviorStream, StateStream, Stream};
pub use subscribable::{Never, Subscribable};
pub use subscription::{Subscription, SubscriptionGuard};
