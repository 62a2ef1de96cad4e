#![forbid(unsafe_code)]

//! reaqt public facade crate.
//!
//! Re-exports the layers under stable names, and a prelude with the types
//! most wiring code needs.

pub use reaqt_core as core;
#[cfg(feature = "runtime")]
pub use reaqt_runtime as runtime;
pub use reaqt_state as state;

pub mod prelude {
    pub use reaqt_core::ops::{combine_latest, filter, map, merge, with_latest_from};
    pub use reaqt_core::{
        BehaviorStream, Derived, ErrorPolicy, Never, Observer, StateStream, Stream, StreamError,
        Subscribable, Subscription, SubscriptionGuard,
    };
    #[cfg(feature = "runtime")]
    pub use reaqt_runtime::{
        Binding, BranchHost, ChildHost, Controller, ListRenderer, Port, Signal, Suppressible,
        SuppressionGuard, Switch, Transform, bind_one_way, bind_two_way, bind_with_input, cond,
        transform,
    };
    pub use reaqt_state::{
        Container, ListEvent, ListEventKind, RxList, RxMap, Seed, SliceSpec, Slot, StateError,
        Value,
    };
}
