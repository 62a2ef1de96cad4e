#![forbid(unsafe_code)]

//! Binding protocol for reaqt.
//!
//! # Role in reaqt
//! `reaqt-runtime` connects state streams to external consumers (controls,
//! labels, containers of children) without ever naming a concrete consumer
//! type. A consumer takes part through three capabilities:
//!
//! - an apply target, wrapped in a [`Controller`],
//! - an outbound [`Signal`] for locally originated changes,
//! - [`Suppressible`], so applying a value never re-triggers the signal.
//!
//! # Primary responsibilities
//! - **Port**: `(controller, stream)` pair, wired like a plain stream.
//! - **Bindings**: [`bind_one_way`], [`bind_two_way`], [`bind_with_input`].
//! - **Suppression**: [`SuppressionGuard`] scopes around every apply.
//! - **ListRenderer**: incremental child reconciliation from list events.
//! - **Switch** / [`cond`]: content chosen from a value or boolean streams.
//!
//! # Example
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use reaqt_core::{Observer, Stream};
//! use reaqt_runtime::{Controller, Port, Signal, Suppressible, bind_two_way};
//!
//! struct Slider {
//!     value: RefCell<i32>,
//!     moved: Signal<i32>,
//! }
//!
//! impl Suppressible for Slider {
//!     fn set_suppressed(&self, suppressed: bool) -> bool {
//!         self.moved.set_suppressed(suppressed)
//!     }
//! }
//!
//! let slider = Rc::new(Slider { value: RefCell::new(0), moved: Signal::new() });
//! let port = Port::new(
//!     Controller::new(Rc::clone(&slider), |s: &Slider, v: &i32| {
//!         *s.value.borrow_mut() = *v;
//!         s.moved.emit(v);
//!     }),
//!     slider.moved.clone(),
//! );
//!
//! let height = Stream::new();
//! let _binding = bind_two_way(&height, &port, None, None);
//!
//! height.on_next(&172);
//! assert_eq!(*slider.value.borrow(), 172);
//!
//! slider.moved.emit(&180);
//! assert_eq!(height.current_value(), Some(180));
//! ```

pub mod binding;
pub mod controller;
pub mod port;
pub mod renderer;
pub mod signal;
pub mod suppress;
pub mod switch;

pub use binding::{Binding, InputBinding, bind_one_way, bind_two_way, bind_with_input};
pub use controller::Controller;
pub use port::{Port, Transform, transform};
pub use renderer::{ChildHost, ListRenderer};
pub use signal::Signal;
pub use suppress::{SuppressFlag, Suppressible, SuppressionGuard, suppressed};
pub use switch::{BranchHost, Builder, Cond, Predicate, Switch, cond};
