#![forbid(unsafe_code)]

//! Wiring state streams to ports.
//!
//! A binding has up to two edges:
//!
//! - **forward**: `state → port.controller`, optionally mapped by `to_port`
//! - **backward**: `port.stream → state`, optionally mapped by `from_port`
//!
//! The edges are independent. [`bind_two_way`] is exactly
//! [`bind_one_way`] called twice with the roles swapped.
//!
//! # Failure Modes
//!
//! - **Unsuppressed consumer**: a two-way binding relies on the consumer
//!   dropping its own notifications while a controller applies a value
//!   (see [`Controller`](crate::Controller)). A consumer that echoes anyway
//!   recurses until the stack is exhausted. Nothing detects this at runtime.

use std::rc::Rc;

use reaqt_core::{MapObserver, Observer, Stream, Subscribable, Subscription};

use crate::port::{Port, Transform};

/// The subscriptions created by one wiring call.
///
/// Dropping a `Binding` leaves the edges in place; call
/// [`dispose`](Self::dispose) to remove them.
#[derive(Debug, Default)]
pub struct Binding {
    edges: Vec<Subscription>,
}

impl Binding {
    fn from_edges(edges: Vec<Subscription>) -> Self {
        tracing::debug!(edges = edges.len(), "binding created");
        Self { edges }
    }

    /// Combine two bindings into one.
    #[must_use]
    pub fn join(mut self, other: Binding) -> Self {
        self.edges.extend(other.edges);
        self
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Remove every edge. Idempotent.
    pub fn dispose(&self) {
        for edge in &self.edges {
            edge.dispose();
        }
    }

    /// Whether every edge has been removed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.edges.iter().all(Subscription::is_disposed)
    }
}

fn edge<T: 'static>(
    source: &(impl Subscribable<T> + ?Sized),
    target: Rc<dyn Observer<T>>,
    transform: Option<Transform<T>>,
) -> Subscription {
    let observer: Rc<dyn Observer<T>> = match transform {
        Some(map) => Rc::new(MapObserver::from_shared(target, map)),
        None => target,
    };
    source.subscribe_rc(observer)
}

/// Subscribe `target` to `source`, mapping values by `transform` if given.
pub fn bind_one_way<T, S, O>(source: &S, target: &O, transform: Option<Transform<T>>) -> Binding
where
    T: 'static,
    S: Subscribable<T> + ?Sized,
    O: Observer<T> + Clone + 'static,
{
    Binding::from_edges(vec![edge(source, Rc::new(target.clone()), transform)])
}

/// Bind `state` and `port` in both directions.
///
/// Values pushed on `state` reach the port's controller (mapped by
/// `to_port`); values reported by the port reach `state` (mapped by
/// `from_port`), and from there every other subscriber of `state`.
pub fn bind_two_way<T, S>(
    state: &S,
    port: &Port<T>,
    to_port: Option<Transform<T>>,
    from_port: Option<Transform<T>>,
) -> Binding
where
    T: 'static,
    S: Subscribable<T> + Observer<T> + Clone + 'static,
{
    let forward = edge(state, Rc::clone(port.controller()), to_port);
    let backward = edge(&**port.stream(), Rc::new(state.clone()), from_port);
    Binding::from_edges(vec![forward, backward])
}

/// A forward binding plus the stream of values the port reported.
#[derive(Debug)]
pub struct InputBinding<T> {
    pub binding: Binding,
    /// Port-originated values, mapped by `from_port`. Not fed into state.
    pub input: Stream<T>,
}

impl<T> InputBinding<T> {
    pub fn dispose(&self) {
        self.binding.dispose();
    }
}

/// Bind `state → port` and expose the port's reports as a separate stream
/// instead of feeding them into `state`.
///
/// Use this when a field is derived from others and user edits must be
/// combined before they reach state: merge or combine `input` with other
/// streams and subscribe `state` to the result.
pub fn bind_with_input<T, S>(
    state: &S,
    port: &Port<T>,
    to_port: Option<Transform<T>>,
    from_port: Option<Transform<T>>,
) -> InputBinding<T>
where
    T: Clone + 'static,
    S: Subscribable<T> + ?Sized,
{
    let input = Stream::new();
    let forward = edge(state, Rc::clone(port.controller()), to_port);
    let backward = edge(&**port.stream(), Rc::new(input.clone()), from_port);
    InputBinding {
        binding: Binding::from_edges(vec![forward, backward]),
        input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::transform;
    use reaqt_core::testing::Recorder;

    fn port_pair() -> (Port<i32>, Recorder<i32>, Stream<i32>) {
        let applied = Recorder::new();
        let outbound = Stream::new();
        (Port::new(applied.clone(), outbound.clone()), applied, outbound)
    }

    #[test]
    fn one_way_forward() {
        let state = Stream::new();
        let (port, applied, _) = port_pair();
        let binding = bind_one_way(&state, &port, Some(transform(|x: &i32| x + 1)));

        state.on_next(&1);
        assert_eq!(applied.values(), vec![2]);
        assert_eq!(binding.len(), 1);

        binding.dispose();
        state.on_next(&5);
        assert_eq!(applied.values(), vec![2]);
        assert!(binding.is_disposed());
    }

    #[test]
    fn two_way_edges() {
        let state = Stream::new();
        let (port, applied, outbound) = port_pair();
        let binding = bind_two_way(
            &state,
            &port,
            Some(transform(|x: &i32| x * 10)),
            Some(transform(|x: &i32| x / 10)),
        );

        state.on_next(&3);
        assert_eq!(applied.values(), vec![30]);

        // The consumer reports 50: state becomes 5 and the forward edge
        // applies 50 again (the recorder has no suppression).
        outbound.on_next(&50);
        assert_eq!(state.current_value(), Some(5));
        assert_eq!(applied.values(), vec![30, 50]);

        binding.dispose();
        binding.dispose();
        outbound.on_next(&70);
        assert_eq!(state.current_value(), Some(5));
    }

    #[test]
    fn with_input_keeps_state_untouched() {
        let state = Stream::new();
        let (port, applied, outbound) = port_pair();
        let bound = bind_with_input(&state, &port, None, Some(transform(|x: &i32| -x)));
        let inputs = Recorder::new();
        let _sub = bound.input.subscribe(inputs.clone());

        outbound.on_next(&4);
        assert_eq!(inputs.values(), vec![-4]);
        assert_eq!(state.current_value(), None);

        state.on_next(&9);
        assert_eq!(applied.values(), vec![9]);

        bound.dispose();
        outbound.on_next(&1);
        assert_eq!(inputs.len(), 1);
    }

    #[test]
    fn join_combines_edges() {
        let a = Stream::<i32>::new();
        let b = Stream::<i32>::new();
        let binding = bind_one_way(&a, &b, None).join(bind_one_way(&b, &Recorder::new(), None));
        assert_eq!(binding.len(), 2);
        a.on_next(&1);
        assert_eq!(b.current_value(), Some(1));
        binding.dispose();
        assert!(binding.is_disposed());
    }
}
