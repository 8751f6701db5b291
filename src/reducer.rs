//! Reducer trait: pure state transitions.

use crate::action::Action;

/// Computes the next state from the current state and an action.
///
/// Reducers must be pure: no side effects, no reads of external mutable
/// state, deterministic for a given `(state, action)` pair. A reducer that
/// does not recognize an action must return a clone of the handle it was
/// given — the store skips the commit and all notifications when the returned
/// handle shares the current one.
///
/// Implemented for any matching closure, so plain functions work directly:
///
/// ```
/// use std::sync::Arc;
/// use fluxion::{Action, Reducer};
///
/// fn counter(state: &Arc<i64>, action: &Action) -> Arc<i64> {
///     match action.kind() {
///         "INC" => Arc::new(**state + 1),
///         _ => Arc::clone(state),
///     }
/// }
///
/// let next = counter.reduce(&Arc::new(0), &Action::new("INC"));
/// assert_eq!(*next, 1);
/// ```
pub trait Reducer<S>: Send + Sync {
    fn reduce(&self, state: &S, action: &Action) -> S;
}

impl<S, F> Reducer<S> for F
where
    F: Fn(&S, &Action) -> S + Send + Sync,
{
    fn reduce(&self, state: &S, action: &Action) -> S {
        self(state, action)
    }
}
