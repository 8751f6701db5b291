//! Shared test fixtures.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fluxion::{Action, StateHandle, Store};

/// Minimal counter state used across the dispatch tests.
#[derive(Debug, PartialEq)]
pub struct Counter {
    pub count: i64,
}

pub fn counter_state(count: i64) -> Arc<Counter> {
    Arc::new(Counter { count })
}

/// Reducer handling `INC` and `ADD` (payload: integer amount); everything
/// else is a referential no-op.
pub fn counter_reducer(state: &Arc<Counter>, action: &Action) -> Arc<Counter> {
    match action.kind() {
        "INC" => Arc::new(Counter {
            count: state.count + 1,
        }),
        "ADD" => {
            let amount = action.payload().and_then(|v| v.as_i64()).unwrap_or(0);
            Arc::new(Counter {
                count: state.count + amount,
            })
        }
        _ => Arc::clone(state),
    }
}

/// Subscribe a counting listener and return the shared counter.
///
/// The subscription handle is intentionally dropped: the listener stays
/// registered for the life of the store.
pub fn count_notifications<S: StateHandle>(store: &Store<S>) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&count);
    store.subscribe(move || {
        probe.fetch_add(1, Ordering::SeqCst);
    });
    count
}
