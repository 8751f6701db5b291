//! Action recording for replay and devtools-style inspection.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::action::{Action, Dispatchable};
use crate::middleware::{DispatchResult, Middleware, Next};
use crate::state::StateHandle;
use crate::store::Store;

/// Captures every plain action that passes through it, in dispatch order.
///
/// Thunks are not recorded; only the plain actions they eventually dispatch
/// are, which is exactly the replayable log. Clones share the same log, so a
/// handle kept by the caller keeps observing actions after the middleware is
/// handed to the store:
///
/// ```no_run
/// use std::sync::Arc;
/// use fluxion::{Action, RecordMiddleware, Store};
///
/// let record = RecordMiddleware::new();
/// let store = Store::builder(
///     |state: &Arc<i64>, _: &Action| Arc::clone(state),
///     Arc::new(0),
/// )
/// .append_middleware(record.clone())
/// .build();
///
/// store.dispatch(Action::new("tick")).unwrap();
/// assert_eq!(record.recorded().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordMiddleware {
    log: Arc<Mutex<Vec<Action>>>,
}

impl RecordMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded actions.
    pub fn recorded(&self) -> Vec<Action> {
        self.log.lock().clone()
    }

    /// Drain the log, returning everything recorded so far.
    pub fn take(&self) -> Vec<Action> {
        std::mem::take(&mut *self.log.lock())
    }

    /// Serialize the log as a JSON array, suitable for replaying later.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.log.lock())
    }
}

impl<S: StateHandle> Middleware<S> for RecordMiddleware {
    fn name(&self) -> &'static str {
        "record"
    }

    fn handle(
        &self,
        _store: &Store<S>,
        action: Dispatchable<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        if let Dispatchable::Action(plain) = &action {
            self.log.lock().push(plain.clone());
        }
        next.run(action)
    }
}
