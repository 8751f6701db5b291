//! Logging middleware built on `tracing`.

use crate::action::Dispatchable;
use crate::middleware::{DispatchResult, Middleware, Next};
use crate::state::StateHandle;
use crate::store::Store;

/// Logs every action and its dispatch outcome at debug level.
#[derive(Debug, Default)]
pub struct TraceMiddleware;

impl TraceMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S: StateHandle> Middleware<S> for TraceMiddleware {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn handle(
        &self,
        _store: &Store<S>,
        action: Dispatchable<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        let label = match &action {
            Dispatchable::Action(action) => action.kind().to_string(),
            Dispatchable::Thunk(thunk) => format!("<{}>", thunk.label()),
        };
        let result = next.run(action);
        match &result {
            Ok(outcome) => tracing::debug!(action = %label, ?outcome, "dispatched"),
            Err(err) => tracing::debug!(action = %label, %err, "dispatch failed"),
        }
        result
    }
}
