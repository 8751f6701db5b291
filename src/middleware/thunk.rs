//! Async action helper: runs dispatched callables on the tokio runtime.

use crate::action::Dispatchable;
use crate::error::StoreError;
use crate::middleware::{DispatchResult, Dispatched, Middleware, Next};
use crate::state::StateHandle;
use crate::store::Store;

/// Intercepts [`Thunk`](crate::action::Thunk) dispatches and spawns them on
/// the ambient tokio runtime with a cloned store handle.
///
/// Installed first in the default chain so no later stage ever sees a
/// callable. Plain actions pass straight through. The thunk itself decides
/// when (and whether) to issue follow-up dispatches; each one is a fresh
/// synchronous pass through the whole chain.
#[derive(Debug, Default)]
pub struct ThunkMiddleware;

impl ThunkMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S: StateHandle> Middleware<S> for ThunkMiddleware {
    fn name(&self) -> &'static str {
        "thunk"
    }

    fn handle(
        &self,
        store: &Store<S>,
        action: Dispatchable<S>,
        next: Next<'_, S>,
    ) -> DispatchResult {
        match action {
            Dispatchable::Thunk(thunk) => {
                let runtime =
                    tokio::runtime::Handle::try_current().map_err(|_| StoreError::NoAsyncRuntime)?;
                tracing::debug!(label = thunk.label(), "spawning thunk");
                runtime.spawn(thunk.into_future(store.clone()));
                Ok(Dispatched::Deferred)
            }
            plain => next.run(plain),
        }
    }
}
