//! Middleware: composable interceptors wrapping the dispatch pipeline.
//!
//! Middleware are installed once at store construction and composed into a
//! single augmented dispatch: each interceptor receives the action and a
//! [`Next`] continuation for the rest of the chain, with the core reducer
//! step as the terminal stage. An interceptor may forward the action
//! unchanged, transform it first, hold on to a cloned store handle and
//! dispatch again later, or drop the action entirely.

mod record;
mod thunk;
mod trace;

pub use record::RecordMiddleware;
pub use thunk::ThunkMiddleware;
pub use trace::TraceMiddleware;

use std::sync::Arc;

use crate::action::Dispatchable;
use crate::error::StoreError;
use crate::state::StateHandle;
use crate::store::Store;

/// Outcome of a dispatch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The reducer produced a new state and subscribers were notified.
    Committed,
    /// The reducer returned the same handle; no commit, no notification.
    Unchanged,
    /// A middleware declined to forward the action. A no-op by design,
    /// not an error.
    Absorbed,
    /// A thunk was handed to the async helper; follow-up dispatches happen
    /// on their own passes.
    Deferred,
}

pub type DispatchResult = Result<Dispatched, StoreError>;

/// An interceptor stage in the dispatch chain.
pub trait Middleware<S: StateHandle>: Send + Sync + 'static {
    /// Name used in trace output and error reporting.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Handle one action.
    ///
    /// `store` is bound to the owning store for `state()` reads and follow-up
    /// dispatches; calling `store.dispatch` here re-enters the whole chain
    /// from the top. Forward with `next.run(action)`, or drop `next` to
    /// swallow the action and return [`Dispatched::Absorbed`].
    fn handle(&self, store: &Store<S>, action: Dispatchable<S>, next: Next<'_, S>)
        -> DispatchResult;
}

/// Continuation over the remaining stages of the chain.
///
/// Consumed on use: a stage forwards at most once.
pub struct Next<'a, S: StateHandle> {
    rest: &'a [Arc<dyn Middleware<S>>],
    store: &'a Store<S>,
}

impl<'a, S: StateHandle> Next<'a, S> {
    pub(crate) fn new(rest: &'a [Arc<dyn Middleware<S>>], store: &'a Store<S>) -> Self {
        Self { rest, store }
    }

    /// Run the rest of the chain, terminating at the core reducer step.
    pub fn run(self, action: Dispatchable<S>) -> DispatchResult {
        match self.rest.split_first() {
            Some((stage, rest)) => stage.handle(self.store, action, Next::new(rest, self.store)),
            None => self.store.commit_action(action),
        }
    }
}
