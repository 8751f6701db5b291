//! The store: single owner of current state, mutated only through reducers.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};

use crate::action::Dispatchable;
use crate::error::StoreError;
use crate::middleware::{DispatchResult, Dispatched, Middleware, Next, ThunkMiddleware};
use crate::reducer::Reducer;
use crate::state::StateHandle;
use crate::subscription::{SubscriberRegistry, Subscription};

/// A predictable state container.
///
/// Holds the current state handle and exposes the three-method surface
/// external collaborators consume: [`state`](Store::state),
/// [`dispatch`](Store::dispatch), and [`subscribe`](Store::subscribe).
/// Cloning yields another handle to the same store, so middleware and thunks
/// can carry one into deferred work.
///
/// Dispatch of a plain action is fully synchronous: the middleware chain,
/// the reducer, the commit, and all subscriber notifications complete before
/// `dispatch` returns. Reducer evaluation and the commit are atomic — a
/// panic or error anywhere in the pass leaves the previously committed
/// handle in place.
pub struct Store<S: StateHandle> {
    inner: Arc<StoreInner<S>>,
}

struct StoreInner<S: StateHandle> {
    state: RwLock<S>,
    reducer: Box<dyn Reducer<S>>,
    chain: Vec<Arc<dyn Middleware<S>>>,
    subscribers: SubscriberRegistry,
    // Serializes reducer evaluation + commit; at most one in-flight commit.
    commit: Mutex<()>,
    // Thread currently evaluating a reducer, for reentrancy detection.
    reducing: Mutex<Option<ThreadId>>,
}

impl<S: StateHandle> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StateHandle> Store<S> {
    /// Create a store with the default middleware chain
    /// ([`ThunkMiddleware`] only).
    pub fn new(reducer: impl Reducer<S> + 'static, initial: S) -> Self {
        Self::builder(reducer, initial).build()
    }

    /// Start configuring a store. The builder begins with the default chain;
    /// see [`StoreBuilder::append_middleware`] and
    /// [`StoreBuilder::replace_middleware`].
    pub fn builder(reducer: impl Reducer<S> + 'static, initial: S) -> StoreBuilder<S> {
        StoreBuilder {
            reducer: Box::new(reducer),
            initial,
            chain: vec![Arc::new(ThunkMiddleware::new())],
        }
    }

    /// Current state handle. Cheap, never blocks dispatch.
    pub fn state(&self) -> S {
        self.inner.state.read().clone()
    }

    /// Dispatch a plain action or a thunk.
    ///
    /// Plain actions run the whole chain synchronously and report how the
    /// pass ended. Errors propagate to the caller with no partial commit;
    /// panics from user reducers or middleware unwind the same way.
    pub fn dispatch(&self, action: impl Into<Dispatchable<S>>) -> DispatchResult {
        let action = action.into();
        if let Dispatchable::Action(plain) = &action {
            plain.validate()?;
        }
        self.check_reentrancy()?;
        Next::new(&self.inner.chain, self).run(action)
    }

    /// Register a listener called after every committed transition.
    ///
    /// Listeners receive no arguments; read the result via
    /// [`state`](Store::state). Subscribing the same callback twice yields
    /// two independent subscriptions.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.inner.subscribers.subscribe(listener)
    }

    /// Terminal stage of the middleware chain: evaluate the reducer and
    /// commit.
    pub(crate) fn commit_action(&self, action: Dispatchable<S>) -> DispatchResult {
        let action = match action {
            Dispatchable::Action(plain) => plain,
            Dispatchable::Thunk(thunk) => {
                return Err(StoreError::InvalidAction {
                    reason: format!(
                        "callable action '{}' reached the reducer; the chain has no ThunkMiddleware",
                        thunk.label()
                    ),
                });
            }
        };
        // A middleware may have rewritten the action since the entry check.
        action.validate()?;
        self.check_reentrancy()?;

        {
            let _commit = self.inner.commit.lock();
            *self.inner.reducing.lock() = Some(thread::current().id());
            let reducing = &self.inner.reducing;
            let marker = scopeguard::guard((), move |()| {
                *reducing.lock() = None;
            });
            let prev = self.inner.state.read().clone();
            let next = self.inner.reducer.reduce(&prev, &action);
            drop(marker);
            if next.shares(&prev) {
                tracing::trace!(kind = action.kind(), "action left state untouched");
                return Ok(Dispatched::Unchanged);
            }
            *self.inner.state.write() = next;
        }
        // Commit lock released: listeners may dispatch follow-up actions.
        tracing::trace!(kind = action.kind(), "state committed");
        self.inner.subscribers.notify();
        Ok(Dispatched::Committed)
    }

    fn check_reentrancy(&self) -> Result<(), StoreError> {
        if *self.inner.reducing.lock() == Some(thread::current().id()) {
            return Err(StoreError::ReentrantDispatch);
        }
        Ok(())
    }
}

/// Configures a [`Store`] before construction.
///
/// The middleware chain is fixed once [`build`](StoreBuilder::build) runs;
/// stages cannot be added or removed afterwards. Extending the default chain
/// and discarding it are two distinct, explicitly named operations — there is
/// no overload to infer intent from.
pub struct StoreBuilder<S: StateHandle> {
    reducer: Box<dyn Reducer<S>>,
    initial: S,
    chain: Vec<Arc<dyn Middleware<S>>>,
}

impl<S: StateHandle> StoreBuilder<S> {
    /// Add a stage after the current chain (defaults included).
    pub fn append_middleware(mut self, middleware: impl Middleware<S>) -> Self {
        self.chain.push(Arc::new(middleware));
        self
    }

    /// Discard the chain (defaults included) and install exactly the given
    /// stages, in order.
    pub fn replace_middleware(mut self, chain: Vec<Arc<dyn Middleware<S>>>) -> Self {
        self.chain = chain;
        self
    }

    pub fn build(self) -> Store<S> {
        Store {
            inner: Arc::new(StoreInner {
                state: RwLock::new(self.initial),
                reducer: self.reducer,
                chain: self.chain,
                subscribers: SubscriberRegistry::new(),
                commit: Mutex::new(()),
                reducing: Mutex::new(None),
            }),
        }
    }
}
