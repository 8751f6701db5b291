//! Actions: immutable, serializable descriptions of intended state changes.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::state::StateHandle;
use crate::store::Store;

/// A plain data action.
///
/// The `type` discriminant is the only structurally required field. The
/// payload and any extra fields are opaque passthrough data: reducers,
/// middleware, and subscribers must not assign meaning to fields they do not
/// recognize. Actions serialize to the open `{ "type": ..., "payload": ... }`
/// shape so middleware can log and replay them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Action {
    /// Create an action with the given type discriminant and no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
            extra: Map::new(),
        }
    }

    /// Create an action carrying a payload.
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
            extra: Map::new(),
        }
    }

    /// Attach an extra top-level field, preserved verbatim through dispatch.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Read an extra top-level field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        if self.kind.is_empty() {
            return Err(StoreError::InvalidAction {
                reason: "action type discriminant is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Boxed future produced by a [`Thunk`].
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A deferred computation dispatched in place of a plain action.
///
/// The thunk is invoked with a cloned [`Store`] handle and may issue zero or
/// more follow-up dispatches, including after awaited I/O. Thunks never reach
/// the reducer: [`ThunkMiddleware`](crate::middleware::ThunkMiddleware)
/// intercepts them, and a chain configured without it rejects the dispatch.
pub struct Thunk<S: StateHandle> {
    run: Box<dyn FnOnce(Store<S>) -> BoxFuture + Send>,
    label: &'static str,
}

impl<S: StateHandle> Thunk<S> {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(Store<S>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::named("thunk", f)
    }

    /// Create a thunk with a label used in trace output.
    pub fn named<F, Fut>(label: &'static str, f: F) -> Self
    where
        F: FnOnce(Store<S>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            run: Box::new(move |store| Box::pin(f(store))),
            label,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub(crate) fn into_future(self, store: Store<S>) -> BoxFuture {
        (self.run)(store)
    }
}

/// What [`dispatch`](crate::store::Store::dispatch) accepts: either a plain
/// data action or a deferred computation.
pub enum Dispatchable<S: StateHandle> {
    Action(Action),
    Thunk(Thunk<S>),
}

impl<S: StateHandle> fmt::Debug for Dispatchable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatchable::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Dispatchable::Thunk(thunk) => write!(f, "Thunk({})", thunk.label()),
        }
    }
}

impl<S: StateHandle> From<Action> for Dispatchable<S> {
    fn from(action: Action) -> Self {
        Dispatchable::Action(action)
    }
}

impl<S: StateHandle> From<Thunk<S>> for Dispatchable<S> {
    fn from(thunk: Thunk<S>) -> Self {
        Dispatchable::Thunk(thunk)
    }
}
