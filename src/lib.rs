//! Predictable unidirectional state container with middleware interception.
//!
//! # Architecture
//!
//! ```text
//! dispatch(action) ──→ middleware chain ──→ reducer ──→ commit ──→ notify
//!        ↑                    │
//!        └── follow-up ───────┘ (thunks, deferred work)
//! ```
//!
//! - **State**: an immutable value behind a cheap handle; only ever replaced
//!   wholesale by a reducer's return value.
//! - **Action**: serializable data with a `type` discriminant.
//! - **Reducer**: pure function `(state, action) -> state`; unrecognized
//!   actions return the same handle, which suppresses commit and
//!   notification.
//! - **Middleware**: ordered interceptors wrapping dispatch; may transform,
//!   defer, or swallow actions.
//! - **Slices**: named sub-reducers combined into one whole-state reducer.
//!
//! ```
//! use std::sync::Arc;
//! use fluxion::{Action, Store};
//!
//! let store = Store::new(
//!     |state: &Arc<i64>, action: &Action| match action.kind() {
//!         "INC" => Arc::new(**state + 1),
//!         _ => Arc::clone(state),
//!     },
//!     Arc::new(0),
//! );
//! store.dispatch(Action::new("INC")).unwrap();
//! assert_eq!(*store.state(), 1);
//! ```

pub mod action;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod slice;
pub mod state;
pub mod store;
pub mod subscription;

pub use action::{Action, BoxFuture, Dispatchable, Thunk};
pub use error::{DynError, StoreError};
pub use middleware::{
    DispatchResult, Dispatched, Middleware, Next, RecordMiddleware, ThunkMiddleware,
    TraceMiddleware,
};
pub use reducer::Reducer;
pub use slice::{ComposedReducer, SliceMap, SliceMapBuilder, SliceRegistry, SliceValue};
pub use state::StateHandle;
pub use store::{Store, StoreBuilder};
pub use subscription::Subscription;
