//! Error types for store construction and dispatch.

use thiserror::Error;

/// Boxed error source produced by user middleware.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`dispatch`](crate::store::Store::dispatch) and by
/// slice composition.
///
/// Nothing is swallowed internally: every error propagates synchronously to
/// the immediate caller, and a failing dispatch never leaves a partial
/// commit behind. Panics raised by user reducers or middleware unwind out of
/// `dispatch` unmodified under the same guarantee.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The dispatched value lacks a usable type discriminant, or a callable
    /// action reached the reducer step.
    #[error("invalid action: {reason}")]
    InvalidAction { reason: String },

    /// `dispatch` was called from inside an active reducer evaluation.
    #[error("dispatch called from inside an active reducer")]
    ReentrantDispatch,

    /// A preloaded state key has no registered slice reducer. Raised at
    /// composition time so the mismatch cannot silently drop data at runtime.
    #[error("no slice reducer registered for state key '{key}'")]
    UnknownSlice { key: String },

    /// A preloaded slice value's type does not match the type registered for
    /// its key. Raised at composition time, like
    /// [`UnknownSlice`](StoreError::UnknownSlice).
    #[error("preloaded value for slice '{key}' does not match its registered type")]
    SliceTypeMismatch { key: String },

    /// A thunk was dispatched but no tokio runtime is available to run it.
    #[error("thunk dispatched outside a tokio runtime")]
    NoAsyncRuntime,

    /// A middleware failed while handling an action.
    #[error("middleware '{name}' failed: {source}")]
    Middleware {
        name: &'static str,
        #[source]
        source: DynError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_slice_names_the_key() {
        let err = StoreError::UnknownSlice {
            key: "session".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no slice reducer registered for state key 'session'"
        );
    }

    #[test]
    fn middleware_error_carries_source() {
        let source: DynError = "connection reset".into();
        let err = StoreError::Middleware {
            name: "flaky",
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("flaky"));
    }
}
