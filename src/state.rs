//! Base trait for state values owned by a [`Store`](crate::store::Store).

use std::sync::Arc;

/// Handle to an immutable state value.
///
/// States are never mutated in place: a reducer replaces the whole value by
/// returning a new handle. A handle is a cheap clone (an `Arc`), and
/// allocation identity is what marks a no-op transition — a reducer that does
/// not recognize an action returns a clone of the handle it was given, and the
/// store detects this with [`shares`](StateHandle::shares) to skip the commit
/// and subscriber notification entirely.
pub trait StateHandle: Clone + Send + Sync + 'static {
    /// True when both handles refer to the same underlying allocation.
    fn shares(&self, other: &Self) -> bool;
}

impl<T: ?Sized + Send + Sync + 'static> StateHandle for Arc<T> {
    fn shares(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}
