//! Slice composition: combining named per-slice reducers into one
//! whole-state reducer.
//!
//! Whole state is a keyed map from slice name to slice value. Slices hold
//! heterogeneous types behind `Arc<dyn Any>`; registration captures the
//! concrete type in a closure so each slice reducer stays fully typed.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::action::Action;
use crate::error::StoreError;
use crate::reducer::Reducer;
use crate::state::StateHandle;

/// Type-erased handle to one slice's state.
pub type SliceValue = Arc<dyn Any + Send + Sync>;

type BoxSliceReducer = Box<dyn Fn(&SliceValue, &Action) -> SliceValue + Send + Sync>;

/// Whole-state value for a composed store: slice name to slice state.
///
/// Cloning is cheap, and the handle identity marks no-op transitions just
/// like any other [`StateHandle`].
#[derive(Clone)]
pub struct SliceMap {
    slices: Arc<BTreeMap<String, SliceValue>>,
}

impl SliceMap {
    pub fn builder() -> SliceMapBuilder {
        SliceMapBuilder {
            slices: BTreeMap::new(),
        }
    }

    /// Read one slice, downcast to its concrete type.
    ///
    /// Returns `None` when the key is absent or registered with a different
    /// type.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.slices.get(key)?.clone().downcast::<T>().ok()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub(crate) fn raw(&self, key: &str) -> Option<&SliceValue> {
        self.slices.get(key)
    }
}

impl fmt::Debug for SliceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceMap")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StateHandle for SliceMap {
    fn shares(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slices, &other.slices)
    }
}

/// Builds a [`SliceMap`] by hand, e.g. for state preloaded from a snapshot.
pub struct SliceMapBuilder {
    slices: BTreeMap<String, SliceValue>,
}

impl SliceMapBuilder {
    pub fn slice<T: Send + Sync + 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        let value: SliceValue = Arc::new(value);
        self.slices.insert(key.into(), value);
        self
    }

    pub fn build(self) -> SliceMap {
        SliceMap {
            slices: Arc::new(self.slices),
        }
    }
}

struct SliceSlot {
    initial: SliceValue,
    // Concrete type registered for this slice; preloads must match.
    accepts: TypeId,
    reduce: BoxSliceReducer,
}

/// Registry of named slice reducers, consumed by
/// [`combine`](SliceRegistry::combine) into a whole-state reducer.
#[derive(Default)]
pub struct SliceRegistry {
    slots: BTreeMap<String, SliceSlot>,
}

impl SliceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed slice with its initial value and reducer.
    ///
    /// The reducer sees only its own slice and follows the usual contract:
    /// return a clone of the given handle for unrecognized actions.
    pub fn slice<T, R>(mut self, key: impl Into<String>, initial: T, reducer: R) -> Self
    where
        T: Send + Sync + 'static,
        R: Fn(&Arc<T>, &Action) -> Arc<T> + Send + Sync + 'static,
    {
        let wrapped = move |value: &SliceValue, action: &Action| -> SliceValue {
            let typed = value
                .clone()
                .downcast::<T>()
                .expect("slice value type drifted from its registration");
            let next = reducer(&typed, action);
            if Arc::ptr_eq(&next, &typed) {
                // Hand back the stored handle so identity survives erasure.
                return Arc::clone(value);
            }
            let widened: SliceValue = next;
            widened
        };
        let initial: SliceValue = Arc::new(initial);
        self.slots.insert(
            key.into(),
            SliceSlot {
                initial,
                accepts: TypeId::of::<T>(),
                reduce: Box::new(wrapped),
            },
        );
        self
    }

    /// Consume the registry, producing the composed reducer and the initial
    /// whole-state assembled from each slice's initial value.
    pub fn combine(self) -> (ComposedReducer, SliceMap) {
        let initial: BTreeMap<String, SliceValue> = self
            .slots
            .iter()
            .map(|(key, slot)| (key.clone(), Arc::clone(&slot.initial)))
            .collect();
        (
            ComposedReducer { slots: self.slots },
            SliceMap {
                slices: Arc::new(initial),
            },
        )
    }

    /// Like [`combine`](Self::combine), but seeded from a preloaded state.
    ///
    /// Every key present in `preloaded` must have a registered reducer and
    /// carry a value of the registered type; a mismatch fails here, before
    /// any store exists, rather than misbehaving on the first dispatch. Keys
    /// the preloaded state lacks fall back to their registered initials.
    pub fn combine_with(
        self,
        preloaded: &SliceMap,
    ) -> Result<(ComposedReducer, SliceMap), StoreError> {
        for (key, value) in preloaded.slices.iter() {
            let slot = self
                .slots
                .get(key)
                .ok_or_else(|| StoreError::UnknownSlice { key: key.clone() })?;
            if (**value).type_id() != slot.accepts {
                return Err(StoreError::SliceTypeMismatch { key: key.clone() });
            }
        }
        let merged: BTreeMap<String, SliceValue> = self
            .slots
            .iter()
            .map(|(key, slot)| {
                let value = preloaded
                    .raw(key)
                    .map(Arc::clone)
                    .unwrap_or_else(|| Arc::clone(&slot.initial));
                (key.clone(), value)
            })
            .collect();
        Ok((
            ComposedReducer { slots: self.slots },
            SliceMap {
                slices: Arc::new(merged),
            },
        ))
    }
}

/// Whole-state reducer over a [`SliceMap`].
///
/// Runs every slice reducer against its own slice for each action. When no
/// slice changed, the original whole-state handle is returned unchanged, so
/// the no-op contract holds transitively. Keys present in the state but
/// registered with no reducer (only reachable through a hand-built map) are
/// carried through untouched — unowned data is never dropped.
pub struct ComposedReducer {
    slots: BTreeMap<String, SliceSlot>,
}

impl Reducer<SliceMap> for ComposedReducer {
    fn reduce(&self, state: &SliceMap, action: &Action) -> SliceMap {
        let mut next = BTreeMap::new();
        let mut changed = false;
        for (key, slot) in &self.slots {
            match state.raw(key) {
                Some(prev) => {
                    let out = (slot.reduce)(prev, action);
                    if !Arc::ptr_eq(&out, prev) {
                        changed = true;
                    }
                    next.insert(key.clone(), out);
                }
                None => {
                    // Hand-built state missing a registered slice: seed it.
                    changed = true;
                    next.insert(key.clone(), Arc::clone(&slot.initial));
                }
            }
        }
        for (key, value) in state.slices.iter() {
            if !self.slots.contains_key(key) {
                next.insert(key.clone(), Arc::clone(value));
            }
        }
        if changed {
            SliceMap {
                slices: Arc::new(next),
            }
        } else {
            state.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Count(i64);

    fn counting(state: &Arc<Count>, action: &Action) -> Arc<Count> {
        match action.kind() {
            "INC" => Arc::new(Count(state.0 + 1)),
            _ => Arc::clone(state),
        }
    }

    #[test]
    fn get_downcasts_to_registered_type() {
        let (_, state) = SliceRegistry::new()
            .slice("counter", Count(7), counting)
            .combine();
        assert_eq!(*state.get::<Count>("counter").unwrap(), Count(7));
        assert!(state.get::<String>("counter").is_none());
        assert!(state.get::<Count>("missing").is_none());
    }

    #[test]
    fn unchanged_slice_keeps_its_handle_identity() {
        let (reducer, state) = SliceRegistry::new()
            .slice("counter", Count(0), counting)
            .combine();
        let next = reducer.reduce(&state, &Action::new("UNKNOWN"));
        assert!(next.shares(&state));
    }

    #[test]
    fn combine_with_rejects_unknown_keys() {
        let preloaded = SliceMap::builder().slice("ghost", Count(1)).build();
        let result = SliceRegistry::new()
            .slice("counter", Count(0), counting)
            .combine_with(&preloaded);
        assert!(matches!(
            result,
            Err(StoreError::UnknownSlice { key }) if key == "ghost"
        ));
    }

    #[test]
    fn combine_with_fills_missing_slices_from_initials() {
        let preloaded = SliceMap::builder().slice("counter", Count(41)).build();
        let (_, state) = SliceRegistry::new()
            .slice("counter", Count(0), counting)
            .slice("other", Count(5), counting)
            .combine_with(&preloaded)
            .unwrap();
        assert_eq!(state.get::<Count>("counter").unwrap().0, 41);
        assert_eq!(state.get::<Count>("other").unwrap().0, 5);
    }
}
