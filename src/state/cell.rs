//! Single-snapshot state container.

use crate::types::Timestamp;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// The current value plus the time it was last written.
pub struct StateSnapshot<S> {
    /// Current domain value.
    pub value: Arc<S>,
    /// When `value` was stored.
    pub updated_at: Timestamp,
}

impl<S> StateSnapshot<S> {
    /// Stamp `value` with the current time, but never earlier than `floor`.
    fn stamp(value: S, floor: Timestamp) -> Self {
        Self {
            value: Arc::new(value),
            updated_at: Timestamp::now().max(floor),
        }
    }
}

// Manual impls: deriving would demand `S: Clone` / `S: Debug` on the Arc.
impl<S> Clone for StateSnapshot<S> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            updated_at: self.updated_at,
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for StateSnapshot<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSnapshot")
            .field("value", &self.value)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Holds exactly one [`StateSnapshot`] and swaps it wholesale on mutation.
///
/// Producers run without the lock held, so a producer may read the cell it
/// is computing the next value for. Concurrent mutators are not serialized
/// against each other: the last write wins. `updated_at` never decreases,
/// even if the wall clock steps backwards.
pub struct StateCell<S> {
    current: RwLock<StateSnapshot<S>>,
}

impl<S> StateCell<S> {
    /// Create a cell holding `value`, stamped now.
    pub fn new(value: S) -> Self {
        Self {
            current: RwLock::new(StateSnapshot::stamp(value, Timestamp::default())),
        }
    }

    /// Derive the next value from the previous one and store it.
    ///
    /// If `producer` panics the stored snapshot is left as it was.
    pub fn mutate<F>(&self, producer: F) -> StateSnapshot<S>
    where
        F: FnOnce(&S) -> S,
    {
        let prev = self.snapshot();
        let next = StateSnapshot::stamp(producer(prev.value.as_ref()), prev.updated_at);
        self.store(next)
    }

    /// Like [`mutate`](Self::mutate), but the producer may refuse. On `Err`
    /// nothing is stored.
    pub fn try_mutate<F, E>(&self, producer: F) -> std::result::Result<StateSnapshot<S>, E>
    where
        F: FnOnce(&S) -> std::result::Result<S, E>,
    {
        let prev = self.snapshot();
        let next = StateSnapshot::stamp(producer(prev.value.as_ref())?, prev.updated_at);
        Ok(self.store(next))
    }

    /// Replace the value outright.
    pub fn replace(&self, value: S) -> StateSnapshot<S> {
        let floor = self.current.read().updated_at;
        self.store(StateSnapshot::stamp(value, floor))
    }

    /// Current value.
    pub fn read(&self) -> Arc<S> {
        Arc::clone(&self.current.read().value)
    }

    /// Current value and its timestamp, read together.
    pub fn snapshot(&self) -> StateSnapshot<S> {
        self.current.read().clone()
    }

    fn store(&self, next: StateSnapshot<S>) -> StateSnapshot<S> {
        *self.current.write() = next.clone();
        next
    }
}

impl<S: fmt::Debug> fmt::Debug for StateCell<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("current", &*self.current.read())
            .finish()
    }
}
