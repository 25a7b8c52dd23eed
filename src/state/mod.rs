//! Per-input outcome caching.
//!
//! `FieldState` remembers the last settled result for each input
//! identity together with a fingerprint of the value it was computed
//! from. A stateful field consults it to skip re-running checks while the
//! input is clean; anything that changes the value (or forced dirtiness)
//! invalidates the entry.

use crate::core::field::InputKind;
use crate::core::input::InputId;
use crate::core::types::{CheckResult, Value};
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Cached state for one input identity.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedState {
    /// Explicit marker written when the owning field was disabled.
    Disabled,
    /// Last settled result plus the fingerprint of the value it was
    /// computed from. A `None` fingerprint means dirtiness was forced.
    Settled {
        /// The settled result.
        result: CheckResult,
        /// Value fingerprint at cache-write time.
        fingerprint: Option<u64>,
    },
}

/// Content fingerprint of an input value.
pub fn fingerprint(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(value, &mut hasher);
    hasher.finish()
}

fn hash_value<H: Hasher>(value: &Value, hasher: &mut H) {
    std::mem::discriminant(value).hash(hasher);
    match value {
        Value::None => {}
        Value::Bool(b) => b.hash(hasher),
        Value::Int(i) => i.hash(hasher),
        Value::Float(f) => f.to_bits().hash(hasher),
        Value::Text(s) => s.hash(hasher),
        Value::List(items) => {
            items.len().hash(hasher);
            for item in items {
                hash_value(item, hasher);
            }
        }
        Value::Map(map) => {
            map.len().hash(hasher);
            for (k, v) in map {
                k.hash(hasher);
                hash_value(v, hasher);
            }
        }
    }
}

/// Thread-safe cache of per-input validation state.
///
/// Owned by the orchestrator: created at setup, cleared at teardown.
/// Mutated only by the pipeline; the host may be multi-threaded, so
/// access is serialized internally.
#[derive(Default)]
pub struct FieldState {
    entries: Mutex<HashMap<InputId, CachedState>>,
}

impl FieldState {
    /// New empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached settled result for an identity, if any.
    pub fn lookup(&self, id: InputId) -> Option<CheckResult> {
        match self.entries.lock().get(&id) {
            Some(CachedState::Settled { result, .. }) => Some(result.clone()),
            _ => None,
        }
    }

    /// Whether the input must be re-validated.
    ///
    /// Dirty when no settled entry exists, the fingerprint changed since
    /// the cache write, or dirtiness was forced. Radio inputs are always
    /// dirty: their checked/unchecked semantics are not captured by a
    /// value fingerprint.
    pub fn is_dirty(&self, id: InputId, kind: InputKind, current: &Value) -> bool {
        if kind.is_exclusive() {
            return true;
        }
        match self.entries.lock().get(&id) {
            Some(CachedState::Settled {
                fingerprint: Some(stored),
                ..
            }) => *stored != fingerprint(current),
            _ => true,
        }
    }

    /// Store a settled result with the fingerprint of the value it was
    /// computed from.
    pub fn store(&self, id: InputId, result: CheckResult, value: &Value) {
        self.entries.lock().insert(
            id,
            CachedState::Settled {
                result,
                fingerprint: Some(fingerprint(value)),
            },
        );
    }

    /// Write the explicit disabled marker for an identity.
    pub fn store_disabled(&self, id: InputId) {
        self.entries.lock().insert(id, CachedState::Disabled);
    }

    /// Clear the stored fingerprint so the next check always re-runs.
    pub fn force_dirty(&self, id: InputId) {
        let mut entries = self.entries.lock();
        if let Some(CachedState::Settled { fingerprint, .. }) = entries.get_mut(&id) {
            *fingerprint = None;
        }
    }

    /// Raw cached state for an identity.
    pub fn get(&self, id: InputId) -> Option<CachedState> {
        self.entries.lock().get(&id).cloned()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of cached identities.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
