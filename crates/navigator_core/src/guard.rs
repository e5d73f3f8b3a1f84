use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::effect::OpId;

/// Marks the one reload a screen may have in flight.
///
/// Holds the in-flight operation id, `0` when clear. Only the operation that
/// set the guard can clear it, so a late result from a superseded reload never
/// releases a guard taken by a newer one.
pub struct ReloadGuard {
    in_flight: AtomicU64,
}

impl ReloadGuard {
    pub fn new() -> Self {
        Self {
            in_flight: AtomicU64::new(0),
        }
    }

    /// Claims the guard for `op`. Returns `false` if another reload holds it.
    pub fn try_acquire(&self, op: OpId) -> bool {
        self.in_flight
            .compare_exchange(0, op.0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clears the guard if `op` is the holder. Returns whether it was.
    pub fn release(&self, op: OpId) -> bool {
        self.in_flight
            .compare_exchange(op.0, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn holder(&self) -> Option<OpId> {
        match self.in_flight.load(Ordering::Acquire) {
            0 => None,
            id => Some(OpId(id)),
        }
    }

    pub fn is_held(&self) -> bool {
        self.holder().is_some()
    }
}

impl Default for ReloadGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ReloadGuard {
    fn clone(&self) -> Self {
        Self {
            in_flight: AtomicU64::new(self.in_flight.load(Ordering::Acquire)),
        }
    }
}

impl PartialEq for ReloadGuard {
    fn eq(&self, other: &Self) -> bool {
        self.holder() == other.holder()
    }
}

impl fmt::Debug for ReloadGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadGuard")
            .field("in_flight", &self.holder())
            .finish()
    }
}
