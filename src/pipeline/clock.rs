//! Modification clock.
//!
//! Every stateful entity in the pipeline stamps itself with a value from a
//! shared `ModificationClock` whenever it changes. Stamps are strictly
//! increasing and never reused, so staleness is a plain integer comparison.
//!
//! The clock is not a process global: each `Executive` owns one and hands
//! clones of it to the nodes it creates. Clones share the same counter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A value issued by the modification clock.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Stamp(pub u64);

impl Stamp {
    /// Older than anything the clock can issue.
    pub const ZERO: Stamp = Stamp(0);

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stamp({})", self.0)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing modification counter.
#[derive(Clone, Debug, Default)]
pub struct ModificationClock {
    counter: Arc<AtomicU64>,
}

impl ModificationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock and return a stamp newer than any issued before.
    #[inline]
    pub fn touch(&self) -> Stamp {
        Stamp(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// The most recently issued stamp (`Stamp::ZERO` before the first touch).
    #[inline]
    pub fn current(&self) -> Stamp {
        Stamp(self.counter.load(Ordering::Relaxed))
    }

    /// Whether both handles advance the same counter.
    pub fn same_clock(&self, other: &ModificationClock) -> bool {
        Arc::ptr_eq(&self.counter, &other.counter)
    }
}
