//! Blocking synchronization primitives for preemptive OS threads.
//!
//! - [`exclusion_lock`] - Binary lock with detached acquire/release
//! - [`read_gate`] - First-reader/last-reader admission protocol
//! - [`section_monitor`] - Critical-section overlap recording (`instrumentation`)

pub mod exclusion_lock;
pub mod read_gate;
#[cfg(any(test, feature = "instrumentation"))]
pub mod section_monitor;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use exclusion_lock::{ExclusionGuard, ExclusionLock};
pub use read_gate::{ReadGate, ReadSection, WriteSection};
#[cfg(any(test, feature = "instrumentation"))]
pub use section_monitor::{MonitorSnapshot, SectionMonitor};

// The state behind these mutexes is only ever touched by the primitives
// themselves, which never panic while holding the guard, so a poisoned lock
// still guards consistent data.
//
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
