use std::sync::{Condvar, Mutex, PoisonError};

use super::lock_unpoisoned;

/// A binary lock whose acquire and release are separate calls.
///
/// Unlike `std::sync::Mutex`, holding the lock is not tied to a guard value.
/// This lets the first reader of a group take the lock on behalf of the whole
/// group and give it back later, from a different call.
///
/// Waiters are woken one at a time; no fairness is promised.
///
#[derive(Debug, Default)]
pub struct ExclusionLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl ExclusionLock {
    pub const fn new() -> Self {
        ExclusionLock {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    // Block until the lock is free, then take it.
    //
    pub fn acquire(&self) {
        let mut held = lock_unpoisoned(&self.held);
        while *held {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
    }

    // Give the lock back and wake one waiter.
    //
    pub fn release(&self) {
        let mut held = lock_unpoisoned(&self.held);
        debug_assert!(*held, "released an exclusion lock nobody held");
        *held = false;
        drop(held);
        self.released.notify_one();
    }

    pub fn is_held(&self) -> bool {
        *lock_unpoisoned(&self.held)
    }

    /// Acquires the lock and returns a guard releasing it on drop.
    pub fn lock(&self) -> ExclusionGuard<'_> {
        self.acquire();
        ExclusionGuard { lock: self }
    }
}

/// Releases its [`ExclusionLock`] when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ExclusionGuard<'a> {
    lock: &'a ExclusionLock,
}

impl Drop for ExclusionGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

// ============================================================================
// Tests
// ============================================================================
