//! Records entries into gated critical sections.
//!
//! The gate reports every reader and writer entering and leaving its
//! critical section. Any entry that finds the opposite kind already inside,
//! or a writer that finds another writer inside, counts as an overlap. A
//! correct gate never records one.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct SectionMonitor {
    readers: AtomicUsize,
    writers: AtomicUsize,
    overlaps: AtomicUsize,
    read_entries: AtomicUsize,
    write_entries: AtomicUsize,
    peak_readers: AtomicUsize,
}

/// Point-in-time copy of the [`SectionMonitor`] counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorSnapshot {
    pub read_entries: usize,
    pub write_entries: usize,
    pub overlaps: usize,
    /// Highest number of readers observed inside at once.
    pub peak_readers: usize,
    pub active_readers: usize,
    pub active_writers: usize,
}

impl SectionMonitor {
    pub const fn new() -> Self {
        SectionMonitor {
            readers: AtomicUsize::new(0),
            writers: AtomicUsize::new(0),
            overlaps: AtomicUsize::new(0),
            read_entries: AtomicUsize::new(0),
            write_entries: AtomicUsize::new(0),
            peak_readers: AtomicUsize::new(0),
        }
    }

    pub fn enter_read(&self) {
        let readers = self.readers.fetch_add(1, Ordering::SeqCst) + 1;
        self.read_entries.fetch_add(1, Ordering::Relaxed);
        self.peak_readers.fetch_max(readers, Ordering::Relaxed);

        if self.writers.load(Ordering::SeqCst) != 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn leave_read(&self) {
        self.readers.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn enter_write(&self) {
        let writers = self.writers.fetch_add(1, Ordering::SeqCst);
        self.write_entries.fetch_add(1, Ordering::Relaxed);

        if writers != 0 || self.readers.load(Ordering::SeqCst) != 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn leave_write(&self) {
        self.writers.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            read_entries: self.read_entries.load(Ordering::Relaxed),
            write_entries: self.write_entries.load(Ordering::Relaxed),
            overlaps: self.overlaps.load(Ordering::SeqCst),
            peak_readers: self.peak_readers.load(Ordering::Relaxed),
            active_readers: self.readers.load(Ordering::SeqCst),
            active_writers: self.writers.load(Ordering::SeqCst),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
