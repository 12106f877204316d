//! First-Reader / Last-Reader Admission Gate
//!
//! Admits any number of concurrent readers or a single writer. Readers do not
//! take the write-exclusion lock one by one: the first reader into an empty
//! group (the *gatekeeper*) takes it on behalf of the whole group, and gives
//! it back once every other reader of that group has left.
//!
//! # Locks
//!
//! ```text
//!   admission ─── serializes entry: every reader while joining,
//!                 every writer for its whole section
//!   exclusion ─── held by a writer, or by the gatekeeper for its group
//!   readers   ─── { active, open, gatekeeper thread, its sections }
//!                 + condvar "sole reader"
//! ```
//!
//! The gatekeeper is a thread, not a section. A thread may hold several read
//! sections at once (two live `NodeRef`s, say), and drop them in any order;
//! only the last of them leaves as gatekeeper, and it waits until the
//! sections still active are its own.
//!
//! # Entering a Read Section
//!
//! ```text
//!   lock admission
//!   lock readers
//!         │
//!         ▼
//!   ┌──────────────┐  no   ┌──────────────────────────┐
//!   │ group open?  ├──────►│ open = true              │
//!   └──────┬───────┘       │ caller becomes gatekeeper│
//!          │ yes           │ acquire exclusion        │
//!          │               └────────────┬─────────────┘
//!          ▼                            │
//!   ┌──────────────┐◄───────────────────┘
//!   │ active += 1  │  (gatekeeper thread: its sections += 1)
//!   └──────┬───────┘
//!          ▼
//!   unlock readers, unlock admission, read
//! ```
//!
//! # Leaving a Read Section
//!
//! ```text
//!   lock readers
//!         │
//!   ┌─────┴───────────────────────────┐
//!   │ gatekeeper's last section?      │
//!   ▼ yes                             ▼ no
//!   wait until active == 1            active -= 1
//!   release exclusion                 active == 1 ? ──► signal "sole reader"
//!   active = 0, open = false
//!         │                 │
//!         └─────────┬───────┘
//!                   ▼
//!             unlock readers
//! ```
//!
//! # Write Section
//!
//! Lock admission, then exclusion; release in reverse order. A writer blocked
//! on exclusion keeps holding admission, so no new reader joins the group it
//! is waiting on. There is no bound on how long a writer may wait for a
//! group that keeps admitting readers before it arrives.

use std::marker::PhantomData;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use log::trace;

use super::exclusion_lock::{ExclusionGuard, ExclusionLock};
use super::lock_unpoisoned;
#[cfg(feature = "instrumentation")]
use super::section_monitor::{MonitorSnapshot, SectionMonitor};

/// Admission gate implementing the first-reader/last-reader protocol.
///
/// Each gate carries its own locks, so independent gates never contend.
///
#[derive(Debug, Default)]
pub struct ReadGate {
    admission: Mutex<()>,
    exclusion: ExclusionLock,
    readers: Mutex<ReaderGroup>,
    sole_reader: Condvar,
    #[cfg(feature = "instrumentation")]
    monitor: SectionMonitor,
}

#[derive(Debug, Default)]
struct ReaderGroup {
    active: usize,
    open: bool,
    gatekeeper: Option<ThreadId>,
    // Sections among `active` held by the gatekeeper thread.
    gatekeeper_sections: usize,
}

impl ReadGate {
    pub const fn new() -> Self {
        ReadGate {
            admission: Mutex::new(()),
            exclusion: ExclusionLock::new(),
            readers: Mutex::new(ReaderGroup {
                active: 0,
                open: false,
                gatekeeper: None,
                gatekeeper_sections: 0,
            }),
            sole_reader: Condvar::new(),
            #[cfg(feature = "instrumentation")]
            monitor: SectionMonitor::new(),
        }
    }

    /// Joins the current reader group, opening one if there is none.
    ///
    /// Blocks while a writer is inside or waiting at the admission lock.
    pub fn read(&self) -> ReadSection<'_> {
        let admission = lock_unpoisoned(&self.admission);
        let mut group = lock_unpoisoned(&self.readers);

        let caller = thread::current().id();
        if !group.open {
            group.open = true;
            group.gatekeeper = Some(caller);
            self.exclusion.acquire();
            trace!("reader group opened");
        }
        if group.gatekeeper == Some(caller) {
            group.gatekeeper_sections += 1;
        }
        group.active += 1;

        drop(group);
        drop(admission);

        #[cfg(feature = "instrumentation")]
        self.monitor.enter_read();

        ReadSection {
            gate: self,
            _not_send: PhantomData,
        }
    }

    /// Enters an exclusive section.
    ///
    /// Blocks until the current reader group, if any, has fully drained and
    /// no other writer is inside.
    pub fn write(&self) -> WriteSection<'_> {
        let admission = lock_unpoisoned(&self.admission);
        let exclusion = self.exclusion.lock();

        #[cfg(feature = "instrumentation")]
        self.monitor.enter_write();

        WriteSection {
            _exclusion: exclusion,
            _admission: admission,
            #[cfg(feature = "instrumentation")]
            monitor: &self.monitor,
        }
    }

    /// Number of readers currently inside.
    pub fn active_readers(&self) -> usize {
        lock_unpoisoned(&self.readers).active
    }

    /// Whether a writer or a reader group currently holds write exclusion.
    pub fn is_excluding_writers(&self) -> bool {
        self.exclusion.is_held()
    }

    #[cfg(feature = "instrumentation")]
    pub fn monitor(&self) -> MonitorSnapshot {
        self.monitor.snapshot()
    }

    fn leave(&self) {
        #[cfg(feature = "instrumentation")]
        self.monitor.leave_read();

        let caller = thread::current().id();
        let mut group = lock_unpoisoned(&self.readers);

        if group.gatekeeper == Some(caller) && group.gatekeeper_sections == 1 {
            while group.active != 1 {
                group = self
                    .sole_reader
                    .wait(group)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            self.exclusion.release();
            group.active = 0;
            group.open = false;
            group.gatekeeper = None;
            group.gatekeeper_sections = 0;
            trace!("reader group closed");
            return;
        }

        if group.gatekeeper == Some(caller) {
            group.gatekeeper_sections -= 1;
        }
        group.active -= 1;
        if group.active == 1 {
            self.sole_reader.notify_one();
        }
    }
}

/// A reader's admission into a [`ReadGate`]; leaves the group on drop.
///
/// Not `Send`: a section belongs to the thread that entered it, and the gate
/// tells the gatekeeper apart by thread. Sections of one thread may be
/// dropped in any order.
///
/// A thread holding a section must not enter a write section of the same
/// gate, nor wait on another thread that does. It should not open further
/// sections of the same gate either while writers may be active: a writer
/// queued at the admission lock holds back every new reader, including this
/// thread, and itself waits for this thread's section to end.
///
#[must_use = "the read section ends as soon as it is dropped"]
#[derive(Debug)]
pub struct ReadSection<'a> {
    gate: &'a ReadGate,
    _not_send: PhantomData<*const ()>,
}

impl ReadSection<'_> {
    /// Whether this section's thread is the gatekeeper of the current group,
    /// holding write exclusion for it.
    pub fn is_gatekeeper(&self) -> bool {
        lock_unpoisoned(&self.gate.readers).gatekeeper == Some(thread::current().id())
    }
}

impl Drop for ReadSection<'_> {
    fn drop(&mut self) {
        self.gate.leave();
    }
}

/// A writer's exclusive section in a [`ReadGate`].
///
/// Field order is load bearing: `_exclusion` drops before `_admission`, so
/// the locks are released in reverse order of acquisition.
#[must_use = "the write section ends as soon as it is dropped"]
#[derive(Debug)]
pub struct WriteSection<'a> {
    _exclusion: ExclusionGuard<'a>,
    _admission: MutexGuard<'a, ()>,
    #[cfg(feature = "instrumentation")]
    monitor: &'a SectionMonitor,
}

#[cfg(feature = "instrumentation")]
impl Drop for WriteSection<'_> {
    fn drop(&mut self) {
        self.monitor.leave_write();
    }
}

// ============================================================================
// Tests
// ============================================================================
