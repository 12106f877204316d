//! Read-section-backed access to list nodes.

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Deref;
use std::ptr::NonNull;

use super::node::{Link, Node};
use crate::preemptive_synchronization::ReadSection;

// ============================================================================
// NodeRef - a node observed under an open read section
// ============================================================================

/// A node of a [`GatedList`](super::GatedList), kept alive by the read
/// section it was found under.
///
/// While a `NodeRef` exists its list admits other readers but no writer.
/// Do not call a write operation of the same list while holding one: the
/// call would wait for this very section to end. Reading the same list again
/// from this thread is only safe while no other thread writes to it, since a
/// queued writer holds back new readers until this section ends.
///
/// Several `NodeRef`s of one thread may be dropped in any order.
///
pub struct NodeRef<'a> {
    node: NonNull<Node>,
    section: ReadSection<'a>,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(node: NonNull<Node>, section: ReadSection<'a>) -> Self {
        NodeRef { node, section }
    }

    /// Whether this thread is the gatekeeper of the list's current reader
    /// group.
    pub fn is_gatekeeper(&self) -> bool {
        self.section.is_gatekeeper()
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        // SAFETY: the node belongs to the list the section was opened on, and
        // no writer can free it while the section is open.
        unsafe { self.node.as_ref() }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("data", &self.data())
            .finish()
    }
}

// ============================================================================
// Iter - payloads in traversal order under one read section
// ============================================================================

/// Iterator over the payloads of a [`GatedList`](super::GatedList).
///
/// The whole iteration runs under a single read section, so it observes one
/// consistent state of the list. The same restrictions as for [`NodeRef`]
/// apply while it is alive.
pub struct Iter<'a> {
    cursor: Link,
    remaining: usize,
    _section: ReadSection<'a>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(head: Link, len: usize, section: ReadSection<'a>) -> Self {
        Iter {
            cursor: head,
            remaining: len,
            _section: section,
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let link = self.cursor?;
        // SAFETY: the held section keeps every node of the chain alive.
        let node = unsafe { link.as_ref() };
        self.cursor = node.next_link();
        self.remaining -= 1;
        Some(node.data())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
