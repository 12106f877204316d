use std::marker::PhantomData;
use std::ptr::NonNull;

use super::node::{Link, Node};
use super::order_policy::Placement;
use crate::error::{ListError, Result};

// =============================================================================
// CHAIN LAYOUT & INVARIANTS
// =============================================================================
//
// ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐
// │ head │───►│  a   │───►│  b   │───►│  c   │───► None
// └──────┘    └──────┘    └──────┘    └──────┘
//                                        ▲
// ┌──────┐                               │
// │ tail │───────────────────────────────┘  (alias, does not own)
// └──────┘
//
// Every node was leaked from a `Box<Node>` when it was spliced in, and is
// rebuilt into a `Box<Node>` exactly once, when it leaves the chain.
//
// INVARIANTS (between operations):
// 1. `len` equals the number of nodes reachable from `head`
// 2. `head` is None iff `len == 0`, and so is `tail`
// 3. when `len > 0`, `tail` is the last reachable node and its `next` is None
//
// =============================================================================

/// The raw head/tail/len triple of a singly linked list.
///
/// `Chain` performs no synchronization: callers serialize access to it.
///
pub(crate) struct Chain {
    pub(super) head: Link,
    pub(super) tail: Link,
    pub(super) len: usize,
}

impl Chain {
    pub(crate) const fn new() -> Self {
        Chain {
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn head(&self) -> Option<&Node> {
        // SAFETY: `head` points at a node owned by this chain.
        self.head.map(|head| unsafe { head.as_ref() })
    }

    pub(crate) fn tail(&self) -> Option<&Node> {
        // SAFETY: `tail` aliases a node owned by this chain.
        self.tail.map(|tail| unsafe { tail.as_ref() })
    }

    #[inline]
    pub(crate) fn tail_link(&self) -> Link {
        self.tail
    }

    /// Walks the raw links in traversal order.
    pub(crate) fn links(&self) -> Links<'_> {
        Links {
            cursor: self.head,
            _chain: PhantomData,
        }
    }

    /// Walks the nodes in traversal order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        // SAFETY: every yielded link is owned by the chain borrowed for '_.
        self.links().map(|link| unsafe { link.as_ref() })
    }

    pub(crate) fn link_at(&self, index: usize) -> Link {
        if index >= self.len {
            return None;
        }
        self.links().nth(index)
    }

    pub(crate) fn find(&self, value: i32) -> Link {
        // SAFETY: see `iter`.
        self.links()
            .find(|link| unsafe { link.as_ref() }.data() == value)
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Splices a detached node in at `placement`, taking ownership of it.
    pub(crate) fn splice(&mut self, placement: Placement, node: Box<Node>) {
        let mut new = NonNull::from(Box::leak(node));

        // SAFETY: `new` is the freshly leaked node, not yet reachable from
        // anywhere else. `tail` and `predecessor` are live nodes of this chain.
        unsafe {
            match placement {
                Placement::Front => {
                    new.as_mut().set_next(self.head);
                    self.head = Some(new);
                    if self.tail.is_none() {
                        self.tail = Some(new);
                    }
                }
                Placement::Back => {
                    new.as_mut().set_next(None);
                    match self.tail {
                        Some(mut tail) => tail.as_mut().set_next(Some(new)),
                        None => self.head = Some(new),
                    }
                    self.tail = Some(new);
                }
                Placement::After(mut predecessor) => {
                    new.as_mut().set_next(predecessor.as_ref().next_link());
                    predecessor.as_mut().set_next(Some(new));
                    if new.as_ref().next_link().is_none() {
                        self.tail = Some(new);
                    }
                }
            }
        }

        self.len += 1;
    }

    /// Unsplices the first node carrying `value` and hands it back.
    ///
    /// Returns `Ok(None)` when no node matches. The located node is checked
    /// once more before any link is rewritten, so an inconsistency leaves the
    /// chain exactly as it was.
    pub(crate) fn remove_first(&mut self, value: i32) -> Result<Option<Box<Node>>> {
        let mut predecessor: Link = None;
        let mut cursor = self.head;

        while let Some(link) = cursor {
            // SAFETY: `link` is owned by this chain.
            let node = unsafe { link.as_ref() };
            if node.data() == value {
                break;
            }
            predecessor = cursor;
            cursor = node.next_link();
        }

        let Some(target) = cursor else {
            return Ok(None);
        };

        // SAFETY: `target` is owned by this chain.
        let found = unsafe { target.as_ref() }.data();
        if found != value {
            return Err(ListError::InternalInconsistency {
                requested: value,
                found,
            });
        }

        self.unlink(predecessor, target);

        // SAFETY: `target` came from `Box::leak` in `splice` and is no longer
        // reachable from the chain.
        let mut node = unsafe { Box::from_raw(target.as_ptr()) };
        node.set_next(None);
        Ok(Some(node))
    }

    /// Unlinks `target`, whose predecessor is `predecessor` (`None` for the
    /// head). Head, tail and mid-chain removal all go through here.
    fn unlink(&mut self, predecessor: Link, target: NonNull<Node>) {
        // SAFETY: both pointers are owned by this chain.
        let next = unsafe { target.as_ref() }.next_link();

        match predecessor {
            None => self.head = next,
            Some(mut predecessor) => unsafe { predecessor.as_mut() }.set_next(next),
        }
        if next.is_none() {
            self.tail = predecessor;
        }

        self.len -= 1;
    }

    /// Frees every node, front to back, without recursion.
    pub(crate) fn clear(&mut self) {
        let mut cursor = self.head.take();
        self.tail = None;
        self.len = 0;

        while let Some(link) = cursor {
            // SAFETY: each node is rebuilt into its `Box` exactly once; the
            // chain has already forgotten it.
            let node = unsafe { Box::from_raw(link.as_ptr()) };
            cursor = node.next_link();
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Chain::new()
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Iterator over the raw links of a [`Chain`].
pub(crate) struct Links<'a> {
    cursor: Link,
    _chain: PhantomData<&'a Chain>,
}

impl Iterator for Links<'_> {
    type Item = NonNull<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.cursor?;
        // SAFETY: the chain is borrowed for the iterator's lifetime.
        self.cursor = unsafe { link.as_ref() }.next_link();
        Some(link)
    }
}

// ============================================================================
// Tests
// ============================================================================
