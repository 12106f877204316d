use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::{ListError, Result};

pub(crate) type Link = Option<NonNull<Node>>;

/// A single cell of a [`GatedList`](super::GatedList).
///
/// Nodes are created detached and handed to
/// [`GatedList::insert`](super::GatedList::insert), which takes over the
/// allocation. From then on the list alone frees it, either in `delete` or
/// when the chain is torn down.
///
#[derive(Debug)]
pub struct Node {
    data: i32,
    next: Link,
}

// SAFETY: `next` is only followed while the owning list's gate admits the
// caller, so sharing a node across threads never races on the chain.
unsafe impl Send for Node {}
unsafe impl Sync for Node {}

impl Node {
    /// Allocates a detached node.
    ///
    /// Like any `Box::new`, this aborts on allocation failure. Use
    /// [`Node::try_new`] to observe it instead.
    pub fn new(data: i32) -> Box<Node> {
        Box::new(Node::detached(data))
    }

    /// Allocates a detached node, reporting allocation failure as
    /// [`ListError::OutOfMemory`].
    pub fn try_new(data: i32) -> Result<Box<Node>> {
        let layout = Layout::new::<Node>();

        // SAFETY: `Node` has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) }.cast::<Node>();
        let Some(ptr) = NonNull::new(raw) else {
            return Err(ListError::OutOfMemory {
                bytes: layout.size(),
            });
        };

        // SAFETY: `ptr` was allocated by the global allocator with the layout
        // of `Node`, which is exactly what `Box::from_raw` expects.
        unsafe {
            ptr.as_ptr().write(Node::detached(data));
            Ok(Box::from_raw(ptr.as_ptr()))
        }
    }

    fn detached(data: i32) -> Self {
        Node { data, next: None }
    }

    /// The payload.
    #[inline]
    pub fn data(&self) -> i32 {
        self.data
    }

    /// The following node in the chain.
    ///
    /// A detached node never has a successor. For a node reached through a
    /// [`NodeRef`](super::NodeRef), the successor stays valid for as long as
    /// the borrow of `self`, because the read section behind it keeps writers
    /// out.
    pub fn next(&self) -> Option<&Node> {
        // SAFETY: links only ever point at live nodes owned by the same chain.
        self.next.map(|next| unsafe { next.as_ref() })
    }

    #[inline]
    pub(crate) fn next_link(&self) -> Link {
        self.next
    }

    #[inline]
    pub(crate) fn set_next(&mut self, next: Link) {
        self.next = next;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_detached() {
        let node = Node::new(42);

        assert_eq!(node.data(), 42);
        assert!(node.next().is_none());
        assert!(node.next_link().is_none());
    }

    #[test]
    fn test_try_new_allocates() {
        let node = Node::try_new(-7).unwrap();

        assert_eq!(node.data(), -7);
        assert!(node.next().is_none());
    }

    #[test]
    fn test_extreme_payloads() {
        assert_eq!(Node::new(i32::MIN).data(), i32::MIN);
        assert_eq!(Node::try_new(i32::MAX).unwrap().data(), i32::MAX);
    }
}
