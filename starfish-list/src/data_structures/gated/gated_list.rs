use std::cell::UnsafeCell;
use std::fmt;

use log::{debug, error};

use super::chain::Chain;
use super::node::Node;
use super::node_ref::{Iter, NodeRef};
use super::order_policy::Order;
use super::sort_engine;
use crate::error::Result;
#[cfg(feature = "instrumentation")]
use crate::preemptive_synchronization::MonitorSnapshot;
use crate::preemptive_synchronization::{ReadGate, ReadSection, WriteSection};

///
/// Singly linked list of `i32` payloads that keeps an insertion order and
/// admits many readers or one writer at a time.
///
/// Reads (`at`, `get`, `iter`, ...) join the current reader group of the
/// list's [`ReadGate`]. Writes (`insert`, `delete`, `sort`, `change_order`,
/// `clear`) wait for the group to drain and run alone.
///
/// ```rust
/// use starfish_list::{GatedList, Node, Order};
///
/// let list = GatedList::with_order(Order::Ascending);
/// for value in [13, 5, 6, 9] {
///     list.insert(Node::new(value));
/// }
///
/// assert_eq!(list.to_vec(), vec![5, 6, 9, 13]);
/// assert_eq!(list.at(1).map(|node| node.data()), Some(6));
/// assert!(list.delete(9));
/// assert!(list.get(9).is_none());
/// ```
///
// INVARIANTS (between operations):
// 1. all access to `state` goes through a section of `gate`
// 2. `state.order != Unordered` => the chain satisfies `state.order`
//
pub struct GatedList {
    gate: ReadGate,
    state: UnsafeCell<ListState>,
}

struct ListState {
    chain: Chain,
    order: Order,
}

// SAFETY: the chain is only reached through `state`, and `state` only through
// the gate: shared access under a read section, exclusive access under a
// write section.
unsafe impl Send for GatedList {}
unsafe impl Sync for GatedList {}

impl GatedList {
    /// Creates an empty, unordered list.
    pub fn new() -> Self {
        GatedList::with_order(Order::Unordered)
    }

    /// Creates an empty list maintaining `order`.
    pub fn with_order(order: Order) -> Self {
        GatedList {
            gate: ReadGate::new(),
            state: UnsafeCell::new(ListState {
                chain: Chain::new(),
                order,
            }),
        }
    }

    /// Builds a list maintaining `order` from `values`, inserting them one by
    /// one.
    pub fn from_values<I>(order: Order, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = i32>,
    {
        let list = GatedList::with_order(order);
        for value in values {
            list.insert_value(value)?;
        }
        Ok(list)
    }

    // =========================================================================
    // Section access
    // =========================================================================

    #[inline]
    fn state<'s>(&'s self, _section: &'s ReadSection<'_>) -> &'s ListState {
        // SAFETY: the read section keeps writers out for 's.
        unsafe { &*self.state.get() }
    }

    #[inline]
    fn state_mut<'s>(&'s self, _section: &'s mut WriteSection<'_>) -> &'s mut ListState {
        // SAFETY: the write section keeps readers and other writers out for
        // 's, and the `&mut` borrow of it stops this from being called twice
        // under one section.
        unsafe { &mut *self.state.get() }
    }

    pub(crate) fn inspect<R>(&self, f: impl FnOnce(&Chain, Order) -> R) -> R {
        let section = self.gate.read();
        let state = self.state(&section);
        f(&state.chain, state.order)
    }

    // =========================================================================
    // Write operations
    // =========================================================================

    /// Takes ownership of `node` and splices it in where the list's order
    /// puts it.
    ///
    /// Under [`Order::Unordered`] the node is appended. Otherwise it goes
    /// after the last node that may stay ahead of it, which places it after
    /// any equal payloads already present.
    pub fn insert(&self, node: Box<Node>) {
        let mut section = self.gate.write();
        let state = self.state_mut(&mut section);

        let placement = state.order.placement(&state.chain, node.data());
        state.chain.splice(placement, node);
    }

    /// Allocates a node for `value` and inserts it.
    pub fn insert_value(&self, value: i32) -> Result<()> {
        self.insert(Node::try_new(value)?);
        Ok(())
    }

    /// Removes and frees the first node carrying `value`.
    ///
    /// Returns whether a node was removed.
    pub fn delete(&self, value: i32) -> bool {
        let mut section = self.gate.write();
        let state = self.state_mut(&mut section);

        match state.chain.remove_first(value) {
            Ok(removed) => removed.is_some(),
            Err(err) => {
                error!("delete aborted, chain left untouched: {err}");
                false
            }
        }
    }

    /// Sorts the contents under `order` without changing the list's declared
    /// order.
    ///
    /// Equal payloads keep their relative order. Sorting under
    /// [`Order::Unordered`] does nothing. Sorting a list whose declared order
    /// differs leaves it violating that order until the next reorder or sort.
    pub fn sort(&self, order: Order) -> Result<()> {
        let mut section = self.gate.write();
        let state = self.state_mut(&mut section);

        sort_engine::sort(&mut state.chain, order)
    }

    /// Switches the order the list maintains.
    ///
    /// - From `Unordered`, the contents are sorted into the new order.
    /// - Between `Ascending` and `Descending`, the chain is reversed.
    /// - From `Ascending` or `Descending` to `Unordered`, the chain is
    ///   reversed as well.
    pub fn change_order(&self, order: Order) -> Result<()> {
        let mut section = self.gate.write();
        let state = self.state_mut(&mut section);

        if order == state.order {
            return Ok(());
        }

        if state.order == Order::Unordered {
            sort_engine::sort(&mut state.chain, order)?;
        } else {
            sort_engine::reverse(&mut state.chain);
        }

        debug!("order changed from {:?} to {:?}", state.order, order);
        state.order = order;
        Ok(())
    }

    /// Frees every node. The declared order is kept.
    pub fn clear(&self) {
        let mut section = self.gate.write();
        let state = self.state_mut(&mut section);

        debug!("clearing {} nodes", state.chain.len());
        state.chain.clear();
    }

    // =========================================================================
    // Read operations
    // =========================================================================

    // A `NodeRef` or `Iter` keeps its read section open. While one is alive
    // on a thread, that thread must not write to the list, and should not
    // start further reads of it if other threads may be writing: a writer
    // queued at the gate admits no new reader until this section ends.

    /// The node at `index` in traversal order.
    pub fn at(&self, index: usize) -> Option<NodeRef<'_>> {
        let section = self.gate.read();
        let node = self.state(&section).chain.link_at(index)?;
        Some(NodeRef::new(node, section))
    }

    /// The first node carrying `value`.
    pub fn get(&self, value: i32) -> Option<NodeRef<'_>> {
        let section = self.gate.read();
        let node = self.state(&section).chain.find(value)?;
        Some(NodeRef::new(node, section))
    }

    pub fn contains(&self, value: i32) -> bool {
        let section = self.gate.read();
        self.state(&section).chain.find(value).is_some()
    }

    pub fn len(&self) -> usize {
        let section = self.gate.read();
        self.state(&section).chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The order the list currently maintains.
    pub fn order(&self) -> Order {
        let section = self.gate.read();
        self.state(&section).order
    }

    /// Iterates over the payloads under one read section.
    pub fn iter(&self) -> Iter<'_> {
        let section = self.gate.read();
        let (head, len) = {
            let chain = &self.state(&section).chain;
            (chain.links().next(), chain.len())
        };
        Iter::new(head, len, section)
    }

    /// Collects the payloads in traversal order.
    pub fn to_vec(&self) -> Vec<i32> {
        self.iter().collect()
    }

    #[cfg(feature = "instrumentation")]
    pub fn monitor(&self) -> MonitorSnapshot {
        self.gate.monitor()
    }
}

impl Default for GatedList {
    fn default() -> Self {
        GatedList::new()
    }
}

impl fmt::Debug for GatedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let section = self.gate.read();
        let state = self.state(&section);

        f.debug_struct("GatedList")
            .field("order", &state.order)
            .field("len", &state.chain.len())
            .field("values", &DebugValues(&state.chain))
            .finish()
    }
}

struct DebugValues<'a>(&'a Chain);

impl fmt::Debug for DebugValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter().map(Node::data)).finish()
    }
}

// ============================================================================
// Tests - Unique to GatedList
// ============================================================================
// Note: Shared scenarios are in common_tests and driven from tests/
