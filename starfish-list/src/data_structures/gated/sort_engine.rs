//! Whole-chain reordering: snapshot sort and in-place reversal.
//!
//! ```text
//! sort:     head ─► 16 ─► 2 ─► 8 ─► 1          (chain order)
//!                    │    │    │    │
//!           cells = [16,  2,   8,   1]         (snapshot of links)
//!           cells = [ 1,  2,   8,  16]         (stable sort_by)
//!           head ─► 1 ─► 2 ─► 8 ─► 16 ◄─ tail  (relink)
//!
//! reverse:  head ─► a ─► b ─► c ◄─ tail
//!           tail ─► a ◄─ b ◄─ c ◄─ head        (flip every link)
//! ```
//!
//! Neither operation touches the list's declared order.

use std::mem::size_of;
use std::ptr::NonNull;

use log::debug;

use super::chain::Chain;
use super::node::Node;
use super::order_policy::Order;
use crate::error::{ListError, Result};

/// Sorts the chain by payload under `order`.
///
/// Equal payloads keep their relative order. Sorting under
/// [`Order::Unordered`] and sorting a chain of fewer than two nodes are
/// no-ops. If the snapshot cannot be allocated the chain is left untouched.
pub(crate) fn sort(chain: &mut Chain, order: Order) -> Result<()> {
    if order == Order::Unordered || chain.len() < 2 {
        return Ok(());
    }

    let mut cells = snapshot(chain)?;
    // SAFETY: every cell is a live node of `chain`, which is exclusively
    // borrowed for the whole sort.
    cells.sort_by(|a, b| unsafe { order.compare(a.as_ref().data(), b.as_ref().data()) });
    relink(chain, &cells);

    debug!("sorted {} nodes {:?}", cells.len(), order);
    Ok(())
}

/// Reverses the chain in place, swapping head and tail.
pub(crate) fn reverse(chain: &mut Chain) {
    let mut reversed: Option<NonNull<Node>> = None;
    let mut cursor = chain.head;

    while let Some(mut link) = cursor {
        // SAFETY: `link` is owned by the exclusively borrowed chain.
        let node = unsafe { link.as_mut() };
        cursor = node.next_link();
        node.set_next(reversed);
        reversed = Some(link);
    }

    chain.tail = chain.head;
    chain.head = reversed;

    debug!("reversed {} nodes", chain.len());
}

fn snapshot(chain: &Chain) -> Result<Vec<NonNull<Node>>> {
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(chain.len())
        .map_err(|_| ListError::OutOfMemory {
            bytes: chain.len().saturating_mul(size_of::<NonNull<Node>>()),
        })?;
    cells.extend(chain.links());
    Ok(cells)
}

/// Rewrites every link so the chain follows `cells`.
fn relink(chain: &mut Chain, cells: &[NonNull<Node>]) {
    for pair in cells.windows(2) {
        let (mut current, next) = (pair[0], pair[1]);
        // SAFETY: all cells are owned by `chain`.
        unsafe { current.as_mut() }.set_next(Some(next));
    }

    if let Some(mut last) = cells.last().copied() {
        // SAFETY: as above.
        unsafe { last.as_mut() }.set_next(None);
    }

    chain.head = cells.first().copied();
    chain.tail = cells.last().copied();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::gated::order_policy::Placement;

    fn chain_of(values: &[i32]) -> Chain {
        let mut chain = Chain::new();
        for &value in values {
            chain.splice(Placement::Back, Node::new(value));
        }
        chain
    }

    fn values(chain: &Chain) -> Vec<i32> {
        chain.iter().map(Node::data).collect()
    }

    fn assert_tail_is_last(chain: &Chain) {
        assert_eq!(chain.links().last(), chain.tail_link());
        if let Some(tail) = chain.tail() {
            assert!(tail.next().is_none());
        }
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let mut chain = chain_of(&[16, 2, 8, 32, 1, 64, 4]);

        sort(&mut chain, Order::Ascending).unwrap();
        assert_eq!(values(&chain), vec![1, 2, 4, 8, 16, 32, 64]);
        assert_tail_is_last(&chain);

        sort(&mut chain, Order::Descending).unwrap();
        assert_eq!(values(&chain), vec![64, 32, 16, 8, 4, 2, 1]);
        assert_tail_is_last(&chain);
        assert_eq!(chain.len(), 7);
    }

    #[test]
    fn test_sort_unordered_is_noop() {
        let mut chain = chain_of(&[3, 1, 2]);

        sort(&mut chain, Order::Unordered).unwrap();

        assert_eq!(values(&chain), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_empty_and_single() {
        let mut empty = Chain::new();
        sort(&mut empty, Order::Ascending).unwrap();
        assert!(empty.is_empty());
        assert!(empty.tail().is_none());

        let mut single = chain_of(&[5]);
        sort(&mut single, Order::Descending).unwrap();
        assert_eq!(values(&single), vec![5]);
        assert_tail_is_last(&single);
    }

    #[test]
    fn test_sort_is_stable_for_equal_payloads() {
        let mut chain = chain_of(&[5, 1, 5, 0, 5]);
        let fives: Vec<_> = chain
            .links()
            .filter(|link| unsafe { link.as_ref() }.data() == 5)
            .collect();

        sort(&mut chain, Order::Descending).unwrap();

        let sorted_fives: Vec<_> = chain.links().take(3).collect();
        assert_eq!(sorted_fives, fives);
        assert_eq!(values(&chain), vec![5, 5, 5, 1, 0]);
    }

    #[test]
    fn test_reverse() {
        let mut chain = chain_of(&[1, 2, 3, 4]);
        let old_head = chain.links().next();

        reverse(&mut chain);

        assert_eq!(values(&chain), vec![4, 3, 2, 1]);
        assert_eq!(chain.tail_link(), old_head);
        assert_tail_is_last(&chain);
    }

    #[test]
    fn test_reverse_empty_and_single() {
        let mut empty = Chain::new();
        reverse(&mut empty);
        assert!(empty.head().is_none());
        assert!(empty.tail().is_none());

        let mut single = chain_of(&[9]);
        reverse(&mut single);
        assert_eq!(values(&single), vec![9]);
        assert_tail_is_last(&single);
    }

    #[test]
    fn test_reverse_twice_restores() {
        let mut chain = chain_of(&[3, 1, 4, 1, 5]);
        let before: Vec<_> = chain.links().collect();

        reverse(&mut chain);
        reverse(&mut chain);

        assert_eq!(chain.links().collect::<Vec<_>>(), before);
        assert_tail_is_last(&chain);
    }
}
