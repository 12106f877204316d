use std::cmp::Ordering;
use std::ptr::NonNull;

use super::chain::Chain;
use super::node::Node;

/// The order a [`GatedList`](super::GatedList) maintains on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    Ascending,
    Descending,
    /// New nodes are appended; no ordering constraint holds.
    #[default]
    Unordered,
}

/// Where a new node goes, relative to the current chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// Becomes the new head (also the tail when the chain is empty).
    Front,
    /// Becomes the new tail.
    Back,
    /// Goes right after the given node, which is not the tail.
    After(NonNull<Node>),
}

impl Order {
    /// Whether an `existing` payload may stay ahead of an `incoming` one.
    ///
    /// Equal payloads stay ahead, so duplicates are inserted after the
    /// values already present.
    #[inline]
    pub fn keeps_ahead(self, existing: i32, incoming: i32) -> bool {
        match self {
            Order::Ascending => existing <= incoming,
            Order::Descending => existing >= incoming,
            Order::Unordered => true,
        }
    }

    /// Comparator for sorting under this order; `Unordered` ranks everything
    /// equal.
    #[inline]
    pub fn compare(self, a: i32, b: i32) -> Ordering {
        match self {
            Order::Ascending => a.cmp(&b),
            Order::Descending => b.cmp(&a),
            Order::Unordered => Ordering::Equal,
        }
    }

    /// Finds the insertion point for `value` in one left-to-right scan.
    ///
    /// `Unordered` never scans: it always appends after the tail.
    pub(crate) fn placement(self, chain: &Chain, value: i32) -> Placement {
        if self == Order::Unordered {
            return Placement::Back;
        }

        let mut predecessor = None;
        for link in chain.links() {
            // SAFETY: `link` is owned by the borrowed chain.
            if !self.keeps_ahead(unsafe { link.as_ref() }.data(), value) {
                break;
            }
            predecessor = Some(link);
        }

        match predecessor {
            None => Placement::Front,
            Some(link) if Some(link) == chain.tail_link() => Placement::Back,
            Some(link) => Placement::After(link),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(values: &[i32]) -> Chain {
        let mut chain = Chain::new();
        for &value in values {
            chain.splice(Placement::Back, Node::new(value));
        }
        chain
    }

    fn after_value(placement: Placement) -> i32 {
        match placement {
            // SAFETY: test chains outlive the placements computed over them.
            Placement::After(link) => unsafe { link.as_ref() }.data(),
            other => panic!("expected After, got {other:?}"),
        }
    }

    #[test]
    fn test_default_order_is_unordered() {
        assert_eq!(Order::default(), Order::Unordered);
    }

    #[test]
    fn test_empty_chain_places_at_front() {
        let chain = Chain::new();

        assert_eq!(Order::Ascending.placement(&chain, 5), Placement::Front);
        assert_eq!(Order::Descending.placement(&chain, 5), Placement::Front);
        assert_eq!(Order::Unordered.placement(&chain, 5), Placement::Back);
    }

    #[test]
    fn test_unordered_always_appends() {
        let chain = chain_of(&[9, 1, 5]);

        assert_eq!(Order::Unordered.placement(&chain, -100), Placement::Back);
        assert_eq!(Order::Unordered.placement(&chain, 100), Placement::Back);
    }

    #[test]
    fn test_ascending_placements() {
        let chain = chain_of(&[2, 4, 4, 8]);

        assert_eq!(Order::Ascending.placement(&chain, 1), Placement::Front);
        assert_eq!(after_value(Order::Ascending.placement(&chain, 3)), 2);
        assert_eq!(Order::Ascending.placement(&chain, 9), Placement::Back);
        assert_eq!(Order::Ascending.placement(&chain, 8), Placement::Back);
    }

    #[test]
    fn test_ascending_duplicates_go_after_equals() {
        let chain = chain_of(&[2, 4, 4, 8]);

        let placement = Order::Ascending.placement(&chain, 4);
        let Placement::After(link) = placement else {
            panic!("expected After, got {placement:?}");
        };
        // The last 4 of the run, not the first.
        assert_eq!(Some(link), chain.link_at(2));
    }

    #[test]
    fn test_descending_placements() {
        let chain = chain_of(&[8, 4, 4, 2]);

        assert_eq!(Order::Descending.placement(&chain, 9), Placement::Front);
        assert_eq!(Order::Descending.placement(&chain, 1), Placement::Back);
        assert_eq!(Order::Descending.placement(&chain, 2), Placement::Back);

        let placement = Order::Descending.placement(&chain, 4);
        assert_eq!(placement, Placement::After(chain.link_at(2).unwrap()));
        assert_eq!(after_value(Order::Descending.placement(&chain, 5)), 8);
    }

    #[test]
    fn test_compare() {
        assert_eq!(Order::Ascending.compare(1, 2), Ordering::Less);
        assert_eq!(Order::Descending.compare(1, 2), Ordering::Greater);
        assert_eq!(Order::Ascending.compare(3, 3), Ordering::Equal);
        assert_eq!(Order::Unordered.compare(1, 2), Ordering::Equal);
    }
}
