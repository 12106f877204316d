//! Data structures guarded by the admission gate.
//!
//! # Organization
//!
//! - [`gated`] - Order-maintaining singly linked list (GatedList)

pub mod gated;

// Re-exports for convenience
pub use gated::{GatedList, Iter, Node, NodeRef, Order};
