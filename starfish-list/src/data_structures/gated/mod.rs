//! Order-maintaining singly linked list guarded by a [`ReadGate`].
//!
//! ```text
//! GatedList
//!     │
//!     ├── ReadGate        admission: many readers or one writer
//!     └── ListState
//!           ├── Order     where insert places new nodes (OrderPolicy)
//!           └── Chain     head ──► node ──► node ──► node ◄── tail
//!                          └── sort / reverse (SortEngine)
//! ```
//!
//! [`ReadGate`]: crate::preemptive_synchronization::ReadGate

pub(crate) mod chain;
pub mod gated_list;
pub mod node;
pub mod node_ref;
pub mod order_policy;
pub(crate) mod sort_engine;

pub use gated_list::GatedList;
pub use node::Node;
pub use node_ref::{Iter, NodeRef};
pub use order_policy::Order;
