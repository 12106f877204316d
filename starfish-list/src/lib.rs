pub mod common_tests;
pub mod data_structures;
pub mod error;
pub mod preemptive_synchronization;

// Re-export the list surface for convenience
pub use data_structures::{GatedList, Iter, Node, NodeRef, Order};
pub use error::{ListError, Result};
pub use preemptive_synchronization::{ExclusionLock, ReadGate, ReadSection, WriteSection};

/*

cargo test --features instrumentation

RUST_LOG=trace cargo test --features instrumentation -- --nocapture

cargo bench --package starfish-list --bench gated_list_benchmark

*/
