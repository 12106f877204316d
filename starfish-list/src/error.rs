//! Error types used by the list.

/// Failures reported by list operations.
///
/// Lookups that miss (absent value, index past the end) are not errors; they
/// surface as `None` or `false`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The allocator could not provide memory for a node or for the sort
    /// snapshot.
    #[error("allocation of {bytes} bytes failed")]
    OutOfMemory { bytes: usize },
    /// A node located for removal did not carry the requested payload.
    /// Reaching this means the chain itself is broken; the operation is
    /// aborted before any link is touched.
    #[error("located node holds {found}, removal requested {requested}")]
    InternalInconsistency { requested: i32, found: i32 },
}

pub type Result<T> = std::result::Result<T, ListError>;
