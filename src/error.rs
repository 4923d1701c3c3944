// Error taxonomy for tree construction and navigation

pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors surfaced while materializing or navigating the tree.
///
/// Display-level degradations (an enum without an accessible backing
/// integer, a value outside the taxonomy) are never errors; they render
/// as diagnostic labels and log a warning instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The instance publishes no position table, so no subtree can be
    /// materialized for it.
    #[error("no position metadata for `{type_name}`; parser built without position tracking")]
    MissingPositionMetadata { type_name: &'static str },

    /// A repeated field's element count disagrees with its recorded
    /// element offsets.
    #[error("span count mismatch for `{field}`: {values} values, {starts} starts, {ends} ends")]
    SpanCountMismatch {
        field: String,
        values: usize,
        starts: usize,
        ends: usize,
    },

    /// Child index past the end of a node's children.
    #[error("child index {index} out of range for a node with {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    /// The descriptor declares a sequential field or parameter that has
    /// no matching accessor.
    #[error("`{type_name}` declares `{name}` but publishes no accessor for it")]
    UnknownAccessor {
        type_name: &'static str,
        name: &'static str,
    },
}
