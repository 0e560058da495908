use alloc::string::String;

/// Errors raised by heap construction and structural node operations.
///
/// Structural variants only surface through the node-level API; the
/// heap and median tracker never trigger them under correct use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// A textual heap kind other than `"min"` or `"max"` was supplied
    #[error("heap kind must be either \"min\" or \"max\", got {0:?}")]
    UnknownHeapKind(String),

    /// Structural removal was attempted on a node that still has children
    #[error("cannot remove non-leaf node")]
    NonLeafRemoval,

    /// Structural removal was attempted on a node without a parent
    #[error("cannot remove root node")]
    RootRemoval,
}
