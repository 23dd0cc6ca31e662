//! DOM operation errors

use crate::{NodeId, NodeType};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
///
/// Every error is raised at the call site and describes whether the node
/// kind was wrong, an argument was bad, or the node had no parent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The operation is not applicable to this node kind
    #[error("{operation} is not valid for {kind} nodes")]
    InvalidOperation {
        operation: &'static str,
        kind: NodeType,
    },

    /// The node is not a child of the given parent
    #[error("node {node} is not a child of {parent}")]
    NotAChild { node: NodeId, parent: NodeId },

    /// The node has no parent
    #[error("node {0} has no parent")]
    NoParent(NodeId),

    /// Inserting would break the tree shape
    #[error("cannot insert node {node} under {parent}: {reason}")]
    HierarchyRequest {
        node: NodeId,
        parent: NodeId,
        reason: &'static str,
    },

    /// Structural index outside the child list
    #[error("index {index} is out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    /// Node id does not belong to this tree
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Malformed path token
    #[error("invalid path token: {0:?}")]
    InvalidPathToken(String),

    /// Fragment parser rejected its input
    #[error("parse error: {0}")]
    Parse(String),
}

impl DomError {
    /// The default-deny failure for `operation` on a node of `kind`
    #[inline]
    pub(crate) fn not_applicable(operation: &'static str, kind: NodeType) -> Self {
        tracing::trace!("{} denied for {} node", operation, kind);
        Self::InvalidOperation { operation, kind }
    }
}
