//! Error types for netsim-topology.

use thiserror::Error;

use crate::{NodeId, NodeKind};

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a topology.
///
/// All of these are validation failures caused by user input; none leave
/// the graph in a partially modified state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested node kind is not one of PC, Router or Switch.
    #[error("invalid node type {0:?}: expected PC, Router or Switch")]
    InvalidType(String),

    /// The node identifier is empty.
    #[error("node identifier must not be empty")]
    InvalidNodeId,

    /// The node already exists with a different kind.
    #[error("node '{id}' already exists as {existing}, cannot re-add as {requested}")]
    DuplicateNode {
        id: NodeId,
        existing: NodeKind,
        requested: NodeKind,
    },

    /// A referenced node does not exist.
    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),

    /// A link would connect a node to itself.
    #[error("cannot link node '{0}' to itself")]
    InvalidLink(NodeId),

    /// Source and destination are in different components.
    #[error("no path exists between {from} and {to}")]
    NoPathFound { from: NodeId, to: NodeId },
}
