//! Error types for netsim-vis.

use netsim_topology::NodeId;
use thiserror::Error;

/// Result type for simulation and front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while simulating or driving a traversal.
#[derive(Debug, Error)]
pub enum Error {
    /// A node on the path has no coordinate in the layout.
    #[error("layout has no coordinate for path node '{node}'")]
    LayoutIncomplete { node: NodeId },

    /// A configuration value is out of range or unparseable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A command line could not be parsed.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Topology error
    #[error(transparent)]
    Topology(#[from] netsim_topology::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
