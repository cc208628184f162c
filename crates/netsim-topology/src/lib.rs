//! Netsim Topology
//!
//! Typed network topology with minimum-hop path resolution and deterministic
//! force-directed layout.
//!
//! # Model
//!
//! A [`TopologyGraph`] holds named nodes, each of a fixed [`NodeKind`]
//! (PC, Router or Switch), joined by undirected, unweighted links. Nodes and
//! links can only be added; nothing is ever removed.
//!
//! # Paths
//!
//! [`shortest_path`] runs a breadth-first search, so the returned [`Path`]
//! always has the minimum number of hops. Ties go to whichever neighbor was
//! linked first.
//!
//! # Layout
//!
//! [`compute_layout`] places every node in the square [-1, 1]² using a
//! seeded force simulation. Equal graph and seed give equal coordinates,
//! which is what lets a renderer and a packet traversal agree on positions.
//!
//! ```
//! use netsim_topology::{shortest_path, TopologyGraph};
//!
//! let mut graph = TopologyGraph::new();
//! graph.add_node_str("A", "PC").unwrap();
//! graph.add_node_str("B", "router").unwrap();
//! graph.add_node_str("C", "pc").unwrap();
//! graph.add_link("A", "B").unwrap();
//! graph.add_link("B", "C").unwrap();
//!
//! let path = shortest_path(&graph, "A", "C").unwrap();
//! assert_eq!(path.hops(), 2);
//! ```

mod error;
mod graph;
mod layout;
mod node;
mod path;

pub use error::{Error, Result};
pub use graph::TopologyGraph;
pub use layout::{compute_layout, compute_layout_with, Layout, LayoutConfig, Point, DEFAULT_SEED};
pub use node::{Node, NodeId, NodeKind};
pub use path::{hop_distance, shortest_path, Path};
