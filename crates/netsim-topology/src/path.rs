//! Minimum-hop path resolution.
//!
//! Links are unweighted, so breadth-first search from the source yields a
//! shortest path. Neighbors are expanded in link-creation order and the
//! first predecessor to discover a node wins, which makes the chosen path
//! deterministic when several shortest paths exist.

use std::collections::VecDeque;
use std::fmt;

use crate::{Error, NodeId, Result, TopologyGraph};

/// A simple path through the topology.
///
/// Always holds at least one node; consecutive nodes are linked and no node
/// repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Path(Vec<NodeId>);

impl Path {
    /// The nodes along the path, source first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    /// First node.
    pub fn source(&self) -> &NodeId {
        &self.0[0]
    }

    /// Last node.
    pub fn destination(&self) -> &NodeId {
        &self.0[self.0.len() - 1]
    }

    /// Number of links traversed.
    pub fn hops(&self) -> usize {
        self.0.len() - 1
    }

    /// Number of nodes on the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A path is never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The `(from, to)` pairs of each hop in order.
    pub fn hop_pairs(&self) -> impl ExactSizeIterator<Item = (&NodeId, &NodeId)> + '_ {
        self.0.windows(2).map(|w| (&w[0], &w[1]))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", id)?;
        }
        f.write_str("]")
    }
}

/// Find a minimum-hop path from `source` to `destination`.
///
/// Fails with [`Error::UnknownNode`] if either endpoint is missing and with
/// [`Error::NoPathFound`] if they are in different components. A node is
/// always reachable from itself by the single-node path.
pub fn shortest_path(graph: &TopologyGraph, source: &str, destination: &str) -> Result<Path> {
    let (src, dst) = endpoints(graph, source, destination)?;
    let parent = bfs(graph, src, dst);

    if parent[dst].is_none() {
        return Err(no_path(graph, src, dst));
    }

    let mut nodes = vec![graph.id_at(dst).clone()];
    let mut current = dst;
    while current != src {
        // Every discovered node except the source has a real predecessor.
        current = match parent[current] {
            Some(prev) => prev,
            None => return Err(no_path(graph, src, dst)),
        };
        nodes.push(graph.id_at(current).clone());
    }
    nodes.reverse();
    Ok(Path(nodes))
}

/// Number of hops on a shortest path between two nodes.
pub fn hop_distance(graph: &TopologyGraph, source: &str, destination: &str) -> Result<usize> {
    shortest_path(graph, source, destination).map(|path| path.hops())
}

fn endpoints(graph: &TopologyGraph, source: &str, destination: &str) -> Result<(usize, usize)> {
    let lookup = |id: &str| {
        graph
            .index_of(id)
            .ok_or_else(|| Error::UnknownNode(NodeId::from_raw(id)))
    };
    Ok((lookup(source)?, lookup(destination)?))
}

fn no_path(graph: &TopologyGraph, src: usize, dst: usize) -> Error {
    Error::NoPathFound {
        from: graph.id_at(src).clone(),
        to: graph.id_at(dst).clone(),
    }
}

/// Breadth-first search recording each node's discovering predecessor.
///
/// The source is its own parent. Stops once `target` is dequeued.
fn bfs(graph: &TopologyGraph, src: usize, target: usize) -> Vec<Option<usize>> {
    let mut parent = vec![None; graph.node_count()];
    let mut queue = VecDeque::new();
    parent[src] = Some(src);
    queue.push_back(src);

    while let Some(node) = queue.pop_front() {
        if node == target {
            break;
        }
        for &next in graph.adjacent(node) {
            if parent[next].is_none() {
                parent[next] = Some(node);
                queue.push_back(next);
            }
        }
    }

    parent
}
