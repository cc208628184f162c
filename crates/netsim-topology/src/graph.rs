//! Undirected topology graph with typed nodes.
//!
//! Nodes are kept in insertion order and neighbors in link-creation order.
//! Both orders are observable: path resolution breaks ties by discovery
//! order and layout seeds its initial placement by node index, so a graph
//! built by the same sequence of calls always yields the same results.

use std::collections::HashMap;

use crate::{Error, Node, NodeId, NodeKind, Result};

/// A network topology: typed nodes joined by symmetric, unweighted links.
#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<usize>>,
    links: Vec<(usize, usize)>,
}

impl TopologyGraph {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node of the given kind.
    ///
    /// Returns `true` if the node was created. Re-adding an existing node
    /// with the same kind is a no-op returning `false`; re-adding it with a
    /// different kind fails with [`Error::DuplicateNode`] since kinds are
    /// immutable.
    pub fn add_node(&mut self, id: NodeId, kind: NodeKind) -> Result<bool> {
        if let Some(&idx) = self.index.get(&id) {
            let existing = self.nodes[idx].kind;
            if existing == kind {
                return Ok(false);
            }
            return Err(Error::DuplicateNode {
                id,
                existing,
                requested: kind,
            });
        }

        let idx = self.nodes.len();
        self.index.insert(id.clone(), idx);
        self.nodes.push(Node { id, kind });
        self.adjacency.push(Vec::new());
        Ok(true)
    }

    /// Add a node from user-supplied text.
    ///
    /// The kind is parsed case-insensitively; anything other than PC, Router
    /// or Switch fails with [`Error::InvalidType`] and nothing is created.
    pub fn add_node_str(&mut self, id: &str, kind: &str) -> Result<bool> {
        let kind: NodeKind = kind.parse()?;
        let id = NodeId::new(id)?;
        self.add_node(id, kind)
    }

    /// Connect two existing nodes.
    ///
    /// Returns `true` if a new link was created and `false` if the nodes
    /// were already connected. Fails without modifying the graph if either
    /// endpoint is missing or both endpoints are the same node.
    pub fn add_link(&mut self, a: &str, b: &str) -> Result<bool> {
        let ia = self.require(a)?;
        let ib = self.require(b)?;
        if ia == ib {
            return Err(Error::InvalidLink(self.nodes[ia].id.clone()));
        }
        if self.adjacency[ia].contains(&ib) {
            return Ok(false);
        }

        self.adjacency[ia].push(ib);
        self.adjacency[ib].push(ia);
        self.links.push((ia, ib));
        Ok(true)
    }

    /// Check whether a node exists.
    pub fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// The kind of a node, if it exists.
    pub fn node_kind(&self, id: &str) -> Option<NodeKind> {
        self.index.get(id).map(|&idx| self.nodes[idx].kind)
    }

    /// Look up a node.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Neighbors of a node in link-creation order, or `None` if the node
    /// does not exist.
    pub fn neighbors(&self, id: &str) -> Option<impl Iterator<Item = &NodeId> + '_> {
        let idx = *self.index.get(id)?;
        Some(self.adjacency[idx].iter().map(|&n| &self.nodes[n].id))
    }

    /// Check whether two nodes are directly linked.
    pub fn has_link(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&ia), Some(&ib)) => self.adjacency[ia].contains(&ib),
            _ => false,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Check whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// All links in creation order, each undirected link reported once.
    pub fn links(&self) -> impl ExactSizeIterator<Item = (&NodeId, &NodeId)> + '_ {
        self.links
            .iter()
            .map(|&(a, b)| (&self.nodes[a].id, &self.nodes[b].id))
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownNode(NodeId::from_raw(id)))
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn id_at(&self, idx: usize) -> &NodeId {
        &self.nodes[idx].id
    }

    pub(crate) fn adjacent(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }

    pub(crate) fn link_indices(&self) -> &[(usize, usize)] {
        &self.links
    }
}
