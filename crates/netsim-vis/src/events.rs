//! Packet monitor events and topology snapshots for front ends.

use std::fmt;
use std::time::Duration;

use netsim_topology::{Layout, NodeId, NodeKind, Path, Point, TopologyGraph};
use serde::{Deserialize, Serialize};

use crate::simulation::AnimationFrame;

/// What the packet monitor shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonitorStatus {
    /// The packet is crossing a hop
    InTransit {
        hop: String,
        total_hops: usize,
        progress: u8,
        elapsed: Duration,
    },

    /// The frame sequence is exhausted
    Delivered {
        source: NodeId,
        destination: NodeId,
        total_time: Duration,
    },
}

impl MonitorStatus {
    /// Monitor readout for a frame.
    pub fn in_transit(frame: &AnimationFrame) -> Self {
        MonitorStatus::InTransit {
            hop: frame.hop_label(),
            total_hops: frame.total_hops,
            progress: frame.progress,
            elapsed: frame.elapsed,
        }
    }

    /// Completion notice for a path.
    pub fn delivered(path: &Path, total_time: Duration) -> Self {
        MonitorStatus::Delivered {
            source: path.source().clone(),
            destination: path.destination().clone(),
            total_time,
        }
    }

    /// Check whether this is the completion notice.
    pub fn is_delivered(&self) -> bool {
        matches!(self, MonitorStatus::Delivered { .. })
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorStatus::InTransit {
                hop,
                total_hops,
                progress,
                elapsed,
            } => {
                writeln!(f, "Current Hop: {hop}")?;
                writeln!(f, "Total Hops: {total_hops}")?;
                writeln!(f, "Progress: {progress}%")?;
                writeln!(f, "Time: {:.1}s", elapsed.as_secs_f64())?;
                write!(f, "Status: In Transit")
            }
            MonitorStatus::Delivered {
                source,
                destination,
                total_time,
            } => {
                writeln!(f, "Packet delivered from {source} to {destination}!")?;
                write!(f, "Total Time: {:.1}s", total_time.as_secs_f64())
            }
        }
    }
}

/// A placed node as a front end draws it.
#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub icon: &'static str,
    pub color: &'static str,
    pub position: Point,
}

/// A link between two placed nodes.
#[derive(Debug, Clone, Serialize)]
pub struct LinkView {
    pub from: Point,
    pub to: Point,
}

/// Everything a front end needs to draw the topology.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopologySnapshot {
    pub nodes: Vec<NodeView>,
    pub links: Vec<LinkView>,
    pub node_count: usize,
    pub link_count: usize,
}

impl TopologySnapshot {
    /// Combine a graph with its layout.
    ///
    /// Nodes the layout does not place are left out, along with their links.
    pub fn capture(graph: &TopologyGraph, layout: &Layout) -> Self {
        let nodes: Vec<_> = graph
            .nodes()
            .filter_map(|node| {
                let position = layout.get(node.id.as_str())?;
                Some(NodeView {
                    id: node.id.clone(),
                    kind: node.kind,
                    icon: node.kind.icon(),
                    color: node.kind.color(),
                    position,
                })
            })
            .collect();

        let links: Vec<_> = graph
            .links()
            .filter_map(|(a, b)| {
                Some(LinkView {
                    from: layout.get(a.as_str())?,
                    to: layout.get(b.as_str())?,
                })
            })
            .collect();

        TopologySnapshot {
            node_count: nodes.len(),
            link_count: links.len(),
            nodes,
            links,
        }
    }

    /// Serialize for a JSON-speaking front end.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
