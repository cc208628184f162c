//! Deterministic force-directed layout.
//!
//! Nodes start evenly spaced on a circle whose phase and per-node radius
//! jitter come from a seeded RNG, then a fixed number of force simulation
//! ticks relax the placement. The result is centered and scaled into the
//! square [-1, 1]². The same graph, seed and config always produce the same
//! coordinates, so a renderer and a traversal computed from separate calls
//! agree on where every node is.

use std::collections::HashMap;
use std::f64::consts::TAU;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{NodeId, TopologyGraph};

/// Default layout seed.
pub const DEFAULT_SEED: u64 = 42;

/// A point in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Origin of layout space.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation: `(1 - t) * self + t * other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: (1.0 - t) * self.x + t * other.x,
            y: (1.0 - t) * self.y + t * other.y,
        }
    }

    /// Euclidean distance.
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Tuning for the force simulation.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Number of simulation ticks
    pub iterations: usize,
    /// Time step per tick, in seconds
    pub time_step: f32,
    /// Radius of the initial circle
    pub initial_radius: f64,
    /// Relative radius jitter applied per node (0.0 - 1.0)
    pub jitter: f64,
    /// Mass of every node
    pub node_mass: f32,
    /// Repulsion between all node pairs
    pub force_charge: f32,
    /// Attraction along links
    pub force_spring: f32,
    /// Cap on any single force
    pub force_max: f32,
    /// Velocity scale
    pub node_speed: f32,
    /// Velocity damping per tick
    pub damping_factor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            time_step: 0.035,
            initial_radius: 100.0,
            jitter: 0.1,
            node_mass: 10.0,
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
        }
    }
}

/// Node coordinates for one graph snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    positions: HashMap<NodeId, Point>,
}

impl Layout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from explicit coordinates.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, Point)>,
    {
        Self {
            positions: points.into_iter().collect(),
        }
    }

    /// Set the coordinate of a node.
    pub fn insert(&mut self, id: NodeId, point: Point) {
        self.positions.insert(id, point);
    }

    /// Coordinate of a node, if placed.
    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Check whether a node has a coordinate.
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Number of placed nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check whether no node is placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All placed nodes, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Point)> + '_ {
        self.positions.iter()
    }
}

/// Compute a layout with the default configuration.
pub fn compute_layout(graph: &TopologyGraph, seed: u64) -> Layout {
    compute_layout_with(graph, seed, &LayoutConfig::default())
}

/// Compute a layout with explicit tuning.
pub fn compute_layout_with(graph: &TopologyGraph, seed: u64, config: &LayoutConfig) -> Layout {
    let count = graph.node_count();
    match count {
        0 => return Layout::new(),
        1 => {
            return Layout::from_points([(graph.id_at(0).clone(), Point::ORIGIN)]);
        }
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let phase = rng.gen::<f64>() * TAU;

    let mut sim: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
        force_charge: config.force_charge,
        force_spring: config.force_spring,
        force_max: config.force_max,
        node_speed: config.node_speed,
        damping_factor: config.damping_factor,
    });

    let mut handles = Vec::with_capacity(count);
    for i in 0..count {
        let angle = phase + i as f64 * TAU / count as f64;
        let radius = config.initial_radius * (1.0 + config.jitter * rng.gen_range(-1.0..1.0));
        handles.push(sim.add_node(NodeData {
            x: (radius * angle.cos()) as f32,
            y: (radius * angle.sin()) as f32,
            mass: config.node_mass,
            is_anchor: false,
            user_data: i,
        }));
    }

    for &(a, b) in graph.link_indices() {
        sim.add_edge(handles[a], handles[b], EdgeData::default());
    }

    for _ in 0..config.iterations {
        sim.update(config.time_step);
    }

    let mut raw = vec![Point::ORIGIN; count];
    sim.visit_nodes(|node| {
        raw[node.data.user_data] = Point::new(node.x() as f64, node.y() as f64);
    });

    let points = normalize(&raw);
    Layout::from_points((0..count).map(|i| (graph.id_at(i).clone(), points[i])))
}

/// Center on the centroid and scale so the farthest axis extent is 1.
fn normalize(raw: &[Point]) -> Vec<Point> {
    let n = raw.len() as f64;
    let cx = raw.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = raw.iter().map(|p| p.y).sum::<f64>() / n;

    let extent = raw
        .iter()
        .map(|p| (p.x - cx).abs().max((p.y - cy).abs()))
        .fold(0.0_f64, f64::max);

    if !extent.is_finite() || extent == 0.0 {
        return vec![Point::ORIGIN; raw.len()];
    }

    raw.iter()
        .map(|p| Point::new((p.x - cx) / extent, (p.y - cy) / extent))
        .collect()
}
