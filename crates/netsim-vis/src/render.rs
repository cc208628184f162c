//! Terminal rendering of topologies and packet frames.
//!
//! Layout space [-1, 1]² maps onto a character grid. Links are dotted
//! lines, nodes are their kind glyph followed by their id, and the packet is
//! a filled circle drawn last so it is always visible.

use netsim_topology::{NodeKind, Point};

use crate::events::TopologySnapshot;
use crate::simulation::AnimationFrame;

const LINK: char = '·';
const PACKET: char = '●';

/// Fixed-size character canvas.
#[derive(Debug, Clone)]
struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width * height],
        }
    }

    /// Cell for a layout point, leaving a one-cell border.
    fn cell(&self, p: Point) -> (usize, usize) {
        let scale = |v: f64, cells: usize| {
            let span = cells.saturating_sub(3) as f64;
            let v = v.clamp(-1.0, 1.0);
            1 + ((v + 1.0) / 2.0 * span).round() as usize
        };
        // Screen rows grow downwards.
        (scale(p.x, self.width), scale(-p.y, self.height))
    }

    fn put(&mut self, col: usize, row: usize, ch: char) {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = ch;
        }
    }

    fn put_str(&mut self, col: usize, row: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i, row, ch);
        }
    }

    fn line(&mut self, from: Point, to: Point) {
        let (c0, r0) = self.cell(from);
        let (c1, r1) = self.cell(to);
        let steps = c0.abs_diff(c1).max(r0.abs_diff(r1)).max(1);
        for s in 0..=steps {
            let p = from.lerp(to, s as f64 / steps as f64);
            let (c, r) = self.cell(p);
            self.put(c, r, LINK);
        }
    }

    fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().collect::<String>().trim_end().to_owned())
    }
}

/// Draws snapshots and frames as text.
#[derive(Debug, Clone)]
pub struct Renderer {
    width: usize,
    height: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(72, 20)
    }
}

impl Renderer {
    /// Create a renderer for a `width × height` character grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(8),
            height: height.max(4),
        }
    }

    /// Draw the topology alone.
    pub fn render_topology(&self, scene: &TopologySnapshot) -> String {
        let canvas = self.draw(scene, None);
        self.compose("Network Topology", &canvas)
    }

    /// Draw the topology with the packet at a frame's position.
    pub fn render_frame(&self, scene: &TopologySnapshot, frame: &AnimationFrame) -> String {
        let canvas = self.draw(scene, Some(frame.position));
        self.compose("Packet Flow Animation", &canvas)
    }

    fn draw(&self, scene: &TopologySnapshot, packet: Option<Point>) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height);
        for link in &scene.links {
            canvas.line(link.from, link.to);
        }
        for node in &scene.nodes {
            let (col, row) = canvas.cell(node.position);
            canvas.put(col, row, node.kind.glyph());
            canvas.put_str(col + 1, row, node.id.as_str());
        }
        if let Some(p) = packet {
            let (col, row) = canvas.cell(p);
            canvas.put(col, row, PACKET);
        }
        canvas
    }

    fn compose(&self, title: &str, canvas: &Canvas) -> String {
        let mut out = String::new();
        out.push_str(title);
        out.push('\n');
        for row in canvas.rows() {
            out.push_str(&row);
            out.push('\n');
        }
        out.push_str(&legend());
        out
    }
}

/// Kind → glyph, icon and color key.
pub fn legend() -> String {
    NodeKind::ALL
        .iter()
        .map(|kind| {
            format!(
                "{} = {} {} ({})",
                kind.glyph(),
                kind.icon(),
                kind.name(),
                kind.color()
            )
        })
        .collect::<Vec<_>>()
        .join("   ")
}
