//! Packet traversal simulation.
//!
//! A [`TraversalSimulator`] turns a path and a layout into a finite sequence
//! of animation frames. Every hop is sampled `samples_per_hop` times with
//! evenly spaced interpolation parameters covering both endpoints, so each
//! hop ends exactly on its destination node and the final frame sits on the
//! packet's destination.
//!
//! Frames are computed on demand from their index. Nothing is buffered, a
//! consumer may stop pulling at any point, and calling
//! [`TraversalSimulator::frames`] again replays the same sequence.

use std::iter::FusedIterator;
use std::str::FromStr;
use std::time::{Duration, Instant};

use netsim_topology::{Layout, NodeId, Path, Point, DEFAULT_SEED};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::playback::PlaybackSpeed;

/// Default number of interpolation samples per hop.
pub const DEFAULT_SAMPLES_PER_HOP: usize = 25;

/// Default time between frames.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Default time the delivery notice stays up.
pub const DEFAULT_MONITOR_LINGER: Duration = Duration::from_secs(2);

/// Configuration for a traversal run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Interpolation samples per hop
    pub samples_per_hop: usize,
    /// Base time between frames at normal speed
    pub frame_interval: Duration,
    /// Seed for the force-directed layout
    pub layout_seed: u64,
    /// How long the delivery notice stays visible
    pub monitor_linger: Duration,
    /// Playback speed multiplier
    pub speed: PlaybackSpeed,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            samples_per_hop: DEFAULT_SAMPLES_PER_HOP,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            layout_seed: DEFAULT_SEED,
            monitor_linger: DEFAULT_MONITOR_LINGER,
            speed: PlaybackSpeed::Normal,
        }
    }
}

impl SimulationConfig {
    /// Create config from environment variables, falling back to defaults.
    ///
    /// Reads `NETSIM_SAMPLES_PER_HOP`, `NETSIM_FRAME_INTERVAL_MS`,
    /// `NETSIM_LAYOUT_SEED`, `NETSIM_MONITOR_LINGER_MS` and `NETSIM_SPEED`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(samples) = env_parse("NETSIM_SAMPLES_PER_HOP")? {
            config.samples_per_hop = samples;
        }
        if let Some(ms) = env_parse("NETSIM_FRAME_INTERVAL_MS")? {
            config.frame_interval = Duration::from_millis(ms);
        }
        if let Some(seed) = env_parse("NETSIM_LAYOUT_SEED")? {
            config.layout_seed = seed;
        }
        if let Some(ms) = env_parse("NETSIM_MONITOR_LINGER_MS")? {
            config.monitor_linger = Duration::from_millis(ms);
        }
        if let Some(speed) = env_parse("NETSIM_SPEED")? {
            config.speed = speed;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive a traversal.
    pub fn validate(&self) -> Result<()> {
        if self.samples_per_hop == 0 {
            return Err(Error::InvalidConfig(
                "samples_per_hop must be at least 1".into(),
            ));
        }
        if self.frame_interval.is_zero() && self.speed != PlaybackSpeed::Maximum {
            return Err(Error::InvalidConfig(
                "frame_interval must be non-zero".into(),
            ));
        }
        if self.speed == PlaybackSpeed::Paused {
            return Err(Error::InvalidConfig(
                "playback speed cannot start paused".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::InvalidConfig(format!("{name}={raw:?}: {e}"))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::InvalidConfig(format!("{name}: {e}"))),
    }
}

/// One sample of the packet's journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationFrame {
    /// Position of this frame in the sequence
    pub index: usize,
    /// Interpolated packet position
    pub position: Point,
    /// Index of the active hop
    pub hop: usize,
    /// Node the active hop leaves from
    pub from: NodeId,
    /// Node the active hop arrives at
    pub to: NodeId,
    /// Hops on the whole path
    pub total_hops: usize,
    /// Percent complete, 0 - 100
    pub progress: u8,
    /// Wall-clock time since the sequence started
    pub elapsed: Duration,
}

impl AnimationFrame {
    /// The active hop as `from → to`.
    pub fn hop_label(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}

/// Produces the frames of one packet traversal.
#[derive(Debug, Clone)]
pub struct TraversalSimulator {
    path: Path,
    points: Vec<Point>,
    samples_per_hop: usize,
}

impl TraversalSimulator {
    /// Create a simulator for a path over a layout.
    ///
    /// Fails with [`Error::LayoutIncomplete`] if any path node is missing
    /// from the layout and with [`Error::InvalidConfig`] if
    /// `samples_per_hop` is zero.
    pub fn new(path: Path, layout: &Layout, samples_per_hop: usize) -> Result<Self> {
        if samples_per_hop == 0 {
            return Err(Error::InvalidConfig(
                "samples_per_hop must be at least 1".into(),
            ));
        }

        let points = path
            .nodes()
            .iter()
            .map(|id| {
                layout
                    .get(id.as_str())
                    .ok_or_else(|| Error::LayoutIncomplete { node: id.clone() })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            path,
            points,
            samples_per_hop,
        })
    }

    /// Create a simulator using the sampling rate from `config`.
    pub fn with_config(path: Path, layout: &Layout, config: &SimulationConfig) -> Result<Self> {
        Self::new(path, layout, config.samples_per_hop)
    }

    /// The path being traversed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of hops on the path.
    pub fn hops(&self) -> usize {
        self.path.hops()
    }

    /// Interpolation samples per hop.
    pub fn samples_per_hop(&self) -> usize {
        self.samples_per_hop
    }

    /// Total frames: `hops × samples_per_hop`.
    pub fn total_frames(&self) -> usize {
        self.hops() * self.samples_per_hop
    }

    /// True when source and destination coincide.
    ///
    /// Such a traversal has no frames and counts as delivered at once.
    pub fn is_immediate(&self) -> bool {
        self.hops() == 0
    }

    /// Compute frame `index` with the given elapsed time.
    ///
    /// Returns `None` past the end of the sequence.
    pub fn frame_at(&self, index: usize, elapsed: Duration) -> Option<AnimationFrame> {
        let total = self.total_frames();
        if index >= total {
            return None;
        }

        let n = self.samples_per_hop;
        let hop = (index / n).min(self.hops() - 1);
        let step = index - hop * n;
        let t = if n == 1 {
            1.0
        } else {
            step as f64 / (n - 1) as f64
        };

        let nodes = self.path.nodes();
        Some(AnimationFrame {
            index,
            position: self.points[hop].lerp(self.points[hop + 1], t),
            hop,
            from: nodes[hop].clone(),
            to: nodes[hop + 1].clone(),
            total_hops: self.hops(),
            progress: percent(index + 1, total),
            elapsed,
        })
    }

    /// Compute frame `index` without timing information.
    pub fn sample(&self, index: usize) -> Option<AnimationFrame> {
        self.frame_at(index, Duration::ZERO)
    }

    /// A fresh frame sequence, timed from now.
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            simulator: self,
            next: 0,
            started: Instant::now(),
        }
    }
}

/// `round(done / total × 100)` in integer arithmetic, halves rounding up.
fn percent(done: usize, total: usize) -> u8 {
    ((done * 200 + total) / (2 * total)) as u8
}

/// Lazy iterator over a traversal's frames.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    simulator: &'a TraversalSimulator,
    next: usize,
    started: Instant,
}

impl Frames<'_> {
    /// Instant the sequence started.
    pub fn started(&self) -> Instant {
        self.started
    }
}

impl Iterator for Frames<'_> {
    type Item = AnimationFrame;

    fn next(&mut self) -> Option<AnimationFrame> {
        let frame = self
            .simulator
            .frame_at(self.next, self.started.elapsed())?;
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.simulator.total_frames().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use netsim_topology::{shortest_path, TopologyGraph};
    use proptest::prelude::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    fn abc() -> (TopologyGraph, Layout) {
        let mut g = TopologyGraph::new();
        g.add_node_str("A", "PC").unwrap();
        g.add_node_str("B", "Router").unwrap();
        g.add_node_str("C", "PC").unwrap();
        g.add_link("A", "B").unwrap();
        g.add_link("B", "C").unwrap();

        let layout = Layout::from_points([
            (id("A"), Point::new(0.0, 0.0)),
            (id("B"), Point::new(1.0, 0.0)),
            (id("C"), Point::new(1.0, 1.0)),
        ]);
        (g, layout)
    }

    fn simulator(from: &str, to: &str, samples: usize) -> TraversalSimulator {
        let (g, layout) = abc();
        let path = shortest_path(&g, from, to).unwrap();
        TraversalSimulator::new(path, &layout, samples).unwrap()
    }

    #[test]
    fn frame_count_is_hops_times_samples() {
        let sim = simulator("A", "C", 25);
        assert_eq!(sim.hops(), 2);
        assert_eq!(sim.total_frames(), 50);
        assert_eq!(sim.frames().len(), 50);
        assert_eq!(sim.frames().count(), 50);
    }

    #[test]
    fn hop_boundaries() {
        let sim = simulator("A", "C", 25);

        let last_of_first = sim.sample(24).unwrap();
        assert_eq!(last_of_first.hop, 0);
        assert_eq!(last_of_first.hop_label(), "A → B");
        assert_eq!(last_of_first.position, Point::new(1.0, 0.0));

        let first_of_second = sim.sample(25).unwrap();
        assert_eq!(first_of_second.hop, 1);
        assert_eq!(first_of_second.hop_label(), "B → C");
        assert_eq!(first_of_second.position, Point::new(1.0, 0.0));
    }

    #[test]
    fn first_and_last_frames_hit_endpoints() {
        let sim = simulator("A", "C", 25);
        let first = sim.sample(0).unwrap();
        assert_eq!(first.position, Point::new(0.0, 0.0));
        assert_eq!(first.progress, 2);

        let last = sim.frames().last().unwrap();
        assert_eq!(last.index, 49);
        assert_eq!(last.position, Point::new(1.0, 1.0));
        assert_eq!(last.progress, 100);
        assert!(sim.sample(50).is_none());
    }

    #[test]
    fn midpoint_interpolation() {
        let sim = simulator("A", "B", 5);
        let positions: Vec<_> = sim.frames().map(|f| f.position.x).collect();
        assert_eq!(positions, [0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn single_sample_lands_on_each_node() {
        let sim = simulator("A", "C", 1);
        let positions: Vec<_> = sim.frames().map(|f| f.position).collect();
        assert_eq!(positions, [Point::new(1.0, 0.0), Point::new(1.0, 1.0)]);
    }

    #[test]
    fn progress_rounds_to_nearest() {
        // 3 frames: 33.3 -> 33, 66.7 -> 67, 100
        let sim = simulator("A", "B", 3);
        let progress: Vec<_> = sim.frames().map(|f| f.progress).collect();
        assert_eq!(progress, [33, 67, 100]);
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
    }

    #[test]
    fn zero_hop_path_is_immediate() {
        let sim = simulator("A", "A", 25);
        assert!(sim.is_immediate());
        assert_eq!(sim.total_frames(), 0);
        assert_eq!(sim.frames().next(), None);
        assert!(sim.sample(0).is_none());
    }

    #[test]
    fn sequence_is_restartable() {
        let sim = simulator("C", "A", 7);
        let strip = |f: AnimationFrame| AnimationFrame {
            elapsed: Duration::ZERO,
            ..f
        };
        let first: Vec<_> = sim.frames().map(strip).collect();
        let second: Vec<_> = sim.frames().map(strip).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn partial_consumption_is_safe() {
        let sim = simulator("A", "C", 10);
        let mut frames = sim.frames();
        frames.next();
        frames.next();
        assert_eq!(frames.len(), 18);
        drop(frames);
        assert_eq!(sim.frames().next().unwrap().index, 0);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let sim = simulator("A", "C", 4);
        let elapsed: Vec<_> = sim.frames().map(|f| f.elapsed).collect();
        assert!(elapsed.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn missing_coordinate_is_rejected() {
        let (g, _) = abc();
        let layout = Layout::from_points([
            (id("A"), Point::new(0.0, 0.0)),
            (id("C"), Point::new(1.0, 1.0)),
        ]);
        let path = shortest_path(&g, "A", "C").unwrap();
        let err = TraversalSimulator::new(path, &layout, 25).unwrap_err();
        assert!(matches!(err, Error::LayoutIncomplete { node } if node.as_str() == "B"));
    }

    #[test]
    fn zero_samples_rejected() {
        let (g, layout) = abc();
        let path = shortest_path(&g, "A", "C").unwrap();
        assert!(matches!(
            TraversalSimulator::new(path, &layout, 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.samples_per_hop, 25);
        assert_eq!(config.frame_interval, Duration::from_millis(100));
        assert_eq!(config.layout_seed, 42);
        assert_eq!(config.monitor_linger, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_validation() {
        let zero_samples = SimulationConfig {
            samples_per_hop: 0,
            ..Default::default()
        };
        assert!(zero_samples.validate().is_err());

        let paused = SimulationConfig {
            speed: PlaybackSpeed::Paused,
            ..Default::default()
        };
        assert!(paused.validate().is_err());

        let flat_out = SimulationConfig {
            frame_interval: Duration::ZERO,
            speed: PlaybackSpeed::Maximum,
            ..Default::default()
        };
        assert!(flat_out.validate().is_ok());
    }

    #[test]
    fn config_from_env() {
        const VARS: [&str; 5] = [
            "NETSIM_SAMPLES_PER_HOP",
            "NETSIM_FRAME_INTERVAL_MS",
            "NETSIM_LAYOUT_SEED",
            "NETSIM_MONITOR_LINGER_MS",
            "NETSIM_SPEED",
        ];
        let clear = || VARS.iter().for_each(|name| std::env::remove_var(name));

        clear();
        assert_eq!(SimulationConfig::from_env().unwrap(), SimulationConfig::default());

        std::env::set_var("NETSIM_SAMPLES_PER_HOP", "5");
        std::env::set_var("NETSIM_FRAME_INTERVAL_MS", " 40 ");
        std::env::set_var("NETSIM_LAYOUT_SEED", "7");
        std::env::set_var("NETSIM_MONITOR_LINGER_MS", "0");
        std::env::set_var("NETSIM_SPEED", "2x");
        let config = SimulationConfig::from_env().unwrap();
        assert_eq!(config.samples_per_hop, 5);
        assert_eq!(config.frame_interval, Duration::from_millis(40));
        assert_eq!(config.layout_seed, 7);
        assert_eq!(config.monitor_linger, Duration::ZERO);
        assert_eq!(config.speed, PlaybackSpeed::Double);

        std::env::set_var("NETSIM_SAMPLES_PER_HOP", "abc");
        assert!(matches!(
            SimulationConfig::from_env(),
            Err(Error::InvalidConfig(msg)) if msg.starts_with("NETSIM_SAMPLES_PER_HOP=\"abc\"")
        ));

        std::env::set_var("NETSIM_SAMPLES_PER_HOP", "0");
        assert!(matches!(
            SimulationConfig::from_env(),
            Err(Error::InvalidConfig(msg)) if msg.contains("samples_per_hop")
        ));

        std::env::set_var("NETSIM_SAMPLES_PER_HOP", "5");
        std::env::set_var("NETSIM_FRAME_INTERVAL_MS", "0");
        assert!(matches!(
            SimulationConfig::from_env(),
            Err(Error::InvalidConfig(msg)) if msg.contains("frame_interval")
        ));

        std::env::set_var("NETSIM_FRAME_INTERVAL_MS", "40");
        std::env::set_var("NETSIM_SPEED", "warp");
        assert!(matches!(
            SimulationConfig::from_env(),
            Err(Error::InvalidConfig(msg)) if msg.starts_with("NETSIM_SPEED=")
        ));

        std::env::set_var("NETSIM_SPEED", "paused");
        assert!(SimulationConfig::from_env().is_err());

        clear();
    }

    proptest! {
        #[test]
        fn final_frame_is_destination(samples in 1usize..40, x in -1.0f64..1.0, y in -1.0f64..1.0) {
            let (g, _) = abc();
            let layout = Layout::from_points([
                (id("A"), Point::new(-x, y)),
                (id("B"), Point::new(0.3, -0.7)),
                (id("C"), Point::new(x, -y)),
            ]);
            let path = shortest_path(&g, "A", "C").unwrap();
            let sim = TraversalSimulator::new(path, &layout, samples).unwrap();

            prop_assert_eq!(sim.frames().count(), 2 * samples);
            let last = sim.frames().last().unwrap();
            prop_assert_eq!(last.position, Point::new(x, -y));
            prop_assert_eq!(last.progress, 100);
        }
    }
}
