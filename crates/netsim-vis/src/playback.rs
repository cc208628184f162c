//! Playback controls for a packet traversal.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::simulation::{AnimationFrame, TraversalSimulator};

/// Playback speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    /// Pause playback
    Paused,
    /// 0.25x speed
    QuarterSpeed,
    /// 0.5x speed
    HalfSpeed,
    /// Normal speed (1x)
    Normal,
    /// 2x speed
    Double,
    /// 4x speed
    Quadruple,
    /// 10x speed
    TenX,
    /// Maximum speed (as fast as possible)
    Maximum,
}

impl PlaybackSpeed {
    /// Get the speed multiplier.
    pub fn multiplier(&self) -> f64 {
        match self {
            PlaybackSpeed::Paused => 0.0,
            PlaybackSpeed::QuarterSpeed => 0.25,
            PlaybackSpeed::HalfSpeed => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Double => 2.0,
            PlaybackSpeed::Quadruple => 4.0,
            PlaybackSpeed::TenX => 10.0,
            PlaybackSpeed::Maximum => f64::INFINITY,
        }
    }

    /// Time per frame at this speed, given the normal-speed interval.
    ///
    /// `None` while paused; zero at maximum speed.
    pub fn frame_interval(&self, base: Duration) -> Option<Duration> {
        match self {
            PlaybackSpeed::Paused => None,
            PlaybackSpeed::Maximum => Some(Duration::ZERO),
            speed => Some(base.div_f64(speed.multiplier())),
        }
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackSpeed::Paused => f.write_str("paused"),
            PlaybackSpeed::Maximum => f.write_str("max"),
            speed => write!(f, "{}x", speed.multiplier()),
        }
    }
}

/// Accepts a multiplier (`2`, `0.25x`) or a name (`half`, `max`, `paused`).
impl FromStr for PlaybackSpeed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let text = s.trim().to_ascii_lowercase();
        let key = text
            .strip_suffix('x')
            .filter(|n| n.parse::<f64>().is_ok())
            .unwrap_or(&text);
        let speed = match key {
            "paused" | "pause" | "0" => PlaybackSpeed::Paused,
            "quarter" | "0.25" | ".25" => PlaybackSpeed::QuarterSpeed,
            "half" | "0.5" | ".5" => PlaybackSpeed::HalfSpeed,
            "normal" | "1" => PlaybackSpeed::Normal,
            "double" | "2" => PlaybackSpeed::Double,
            "quadruple" | "4" => PlaybackSpeed::Quadruple,
            "ten" | "10" => PlaybackSpeed::TenX,
            "max" | "maximum" => PlaybackSpeed::Maximum,
            _ => {
                return Err(Error::InvalidConfig(format!(
                    "unknown playback speed {s:?}: expected 0.25, 0.5, 1, 2, 4, 10 or max"
                )))
            }
        };
        Ok(speed)
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Playback is stopped at beginning
    Stopped,
    /// Playback is running forward
    Playing,
    /// Playback is paused
    Paused,
    /// The packet has been delivered
    Finished,
}

/// Playback controller over a traversal's frames.
///
/// Frames are computed from the cursor on demand, so stopping rewinds
/// without recomputing anything.
pub struct Playback {
    simulator: TraversalSimulator,
    base_interval: Duration,
    current_frame: usize,
    state: PlaybackState,
    speed: PlaybackSpeed,
    started: Option<Instant>,
}

impl Playback {
    /// Create a new playback controller.
    pub fn new(simulator: TraversalSimulator, base_interval: Duration) -> Self {
        Self {
            simulator,
            base_interval,
            current_frame: 0,
            state: PlaybackState::Stopped,
            speed: PlaybackSpeed::Normal,
            started: None,
        }
    }

    /// The traversal being played.
    pub fn simulator(&self) -> &TraversalSimulator {
        &self.simulator
    }

    /// Get the current frame number.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Get the total number of frames.
    pub fn total_frames(&self) -> usize {
        self.simulator.total_frames()
    }

    /// Get the current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Get the current playback speed.
    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Check whether the packet has been delivered.
    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Time between frames at the current speed, `None` while paused.
    pub fn interval(&self) -> Option<Duration> {
        self.speed.frame_interval(self.base_interval)
    }

    /// Wall-clock time since playback first started.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Start playback.
    ///
    /// Playing a finished traversal restarts it. A traversal with no frames
    /// finishes immediately.
    pub fn play(&mut self) {
        if self.current_frame >= self.total_frames() && self.total_frames() > 0 {
            self.current_frame = 0;
            self.started = None;
        }
        self.started.get_or_insert_with(Instant::now);
        self.state = if self.total_frames() == 0 {
            PlaybackState::Finished
        } else {
            PlaybackState::Playing
        };
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Finished {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop playback and return to beginning.
    pub fn stop(&mut self) {
        self.current_frame = 0;
        self.started = None;
        self.state = PlaybackState::Stopped;
    }

    /// Set playback speed.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
        if matches!(speed, PlaybackSpeed::Paused) {
            self.pause();
        }
    }

    /// Step forward one frame.
    ///
    /// Returns `None` once the sequence is exhausted, at which point the
    /// playback is finished.
    pub fn step_forward(&mut self) -> Option<AnimationFrame> {
        let started = *self.started.get_or_insert_with(Instant::now);
        let frame = self
            .simulator
            .frame_at(self.current_frame, started.elapsed());

        match frame {
            Some(frame) => {
                self.current_frame += 1;
                if self.current_frame >= self.total_frames() {
                    self.state = PlaybackState::Finished;
                }
                Some(frame)
            }
            None => {
                self.state = PlaybackState::Finished;
                None
            }
        }
    }

    /// The most recently emitted frame, if any.
    pub fn current(&self) -> Option<AnimationFrame> {
        let index = self.current_frame.checked_sub(1)?;
        self.simulator.frame_at(index, self.elapsed())
    }

    /// Calculate progress as percentage (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        if self.total_frames() == 0 {
            if self.is_finished() { 1.0 } else { 0.0 }
        } else {
            self.current_frame as f64 / self.total_frames() as f64
        }
    }
}

/// Playback status for reporting to a front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub current_frame: usize,
    pub total_frames: usize,
    pub state: PlaybackState,
    pub speed: PlaybackSpeed,
    pub progress: f64,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            current_frame: playback.current_frame,
            total_frames: playback.total_frames(),
            state: playback.state,
            speed: playback.speed,
            progress: playback.progress(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsim_topology::{shortest_path, Layout, NodeId, Point, TopologyGraph};

    /// Line A - B with `samples` frames per hop.
    fn make_playback(samples: usize, to: &str) -> Playback {
        let mut g = TopologyGraph::new();
        g.add_node_str("A", "pc").unwrap();
        g.add_node_str("B", "pc").unwrap();
        g.add_link("A", "B").unwrap();
        let layout = Layout::from_points([
            (NodeId::new("A").unwrap(), Point::new(0.0, 0.0)),
            (NodeId::new("B").unwrap(), Point::new(1.0, 0.0)),
        ]);
        let path = shortest_path(&g, "A", to).unwrap();
        let sim = TraversalSimulator::new(path, &layout, samples).unwrap();
        Playback::new(sim, Duration::from_millis(100))
    }

    #[test]
    fn playback_starts_at_zero() {
        let playback = make_playback(10, "B");
        assert_eq!(playback.current_frame(), 0);
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert_eq!(playback.total_frames(), 10);
    }

    #[test]
    fn step_forward_advances() {
        let mut playback = make_playback(5, "B");
        playback.play();

        let frame = playback.step_forward().unwrap();
        assert_eq!(frame.index, 0);
        assert_eq!(playback.current_frame(), 1);

        playback.step_forward();
        let frame = playback.step_forward().unwrap();
        assert_eq!(frame.index, 2);
        assert_eq!(playback.current().unwrap().index, 2);
        assert_eq!(playback.current_frame(), 3);
    }

    #[test]
    fn step_forward_stops_at_end() {
        let mut playback = make_playback(3, "B");
        playback.play();

        playback.step_forward();
        playback.step_forward();
        let last = playback.step_forward().unwrap();
        assert_eq!(last.progress, 100);
        assert_eq!(playback.state(), PlaybackState::Finished);

        assert!(playback.step_forward().is_none());
    }

    #[test]
    fn play_after_finish_restarts() {
        let mut playback = make_playback(2, "B");
        playback.play();
        while playback.step_forward().is_some() {}
        assert!(playback.is_finished());

        playback.play();
        assert_eq!(playback.state(), PlaybackState::Playing);
        assert_eq!(playback.step_forward().unwrap().index, 0);
    }

    #[test]
    fn zero_hop_finishes_immediately() {
        let mut playback = make_playback(25, "A");
        assert_eq!(playback.total_frames(), 0);
        playback.play();
        assert!(playback.is_finished());
        assert!(playback.step_forward().is_none());
        assert_eq!(playback.progress(), 1.0);
    }

    #[test]
    fn stop_rewinds() {
        let mut playback = make_playback(4, "B");
        playback.play();
        playback.step_forward();
        playback.step_forward();
        playback.stop();
        assert_eq!(playback.current_frame(), 0);
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert!(playback.current().is_none());
    }

    #[test]
    fn progress_calculation() {
        let mut playback = make_playback(10, "B");

        assert_eq!(playback.progress(), 0.0);

        playback.play();
        for _ in 0..5 {
            playback.step_forward();
        }
        assert_eq!(playback.progress(), 0.5);

        while playback.step_forward().is_some() {}
        assert_eq!(playback.progress(), 1.0);
    }

    #[test]
    fn speed_multipliers() {
        assert_eq!(PlaybackSpeed::Paused.multiplier(), 0.0);
        assert_eq!(PlaybackSpeed::Normal.multiplier(), 1.0);
        assert_eq!(PlaybackSpeed::Double.multiplier(), 2.0);
        assert!(PlaybackSpeed::Maximum.multiplier().is_infinite());
    }

    #[test]
    fn interval_scales_with_speed() {
        let mut playback = make_playback(4, "B");
        assert_eq!(playback.interval(), Some(Duration::from_millis(100)));

        playback.set_speed(PlaybackSpeed::Double);
        assert_eq!(playback.interval(), Some(Duration::from_millis(50)));

        playback.set_speed(PlaybackSpeed::QuarterSpeed);
        assert_eq!(playback.interval(), Some(Duration::from_millis(400)));

        playback.set_speed(PlaybackSpeed::Maximum);
        assert_eq!(playback.interval(), Some(Duration::ZERO));

        playback.set_speed(PlaybackSpeed::Paused);
        assert_eq!(playback.interval(), None);
        assert_eq!(playback.state(), PlaybackState::Paused);
    }

    #[test]
    fn status_conversion() {
        let mut playback = make_playback(10, "B");
        playback.play();
        for _ in 0..3 {
            playback.step_forward();
        }
        playback.set_speed(PlaybackSpeed::Double);

        let status: PlaybackStatus = (&playback).into();
        assert_eq!(status.current_frame, 3);
        assert_eq!(status.total_frames, 10);
        assert_eq!(status.speed, PlaybackSpeed::Double);

        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"Double\""));
    }

    #[test]
    fn speed_parses_names_and_multipliers() {
        assert_eq!("2".parse::<PlaybackSpeed>().unwrap(), PlaybackSpeed::Double);
        assert_eq!("0.25x".parse::<PlaybackSpeed>().unwrap(), PlaybackSpeed::QuarterSpeed);
        assert_eq!(" Half ".parse::<PlaybackSpeed>().unwrap(), PlaybackSpeed::HalfSpeed);
        assert_eq!("10X".parse::<PlaybackSpeed>().unwrap(), PlaybackSpeed::TenX);
        assert_eq!("max".parse::<PlaybackSpeed>().unwrap(), PlaybackSpeed::Maximum);
        assert_eq!("paused".parse::<PlaybackSpeed>().unwrap(), PlaybackSpeed::Paused);

        assert!(matches!(
            "3".parse::<PlaybackSpeed>(),
            Err(Error::InvalidConfig(_))
        ));
        assert!("fast".parse::<PlaybackSpeed>().is_err());
    }

    #[test]
    fn speed_display_parses_back() {
        for speed in [
            PlaybackSpeed::Paused,
            PlaybackSpeed::QuarterSpeed,
            PlaybackSpeed::HalfSpeed,
            PlaybackSpeed::Normal,
            PlaybackSpeed::Double,
            PlaybackSpeed::Quadruple,
            PlaybackSpeed::TenX,
            PlaybackSpeed::Maximum,
        ] {
            assert_eq!(speed.to_string().parse::<PlaybackSpeed>().unwrap(), speed);
        }
        assert_eq!(PlaybackSpeed::QuarterSpeed.to_string(), "0.25x");
        assert_eq!(PlaybackSpeed::Normal.to_string(), "1x");
    }
}
