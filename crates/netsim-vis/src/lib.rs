//! Netsim Packet Visualization
//!
//! Animated packet traversal over a small network topology.
//!
//! # Architecture
//!
//! - **Simulation**: Turns a shortest path and a layout into animation frames
//! - **Playback**: Play, pause, stop and speed controls over those frames
//! - **Driver**: Plays frames against a tokio timer
//! - **Events**: Packet monitor readouts and topology snapshots
//! - **Render**: Text rendering for terminals
//! - **Session**: The interactive command surface
//!
//! # Usage
//!
//! ```
//! use netsim_vis::{Outcome, Session, SimulationConfig};
//!
//! let mut session = Session::new(SimulationConfig::default());
//! for line in ["add-node A pc", "add-node B router", "link A B"] {
//!     session.handle_line(line);
//! }
//!
//! match session.handle_line("send A B") {
//!     Some(Outcome::Traversal { simulator, .. }) => {
//!         assert_eq!(simulator.total_frames(), 25);
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

mod driver;
mod error;
mod events;
mod playback;
mod render;
mod session;
mod simulation;

pub use driver::drive;
pub use error::{Error, Result};
pub use events::{LinkView, MonitorStatus, NodeView, TopologySnapshot};
pub use playback::{Playback, PlaybackSpeed, PlaybackState, PlaybackStatus};
pub use render::{legend, Renderer};
pub use session::{Command, Outcome, Session, HELP};
pub use simulation::{
    AnimationFrame, Frames, SimulationConfig, TraversalSimulator, DEFAULT_FRAME_INTERVAL,
    DEFAULT_MONITOR_LINGER, DEFAULT_SAMPLES_PER_HOP,
};
