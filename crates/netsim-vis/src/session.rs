//! Interactive session: the command surface over a topology.
//!
//! Commands:
//!   add-node <id> <PC|Router|Switch>
//!   link <a> <b>
//!   show
//!   send <source> <destination>
//!   speed [multiplier]
//!   help
//!   exit | quit
//!
//! Every command yields an [`Outcome`]. Failures never end the session;
//! they come back as user-facing error messages.

use std::fmt;

use netsim_topology::{
    compute_layout, shortest_path, Error as TopologyError, Layout, NodeId, NodeKind, TopologyGraph,
};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::events::TopologySnapshot;
use crate::playback::PlaybackSpeed;
use crate::render::Renderer;
use crate::simulation::{SimulationConfig, TraversalSimulator};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddNode { id: String, kind: String },
    Link { a: String, b: String },
    Show,
    Send { source: String, destination: String },
    Speed(Option<String>),
    Help,
    Exit,
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Ok(None);
        };
        if verb.starts_with('#') {
            return Ok(None);
        }

        let command = match (verb.to_ascii_lowercase().as_str(), args) {
            ("add-node" | "add", [id, kind]) => Command::AddNode {
                id: (*id).to_owned(),
                kind: (*kind).to_owned(),
            },
            ("link" | "connect", [a, b]) => Command::Link {
                a: (*a).to_owned(),
                b: (*b).to_owned(),
            },
            ("show", []) => Command::Show,
            ("send", [source, destination]) => Command::Send {
                source: (*source).to_owned(),
                destination: (*destination).to_owned(),
            },
            ("speed", []) => Command::Speed(None),
            ("speed", [value]) => Command::Speed(Some((*value).to_owned())),
            ("help" | "?", []) => Command::Help,
            ("exit" | "quit", []) => Command::Exit,
            ("add-node" | "add" | "link" | "connect" | "show" | "send" | "speed" | "help" | "?"
            | "exit" | "quit", _) => {
                return Err(Error::InvalidCommand(format!(
                    "wrong number of arguments for '{verb}' (try 'help')"
                )));
            }
            _ => {
                return Err(Error::InvalidCommand(format!(
                    "unknown command '{verb}' (try 'help')"
                )));
            }
        };
        Ok(Some(command))
    }
}

/// Usage text for the `help` command.
pub const HELP: &str = "\
Commands:
  add-node <id> <PC|Router|Switch>   Add a device
  link <a> <b>                       Connect two devices
  show                               Draw the topology
  send <source> <destination>        Animate a packet along the shortest path
  speed [0.25|0.5|1|2|4|10|max]      Show or set the playback speed
  help                               Show this help
  exit                               Quit";

/// Result of applying a command.
#[derive(Debug)]
pub enum Outcome {
    /// Success confirmation
    Info(String),
    /// Nothing to do
    Warning(String),
    /// The command was rejected
    Error(String),
    /// Rendered topology
    Topology(String),
    /// A packet is ready to be animated
    Traversal {
        message: String,
        scene: TopologySnapshot,
        simulator: TraversalSimulator,
    },
    /// Help text
    Help,
    /// End the session
    Exit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Info(msg) => write!(f, "{msg}"),
            Outcome::Warning(msg) => write!(f, "warning: {msg}"),
            Outcome::Error(msg) => write!(f, "error: {msg}"),
            Outcome::Topology(text) => write!(f, "{text}"),
            Outcome::Traversal { message, .. } => write!(f, "{message}"),
            Outcome::Help => write!(f, "{HELP}"),
            Outcome::Exit => Ok(()),
        }
    }
}

/// Owns the topology between traversal runs.
pub struct Session {
    graph: TopologyGraph,
    config: SimulationConfig,
    renderer: Renderer,
}

impl Session {
    /// Create a session with an empty topology.
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            graph: TopologyGraph::new(),
            config,
            renderer: Renderer::default(),
        }
    }

    /// Use a custom renderer for `show`.
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// The topology built so far.
    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Parse and apply one input line.
    pub fn handle_line(&mut self, line: &str) -> Option<Outcome> {
        match Command::parse_line(line) {
            Ok(Some(command)) => Some(self.execute(command)),
            Ok(None) => None,
            Err(e) => {
                warn!("Rejected input {:?}: {}", line, e);
                Some(Outcome::Error(e.to_string()))
            }
        }
    }

    /// Apply a command.
    pub fn execute(&mut self, command: Command) -> Outcome {
        match command {
            Command::AddNode { id, kind } => self.add_node(&id, &kind),
            Command::Link { a, b } => self.add_link(&a, &b),
            Command::Show => self.show(),
            Command::Send {
                source,
                destination,
            } => self.send(&source, &destination),
            Command::Speed(value) => self.speed(value.as_deref()),
            Command::Help => Outcome::Help,
            Command::Exit => Outcome::Exit,
        }
    }

    fn add_node(&mut self, id: &str, kind: &str) -> Outcome {
        let parsed = kind
            .parse::<NodeKind>()
            .and_then(|kind| Ok((NodeId::new(id)?, kind)));
        let (id, kind) = match parsed {
            Ok(node) => node,
            Err(TopologyError::InvalidType(t)) => {
                warn!("Invalid node type {:?}", t);
                return Outcome::Error("Invalid type! Enter PC, Router, or Switch.".into());
            }
            Err(e) => {
                warn!("Add node failed: {}", e);
                return Outcome::Error(e.to_string());
            }
        };

        match self.graph.add_node(id.clone(), kind) {
            Ok(true) => {
                info!(node = %id, kind = %kind, "Node added");
                Outcome::Info(format!("{kind} '{id}' added successfully!"))
            }
            Ok(false) => {
                debug!(node = %id, "Node already present");
                Outcome::Info(format!("{kind} '{id}' already exists"))
            }
            Err(e) => {
                warn!("Add node failed: {}", e);
                Outcome::Error(e.to_string())
            }
        }
    }

    fn add_link(&mut self, a: &str, b: &str) -> Outcome {
        match self.graph.add_link(a, b) {
            Ok(true) => {
                info!(from = a, to = b, "Link added");
                Outcome::Info(format!("Connected '{a}' ↔ '{b}'"))
            }
            Ok(false) => Outcome::Info(format!("'{a}' and '{b}' are already connected")),
            Err(TopologyError::UnknownNode(missing)) => {
                warn!("Link references unknown node '{}'", missing);
                Outcome::Error("Both nodes must exist before connecting!".into())
            }
            Err(e) => {
                warn!("Add link failed: {}", e);
                Outcome::Error(e.to_string())
            }
        }
    }

    fn speed(&mut self, value: Option<&str>) -> Outcome {
        let Some(value) = value else {
            return Outcome::Info(format!("Playback speed: {}", self.config.speed));
        };

        let updated = value.parse::<PlaybackSpeed>().and_then(|speed| {
            let config = SimulationConfig {
                speed,
                ..self.config.clone()
            };
            config.validate()?;
            Ok(config)
        });
        match updated {
            Ok(config) => {
                self.config = config;
                info!(speed = %self.config.speed, "Playback speed changed");
                Outcome::Info(format!("Playback speed set to {}", self.config.speed))
            }
            Err(e) => {
                warn!("Rejected speed {:?}: {}", value, e);
                Outcome::Error(e.to_string())
            }
        }
    }

    fn snapshot(&self) -> (TopologySnapshot, Layout) {
        let layout = compute_layout(&self.graph, self.config.layout_seed);
        debug!(
            nodes = self.graph.node_count(),
            seed = self.config.layout_seed,
            "Layout computed"
        );
        (TopologySnapshot::capture(&self.graph, &layout), layout)
    }

    fn show(&self) -> Outcome {
        if self.graph.is_empty() {
            return Outcome::Warning("No nodes to display!".into());
        }
        let (scene, _) = self.snapshot();
        Outcome::Topology(self.renderer.render_topology(&scene))
    }

    fn send(&self, source: &str, destination: &str) -> Outcome {
        if self.graph.node_count() < 2 {
            return Outcome::Error("Need at least 2 nodes to simulate packet transfer!".into());
        }
        match self.prepare(source, destination) {
            Ok(outcome) => outcome,
            Err(Error::Topology(TopologyError::UnknownNode(missing))) => {
                warn!("Send references unknown node '{}'", missing);
                Outcome::Error("Both nodes must exist!".into())
            }
            Err(Error::Topology(TopologyError::NoPathFound { from, to })) => {
                warn!("No path from {} to {}", from, to);
                Outcome::Error(format!("No path exists between {from} and {to}!"))
            }
            Err(e) => Outcome::Error(e.to_string()),
        }
    }

    fn prepare(&self, source: &str, destination: &str) -> Result<Outcome> {
        let path = shortest_path(&self.graph, source, destination)?;
        debug!(path = %path, hops = path.hops(), "Path resolved");

        let (scene, layout) = self.snapshot();
        let message = format!("Packet path: {path}");
        let simulator = TraversalSimulator::with_config(path, &layout, &self.config)?;

        Ok(Outcome::Traversal {
            message,
            scene,
            simulator,
        })
    }
}
