//! Node identity and device kinds.
//!
//! A node is a named device on the network. Its kind is chosen once when the
//! node is added and never changes afterwards.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A unique node identifier.
///
/// Identifiers are arbitrary non-empty strings chosen by the user.
/// Deserialization goes through [`NodeId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct NodeId(String);

impl NodeId {
    /// Create an identifier, trimming surrounding whitespace.
    ///
    /// Fails with [`Error::InvalidNodeId`] if nothing is left after trimming.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(Error::InvalidNodeId);
        }
        Ok(Self(id.to_owned()))
    }

    /// Wrap a lookup key verbatim, for error reporting.
    pub(crate) fn from_raw(id: &str) -> Self {
        Self(id.to_owned())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = Error;

    fn try_from(id: String) -> Result<Self> {
        Self::new(id)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// The kind of device a node represents.
///
/// Serializes as its canonical name and deserializes through [`FromStr`],
/// so `"router"` is accepted as well as `"Router"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
pub enum NodeKind {
    /// End host
    #[cfg_attr(feature = "serde", serde(rename = "PC"))]
    Pc,
    /// Layer-3 forwarding device
    Router,
    /// Layer-2 forwarding device
    Switch,
}

impl NodeKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 3] = [Self::Pc, Self::Router, Self::Switch];

    /// Canonical name, as shown to users.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Router => "Router",
            Self::Switch => "Switch",
        }
    }

    /// Emoji icon used by graphical front ends.
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Pc => "🖥️",
            Self::Router => "🌐",
            Self::Switch => "🔀",
        }
    }

    /// Hex color used by graphical front ends.
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Pc => "#4CAF50",
            Self::Router => "#2196F3",
            Self::Switch => "#9C27B0",
        }
    }

    /// Single-character glyph for text front ends.
    pub const fn glyph(&self) -> char {
        match self {
            Self::Pc => 'P',
            Self::Router => 'R',
            Self::Switch => 'S',
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive parse: `pc`, `PC` and `Pc` all name [`NodeKind::Pc`].
impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidType(s.to_owned()))
    }
}

impl TryFrom<String> for NodeKind {
    type Error = Error;

    fn try_from(kind: String) -> Result<Self> {
        kind.parse()
    }
}

/// A node together with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Identifier
    pub id: NodeId,
    /// Device kind
    pub kind: NodeKind,
}
