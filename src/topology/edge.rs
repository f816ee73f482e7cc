use serde::Serialize;

use super::output::Socket;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the layout store.
    pub struct EdgeId;
}

/// How an edge's strip is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Pixel 0 sits at `v0`.
    Default,
    /// Pixel 0 sits at `v1`.
    Reversed,
    /// No LEDs are driven on this edge.
    Dark,
}

impl EdgeKind {
    #[must_use]
    pub fn is_reversed(self) -> bool {
        self == Self::Reversed
    }
}

/// Where an edge's pixels start on a controller channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelAssignment {
    pub socket: Socket,
    /// Index of the edge's first pixel on the channel.
    pub pixel_offset: usize,
}

/// Wiring state of an edge.
///
/// Chained edges start as [`Wiring::PendingOn`] and are rewritten to
/// [`Wiring::Resolved`] by [`ResolveChains`](crate::operations::wiring::ResolveChains).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wiring {
    /// Absolute position on a controller channel.
    Resolved(ChannelAssignment),
    /// Data arrives through the named edge; offset not yet known.
    PendingOn(String),
    /// Not connected to any controller.
    Uncontrolled,
}

impl Wiring {
    /// Returns the resolved channel assignment, if any.
    #[must_use]
    pub fn assignment(&self) -> Option<&ChannelAssignment> {
        match self {
            Self::Resolved(assignment) => Some(assignment),
            Self::PendingOn(_) | Self::Uncontrolled => None,
        }
    }
}

/// A linear LED run between two vertices.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Edge label, `<v0>-<v1>`.
    pub name: String,
    pub v0: VertexId,
    pub v1: VertexId,
    pub kind: EdgeKind,
    pub point_count: usize,
    pub wiring: Wiring,
}

impl EdgeData {
    /// Name of the fixture generated for this edge.
    #[must_use]
    pub fn fixture_name(&self) -> String {
        format!("Edge{}", self.name)
    }

    /// Tag of the fixture generated for this edge.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("edge{}", self.name.replace('-', "_"))
    }

    /// Returns `[v0, v1]`.
    #[must_use]
    pub fn vertices(&self) -> [VertexId; 2] {
        [self.v0, self.v1]
    }
}
