use serde::Serialize;

use crate::operations::frame::FixtureTransform;
use crate::operations::packing::OutputSegment;
use crate::operations::wiring::ChainTail;
use crate::stripe::{Corner, Row, Side};
use crate::topology::{ChannelAssignment, EdgeKind, Output};

/// A fixture left out of the layout, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureFailure {
    pub id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDescriptor {
    pub id: String,
    pub fixture_name: String,
    pub tag: String,
    pub v0: String,
    pub v1: String,
    pub kind: EdgeKind,
    pub reverse: bool,
    pub point_count: usize,
    /// `None` for uncontrolled edges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelAssignment>,
    pub transform: FixtureTransform,
    pub segments: Vec<OutputSegment>,
}

/// Where a panel's pixel 0 sits, seen from either face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeOrientation {
    pub side: Side,
    pub from_back: Corner,
    pub from_front: Corner,
}

impl From<Side> for StripeOrientation {
    fn from(side: Side) -> Self {
        Self {
            side,
            from_back: side.starting_corner(true),
            from_front: side.starting_corner(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelDescriptor {
    pub id: String,
    pub edges: [String; 3],
    pub leading_edge: String,
    pub flipped: bool,
    pub point_count: usize,
    pub orientation: StripeOrientation,
    pub rows: Vec<Row>,
    pub outputs: Vec<Output>,
    pub transform: FixtureTransform,
    pub segments: Vec<OutputSegment>,
}

/// Every compiled fixture of a vehicle: edges first, then panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub edges: Vec<EdgeDescriptor>,
    pub panels: Vec<PanelDescriptor>,
    pub chain_tails: Vec<ChainTail>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FixtureFailure>,
}

impl Layout {
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&EdgeDescriptor> {
        self.edges.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn panel(&self, id: &str) -> Option<&PanelDescriptor> {
        self.panels.iter().find(|p| p.id == id)
    }
}
