use super::edge::EdgeId;
use super::output::OutputSpec;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a panel in the layout store.
    pub struct PanelId;
}

/// A triangular panel of LED rows bounded by three edges.
///
/// `v0 -> v1` is the leading edge the first row runs along; `v2` is the
/// corner opposite it.
#[derive(Debug, Clone)]
pub struct PanelData {
    pub name: String,
    /// Declared number of LED-bearing pixels.
    pub point_count: usize,
    pub edges: [EdgeId; 3],
    /// Leading edge as written in the panel record, `<v0>-><v1>`.
    pub leading_edge: String,
    pub v0: VertexId,
    pub v1: VertexId,
    pub v2: VertexId,
    pub flipped: bool,
    pub outputs: OutputSpec,
}

impl PanelData {
    /// Returns `[v0, v1, v2]`.
    #[must_use]
    pub fn vertices(&self) -> [VertexId; 3] {
        [self.v0, self.v1, self.v2]
    }
}
