pub mod edge;
pub mod output;
pub mod panel;
pub mod vertex;

pub use edge::{ChannelAssignment, EdgeData, EdgeId, EdgeKind, Wiring};
pub use output::{Output, OutputGroup, OutputSpec, Socket};
pub use panel::{PanelData, PanelId};
pub use vertex::{VertexData, VertexId, VertexStore};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::stripe::Stripe;

/// Central arena that owns every entity of one compilation run.
///
/// Edges and panels are addressable by typed IDs and by their labels.
/// Iteration follows insertion order, which is the order of the input files.
#[derive(Debug, Default)]
pub struct LayoutStore {
    pub vertices: VertexStore,
    edges: SlotMap<EdgeId, EdgeData>,
    edge_names: HashMap<String, EdgeId>,
    panels: SlotMap<PanelId, PanelData>,
    panel_names: HashMap<String, PanelId>,
    stripes: HashMap<String, Stripe>,
}

impl LayoutStore {
    /// Creates a new, empty layout store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store around an already-loaded set of vertices.
    #[must_use]
    pub fn with_vertices(vertices: VertexStore) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    // --- Edge operations ---

    /// Inserts an edge and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge with the same label already exists.
    pub fn add_edge(&mut self, data: EdgeData) -> Result<EdgeId, TopologyError> {
        if self.edge_names.contains_key(&data.name) {
            return Err(TopologyError::DuplicateId {
                kind: "edge",
                id: data.name,
            });
        }
        let name = data.name.clone();
        let id = self.edges.insert(data);
        self.edge_names.insert(name, id);
        Ok(id)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::MissingEdge(format!("{id:?}")))
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::MissingEdge(format!("{id:?}")))
    }

    /// Looks up an edge ID by label.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MissingEdge`] if no edge has this label.
    pub fn edge_id(&self, name: &str) -> Result<EdgeId, TopologyError> {
        self.edge_names
            .get(name)
            .copied()
            .ok_or_else(|| TopologyError::MissingEdge(name.into()))
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    // --- Panel operations ---

    /// Inserts a panel and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a panel with the same label already exists.
    pub fn add_panel(&mut self, data: PanelData) -> Result<PanelId, TopologyError> {
        if self.panel_names.contains_key(&data.name) {
            return Err(TopologyError::DuplicateId {
                kind: "panel",
                id: data.name,
            });
        }
        let name = data.name.clone();
        let id = self.panels.insert(data);
        self.panel_names.insert(name, id);
        Ok(id)
    }

    /// Iterates over all panels in insertion order.
    pub fn panels(&self) -> impl Iterator<Item = (PanelId, &PanelData)> {
        self.panels.iter()
    }

    /// Finds the corner of a panel that is not on its leading edge.
    ///
    /// The candidates are every vertex of the three bounding edges minus
    /// `v0` and `v1`; exactly one must remain.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::VertexCountMismatch`] if zero or several
    /// candidates remain, or an error if a bounding edge is unknown.
    pub fn third_vertex(
        &self,
        panel: &str,
        edges: [EdgeId; 3],
        v0: VertexId,
        v1: VertexId,
    ) -> Result<VertexId, TopologyError> {
        let mut candidates: Vec<VertexId> = Vec::new();
        for id in edges {
            for v in self.edge(id)?.vertices() {
                if v != v0 && v != v1 && !candidates.contains(&v) {
                    candidates.push(v);
                }
            }
        }
        match candidates.as_slice() {
            [v2] => Ok(*v2),
            _ => Err(TopologyError::VertexCountMismatch {
                panel: panel.into(),
                candidates: candidates
                    .iter()
                    .map(|&v| {
                        self.vertices
                            .get(v)
                            .map_or_else(|_| format!("{v:?}"), |data| data.name.clone())
                    })
                    .collect(),
            }),
        }
    }

    // --- Stripe operations ---

    /// Stores the decoded stripe for a panel, replacing any previous one.
    pub fn add_stripe(&mut self, stripe: Stripe) {
        self.stripes.insert(stripe.panel_id.clone(), stripe);
    }

    /// Returns the decoded stripe of the named panel.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::MissingStripe`] if none was loaded.
    pub fn stripe(&self, panel: &str) -> Result<&Stripe, TopologyError> {
        self.stripes
            .get(panel)
            .ok_or_else(|| TopologyError::MissingStripe(panel.into()))
    }
}
