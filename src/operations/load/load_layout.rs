use tracing::{info, warn};

use crate::config::LayoutConfig;
use crate::error::{Result, TopologyError};
use crate::operations::assemble::FixtureFailure;
use crate::records::{EdgeRecord, PanelRecord, StripeRecord, VertexRecord, WiringSpec};
use crate::stripe::DecodeStripe;
use crate::topology::{
    ChannelAssignment, EdgeData, LayoutStore, PanelData, VertexStore, Wiring,
};

use super::LoadVertices;

/// The populated store plus any fixtures left out under
/// [`FailurePolicy::SkipAndReport`](crate::config::FailurePolicy::SkipAndReport).
#[derive(Debug)]
pub struct LoadedLayout {
    pub store: LayoutStore,
    pub failures: Vec<FixtureFailure>,
}

/// Builds a [`LayoutStore`] from parsed records.
///
/// Vertices are normalized, edges linked to their endpoints, stripes decoded
/// and each panel's third corner found. Chained wiring is left pending.
pub struct LoadLayout<'a> {
    vertices: &'a [VertexRecord],
    edges: &'a [EdgeRecord],
    panels: &'a [PanelRecord],
    stripes: &'a [StripeRecord],
    config: &'a LayoutConfig,
}

impl<'a> LoadLayout<'a> {
    /// Creates a new `LoadLayout` operation.
    #[must_use]
    pub fn new(
        vertices: &'a [VertexRecord],
        edges: &'a [EdgeRecord],
        panels: &'a [PanelRecord],
        stripes: &'a [StripeRecord],
        config: &'a LayoutConfig,
    ) -> Self {
        Self {
            vertices,
            edges,
            panels,
            stripes,
            config,
        }
    }

    /// Executes the load.
    ///
    /// # Errors
    ///
    /// Vertex failures always abort. Edge, stripe and panel failures abort
    /// under [`FailurePolicy::Abort`](crate::config::FailurePolicy::Abort),
    /// tagged with the fixture id.
    pub fn execute(&self) -> Result<LoadedLayout> {
        let vertices = LoadVertices::new(self.vertices, self.config.unit_scale).execute()?;
        if vertices.is_empty() {
            warn!("no vertices loaded");
        }
        let mut store = LayoutStore::with_vertices(vertices);
        let mut failures = Vec::new();
        let policy = self.config.failure_policy;

        for record in self.edges {
            let edge = edge_data(&store.vertices, record);
            if let Some(edge) = policy.admit(&record.name, edge, &mut failures)? {
                let added = store.add_edge(edge).map_err(Into::into);
                policy.admit(&record.name, added, &mut failures)?;
            }
        }

        for record in self.stripes {
            let stripe = DecodeStripe::new(
                &record.panel_id,
                record.base_row_length,
                record.side,
                &record.code,
            )
            .with_custom_lengths(record.custom_lengths.clone())
            .execute();
            if let Some(stripe) = policy.admit(&record.panel_id, stripe, &mut failures)? {
                store.add_stripe(stripe);
            }
        }

        for record in self.panels {
            let panel = panel_data(&store, record);
            if let Some(panel) = policy.admit(&record.name, panel, &mut failures)? {
                let added = store.add_panel(panel).map_err(Into::into);
                policy.admit(&record.name, added, &mut failures)?;
            }
        }

        info!(
            vertices = store.vertices.len(),
            edges = store.edges().count(),
            panels = store.panels().count(),
            skipped = failures.len(),
            "loaded layout"
        );
        Ok(LoadedLayout { store, failures })
    }
}

fn edge_data(vertices: &VertexStore, record: &EdgeRecord) -> Result<EdgeData> {
    let (v0, v1) = record
        .vertex_names()
        .ok_or_else(|| TopologyError::MissingVertex(format!("{} is not <v0>-<v1>", record.name)))?;
    let wiring = match &record.wiring {
        WiringSpec::Direct {
            socket,
            pixel_offset,
        } => Wiring::Resolved(ChannelAssignment {
            socket: socket.clone(),
            pixel_offset: *pixel_offset,
        }),
        WiringSpec::ChainedFrom(source) => Wiring::PendingOn(source.clone()),
        WiringSpec::Uncontrolled => Wiring::Uncontrolled,
    };
    Ok(EdgeData {
        name: record.name.clone(),
        v0: vertices.id(v0)?,
        v1: vertices.id(v1)?,
        kind: record.kind,
        point_count: record.point_count,
        wiring,
    })
}

fn panel_data(store: &LayoutStore, record: &PanelRecord) -> Result<PanelData> {
    let edges = [
        store.edge_id(&record.edges[0])?,
        store.edge_id(&record.edges[1])?,
        store.edge_id(&record.edges[2])?,
    ];
    let v0 = store.vertices.id(&record.v0)?;
    let v1 = store.vertices.id(&record.v1)?;
    let v2 = store.third_vertex(&record.name, edges, v0, v1)?;
    Ok(PanelData {
        name: record.name.clone(),
        point_count: record.point_count,
        edges,
        leading_edge: record.leading_edge.clone(),
        v0,
        v1,
        v2,
        flipped: record.flipped,
        outputs: record.outputs.clone(),
    })
}
