use tracing::{debug, info};

use crate::config::LayoutConfig;
use crate::error::{PackingError, Result, StripeError, WiringError};
use crate::operations::frame::{SolveEdgeFrame, SolvePanelFrame};
use crate::operations::packing::{panel_outputs, strip_row, PackOutputs};
use crate::operations::wiring::ChainReport;
use crate::topology::{EdgeData, LayoutStore, Output, PanelData, Wiring};

use super::{EdgeDescriptor, FixtureFailure, Layout, PanelDescriptor, StripeOrientation};

/// Joins transforms, stripes and packed outputs into per-fixture
/// descriptors.
///
/// Run after chain resolution; an edge still pending is an unresolvable
/// chain. Each fixture is compiled on its own and admitted through the
/// configured failure policy.
pub struct AssembleFixtures<'a> {
    config: &'a LayoutConfig,
}

impl<'a> AssembleFixtures<'a> {
    /// Creates a new `AssembleFixtures` operation.
    #[must_use]
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Executes the assembly.
    ///
    /// `failures` carries fixtures already skipped while loading; any
    /// skipped here are appended.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`](crate::config::FailurePolicy::Abort),
    /// returns the first fixture error, tagged with the fixture id.
    pub fn execute(
        &self,
        store: &LayoutStore,
        chains: ChainReport,
        mut failures: Vec<FixtureFailure>,
    ) -> Result<Layout> {
        let policy = self.config.failure_policy;

        let mut edges = Vec::new();
        for (_, edge) in store.edges() {
            let descriptor = self.edge_descriptor(store, edge);
            if let Some(descriptor) = policy.admit(&edge.name, descriptor, &mut failures)? {
                edges.push(descriptor);
            }
        }

        let mut panels = Vec::new();
        for (_, panel) in store.panels() {
            let descriptor = self.panel_descriptor(store, panel);
            if let Some(descriptor) = policy.admit(&panel.name, descriptor, &mut failures)? {
                panels.push(descriptor);
            }
        }

        info!(
            edges = edges.len(),
            panels = panels.len(),
            failures = failures.len(),
            "assembled fixtures"
        );
        Ok(Layout {
            edges,
            panels,
            chain_tails: chains.tails,
            failures,
        })
    }

    fn edge_descriptor(&self, store: &LayoutStore, edge: &EdgeData) -> Result<EdgeDescriptor> {
        let v0 = store.vertices.get(edge.v0)?;
        let v1 = store.vertices.get(edge.v1)?;
        let transform = SolveEdgeFrame::new(
            v0.point,
            v1.point,
            edge.point_count,
            self.config.edge_pixel_spacing,
        )
        .execute()?;

        let channel = match &edge.wiring {
            Wiring::Resolved(assignment) => Some(assignment.clone()),
            Wiring::Uncontrolled => None,
            Wiring::PendingOn(_) => {
                return Err(WiringError::CyclicWiring {
                    unresolved: vec![edge.name.clone()],
                }
                .into())
            }
        };

        let segments = match &channel {
            Some(assignment) if edge.point_count > 0 => {
                // The channel's remaining room after the pixels ahead of this
                // edge in its chain.
                let capacity = self
                    .config
                    .edge_channel_capacity
                    .checked_sub(assignment.pixel_offset)
                    .ok_or(PackingError::InsufficientOutputs {
                        rows_left: 1,
                        pixels_left: edge.point_count,
                    })?;
                let rows = [strip_row(edge.point_count)];
                let outputs = [Output::new(assignment.socket.clone(), capacity)];
                PackOutputs::new(&rows, &outputs).execute()?
            }
            _ => {
                debug!(edge = %edge.name, "no segments for uncontrolled or empty edge");
                Vec::new()
            }
        };

        Ok(EdgeDescriptor {
            id: edge.name.clone(),
            fixture_name: edge.fixture_name(),
            tag: edge.tag(),
            v0: v0.name.clone(),
            v1: v1.name.clone(),
            kind: edge.kind,
            reverse: edge.kind.is_reversed(),
            point_count: edge.point_count,
            channel,
            transform,
            segments,
        })
    }

    fn panel_descriptor(&self, store: &LayoutStore, panel: &PanelData) -> Result<PanelDescriptor> {
        let stripe = store.stripe(&panel.name)?;
        let packed = stripe.pixel_count();
        if packed != panel.point_count {
            return Err(PackingError::PixelCountMismatch {
                declared: panel.point_count,
                packed,
            }
            .into());
        }
        let first_row = stripe
            .rows
            .first()
            .ok_or_else(|| StripeError::NoRows(panel.name.clone()))?;

        let [v0, v1, v2] = panel.vertices();
        let corners = [
            store.vertices.point(v0)?,
            store.vertices.point(v1)?,
            store.vertices.point(v2)?,
        ];
        let transform = SolvePanelFrame::new(
            corners,
            first_row,
            self.config.panel_pixel_spacing,
            self.config.panel_y_offset,
        )
        .execute()?;

        let outputs = panel_outputs(
            &panel.outputs,
            stripe,
            self.config.panel_output_capacity,
            self.config.default_max_channel,
        )?;
        let segments = PackOutputs::new(&stripe.rows, &outputs).execute()?;

        let [e0, e1, e2] = panel.edges;
        let edges = [
            store.edge(e0)?.name.clone(),
            store.edge(e1)?.name.clone(),
            store.edge(e2)?.name.clone(),
        ];

        Ok(PanelDescriptor {
            id: panel.name.clone(),
            edges,
            leading_edge: panel.leading_edge.clone(),
            flipped: panel.flipped,
            point_count: panel.point_count,
            orientation: StripeOrientation::from(stripe.side),
            rows: stripe.rows.clone(),
            outputs,
            transform,
            segments,
        })
    }
}
