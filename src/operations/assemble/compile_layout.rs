use crate::config::LayoutConfig;
use crate::error::Result;
use crate::operations::load::LoadLayout;
use crate::operations::wiring::ResolveChains;
use crate::records::{parse_edges, parse_panels, parse_stripes, parse_vertices};

use super::{AssembleFixtures, Layout};

/// Raw contents of the four resource files describing a vehicle.
#[derive(Debug, Clone, Default)]
pub struct LayoutSources {
    pub vertices: String,
    pub edges: String,
    pub panels: String,
    pub stripes: String,
}

/// Runs the whole pipeline: parse, load, resolve chains, assemble.
pub struct CompileLayout<'a> {
    sources: &'a LayoutSources,
    config: &'a LayoutConfig,
}

impl<'a> CompileLayout<'a> {
    /// Creates a new `CompileLayout` operation.
    #[must_use]
    pub fn new(sources: &'a LayoutSources, config: &'a LayoutConfig) -> Self {
        Self { sources, config }
    }

    /// Executes the compilation.
    ///
    /// # Errors
    ///
    /// Parse and vertex errors always abort. Per-fixture errors, including
    /// unresolvable chains, abort or are recorded according to the
    /// configured failure policy.
    pub fn execute(&self) -> Result<Layout> {
        let vertices = parse_vertices(&self.sources.vertices)?;
        let edges = parse_edges(&self.sources.edges)?;
        let panels = parse_panels(&self.sources.panels)?;
        let stripes = parse_stripes(&self.sources.stripes)?;

        let mut loaded =
            LoadLayout::new(&vertices, &edges, &panels, &stripes, self.config).execute()?;
        let chains = ResolveChains::new()
            .with_failure_policy(self.config.failure_policy)
            .execute(&mut loaded.store)?;
        AssembleFixtures::new(self.config).execute(&loaded.store, chains, loaded.failures)
    }
}
