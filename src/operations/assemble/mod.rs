mod assemble_fixtures;
mod compile_layout;
mod descriptor;

pub use assemble_fixtures::AssembleFixtures;
pub use compile_layout::{CompileLayout, LayoutSources};
pub use descriptor::{
    EdgeDescriptor, FixtureFailure, Layout, PanelDescriptor, StripeOrientation,
};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::{FailurePolicy, LayoutConfig};
    use crate::error::{LayoutError, PackingError, WiringError};

    // A tetrahedron-ish corner: three edges and one panel.
    const VERTICES: &str = "1\t0\t0\t0\n2\t0\t0\t254000\n3\t0\t254000\t0\n";
    const EDGES: &str = "\
1-2\tdefault\t100\th#1\n\
2-3\treversed\t50\t1-2\n\
1-3\tdark\t10\tuncontrolled\n";
    const STRIPES: &str = "P 5 L . . .\n";

    fn sources(panels: &str) -> LayoutSources {
        LayoutSources {
            vertices: VERTICES.into(),
            edges: EDGES.into(),
            panels: panels.into(),
            stripes: STRIPES.into(),
        }
    }

    #[test]
    fn compiles_edges_and_panels() {
        let sources = sources("P\t12\t1-2\t2-3\t1-3\t1->2\tunflipped\th#1\n");
        let layout = CompileLayout::new(&sources, &LayoutConfig::default())
            .execute()
            .unwrap();

        assert_eq!(layout.edges.len(), 3);
        let chained = layout.edge("2-3").unwrap();
        assert!(chained.reverse);
        assert_eq!(chained.channel.as_ref().unwrap().pixel_offset, 100);
        assert_eq!(chained.segments.len(), 1);
        assert_eq!(chained.segments[0].length, 50);

        let dark = layout.edge("1-3").unwrap();
        assert!(dark.channel.is_none());
        assert!(dark.segments.is_empty());

        let panel = layout.panel("P").unwrap();
        assert_eq!(panel.edges, ["1-2", "2-3", "1-3"]);
        assert_eq!(panel.outputs.len(), 1);
        let packed: usize = panel.segments.iter().map(|s| s.length).sum();
        assert_eq!(packed, 12);
        assert_relative_eq!(panel.transform.y_offset.unwrap(), 2.0);

        assert_eq!(layout.chain_tails.len(), 1);
        assert_eq!(layout.chain_tails[0].edge, "2-3");
        assert_eq!(layout.chain_tails[0].next_pixel, 150);
    }

    #[test]
    fn declared_pixel_count_must_match_stripe() {
        let sources = sources("P\t13\t1-2\t2-3\t1-3\t1->2\tunflipped\th#1\n");
        let result = CompileLayout::new(&sources, &LayoutConfig::default()).execute();
        let Err(LayoutError::Fixture { id, source }) = result else {
            panic!("expected a fixture error");
        };
        assert_eq!(id, "P");
        assert!(matches!(
            *source,
            LayoutError::Packing(PackingError::PixelCountMismatch {
                declared: 13,
                packed: 12
            })
        ));
    }

    #[test]
    fn skip_policy_keeps_the_rest_of_the_layout() {
        let config = LayoutConfig {
            failure_policy: FailurePolicy::SkipAndReport,
            ..LayoutConfig::default()
        };
        let sources = sources("P\t13\t1-2\t2-3\t1-3\t1->2\tunflipped\th#1\n");
        let layout = CompileLayout::new(&sources, &config).execute().unwrap();
        assert_eq!(layout.edges.len(), 3);
        assert!(layout.panels.is_empty());
        assert_eq!(layout.failures.len(), 1);
        assert_eq!(layout.failures[0].id, "P");
    }

    #[test]
    fn skip_policy_drops_edges_chained_from_a_skipped_edge() {
        let config = LayoutConfig {
            failure_policy: FailurePolicy::SkipAndReport,
            ..LayoutConfig::default()
        };
        let sources = LayoutSources {
            vertices: VERTICES.into(),
            edges: "1-9\tdefault\t10\th#1\n1-2\tdefault\t10\t1-9\n2-3\tdefault\t10\th#2\n".into(),
            panels: String::new(),
            stripes: String::new(),
        };
        let layout = CompileLayout::new(&sources, &config).execute().unwrap();

        let ids: Vec<&str> = layout.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["2-3"]);
        let failed: Vec<&str> = layout.failures.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(failed, ["1-9", "1-2"]);
        assert!(layout.failures[1].error.contains("unresolvable"));
    }

    #[test]
    fn broken_chain_aborts_by_default() {
        let sources = LayoutSources {
            vertices: VERTICES.into(),
            edges: "1-2\tdefault\t10\t2-3\n".into(),
            panels: String::new(),
            stripes: String::new(),
        };
        let result = CompileLayout::new(&sources, &LayoutConfig::default()).execute();
        assert!(matches!(
            result,
            Err(LayoutError::Wiring(WiringError::CyclicWiring { unresolved })) if unresolved == ["1-2"]
        ));
    }

    #[test]
    fn chain_past_channel_capacity_is_insufficient() {
        let config = LayoutConfig {
            edge_channel_capacity: 120,
            ..LayoutConfig::default()
        };
        let sources = sources("");
        let result = CompileLayout::new(&sources, &config).execute();
        let Err(LayoutError::Fixture { id, source }) = result else {
            panic!("expected a fixture error");
        };
        assert_eq!(id, "2-3");
        assert!(matches!(
            *source,
            LayoutError::Packing(PackingError::InsufficientOutputs { .. })
        ));
    }
}
