use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ParseError, Result};
use crate::operations::assemble::FixtureFailure;

/// Microns per inch. Raw vertex coordinates are in microns.
pub const UNIT_SCALE: f64 = 25_400.0;

/// Distance between adjacent pixels on an edge strip, in inches.
pub const EDGE_PIXEL_SPACING: f64 = 0.6562;

/// Distance between adjacent pixels on a panel, in inches (50 mm).
pub const PANEL_PIXEL_SPACING: f64 = 50_000.0 / UNIT_SCALE;

/// Clearance between a panel's leading edge and its first row, in inches.
pub const PANEL_Y_OFFSET: f64 = 2.0;

/// Pixels per panel strand unless the striping instructions override it.
pub const PANEL_OUTPUT_CAPACITY: usize = 250;

/// Pixels addressable on one edge channel: ten 512-slot universes of RGB.
pub const EDGE_CHANNEL_CAPACITY: usize = 10 * 512 / 3;

/// Controller outputs per host when an output group gives no upper bound.
pub const DEFAULT_MAX_CHANNEL: u32 = 4;

/// What to do when a single fixture fails to compile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the whole compilation at the first failing fixture.
    #[default]
    Abort,
    /// Leave the fixture out and record the failure in the layout.
    SkipAndReport,
}

impl FailurePolicy {
    /// Applies the policy to one fixture's result.
    ///
    /// Returns `Ok(Some(value))` on success and `Ok(None)` for a failure that
    /// was recorded in `failures`.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns the failure tagged with `id`.
    pub fn admit<T>(
        self,
        id: &str,
        result: Result<T>,
        failures: &mut Vec<FixtureFailure>,
    ) -> Result<Option<T>> {
        match (result, self) {
            (Ok(value), _) => Ok(Some(value)),
            (Err(e), Self::Abort) => Err(e.in_fixture(id)),
            (Err(e), Self::SkipAndReport) => {
                warn!(fixture = id, error = %e, "skipping fixture");
                failures.push(FixtureFailure {
                    id: id.into(),
                    error: e.to_string(),
                });
                Ok(None)
            }
        }
    }
}

/// Constants that drive a compilation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Divisor applied to raw vertex coordinates.
    pub unit_scale: f64,
    /// Pixel pitch along an edge.
    pub edge_pixel_spacing: f64,
    /// Pixel pitch along a panel row.
    pub panel_pixel_spacing: f64,
    /// Fixed in-plane Y offset for every panel.
    pub panel_y_offset: f64,
    /// Default capacity of a panel output.
    pub panel_output_capacity: usize,
    /// Capacity of the channel an edge chain is plugged into.
    pub edge_channel_capacity: usize,
    /// Upper channel bound for output groups written as `host#min`.
    pub default_max_channel: u32,
    pub failure_policy: FailurePolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            unit_scale: UNIT_SCALE,
            edge_pixel_spacing: EDGE_PIXEL_SPACING,
            panel_pixel_spacing: PANEL_PIXEL_SPACING,
            panel_y_offset: PANEL_Y_OFFSET,
            panel_output_capacity: PANEL_OUTPUT_CAPACITY,
            edge_channel_capacity: EDGE_CHANNEL_CAPACITY,
            default_max_channel: DEFAULT_MAX_CHANNEL,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl LayoutConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for this structure.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            ParseError::new("config", e.line(), e.to_string()).into()
        })
    }
}
