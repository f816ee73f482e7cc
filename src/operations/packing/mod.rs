mod pack_outputs;

pub use pack_outputs::PackOutputs;

use serde::Serialize;

use crate::error::Result;
use crate::stripe::{Row, Stripe};
use crate::topology::{Output, OutputSpec};

/// A contiguous slice of one row assigned to one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSegment {
    pub output_index: usize,
    /// Position of the row in the fixture's row list.
    pub row_index: usize,
    pub reverse: bool,
    /// First pixel of the row covered. Nonzero only when the row was split
    /// and this segment resumes it.
    pub start: usize,
    pub length: usize,
    /// Unlit pixels sent on this output immediately before the segment. A
    /// segment with `length == 0` carries only gap pixels.
    pub gap_count: usize,
}

/// The single implicit row of an edge strip.
#[must_use]
pub fn strip_row(point_count: usize) -> Row {
    Row {
        index: 0,
        offset: 0,
        point_count,
        gap_count: 0,
    }
}

/// Expands a panel's output groups into the outputs its stripe needs.
///
/// With custom lengths there is one output per length, at that capacity.
/// Otherwise as many outputs of `default_capacity` are taken as packing the
/// stripe's rows uses.
///
/// # Errors
///
/// Returns an error if the rows cannot be packed at `default_capacity`.
pub fn panel_outputs(
    spec: &OutputSpec,
    stripe: &Stripe,
    default_capacity: usize,
    default_max_channel: u32,
) -> Result<Vec<Output>> {
    let count = if stripe.custom_lengths.is_empty() {
        PackOutputs::outputs_needed(&stripe.rows, default_capacity)?
    } else {
        stripe.custom_lengths.len()
    };
    let outputs = spec
        .sockets(count, default_max_channel)
        .into_iter()
        .enumerate()
        .map(|(i, socket)| {
            let capacity = stripe
                .custom_lengths
                .get(i)
                .copied()
                .unwrap_or(default_capacity);
            Output::new(socket, capacity)
        })
        .collect();
    Ok(outputs)
}
