use crate::error::{PackingError, Result};
use crate::stripe::Row;
use crate::topology::Output;

use super::OutputSegment;

/// Packs a fixture's rows onto its outputs in order.
///
/// Each output takes rows until its capacity is spent. A row that does not
/// fit is split, and the next output resumes it where the split left off.
/// A row's gap pixels are charged once and never straddle two outputs. A
/// gap that exactly fills an output is charged there as a zero-length
/// segment and the row's pixels start on the next output. Wiring zigzags:
/// `reverse` flips each time a row is completed.
pub struct PackOutputs<'a> {
    rows: &'a [Row],
    outputs: &'a [Output],
}

impl<'a> PackOutputs<'a> {
    /// Creates a new `PackOutputs` operation.
    #[must_use]
    pub fn new(rows: &'a [Row], outputs: &'a [Output]) -> Self {
        Self { rows, outputs }
    }

    /// Number of outputs of `capacity` pixels that packing `rows` uses.
    ///
    /// # Errors
    ///
    /// Returns [`PackingError::GapExceedsCapacity`] if a gap run is larger
    /// than `capacity`, or [`PackingError::InsufficientOutputs`] if an output
    /// of `capacity` cannot hold anything.
    pub fn outputs_needed(rows: &[Row], capacity: usize) -> Result<usize> {
        let mut cursor = Cursor::new(rows);
        let mut scratch = Vec::new();
        let mut count = 0;
        while !cursor.is_done() {
            let before = cursor.position();
            cursor.fill(count, capacity, &mut scratch)?;
            if cursor.position() == before {
                return Err(cursor.insufficient().into());
            }
            scratch.clear();
            count += 1;
        }
        Ok(count)
    }

    /// Executes the packing, returning segments in output order.
    ///
    /// # Errors
    ///
    /// Returns [`PackingError::InsufficientOutputs`] if rows remain after the
    /// last output, [`PackingError::OverAllocatedOutputs`] if outputs remain
    /// after the last row, and [`PackingError::GapExceedsCapacity`] if a gap
    /// run is larger than an empty output.
    pub fn execute(&self) -> Result<Vec<OutputSegment>> {
        let mut cursor = Cursor::new(self.rows);
        let mut segments = Vec::new();

        for (output_index, output) in self.outputs.iter().enumerate() {
            if cursor.is_done() {
                return Err(PackingError::OverAllocatedOutputs {
                    used: output_index,
                    provided: self.outputs.len(),
                }
                .into());
            }
            cursor.fill(output_index, output.capacity, &mut segments)?;
        }

        if !cursor.is_done() {
            return Err(cursor.insufficient().into());
        }
        Ok(segments)
    }
}

/// Position of the packer within a fixture's rows.
struct Cursor<'a> {
    rows: &'a [Row],
    row: usize,
    /// Pixels of the current row already placed on earlier outputs.
    start: usize,
    gap_charged: bool,
    reverse: bool,
}

impl<'a> Cursor<'a> {
    fn new(rows: &'a [Row]) -> Self {
        Self {
            rows,
            row: 0,
            start: 0,
            gap_charged: false,
            reverse: false,
        }
    }

    fn is_done(&self) -> bool {
        self.row == self.rows.len()
    }

    fn position(&self) -> (usize, usize, bool) {
        (self.row, self.start, self.gap_charged)
    }

    fn insufficient(&self) -> PackingError {
        let pixels_left =
            self.rows[self.row..].iter().map(|r| r.point_count).sum::<usize>() - self.start;
        PackingError::InsufficientOutputs {
            rows_left: self.rows.len() - self.row,
            pixels_left,
        }
    }

    /// Places as much as fits on one output of `capacity` pixels.
    fn fill(
        &mut self,
        output_index: usize,
        capacity: usize,
        segments: &mut Vec<OutputSegment>,
    ) -> std::result::Result<(), PackingError> {
        let mut remaining = capacity;
        while remaining > 0 && !self.is_done() {
            let row = self.rows[self.row];

            let mut gap_count = 0;
            if !self.gap_charged {
                if row.gap_count > remaining {
                    if remaining == capacity {
                        return Err(PackingError::GapExceedsCapacity {
                            row: self.row,
                            gap: row.gap_count,
                            capacity,
                        });
                    }
                    break;
                }
                gap_count = row.gap_count;
                remaining -= gap_count;
                self.gap_charged = true;
            }

            let left = row.point_count - self.start;
            let length = left.min(remaining);
            segments.push(OutputSegment {
                output_index,
                row_index: self.row,
                reverse: self.reverse,
                start: self.start,
                length,
                gap_count,
            });
            remaining -= length;

            if length < left {
                self.start += length;
            } else {
                self.row += 1;
                self.start = 0;
                self.gap_charged = false;
                self.reverse = !self.reverse;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::operations::packing::strip_row;
    use crate::topology::Socket;

    fn outputs(capacities: &[usize]) -> Vec<Output> {
        capacities
            .iter()
            .enumerate()
            .map(|(i, &capacity)| {
                Output::new(Socket::new("h", u32::try_from(i + 1).unwrap()), capacity)
            })
            .collect()
    }

    fn rows(specs: &[(usize, usize)]) -> Vec<Row> {
        specs
            .iter()
            .enumerate()
            .map(|(index, &(point_count, gap_count))| Row {
                index,
                offset: 0,
                point_count,
                gap_count,
            })
            .collect()
    }

    /// Every row must be covered by contiguous segments from 0 to its end,
    /// and no output may carry more than its capacity.
    fn assert_exact_cover(rows: &[Row], outputs: &[Output], segments: &[OutputSegment]) {
        for (index, row) in rows.iter().enumerate() {
            let mut next = 0;
            for seg in segments.iter().filter(|s| s.row_index == index) {
                assert_eq!(seg.start, next, "row {index} has a hole or overlap");
                next += seg.length;
            }
            assert_eq!(next, row.point_count, "row {index} not fully covered");
        }
        for (index, output) in outputs.iter().enumerate() {
            let used: usize = segments
                .iter()
                .filter(|s| s.output_index == index)
                .map(|s| s.length + s.gap_count)
                .sum();
            assert!(used <= output.capacity, "output {index} over capacity");
        }
        let total: usize = segments.iter().map(|s| s.length).sum();
        assert_eq!(total, rows.iter().map(|r| r.point_count).sum::<usize>());
    }

    #[test]
    fn long_edge_splits_across_two_outputs() {
        let rows = [strip_row(300)];
        let outputs = outputs(&[250, 250]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        assert_eq!(
            segments,
            [
                OutputSegment {
                    output_index: 0,
                    row_index: 0,
                    reverse: false,
                    start: 0,
                    length: 250,
                    gap_count: 0,
                },
                OutputSegment {
                    output_index: 1,
                    row_index: 0,
                    reverse: false,
                    start: 250,
                    length: 50,
                    gap_count: 0,
                },
            ]
        );
    }

    #[test]
    fn zigzag_flips_only_after_a_row_completes() {
        let rows = rows(&[(300, 0), (10, 0), (10, 0)]);
        let outputs = outputs(&[250, 250]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        let flags: Vec<(usize, bool)> = segments.iter().map(|s| (s.row_index, s.reverse)).collect();
        assert_eq!(flags, [(0, false), (0, false), (1, true), (2, false)]);
        assert_exact_cover(&rows, &outputs, &segments);
    }

    #[test]
    fn panel_rows_fill_outputs_in_order() {
        let rows = rows(&[(120, 0), (119, 0), (118, 0), (117, 0)]);
        let outputs = outputs(&[250, 250]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        assert_exact_cover(&rows, &outputs, &segments);
        // 120 + 119 = 239, so 11 of row 2 finish output 0.
        assert_eq!(segments[2].length, 11);
        assert_eq!(segments[3].start, 11);
        assert_eq!(segments[3].output_index, 1);
    }

    #[test]
    fn row_longer_than_two_outputs_splits_twice() {
        let rows = [strip_row(500)];
        let outputs = outputs(&[200, 200, 200]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        let spans: Vec<(usize, usize)> = segments.iter().map(|s| (s.start, s.length)).collect();
        assert_eq!(spans, [(0, 200), (200, 200), (400, 100)]);
    }

    #[test]
    fn gaps_consume_capacity_once() {
        let rows = rows(&[(100, 0), (100, 5), (60, 0)]);
        let outputs = outputs(&[250, 250]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        assert_exact_cover(&rows, &outputs, &segments);
        // 100 + 5 gap + 100 = 205, leaving 45 of row 2.
        assert_eq!(segments[1].gap_count, 5);
        assert_eq!(segments[2].length, 45);
        assert_eq!(segments[3].gap_count, 0);
        assert_eq!(segments[3].start, 45);
    }

    #[test]
    fn gap_that_does_not_fit_moves_to_next_output() {
        let rows = rows(&[(248, 0), (10, 3)]);
        let outputs = outputs(&[250, 250]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].output_index, 1);
        assert_eq!(segments[1].gap_count, 3);
        assert_eq!(segments[1].start, 0);
        assert_exact_cover(&rows, &outputs, &segments);
    }

    #[test]
    fn gap_larger_than_an_output_is_an_error() {
        let rows = rows(&[(10, 31)]);
        let outputs = outputs(&[30]);
        let result = PackOutputs::new(&rows, &outputs).execute();
        assert!(matches!(
            result,
            Err(LayoutError::Packing(PackingError::GapExceedsCapacity { gap: 31, .. }))
        ));
    }

    #[test]
    fn gap_filling_the_rest_of_an_output_is_charged_there() {
        let rows = rows(&[(249, 0), (250, 1)]);
        let outputs = outputs(&[250, 250]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        let plan: Vec<(usize, usize, usize, usize)> = segments
            .iter()
            .map(|s| (s.output_index, s.row_index, s.length, s.gap_count))
            .collect();
        assert_eq!(plan, [(0, 0, 249, 0), (0, 1, 0, 1), (1, 1, 250, 0)]);
        assert!(segments[1].reverse && segments[2].reverse);
        assert_exact_cover(&rows, &outputs, &segments);
    }

    #[test]
    fn gap_as_large_as_a_fresh_output_fills_it() {
        let rows = rows(&[(10, 30)]);
        let outputs = outputs(&[30, 30]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!((segments[0].length, segments[0].gap_count), (0, 30));
        assert_eq!((segments[1].output_index, segments[1].length), (1, 10));
    }

    #[test]
    fn outputs_needed_matches_packing() {
        assert_eq!(
            PackOutputs::outputs_needed(&rows(&[(249, 0), (250, 1)]), 250).unwrap(),
            2
        );
        // The two pixels left on output 0 cannot take a gap of 3.
        let stranded = rows(&[(248, 0), (249, 3)]);
        let needed = PackOutputs::outputs_needed(&stranded, 250).unwrap();
        assert_eq!(needed, 3);
        let outputs = outputs(&vec![250; needed]);
        let segments = PackOutputs::new(&stranded, &outputs).execute().unwrap();
        assert_exact_cover(&stranded, &outputs, &segments);
    }

    #[test]
    fn outputs_needed_rejects_empty_outputs() {
        let result = PackOutputs::outputs_needed(&[strip_row(5)], 0);
        assert!(matches!(
            result,
            Err(LayoutError::Packing(PackingError::InsufficientOutputs { .. }))
        ));
    }

    #[test]
    fn custom_capacities_are_respected() {
        let rows = rows(&[(50, 0), (49, 0), (48, 0)]);
        let outputs = outputs(&[60, 87]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        assert_exact_cover(&rows, &outputs, &segments);
        assert_eq!(segments[1].length, 10);
    }

    #[test]
    fn too_few_outputs() {
        let rows = rows(&[(200, 0), (199, 0)]);
        let outputs = outputs(&[250]);
        let result = PackOutputs::new(&rows, &outputs).execute();
        assert!(matches!(
            result,
            Err(LayoutError::Packing(PackingError::InsufficientOutputs {
                rows_left: 1,
                pixels_left: 149
            }))
        ));
    }

    #[test]
    fn too_many_outputs() {
        let rows = [strip_row(100)];
        let outputs = outputs(&[250, 250]);
        let result = PackOutputs::new(&rows, &outputs).execute();
        assert!(matches!(
            result,
            Err(LayoutError::Packing(PackingError::OverAllocatedOutputs {
                used: 1,
                provided: 2
            }))
        ));
    }

    #[test]
    fn exact_fill_uses_every_output() {
        let rows = rows(&[(250, 0), (250, 0)]);
        let outputs = outputs(&[250, 250]);
        let segments = PackOutputs::new(&rows, &outputs).execute().unwrap();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.start == 0 && s.length == 250));
        assert!(segments[1].reverse);
    }
}
