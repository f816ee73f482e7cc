use crate::error::Result;
use crate::math::Point3;
use crate::stripe::Row;

use super::{solve_angles, FixtureTransform};

/// Places a panel in the plane of its three corners.
///
/// `v0 -> v1` is the leading edge; `v2` ends up on the local +Y side.
pub struct SolvePanelFrame<'a> {
    corners: [Point3; 3],
    first_row: &'a Row,
    pixel_spacing: f64,
    y_offset: f64,
}

impl<'a> SolvePanelFrame<'a> {
    /// Creates a new `SolvePanelFrame` operation.
    ///
    /// * `first_row` - The row laid along the leading edge.
    /// * `y_offset` - Fixed clearance between the leading edge and that row.
    #[must_use]
    pub fn new(
        corners: [Point3; 3],
        first_row: &'a Row,
        pixel_spacing: f64,
        y_offset: f64,
    ) -> Self {
        Self {
            corners,
            first_row,
            pixel_spacing,
            y_offset,
        }
    }

    /// Executes the solve.
    ///
    /// The default `x_offset` centers the first row against the leading edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the corners coincide, are collinear or are not
    /// finite.
    pub fn execute(&self) -> Result<FixtureTransform> {
        let [v0, v1, v2] = self.corners;
        let angles = solve_angles(v0, v1, Some(v2))?;
        #[allow(clippy::cast_precision_loss)]
        let row_span = (self.first_row.point_count as f64 + f64::from(self.first_row.offset) - 1.0)
            * self.pixel_spacing;
        let length = (v1 - v0).norm();
        Ok(FixtureTransform {
            x: v0.x,
            y: v0.y,
            z: v0.z,
            yaw: angles.yaw,
            roll: angles.roll,
            pitch: angles.pitch,
            x_offset: (length - row_span) / 2.0,
            y_offset: Some(self.y_offset),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::{GeometryError, LayoutError};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn row(point_count: usize, offset: i32) -> Row {
        Row {
            index: 0,
            offset,
            point_count,
            gap_count: 0,
        }
    }

    #[test]
    fn flat_panel_in_xy_plane_is_unrotated() {
        let first = row(3, 0);
        let t = SolvePanelFrame::new(
            [p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(5.0, 8.0, 0.0)],
            &first,
            1.0,
            2.0,
        )
        .execute()
        .unwrap();
        assert!(t.yaw.abs() < 1e-10);
        assert!(t.roll.abs() < 1e-10);
        assert!(t.pitch.unwrap().abs() < 1e-10);
        assert_eq!(t.y_offset, Some(2.0));
    }

    #[test]
    fn panel_below_leading_edge_flips_pitch() {
        let first = row(3, 0);
        let t = SolvePanelFrame::new(
            [p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(5.0, -8.0, 0.0)],
            &first,
            1.0,
            2.0,
        )
        .execute()
        .unwrap();
        assert_relative_eq!(t.pitch.unwrap().abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn horizontal_panel_pitches_a_quarter_turn() {
        let first = row(3, 0);
        // v2 lies along world +Z, i.e. local -Z before pitch.
        let t = SolvePanelFrame::new(
            [p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(5.0, 0.0, 8.0)],
            &first,
            1.0,
            2.0,
        )
        .execute()
        .unwrap();
        assert_relative_eq!(t.pitch.unwrap(), -90.0, epsilon = 1e-9);
    }

    #[test]
    fn transform_maps_corners_into_canonical_frame() {
        let first = row(3, 0);
        let corners = [p(1.0, 2.0, -3.0), p(7.0, -2.0, 4.0), p(-2.0, 9.0, 5.0)];
        let t = SolvePanelFrame::new(corners, &first, 1.0, 2.0)
            .execute()
            .unwrap();

        let local: Vec<Point3> = corners.iter().map(|&c| t.to_local(c)).collect();
        let lead = (corners[1] - corners[0]).norm();
        assert_relative_eq!(local[0], Point3::origin(), epsilon = 1e-9);
        assert_relative_eq!(local[1], p(lead, 0.0, 0.0), epsilon = 1e-9);
        assert!(local[2].z.abs() < 1e-9);
        assert!(local[2].y > 0.0);
        // Rotation preserves the distance to the third corner.
        assert_relative_eq!(
            local[2].coords.norm(),
            (corners[2] - corners[0]).norm(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn offset_centers_first_row() {
        // Row of 3 with 1 extra offset spans 3 pixel gaps of 2.0 on a 10.0 edge.
        let first = row(3, 1);
        let t = SolvePanelFrame::new(
            [p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(5.0, 8.0, 0.0)],
            &first,
            2.0,
            2.0,
        )
        .execute()
        .unwrap();
        assert_relative_eq!(t.x_offset, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_corners_are_degenerate() {
        let first = row(3, 0);
        let result = SolvePanelFrame::new(
            [p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(20.0, 0.0, 0.0)],
            &first,
            1.0,
            2.0,
        )
        .execute();
        assert!(matches!(
            result,
            Err(LayoutError::Geometry(GeometryError::Degenerate(_)))
        ));
    }
}
