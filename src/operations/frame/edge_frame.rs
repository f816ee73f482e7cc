use crate::error::Result;
use crate::math::Point3;

use super::{solve_angles, FixtureTransform};

/// Places an edge strip between its two vertices.
pub struct SolveEdgeFrame {
    v0: Point3,
    v1: Point3,
    point_count: usize,
    pixel_spacing: f64,
}

impl SolveEdgeFrame {
    /// Creates a new `SolveEdgeFrame` operation.
    ///
    /// * `pixel_spacing` - Distance between adjacent pixels on the strip.
    #[must_use]
    pub fn new(v0: Point3, v1: Point3, point_count: usize, pixel_spacing: f64) -> Self {
        Self {
            v0,
            v1,
            point_count,
            pixel_spacing,
        }
    }

    /// Executes the solve.
    ///
    /// The default `x_offset` centers the strip between the vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertices coincide or are not finite.
    pub fn execute(&self) -> Result<FixtureTransform> {
        let angles = solve_angles(self.v0, self.v1, None)?;
        #[allow(clippy::cast_precision_loss)]
        let strip_length = self.point_count.saturating_sub(1) as f64 * self.pixel_spacing;
        let length = (self.v1 - self.v0).norm();
        Ok(FixtureTransform {
            x: self.v0.x,
            y: self.v0.y,
            z: self.v0.z,
            yaw: angles.yaw,
            roll: angles.roll,
            pitch: None,
            x_offset: (length - strip_length) / 2.0,
            y_offset: None,
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

    #[test]
    fn edge_along_x_needs_no_rotation() {
        let t = SolveEdgeFrame::new(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), 1, 1.0)
            .execute()
            .unwrap();
        assert!(t.yaw.abs() < 1e-10);
        assert!(t.roll.abs() < 1e-10);
        assert!(t.pitch.is_none());
    }

    #[test]
    fn edge_along_z_yaws_a_quarter_turn() {
        let t = SolveEdgeFrame::new(p(1.0, 2.0, 3.0), p(1.0, 2.0, 13.0), 1, 1.0)
            .execute()
            .unwrap();
        assert_relative_eq!(t.yaw, 90.0, epsilon = 1e-9);
        assert!(t.roll.abs() < 1e-9);
        assert_relative_eq!(t.origin(), p(1.0, 2.0, 3.0));
    }

    #[test]
    fn vertical_edge_rolls_a_quarter_turn() {
        let t = SolveEdgeFrame::new(p(0.0, 0.0, 0.0), p(0.0, 5.0, 0.0), 1, 1.0)
            .execute()
            .unwrap();
        assert!(t.yaw.abs() < 1e-9);
        assert_relative_eq!(t.roll, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn transform_maps_v1_onto_local_x() {
        let v0 = p(3.0, -1.0, 2.0);
        let v1 = p(-4.0, 6.5, 9.0);
        let t = SolveEdgeFrame::new(v0, v1, 1, 1.0).execute().unwrap();
        let length = (v1 - v0).norm();
        assert_relative_eq!(t.to_local(v0), Point3::origin(), epsilon = 1e-9);
        assert_relative_eq!(t.to_local(v1), p(length, 0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn offset_centers_strip() {
        // 11 pixels at 0.5 span 5.0 of a 10.0 edge.
        let t = SolveEdgeFrame::new(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), 11, 0.5)
            .execute()
            .unwrap();
        assert_relative_eq!(t.x_offset, 2.5, epsilon = 1e-12);
        assert!(t.y_offset.is_none());
    }

    #[test]
    fn coincident_vertices_are_degenerate() {
        let result = SolveEdgeFrame::new(p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), 10, 1.0).execute();
        assert!(matches!(
            result,
            Err(LayoutError::Geometry(GeometryError::Degenerate(_)))
        ));
    }

    #[test]
    fn non_finite_vertex_is_degenerate() {
        let result = SolveEdgeFrame::new(p(0.0, 0.0, 0.0), p(f64::NAN, 0.0, 0.0), 10, 1.0).execute();
        assert!(result.is_err());
    }
}
