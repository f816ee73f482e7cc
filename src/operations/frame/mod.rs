mod edge_frame;
mod panel_frame;

pub use edge_frame::SolveEdgeFrame;
pub use panel_frame::SolvePanelFrame;

use serde::Serialize;

use crate::error::GeometryError;
use crate::math::{Point3, Rotation3, Vector3, TOLERANCE};

/// Placement of a fixture's local frame on the vehicle.
///
/// Applied in order: translate to `(x, y, z)`, then `yaw`, `roll` and
/// `pitch` (degrees), then the in-plane `x_offset`/`y_offset`. The target
/// frame's +Z points away from the camera, so world Z is negated before
/// rotating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTransform {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
    pub roll: f64,
    /// Panels only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    pub x_offset: f64,
    /// Panels only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_offset: Option<f64>,
}

impl FixtureTransform {
    /// The translation part of the transform.
    #[must_use]
    pub fn origin(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    /// Rotation from the Z-flipped world frame into the fixture frame.
    #[must_use]
    pub fn local_rotation(&self) -> Rotation3 {
        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), -self.yaw.to_radians());
        let roll = Rotation3::from_axis_angle(&Vector3::z_axis(), -self.roll.to_radians());
        let pitch = Rotation3::from_axis_angle(
            &Vector3::x_axis(),
            -self.pitch.unwrap_or(0.0).to_radians(),
        );
        pitch * roll * yaw
    }

    /// Maps a world point into the fixture's local frame, before the in-plane
    /// offsets are applied.
    #[must_use]
    pub fn to_local(&self, point: Point3) -> Point3 {
        Point3::from(self.local_rotation() * flip_z(point - self.origin()))
    }
}

/// Euler angles in degrees, as written to a [`FixtureTransform`].
#[derive(Debug, Clone, Copy)]
struct FrameAngles {
    yaw: f64,
    roll: f64,
    pitch: Option<f64>,
}

fn flip_z(v: Vector3) -> Vector3 {
    Vector3::new(v.x, v.y, -v.z)
}

/// Solves the sequential yaw, roll and (with a third corner) pitch that
/// bring `v1` onto local +X and `v2` into the local XY plane with +Y.
///
/// Each rotation is applied to every remaining vertex before the next
/// angle is solved.
fn solve_angles(
    v0: Point3,
    v1: Point3,
    v2: Option<Point3>,
) -> Result<FrameAngles, GeometryError> {
    let finite = |p: &Point3| p.iter().all(|c| c.is_finite());
    if !(finite(&v0) && finite(&v1) && v2.as_ref().is_none_or(finite)) {
        return Err(GeometryError::Degenerate("non-finite vertex coordinate".into()));
    }

    let mut lead = flip_z(v1 - v0);
    let mut corner = v2.map(|v2| flip_z(v2 - v0));
    if lead.norm() < TOLERANCE {
        return Err(GeometryError::Degenerate(
            "leading vertices coincide".into(),
        ));
    }

    let yaw = lead.z.atan2(lead.x);
    let rot = Rotation3::from_axis_angle(&Vector3::y_axis(), yaw);
    lead = rot * lead;
    corner = corner.map(|c| rot * c);

    let roll = (-lead.y).atan2(lead.x);
    let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), roll);
    corner = corner.map(|c| rot * c);

    let pitch = match corner {
        Some(c) => {
            if c.y.hypot(c.z) < TOLERANCE {
                return Err(GeometryError::Degenerate(
                    "third vertex is collinear with the leading edge".into(),
                ));
            }
            Some(-(-c.z).atan2(c.y).to_degrees())
        }
        None => None,
    };

    Ok(FrameAngles {
        yaw: -yaw.to_degrees(),
        roll: -roll.to_degrees(),
        pitch,
    })
}
