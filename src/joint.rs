//! Single joint: how a scalar value becomes the local transform of one edge.

use nalgebra::{Point3, Translation3, Unit, UnitQuaternion, Vector3};

use crate::constraints::JointLimits;
use crate::frame::FrameId;
use crate::kinematic_traits::Pose;

/// Kind of motion, which also fixes the unit of the joint value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "allow_filesystem", derive(serde::Serialize, serde::Deserialize))]
pub enum JointKind {
    /// Rotation about the axis, value in degrees.
    #[default]
    Revolute,
    /// Translation along the axis, value in millimetres.
    Prismatic,
}

impl JointKind {
    pub fn unit(&self) -> &'static str {
        match self {
            JointKind::Revolute => "deg",
            JointKind::Prismatic => "mm",
        }
    }
}

/// Point the joint axis passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pivot {
    /// Origin of the child frame at home.
    JointOrigin,
    /// Point fixed in the child's home frame.
    Local(Point3<f64>),
    /// Point fixed in another frame, which must not be a descendant of the joint's frame.
    /// Re-expressed in the parent frame against the current graph on every update.
    Anchor { frame: FrameId, point: Point3<f64> },
}

impl Pivot {
    pub fn anchor_frame(&self) -> Option<FrameId> {
        match self {
            Pivot::Anchor { frame, .. } => Some(*frame),
            _ => None,
        }
    }
}

/// Joint driving the edge from `frame` to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub frame: FrameId,
    pub kind: JointKind,
    /// Axis in child home coordinates.
    pub axis: Unit<Vector3<f64>>,
    /// Fixed mechanical offset of the child in its parent, joint value zero.
    pub home: Pose,
    pub pivot: Pivot,
    pub limits: JointLimits,
}

impl Joint {
    pub fn revolute(name: &str, frame: FrameId, axis: Unit<Vector3<f64>>, home: Pose, limits: JointLimits) -> Self {
        Joint {
            name: name.to_string(),
            frame,
            kind: JointKind::Revolute,
            axis,
            home,
            pivot: Pivot::JointOrigin,
            limits,
        }
    }

    pub fn with_pivot(mut self, pivot: Pivot) -> Self {
        self.pivot = pivot;
        self
    }

    /// Joint axis expressed in the parent frame.
    pub fn axis_in_parent(&self) -> Unit<Vector3<f64>> {
        self.home.rotation * self.axis
    }

    /// Pivot in parent coordinates when it does not depend on other edges.
    pub fn local_pivot(&self) -> Option<Point3<f64>> {
        match self.pivot {
            Pivot::JointOrigin => Some(Point3::from(self.home.translation.vector)),
            Pivot::Local(point) => Some(self.home * point),
            Pivot::Anchor { .. } => None,
        }
    }

    /// Local transform `motion * home` for the given value, with the pivot already expressed in
    /// the parent frame. Prismatic joints ignore the pivot.
    pub fn local_transform(&self, value: f64, pivot_in_parent: &Point3<f64>) -> Pose {
        let axis = self.axis_in_parent();
        let motion = match self.kind {
            JointKind::Revolute => {
                let rotation = UnitQuaternion::from_axis_angle(&axis, value.to_radians());
                let to_pivot = Translation3::from(pivot_in_parent.coords);
                Pose::from_parts(to_pivot, rotation) * to_pivot.inverse()
            }
            JointKind::Prismatic => Pose::from_parts(
                Translation3::from(axis.into_inner() * value),
                UnitQuaternion::identity(),
            ),
        };
        motion * self.home
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{are_isometries_approx_equal, pose_from_degrees};

    fn shoulder() -> Joint {
        Joint::revolute(
            "A2",
            FrameId::TableShoulder,
            Vector3::y_axis(),
            Pose::translation(350.0, 0.0, 435.0),
            JointLimits::symmetric(90.0),
        )
    }

    #[test]
    fn test_zero_value_is_home() {
        let joint = shoulder();
        let pivot = joint.local_pivot().unwrap();
        assert!(are_isometries_approx_equal(&joint.local_transform(0.0, &pivot), &joint.home, 1e-12));
    }

    #[test]
    fn test_rotation_about_joint_origin_keeps_origin() {
        let joint = shoulder();
        let pivot = joint.local_pivot().unwrap();
        let pose = joint.local_transform(30.0, &pivot);
        assert!((pose.translation.vector - joint.home.translation.vector).norm() < 1e-9);
        assert!((pose.rotation.angle() - 30_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_local_pivot_moves_origin() {
        // Rotate about a vertical axis through a point 100 mm ahead of the joint origin
        let joint = Joint::revolute(
            "yaw",
            FrameId::CArm,
            Vector3::z_axis(),
            Pose::translation(240.0, 0.0, 0.0),
            JointLimits::default(),
        )
        .with_pivot(Pivot::Local(Point3::new(100.0, 0.0, 0.0)));
        let pivot = joint.local_pivot().unwrap();
        assert!((pivot - Point3::new(340.0, 0.0, 0.0)).norm() < 1e-12);
        let pose = joint.local_transform(180.0, &pivot);
        assert!((pose.translation.vector - Vector3::new(440.0, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_axis_follows_home_rotation() {
        let joint = Joint::revolute(
            "roll",
            FrameId::CArm,
            Vector3::x_axis(),
            pose_from_degrees([0.0, 0.0, 0.0], [0.0, 0.0, 90.0]),
            JointLimits::default(),
        );
        let axis = joint.axis_in_parent();
        assert!((axis.into_inner() - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_prismatic() {
        let mut joint = shoulder();
        joint.kind = JointKind::Prismatic;
        joint.axis = Vector3::z_axis();
        let pose = joint.local_transform(25.0, &Point3::origin());
        assert!((pose.translation.vector - Vector3::new(350.0, 0.0, 460.0)).norm() < 1e-12);
        assert_eq!(joint.kind.unit(), "mm");
    }

    #[test]
    fn test_anchor_has_no_local_pivot() {
        let joint = shoulder().with_pivot(Pivot::Anchor {
            frame: FrameId::FixedReference,
            point: Point3::origin(),
        });
        assert_eq!(joint.local_pivot(), None);
        assert_eq!(joint.pivot.anchor_frame(), Some(FrameId::FixedReference));
    }
}
