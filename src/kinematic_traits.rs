use nalgebra::{Isometry3, Point3};

use crate::error::Result;
use crate::frame::FrameId;

/// Pose of a frame, or the rigid transform between two frames. It contains both Cartesian
/// position (millimetres) and rotation quaternion.
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion, Vector3};
///
/// type Pose = Isometry3<f64>;
///
/// // Table top 90 mm above the flange, rotated 90 degrees around vertical axis
/// let translation = Translation3::new(0.0, 0.0, 90.0);
/// let rotation = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 90_f64.to_radians());
/// let transform = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Anything that can answer "what is the transform between these two named frames".
/// Implemented by the bare [`crate::graph::FrameGraph`] and by the complete
/// [`crate::room::TreatmentRoom`].
pub trait TransformResolver {
    /// Transform mapping coordinates expressed in `from` to coordinates expressed in `to`.
    /// This is the mapping used for model placement and point conversion.
    fn static_model_pose(&self, from: FrameId, to: FrameId) -> Result<Pose>;

    /// Beam mode composition: the `to` side of the path is walked with forward (not inverted)
    /// edge transforms. See [`crate::compose::dynamic_beam_pose`].
    fn dynamic_beam_pose(&self, from: FrameId, to: FrameId) -> Result<Pose>;

    /// Map a point expressed in `from` into `to`, one edge at a time.
    fn transform_point(&self, point: &Point3<f64>, from: FrameId, to: FrameId) -> Result<Point3<f64>>;
}
