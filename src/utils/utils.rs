//! Helper functions

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion};

use crate::kinematic_traits::Pose;

/// Pose from a translation in millimetres and roll, pitch, yaw rotations in degrees
/// (applied about x, then y, then z).
pub fn pose_from_degrees(translation: [f64; 3], rotation: [f64; 3]) -> Pose {
    Pose::from_parts(
        Translation3::new(translation[0], translation[1], translation[2]),
        UnitQuaternion::from_euler_angles(
            rotation[0].to_radians(),
            rotation[1].to_radians(),
            rotation[2].to_radians(),
        ),
    )
}

/// Roll, pitch, yaw of the pose rotation, in degrees.
pub fn rotation_degrees(pose: &Pose) -> [f64; 3] {
    let (roll, pitch, yaw) = pose.rotation.euler_angles();
    [roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()]
}

pub fn dump_pose(isometry: &Isometry3<f64>) {
    println!("{}", format_pose(isometry));
}

/// One line: translation and quaternion.
pub fn format_pose(isometry: &Isometry3<f64>) -> String {
    let translation = isometry.translation.vector;
    let rotation: UnitQuaternion<f64> = isometry.rotation;
    format!(
        "x: {:.5}, y: {:.5}, z: {:.5},  quat: {:.5},{:.5},{:.5},{:.5}",
        translation.x, translation.y, translation.z, rotation.i, rotation.j, rotation.k, rotation.w
    )
}

/// Homogeneous 4x4 matrix, one row per line.
pub fn format_matrix(isometry: &Isometry3<f64>) -> String {
    let m = isometry.to_homogeneous();
    let mut out = String::new();
    for r in 0..4 {
        out.push_str(&format!(
            "  [{:12.4} {:12.4} {:12.4} {:12.4}]\n",
            m[(r, 0)], m[(r, 1)], m[(r, 2)], m[(r, 3)]
        ));
    }
    out
}

pub fn format_point(point: &Point3<f64>) -> String {
    format!("({:.4}, {:.4}, {:.4})", point.x, point.y, point.z)
}

pub fn are_isometries_approx_equal(a: &Isometry3<f64>, b: &Isometry3<f64>, tolerance: f64) -> bool {
    let translation_diff = a.translation.vector - b.translation.vector;
    if translation_diff.norm() > tolerance {
        return false;
    }
    a.rotation.angle_to(&b.rotation) <= tolerance
}

/// Panics with both poses printed if they differ by more than the given tolerances.
pub fn assert_pose_eq(ta: &Isometry3<f64>, tb: &Isometry3<f64>, distance_tolerance: f64, angular_tolerance: f64) {
    let translation_distance = (ta.translation.vector - tb.translation.vector).norm();
    let angular_distance = ta.rotation.angle_to(&tb.rotation);
    if translation_distance > distance_tolerance || angular_distance > angular_tolerance {
        dump_pose(ta);
        dump_pose(tb);
        panic!(
            "Poses differ: {:.6} mm apart, {:.6} rad apart",
            translation_distance, angular_distance
        );
    }
}
