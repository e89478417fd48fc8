//! Coordinate frame hierarchy and forward kinematics for a treatment room with two serial robots
//! sharing one reference frame: a six axis patient table robot and a five axis C-arm imaging robot.
//!
//! The library answers "what is the transform, or the mapping of a point, between any two named
//! frames" for the current joint values. These answers are what beam alignment, model placement
//! and collision checks are built on.
//!
//! # Features
//!
//! - Closed set of named frames ([`frame::FrameId`]) arranged in a tree rooted at the room
//!   reference (`FixedReference`), stored in an arena indexed by frame.
//! - Path resolution to and from the root, and transform composition along these paths with
//!   direction aware inversion. Two explicit composition modes: the static model pose used for
//!   model placement and point mapping, and the beam pose used when placing a beam or source model.
//! - Joint values (degrees for revolute, millimetres for prismatic joints) turned into edge
//!   transforms. Joint axes may pass through anchor points fixed in other frames; updates are
//!   ordered by the dependencies these anchors create, so joints can be updated in any order.
//! - Out of range joint values are clamped to the mechanical limits and reported with `tracing`.
//! - Built-in Cabin 26A room geometry, and geometry loading from YAML (`allow_filesystem` feature).
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use room_kinematics::frame::{FrameId, Robot};
//! use room_kinematics::room::TreatmentRoom;
//!
//! let mut room = TreatmentRoom::cabin26a().unwrap();
//! room.set_joint_values(Robot::Table, &[90.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
//! room.update_all(Robot::Table).unwrap();
//!
//! let pose = room.frame_transform(FrameId::TableTop, FrameId::FixedReference).unwrap();
//! let origin = room
//!     .transform_point(&Point3::new(0.0, 0.0, 0.0), FrameId::TableTop, FrameId::FixedReference)
//!     .unwrap();
//! assert!((pose * Point3::origin() - origin).norm() < 1e-9);
//! ```

pub mod error;

pub mod frame;

pub mod graph;

pub mod path;

pub mod compose;

pub mod point;

pub mod kinematic_traits;

pub mod constraints;

pub mod joint;

pub mod chain;

pub mod updater;

pub mod room;

pub mod parameters;
pub mod parameters_robots;
pub mod parameter_error;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

#[path = "utils/utils.rs"]
pub mod utils;

#[cfg(test)]
#[cfg(feature = "allow_filesystem")]
mod tests;
