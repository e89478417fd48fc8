//! Errors reported by the frame graph, the transform composer and the joint updater.

use std::fmt;

use crate::frame::{FrameId, Robot};

/// Failure of a single kinematics request. Lookups and compositions never write to the graph.
/// An update that fails midway keeps the edges it already wrote; running it again once the cause
/// is fixed brings the graph back in line.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Frame is not registered in the graph, or an edge declaration is illegal
    /// (root given a parent, second parent, self-parent).
    InvalidFrame { frame: FrameId, reason: String },

    /// Frame cannot reach the root: a parent link is missing, or the declared edges form a cycle.
    DisconnectedFrame { frame: FrameId },

    /// Edge `child -> parent` has no transform set yet.
    BrokenChain { child: FrameId, parent: FrameId },

    /// Joint value outside the mechanical range. Joint setters clamp and log this instead of
    /// returning it.
    OutOfRangeJointValue { joint: String, value: f64, min: f64, max: f64 },

    /// Joint index does not exist on the robot.
    InvalidJoint { robot: Robot, index: usize },

    /// Anchors of the listed joint depend, directly or through other joints, on the joint itself.
    CyclicJointDependency { joint: String },
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KinematicsError::InvalidFrame { frame, reason } =>
                write!(f, "Invalid frame {}: {}", frame, reason),
            KinematicsError::DisconnectedFrame { frame } =>
                write!(f, "Frame {} is not connected to the root", frame),
            KinematicsError::BrokenChain { child, parent } =>
                write!(f, "Transform {} -> {} is not set", child, parent),
            KinematicsError::OutOfRangeJointValue { joint, value, min, max } =>
                write!(f, "Joint {} value {} is outside [{}, {}]", joint, value, min, max),
            KinematicsError::InvalidJoint { robot, index } =>
                write!(f, "Robot {} has no joint {}", robot, index),
            KinematicsError::CyclicJointDependency { joint } =>
                write!(f, "Joint {} depends on itself through its anchors", joint),
        }
    }
}

impl std::error::Error for KinematicsError {}

pub type Result<T> = std::result::Result<T, KinematicsError>;
