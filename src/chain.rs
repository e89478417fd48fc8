//! Joints and fixed edges of one robot.

use tracing::warn;

use crate::error::{KinematicsError, Result};
use crate::frame::{FrameId, Robot};
use crate::joint::Joint;
use crate::kinematic_traits::Pose;

/// Edge whose transform comes from configuration only.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedEdge {
    pub frame: FrameId,
    pub pose: Pose,
}

/// Ordered joints of a robot with their current values, plus the robot's fixed edges.
/// Every edge owned by the robot is driven either by exactly one joint or by exactly one fixed
/// edge entry.
#[derive(Debug, Clone)]
pub struct KinematicChain {
    robot: Robot,
    joints: Vec<Joint>,
    values: Vec<f64>,
    fixed: Vec<FixedEdge>,
}

impl KinematicChain {
    pub fn new(robot: Robot, joints: Vec<Joint>, fixed: Vec<FixedEdge>) -> Result<Self> {
        let mut owner = [false; FrameId::COUNT];
        let frames = joints.iter().map(|j| j.frame).chain(fixed.iter().map(|f| f.frame));
        for frame in frames {
            if frame.robot() != Some(robot) {
                return Err(KinematicsError::InvalidFrame {
                    frame,
                    reason: format!("edge is not driven by the {} robot", robot),
                });
            }
            if owner[frame.index()] {
                return Err(KinematicsError::InvalidFrame {
                    frame,
                    reason: "edge is driven twice".into(),
                });
            }
            owner[frame.index()] = true;
        }
        if let Some(frame) = FrameId::of_robot(robot).find(|f| !owner[f.index()]) {
            return Err(KinematicsError::InvalidFrame {
                frame,
                reason: format!("no joint or fixed edge of the {} robot drives this edge", robot),
            });
        }

        let values = joints.iter().map(|j| j.limits.zero()).collect();
        Ok(KinematicChain { robot, joints, values, fixed })
    }

    pub fn robot(&self) -> Robot {
        self.robot
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joint(&self, index: usize) -> Result<&Joint> {
        self.joints.get(index).ok_or(KinematicsError::InvalidJoint { robot: self.robot, index })
    }

    pub fn value(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(KinematicsError::InvalidJoint { robot: self.robot, index })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Store a joint value, clamped into the joint limits. Returns the value actually stored.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<f64> {
        let joint = self.joint(index)?;
        let applied = joint.limits.clamp(value);
        if applied != value {
            warn!(
                "{} joint {} value {} {} outside [{}, {}], clamped to {}",
                self.robot,
                joint.name,
                value,
                joint.kind.unit(),
                joint.limits.min,
                joint.limits.max,
                applied
            );
        }
        self.values[index] = applied;
        Ok(applied)
    }

    /// Set every value to its mechanical zero.
    pub fn zero(&mut self) {
        for (value, joint) in self.values.iter_mut().zip(&self.joints) {
            *value = joint.limits.zero();
        }
    }

    pub fn fixed_edges(&self) -> &[FixedEdge] {
        &self.fixed
    }

    pub fn fixed_edge(&self, frame: FrameId) -> Option<&FixedEdge> {
        self.fixed.iter().find(|f| f.frame == frame)
    }

    /// Replace the configured pose of a fixed edge.
    pub fn set_fixed_edge(&mut self, frame: FrameId, pose: Pose) -> Result<()> {
        match self.fixed.iter_mut().find(|f| f.frame == frame) {
            Some(edge) => {
                edge.pose = pose;
                Ok(())
            }
            None => Err(KinematicsError::InvalidFrame {
                frame,
                reason: format!("not a fixed edge of the {} robot", self.robot),
            }),
        }
    }

    /// Index of the joint driving the edge of `frame`, if any.
    pub fn joint_index(&self, frame: FrameId) -> Option<usize> {
        self.joints.iter().position(|j| j.frame == frame)
    }
}
