//! Defines the room geometry data structure

use nalgebra::{Point3, Unit, Vector3};

use crate::chain::{FixedEdge, KinematicChain};
use crate::constraints::JointLimits;
use crate::frame::{FrameId, Robot};
use crate::joint::{Joint, JointKind, Pivot};
use crate::kinematic_traits::Pose;
use crate::parameter_error::ParameterError;
use crate::utils::pose_from_degrees;

/// Number of joints of the table robot (A1 to A6).
pub const TABLE_JOINTS: usize = 6;

/// Number of joints of the C-arm robot.
pub const CARM_JOINTS: usize = 5;

/// How the patient lies on the table top. Decides the RAS to patient edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "allow_filesystem", derive(serde::Serialize, serde::Deserialize))]
pub enum PatientOrientation {
    #[default]
    HeadFirst,
    FeetFirst,
}

impl PatientOrientation {
    /// Pose of the RAS frame in the patient frame: -90 degrees about x, and for feet first an
    /// additional half turn about the RAS z axis.
    pub fn ras_pose(&self) -> Pose {
        let supine = pose_from_degrees([0.0; 3], [-90.0, 0.0, 0.0]);
        match self {
            PatientOrientation::HeadFirst => supine,
            PatientOrientation::FeetFirst => supine * pose_from_degrees([0.0; 3], [0.0, 0.0, 180.0]),
        }
    }
}

/// Where the joint axis passes through.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "allow_filesystem",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum PivotParameters {
    #[default]
    JointOrigin,
    Local { point: [f64; 3] },
    Anchor { frame: FrameId, point: [f64; 3] },
}

impl From<PivotParameters> for Pivot {
    fn from(p: PivotParameters) -> Self {
        match p {
            PivotParameters::JointOrigin => Pivot::JointOrigin,
            PivotParameters::Local { point } => Pivot::Local(Point3::from(point)),
            PivotParameters::Anchor { frame, point } => Pivot::Anchor { frame, point: Point3::from(point) },
        }
    }
}

/// One joint: which edge it drives and how.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "allow_filesystem", derive(serde::Serialize, serde::Deserialize))]
pub struct JointParameters {
    pub name: String,

    /// Child frame of the driven edge.
    pub frame: FrameId,

    #[cfg_attr(feature = "allow_filesystem", serde(default))]
    pub kind: JointKind,

    /// Axis in child home coordinates, normalized on use.
    pub axis: [f64; 3],

    /// Translation of the child origin in the parent at joint zero, mm.
    pub home: [f64; 3],

    /// Roll, pitch, yaw of the child in the parent at joint zero, degrees.
    #[cfg_attr(feature = "allow_filesystem", serde(default))]
    pub home_rotation: [f64; 3],

    #[cfg_attr(feature = "allow_filesystem", serde(default))]
    pub pivot: PivotParameters,

    pub limits: JointLimits,
}

impl JointParameters {
    pub fn to_joint(&self) -> Result<Joint, ParameterError> {
        let axis = Unit::try_new(Vector3::from(self.axis), 1e-9)
            .ok_or_else(|| ParameterError::InvalidAxis(self.name.clone()))?;
        Ok(Joint {
            name: self.name.clone(),
            frame: self.frame,
            kind: self.kind,
            axis,
            home: pose_from_degrees(self.home, self.home_rotation),
            pivot: self.pivot.into(),
            limits: self.limits,
        })
    }
}

/// Edge with a configured, joint independent pose: translation, then roll, pitch, yaw.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "allow_filesystem", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedEdgeParameters {
    pub frame: FrameId,
    pub translation: [f64; 3],
    #[cfg_attr(feature = "allow_filesystem", serde(default))]
    pub rotation: [f64; 3],
}

/// Geometry of one robot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "allow_filesystem", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainParameters {
    /// Translation of the robot base in the room reference, mm.
    pub base_fixed_translation: [f64; 3],

    pub joints: Vec<JointParameters>,

    /// Fixed edges other than the base and the patient edges.
    #[cfg_attr(feature = "allow_filesystem", serde(default))]
    pub fixed: Vec<FixedEdgeParameters>,
}

/// Complete geometry of the treatment room. See [parameters_robots.rs](parameters_robots.rs)
/// for the built-in preset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "allow_filesystem", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomParameters {
    pub table: ChainParameters,
    pub carm: ChainParameters,

    /// Translation of the patient origin on the table top, mm.
    #[cfg_attr(feature = "allow_filesystem", serde(default))]
    pub patient_to_table_top: [f64; 3],

    #[cfg_attr(feature = "allow_filesystem", serde(default))]
    pub patient_orientation: PatientOrientation,
}

impl RoomParameters {
    pub fn chain(&self, robot: Robot) -> &ChainParameters {
        match robot {
            Robot::Table => &self.table,
            Robot::CArm => &self.carm,
        }
    }

    pub fn chain_mut(&mut self, robot: Robot) -> &mut ChainParameters {
        match robot {
            Robot::Table => &mut self.table,
            Robot::CArm => &mut self.carm,
        }
    }

    /// Joint count required for the robot.
    pub fn expected_joints(robot: Robot) -> usize {
        match robot {
            Robot::Table => TABLE_JOINTS,
            Robot::CArm => CARM_JOINTS,
        }
    }

    /// Build the kinematic chain of one robot: its joints and every fixed edge, including the
    /// base translation and, for the table, the patient edges.
    pub fn build_chain(&self, robot: Robot) -> Result<KinematicChain, ParameterError> {
        let params = self.chain(robot);
        let expected = RoomParameters::expected_joints(robot);
        if params.joints.len() != expected {
            return Err(ParameterError::InvalidLength { expected, found: params.joints.len() });
        }
        let joints = params
            .joints
            .iter()
            .map(|j| j.to_joint())
            .collect::<Result<Vec<_>, _>>()?;

        let base = params.base_fixed_translation;
        let mut fixed = vec![FixedEdge {
            frame: robot.base_frame(),
            pose: Pose::translation(base[0], base[1], base[2]),
        }];
        if robot == Robot::Table {
            let p = self.patient_to_table_top;
            fixed.push(FixedEdge { frame: FrameId::Patient, pose: Pose::translation(p[0], p[1], p[2]) });
            fixed.push(FixedEdge { frame: FrameId::Ras, pose: self.patient_orientation.ras_pose() });
        }
        fixed.extend(params.fixed.iter().map(|f| FixedEdge {
            frame: f.frame,
            pose: pose_from_degrees(f.translation, f.rotation),
        }));

        Ok(KinematicChain::new(robot, joints, fixed)?)
    }
}
