//! The treatment room context: one frame graph, both robots, and the operations callers use.

use std::fmt;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::compose::{dynamic_beam_pose, static_model_pose};
use crate::error::{KinematicsError, Result};
use crate::frame::{self, FrameId, Robot};
use crate::graph::FrameGraph;
use crate::kinematic_traits::{Pose, TransformResolver};
use crate::parameter_error::ParameterError;
use crate::parameters::{PatientOrientation, RoomParameters};
use crate::point;
use crate::updater::JointKinematicsUpdater;
use crate::utils::format_matrix;

/// Owns the frame graph of the room and the joint state of both robots. All mutation goes
/// through `&mut self`; nothing downstream is triggered automatically. Callers typically set
/// several joint values, call [`TreatmentRoom::update_all`] once and then query transforms.
#[derive(Debug, Clone)]
pub struct TreatmentRoom {
    graph: FrameGraph,
    updater: JointKinematicsUpdater,
    parameters: RoomParameters,
}

impl TreatmentRoom {
    /// Build the room from the given geometry, with both robots reset to their initial pose.
    /// Every edge is set afterwards.
    pub fn new(parameters: RoomParameters) -> std::result::Result<Self, ParameterError> {
        let mut graph = FrameGraph::treatment_room()?;
        let table = parameters.build_chain(Robot::Table)?;
        let carm = parameters.build_chain(Robot::CArm)?;
        let mut updater = JointKinematicsUpdater::new(&graph, table, carm)?;
        updater.reset_all(&mut graph)?;
        debug!("Treatment room ready with {} frames", graph.frames().count());
        Ok(TreatmentRoom { graph, updater, parameters })
    }

    /// Room with the built-in Cabin 26A geometry.
    pub fn cabin26a() -> std::result::Result<Self, ParameterError> {
        TreatmentRoom::new(RoomParameters::cabin26a())
    }

    pub fn graph(&self) -> &FrameGraph {
        &self.graph
    }

    /// Current geometry, including changes made through the setters.
    pub fn parameters(&self) -> &RoomParameters {
        &self.parameters
    }

    pub fn joint_count(&self, robot: Robot) -> usize {
        self.updater.chain(robot).len()
    }

    pub fn joint_names(&self, robot: Robot) -> Vec<&str> {
        self.updater.chain(robot).joints().iter().map(|j| j.name.as_str()).collect()
    }

    /// Store a joint value (degrees or mm), clamped into its limits. The edge is only rewritten by
    /// the next update. Returns the value actually stored.
    pub fn set_joint_value(&mut self, robot: Robot, index: usize, value: f64) -> Result<f64> {
        self.updater.set_joint_value(robot, index, value)
    }

    /// Set the leading joints of the robot. More values than joints is an error and stores
    /// nothing.
    pub fn set_joint_values(&mut self, robot: Robot, values: &[f64]) -> Result<Vec<f64>> {
        let count = self.joint_count(robot);
        if values.len() > count {
            return Err(KinematicsError::InvalidJoint { robot, index: count });
        }
        values
            .iter()
            .enumerate()
            .map(|(index, value)| self.updater.set_joint_value(robot, index, *value))
            .collect()
    }

    pub fn joint_value(&self, robot: Robot, index: usize) -> Result<f64> {
        self.updater.chain(robot).value(index)
    }

    pub fn joint_values(&self, robot: Robot) -> &[f64] {
        self.updater.chain(robot).values()
    }

    /// True if the joint value changed, or an edge it reads was rewritten, since its last update.
    pub fn is_dirty(&self, robot: Robot, index: usize) -> Result<bool> {
        self.updater.is_dirty(robot, index)
    }

    /// Rewrite every edge of the robot from configuration and current joint values.
    pub fn update_all(&mut self, robot: Robot) -> Result<()> {
        self.updater.update_all(&mut self.graph, robot)
    }

    /// Rewrite the edge of a single joint, after any stale joint it depends on.
    pub fn update_joint(&mut self, robot: Robot, index: usize) -> Result<()> {
        self.updater.update_joint(&mut self.graph, robot, index)
    }

    /// Zero the robot's joints and put all its edges back to their home pose.
    pub fn reset_to_initial_pose(&mut self, robot: Robot) -> Result<()> {
        self.updater.reset_to_initial_pose(&mut self.graph, robot)
    }

    /// Transform mapping coordinates in `from` to coordinates in `to`. Use
    /// `.to_homogeneous()` for the 4x4 matrix.
    pub fn frame_transform(&self, from: FrameId, to: FrameId) -> Result<Pose> {
        static_model_pose(&self.graph, from, to)
    }

    /// Beam mode composition, for placing a beam or source model. See
    /// [`crate::compose::dynamic_beam_pose`].
    pub fn beam_pose(&self, from: FrameId, to: FrameId) -> Result<Pose> {
        dynamic_beam_pose(&self.graph, from, to)
    }

    pub fn transform_point(&self, point: &Point3<f64>, from: FrameId, to: FrameId) -> Result<Point3<f64>> {
        point::transform_point(&self.graph, point, from, to)
    }

    /// Move the base of the robot within the room. Written to the graph immediately.
    pub fn set_base_fixed_translation(&mut self, robot: Robot, translation: Vector3<f64>) -> Result<()> {
        let pose = Pose::translation(translation.x, translation.y, translation.z);
        self.updater.set_fixed_edge(&mut self.graph, robot, robot.base_frame(), pose)?;
        self.parameters.chain_mut(robot).base_fixed_translation = translation.into();
        Ok(())
    }

    /// Offset of the patient origin on the table top. Written to the graph immediately.
    pub fn set_patient_to_table_top_translation(&mut self, translation: Vector3<f64>) -> Result<()> {
        let pose = Pose::translation(translation.x, translation.y, translation.z);
        self.updater.set_fixed_edge(&mut self.graph, Robot::Table, FrameId::Patient, pose)?;
        self.parameters.patient_to_table_top = translation.into();
        Ok(())
    }

    pub fn set_patient_orientation(&mut self, orientation: PatientOrientation) -> Result<()> {
        self.updater.set_fixed_edge(&mut self.graph, Robot::Table, FrameId::Ras, orientation.ras_pose())?;
        self.parameters.patient_orientation = orientation;
        Ok(())
    }

    /// Scene name of the edge `child -> parent`. Fails if `parent` is not the parent of `child`.
    pub fn edge_name(&self, child: FrameId, parent: FrameId) -> Result<String> {
        if self.graph.parent(child)? != Some(parent) {
            return Err(KinematicsError::InvalidFrame {
                frame: child,
                reason: format!("{} is not the parent frame", parent),
            });
        }
        Ok(frame::edge_name(child, parent))
    }

    pub fn treatment_machine_part_name(&self, frame: FrameId) -> Option<&'static str> {
        frame.treatment_machine_part_name()
    }
}

impl TransformResolver for TreatmentRoom {
    fn static_model_pose(&self, from: FrameId, to: FrameId) -> Result<Pose> {
        self.frame_transform(from, to)
    }

    fn dynamic_beam_pose(&self, from: FrameId, to: FrameId) -> Result<Pose> {
        self.beam_pose(from, to)
    }

    fn transform_point(&self, point: &Point3<f64>, from: FrameId, to: FrameId) -> Result<Point3<f64>> {
        TreatmentRoom::transform_point(self, point, from, to)
    }
}

/// Dumps the joint values and every edge transform.
impl fmt::Display for TreatmentRoom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TreatmentRoom:")?;
        for robot in Robot::ALL {
            let chain = self.updater.chain(robot);
            let values: Vec<String> = chain
                .joints()
                .iter()
                .zip(chain.values())
                .map(|(j, v)| format!("{}={:.3}", j.name, v))
                .collect();
            writeln!(f, " {} joints: {}", robot, values.join(" "))?;
        }
        for child in self.graph.frames() {
            let Ok(Some(parent)) = self.graph.parent(child) else {
                continue;
            };
            writeln!(f, " {}:", frame::edge_name(child, parent))?;
            match self.graph.local_transform(child) {
                Ok(Some(local)) => write!(f, "{}", format_matrix(local))?,
                _ => writeln!(f, "  (unset)")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FrameId::*;

    #[test]
    fn test_new_sets_every_edge() {
        let room = TreatmentRoom::cabin26a().unwrap();
        for frame in FrameId::ALL.into_iter().skip(1) {
            assert!(room.graph().local_transform(frame).unwrap().is_some(), "{frame} unset");
        }
    }

    #[test]
    fn test_set_joint_values_rejects_extra() {
        let mut room = TreatmentRoom::cabin26a().unwrap();
        let err = room.set_joint_values(Robot::CArm, &[1.0; 6]).unwrap_err();
        assert_eq!(err, KinematicsError::InvalidJoint { robot: Robot::CArm, index: 5 });
        assert_eq!(room.joint_values(Robot::CArm), &[0.0; 5]);
        assert_eq!(room.set_joint_values(Robot::CArm, &[1.0, 2.0]).unwrap(), vec![1.0, 2.0]);
        assert_eq!(room.joint_value(Robot::CArm, 1).unwrap(), 2.0);
    }

    #[test]
    fn test_edge_names() {
        let room = TreatmentRoom::cabin26a().unwrap();
        assert_eq!(room.edge_name(Ras, Patient).unwrap(), "RASToPatientTransform");
        assert!(room.edge_name(Ras, TableTop).is_err());
        assert_eq!(room.treatment_machine_part_name(XrayImager), Some("XrayImager"));
    }

    #[test]
    fn test_display_lists_all_edges() {
        let room = TreatmentRoom::cabin26a().unwrap();
        let text = room.to_string();
        assert!(text.contains("TableTopToTableFlangeTransform"));
        assert!(text.contains("ExternalXrayBeamToXrayImagerTransform"));
        assert!(!text.contains("(unset)"));
        assert_eq!(text.matches("Transform:").count(), FrameId::COUNT - 1);
    }

    #[test]
    fn test_room_is_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<TreatmentRoom>();
    }
}
