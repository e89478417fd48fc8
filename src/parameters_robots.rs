//! Hardcoded room geometry presets

use crate::constraints::JointLimits;
use crate::frame::FrameId;
use crate::joint::JointKind;
use crate::parameters::{
    ChainParameters, FixedEdgeParameters, JointParameters, PatientOrientation, PivotParameters, RoomParameters,
};

const X: [f64; 3] = [1.0, 0.0, 0.0];
const Y: [f64; 3] = [0.0, 1.0, 0.0];
const Z: [f64; 3] = [0.0, 0.0, 1.0];

fn revolute(name: &str, frame: FrameId, axis: [f64; 3], home: [f64; 3], limits: JointLimits) -> JointParameters {
    JointParameters {
        name: name.to_string(),
        frame,
        kind: JointKind::Revolute,
        axis,
        home,
        home_rotation: [0.0; 3],
        pivot: PivotParameters::JointOrigin,
        limits,
    }
}

impl RoomParameters {
    /// Cabin 26A treatment room: patient table robot and C-arm, lengths in mm.
    ///
    /// With every joint at zero the table top is level and aligned with the room axes. The last
    /// table joint turns the top about the vertical line through the room isocenter (the origin of
    /// `FixedReference`), so a patient on the isocenter stays there while the couch rotates.
    pub fn cabin26a() -> Self {
        RoomParameters {
            table: ChainParameters {
                base_fixed_translation: [-1685.0, 600.0, -1800.0],
                joints: vec![
                    revolute("A1", FrameId::TableBaseRotation, Z, [0.0, 0.0, 240.0], JointLimits::symmetric(185.0)),
                    revolute("A2", FrameId::TableShoulder, Y, [350.0, 0.0, 435.0], JointLimits::new(-65.0, 95.0)),
                    // Elbow height minus the shoulder disk offset
                    revolute("A3", FrameId::TableElbow, Y, [0.0, 0.0, 1150.0 - 41.0], JointLimits::new(-120.0, 155.0)),
                    revolute("A4", FrameId::TableWrist, X, [1200.0, 0.0, 0.0], JointLimits::symmetric(350.0)),
                    revolute("A5", FrameId::TableFlange, Y, [0.0, 0.0, 215.0], JointLimits::symmetric(125.0)),
                    JointParameters {
                        pivot: PivotParameters::Anchor { frame: FrameId::FixedReference, point: [0.0; 3] },
                        // Flange to table top plate
                        ..revolute("A6", FrameId::TableTop, Z, [0.0, 0.0, 300.0 + 90.0], JointLimits::symmetric(350.0))
                    },
                ],
                fixed: vec![],
            },
            carm: ChainParameters {
                base_fixed_translation: [1500.0, -2000.0, -1800.0],
                joints: vec![
                    revolute("C1", FrameId::CArmBaseRotation, Z, [0.0, 0.0, 240.0], JointLimits::symmetric(185.0)),
                    revolute("C2", FrameId::CArmShoulder, Y, [330.0, 0.0, 645.0 - 240.0], JointLimits::new(-90.0, 60.0)),
                    revolute("C3", FrameId::CArmElbow, Y, [0.0, 0.0, 1350.0 + 115.0], JointLimits::symmetric(120.0)),
                    revolute("C4", FrameId::CArmWrist, Y, [1420.0, 0.0, 0.0], JointLimits::symmetric(120.0)),
                    revolute("C5", FrameId::CArm, X, [240.0, 0.0, 0.0], JointLimits::symmetric(180.0)),
                ],
                fixed: vec![
                    FixedEdgeParameters { frame: FrameId::XrayImager, translation: [1000.0, 865.0, 0.0], rotation: [0.0; 3] },
                    FixedEdgeParameters {
                        frame: FrameId::XrayImageReceptor,
                        translation: [1000.0, -865.0, 0.0],
                        rotation: [0.0; 3],
                    },
                    // Beam axis from the source towards the receptor
                    FixedEdgeParameters {
                        frame: FrameId::ExternalXrayBeam,
                        translation: [0.0, -865.0 - 335.0, 0.0],
                        rotation: [90.0, 0.0, 0.0],
                    },
                ],
            },
            patient_to_table_top: [0.0, 0.0, 0.0],
            patient_orientation: PatientOrientation::HeadFirst,
        }
    }
}

impl Default for RoomParameters {
    fn default() -> Self {
        RoomParameters::cabin26a()
    }
}
