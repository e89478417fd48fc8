#[cfg(test)]
mod tests {
    use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};

    use crate::constraints::JointLimits;
    use crate::error::KinematicsError;
    use crate::frame::{FrameId, Robot};
    use crate::kinematic_traits::Pose;
    use crate::parameters::{PatientOrientation, PivotParameters, RoomParameters};
    use crate::room::TreatmentRoom;
    use crate::tests::test_utils::{all_poses, cabin_at, room_with};
    use crate::utils::{are_isometries_approx_equal, assert_pose_eq};

    const TABLE: [f64; 6] = [25.0, 12.0, -30.0, 4.0, -8.0, 35.0];
    const CARM: [f64; 5] = [-40.0, 20.0, -15.0, 30.0, 60.0];

    #[test]
    fn test_initial_pose_is_sum_of_offsets() {
        let params = RoomParameters::cabin26a();
        let room = TreatmentRoom::new(params.clone()).unwrap();

        let mut expected = Vector3::from(params.table.base_fixed_translation);
        for joint in &params.table.joints {
            expected += Vector3::from(joint.home);
        }
        let pose = room.frame_transform(FrameId::TableTop, FrameId::FixedReference).unwrap();
        assert!(pose.rotation.angle() < 1e-12);
        assert!((pose.translation.vector - expected).norm() < 1e-9);
        assert!((pose.translation.vector - Vector3::new(-135.0, 600.0, 589.0)).norm() < 1e-9);
    }

    #[test]
    fn test_base_yaw_rotates_downstream_frames_only() {
        let before_room = cabin_at(&[0.0; 6], &[0.0; 5]).unwrap();
        let before = all_poses(&before_room).unwrap();
        let after_room = cabin_at(&[90.0, 0.0, 0.0, 0.0, 0.0, 0.0], &[0.0; 5]).unwrap();
        let after = all_poses(&after_room).unwrap();

        // Vertical axis through the base rotation origin
        let center = before[FrameId::TableBaseRotation.index()].translation.vector;
        let yaw = Pose::from_parts(
            Translation3::from(center),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 90_f64.to_radians()),
        ) * Translation3::from(-center);

        for frame in FrameId::ALL {
            let (b, a) = (&before[frame.index()], &after[frame.index()]);
            if frame.robot() == Some(Robot::Table) && frame != FrameId::TableBaseFixed {
                assert_pose_eq(a, &(yaw * b), 1e-6, 1e-9);
            } else {
                assert_eq!(a, b, "{frame} should not move");
            }
        }
    }

    #[test]
    fn test_update_all_is_idempotent() {
        let mut room = cabin_at(&TABLE, &CARM).unwrap();
        let first: Vec<Option<Pose>> = FrameId::ALL
            .into_iter()
            .map(|f| room.graph().local_transform(f).unwrap().copied())
            .collect();
        room.update_all(Robot::Table).unwrap();
        room.update_all(Robot::CArm).unwrap();
        room.update_all(Robot::Table).unwrap();
        let second: Vec<Option<Pose>> = FrameId::ALL
            .into_iter()
            .map(|f| room.graph().local_transform(f).unwrap().copied())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_joint_update_order_does_not_matter() {
        let ordered = cabin_at(&TABLE, &CARM).unwrap();
        let expected = all_poses(&ordered).unwrap();

        for table_order in [[5, 4, 3, 2, 1, 0], [2, 5, 0, 4, 1, 3], [0, 1, 2, 3, 4, 5]] {
            let mut room = TreatmentRoom::cabin26a().unwrap();
            room.set_joint_values(Robot::Table, &TABLE).unwrap();
            room.set_joint_values(Robot::CArm, &CARM).unwrap();
            for index in [3, 0, 4, 1, 2] {
                room.update_joint(Robot::CArm, index).unwrap();
            }
            for index in table_order {
                room.update_joint(Robot::Table, index).unwrap();
            }
            let poses = all_poses(&room).unwrap();
            for frame in FrameId::ALL {
                assert_pose_eq(&poses[frame.index()], &expected[frame.index()], 1e-9, 1e-12);
            }
        }
    }

    #[test]
    fn test_anchored_joint_refreshes_stale_upstream() {
        let mut room = TreatmentRoom::cabin26a().unwrap();
        room.set_joint_values(Robot::Table, &TABLE).unwrap();
        // Only the last joint is updated explicitly
        room.update_joint(Robot::Table, 5).unwrap();
        for index in 0..6 {
            assert!(!room.is_dirty(Robot::Table, index).unwrap());
        }
        let expected = cabin_at(&TABLE, &[0.0; 5]).unwrap();
        let pose = room.frame_transform(FrameId::TableTop, FrameId::FixedReference).unwrap();
        let reference = expected.frame_transform(FrameId::TableTop, FrameId::FixedReference).unwrap();
        assert_pose_eq(&pose, &reference, 1e-9, 1e-12);
    }

    #[test]
    fn test_values_wait_for_update() {
        let mut room = TreatmentRoom::cabin26a().unwrap();
        let before = room.frame_transform(FrameId::TableTop, FrameId::FixedReference).unwrap();
        room.set_joint_value(Robot::Table, 0, 90.0).unwrap();
        assert!(room.is_dirty(Robot::Table, 0).unwrap());
        assert_eq!(room.joint_value(Robot::Table, 0).unwrap(), 90.0);
        let unchanged = room.frame_transform(FrameId::TableTop, FrameId::FixedReference).unwrap();
        assert_eq!(before, unchanged);

        room.update_joint(Robot::Table, 0).unwrap();
        assert!(!room.is_dirty(Robot::Table, 0).unwrap());
        let moved = room.frame_transform(FrameId::TableTop, FrameId::FixedReference).unwrap();
        assert!(!are_isometries_approx_equal(&before, &moved, 1e-3));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut room = TreatmentRoom::cabin26a().unwrap();
        assert_eq!(room.set_joint_value(Robot::Table, 1, 500.0).unwrap(), 95.0);
        assert_eq!(room.set_joint_value(Robot::Table, 1, -500.0).unwrap(), -65.0);
        assert_eq!(room.joint_value(Robot::Table, 1).unwrap(), -65.0);
        assert_eq!(room.set_joint_value(Robot::CArm, 1, 61.0).unwrap(), 60.0);
        assert_eq!(room.set_joint_value(Robot::CArm, 1, 59.5).unwrap(), 59.5);

        let clamped = room_with(RoomParameters::cabin26a(), &[0.0, 500.0], &[]).unwrap();
        let limit = room_with(RoomParameters::cabin26a(), &[0.0, 95.0], &[]).unwrap();
        assert_eq!(all_poses(&clamped).unwrap(), all_poses(&limit).unwrap());
    }

    #[test]
    fn test_unknown_joint() {
        let mut room = TreatmentRoom::cabin26a().unwrap();
        assert_eq!(
            room.set_joint_value(Robot::CArm, 5, 0.0).unwrap_err(),
            KinematicsError::InvalidJoint { robot: Robot::CArm, index: 5 }
        );
        assert!(matches!(room.update_joint(Robot::Table, 6), Err(KinematicsError::InvalidJoint { .. })));
        assert!(room.joint_value(Robot::Table, 7).is_err());
    }

    #[test]
    fn test_isocentric_couch_rotation() {
        let mut room = TreatmentRoom::cabin26a().unwrap();
        let isocenter = room
            .transform_point(&Point3::origin(), FrameId::FixedReference, FrameId::TableTop)
            .unwrap();

        room.set_joint_value(Robot::Table, 5, 40.0).unwrap();
        room.update_all(Robot::Table).unwrap();
        let moved = room.transform_point(&isocenter, FrameId::TableTop, FrameId::FixedReference).unwrap();
        assert!(moved.coords.norm() < 1e-6, "isocenter moved to {moved:?}");

        // The top itself turns by the joint angle
        let pose = room.frame_transform(FrameId::TableTop, FrameId::FixedReference).unwrap();
        assert!((pose.rotation.angle() - 40_f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let initial = all_poses(&TreatmentRoom::cabin26a().unwrap()).unwrap();
        let mut room = cabin_at(&TABLE, &CARM).unwrap();
        let carm_posed = all_poses(&room).unwrap();

        room.reset_to_initial_pose(Robot::Table).unwrap();
        assert_eq!(room.joint_values(Robot::Table), &[0.0; 6]);
        assert_eq!(room.joint_values(Robot::CArm), &CARM);
        let poses = all_poses(&room).unwrap();
        for frame in FrameId::ALL {
            let expected = match frame.robot() {
                Some(Robot::CArm) => &carm_posed[frame.index()],
                _ => &initial[frame.index()],
            };
            assert_pose_eq(&poses[frame.index()], expected, 1e-9, 1e-12);
        }
    }

    #[test]
    fn test_base_translation_applies_immediately() {
        let mut room = cabin_at(&TABLE, &CARM).unwrap();
        let before = all_poses(&room).unwrap();
        room.set_base_fixed_translation(Robot::Table, Vector3::new(-1585.0, 600.0, -1800.0)).unwrap();
        let after = all_poses(&room).unwrap();
        for frame in FrameId::ALL {
            let shift = after[frame.index()].translation.vector - before[frame.index()].translation.vector;
            let expected = if frame.robot() == Some(Robot::Table) { 100.0 } else { 0.0 };
            assert!((shift - Vector3::new(expected, 0.0, 0.0)).norm() < 1e-9, "{frame}");
        }
        assert_eq!(room.parameters().table.base_fixed_translation, [-1585.0, 600.0, -1800.0]);

        // Kept by later updates
        room.update_all(Robot::Table).unwrap();
        let flange = room.frame_transform(FrameId::TableFlange, FrameId::FixedReference).unwrap();
        assert_pose_eq(&flange, &after[FrameId::TableFlange.index()], 1e-9, 1e-12);
    }

    #[test]
    fn test_patient_placement() {
        let mut room = TreatmentRoom::cabin26a().unwrap();
        room.set_patient_to_table_top_translation(Vector3::new(0.0, -300.0, 120.0)).unwrap();
        let patient = room.frame_transform(FrameId::Patient, FrameId::TableTop).unwrap();
        assert_pose_eq(&patient, &Pose::translation(0.0, -300.0, 120.0), 1e-9, 1e-12);

        room.set_patient_orientation(PatientOrientation::FeetFirst).unwrap();
        let ras = room.frame_transform(FrameId::Ras, FrameId::Patient).unwrap();
        assert_pose_eq(&ras, &PatientOrientation::FeetFirst.ras_pose(), 1e-12, 1e-12);
        assert_eq!(room.parameters().patient_orientation, PatientOrientation::FeetFirst);

        // Superior direction of a head first patient points towards the table head
        room.set_patient_orientation(PatientOrientation::HeadFirst).unwrap();
        let superior = room.frame_transform(FrameId::Ras, FrameId::TableTop).unwrap() * Vector3::z();
        assert!((superior - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_carm_anchored_on_table_top() {
        let mut params = RoomParameters::cabin26a();
        params.carm.joints[0].pivot = PivotParameters::Anchor { frame: FrameId::TableTop, point: [0.0; 3] };

        let mut room = TreatmentRoom::new(params.clone()).unwrap();
        room.set_joint_values(Robot::Table, &TABLE).unwrap();
        room.set_joint_values(Robot::CArm, &CARM).unwrap();
        // The C-arm base yaw needs the current table top
        room.update_all(Robot::CArm).unwrap();
        for index in 0..6 {
            assert!(!room.is_dirty(Robot::Table, index).unwrap());
        }

        let reference = all_poses(&room_with(params, &TABLE, &CARM).unwrap()).unwrap();
        let poses = all_poses(&room).unwrap();
        for frame in FrameId::ALL {
            assert_pose_eq(&poses[frame.index()], &reference[frame.index()], 1e-9, 1e-12);
        }

        // Moving the table afterwards leaves the C-arm base yaw stale
        room.set_joint_value(Robot::Table, 0, 0.0).unwrap();
        room.update_all(Robot::Table).unwrap();
        assert!(room.is_dirty(Robot::CArm, 0).unwrap());
    }

    #[test]
    fn test_room_builds_with_anchor_on_carm_and_zero_out_of_range() {
        let mut params = RoomParameters::cabin26a();
        params.table.joints[5].pivot = PivotParameters::Anchor { frame: FrameId::CArm, point: [1000.0, 0.0, 0.0] };
        params.table.joints[5].limits = JointLimits::new(5.0, 20.0);

        let mut room = TreatmentRoom::new(params).expect("Room with cross robot anchor must build");
        assert_eq!(room.joint_value(Robot::Table, 5).unwrap(), 5.0);
        let built = all_poses(&room).unwrap();

        room.update_all(Robot::CArm).unwrap();
        room.update_all(Robot::Table).unwrap();
        let updated = all_poses(&room).unwrap();
        for frame in FrameId::ALL {
            assert_pose_eq(&updated[frame.index()], &built[frame.index()], 1e-9, 1e-12);
        }
        let top = room.frame_transform(FrameId::TableTop, FrameId::TableFlange).unwrap();
        assert!((top.rotation.angle() - 5_f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_anchor_cycle_is_rejected() {
        let mut params = RoomParameters::cabin26a();
        params.carm.joints[4].pivot = PivotParameters::Anchor { frame: FrameId::TableTop, point: [0.0; 3] };
        params.table.joints[5].pivot = PivotParameters::Anchor { frame: FrameId::CArm, point: [0.0; 3] };
        let err = TreatmentRoom::new(params).unwrap_err();
        assert!(err.to_string().contains("depends on itself"), "{err}");
    }
}
