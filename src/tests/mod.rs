mod test_kinematics;
