//! Supports reading room geometry from YAML file (optional)

use std::path::Path;

use crate::frame::Robot;
use crate::parameter_error::ParameterError;
use crate::parameters::RoomParameters;

impl RoomParameters {
    /// Read the room geometry from YAML file. YAML file like this is supported:
    /// ```yaml
    /// patient_to_table_top: [0.0, 0.0, 0.0]
    /// patient_orientation: HeadFirst
    /// table:
    ///   base_fixed_translation: [-1685.0, 600.0, -1800.0]
    ///   joints:
    ///     - { name: A1, frame: TableBaseRotation, axis: [0, 0, 1], home: [0, 0, 240],
    ///         limits: { min: -185, max: 185 } }
    ///     # ... A2 to A5
    ///     - name: A6
    ///       frame: TableTop
    ///       axis: [0, 0, 1]
    ///       home: [0, 0, 390]
    ///       pivot: { type: anchor, frame: FixedReference, point: [0, 0, 0] }
    ///       limits: { min: -350, max: 350 }
    /// carm:
    ///   base_fixed_translation: [1500.0, -2000.0, -1800.0]
    ///   joints: [ ... ]
    ///   fixed:
    ///     - { frame: XrayImager, translation: [1000, 865, 0] }
    /// ```
    /// Joint `kind` (default `Revolute`), `home_rotation`, `pivot` (default `joint_origin`) and
    /// the fixed edge `rotation` are optional. Frames are given by name.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Same as [`RoomParameters::from_yaml_file`], from an in-memory string. Chains are built
    /// once to validate the geometry before it is returned.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let params: RoomParameters = serde_yaml::from_str(contents).map_err(|e| {
            let message = e.to_string();
            if message.contains("unknown frame") {
                ParameterError::UnknownFrame(message)
            } else {
                ParameterError::ParseError(message)
            }
        })?;
        for robot in Robot::ALL {
            params.build_chain(robot)?;
        }
        Ok(params)
    }

    /// Convert to string yaml representation (quick viewing, etc).
    pub fn to_yaml(&self) -> Result<String, ParameterError> {
        serde_yaml::to_string(self).map_err(|e| ParameterError::ParseError(e.to_string()))
    }
}
