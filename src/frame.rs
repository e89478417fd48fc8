//! Registry of the named coordinate frames of the treatment room.
//!
//! The set of frames is closed: every frame the kinematic graph knows about is a variant of
//! [`FrameId`]. Names are taken from a static registration table built once, so lookups in both
//! directions are plain array scans over a handful of entries.
//!
//! ```text
//! FixedReference -> TableBaseFixed -> TableBaseRotation -> TableShoulder -> TableElbow
//!                -> TableWrist -> TableFlange -> TableTop -> Patient -> Ras
//! FixedReference -> CArmBaseFixed -> CArmBaseRotation -> CArmShoulder -> CArmElbow
//!                -> CArmWrist -> CArm -> XrayImager -> ExternalXrayBeam
//!                                     -> XrayImageReceptor
//! ```

use std::fmt;

/// Robot that owns (drives) a frame. The root frame belongs to neither robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "allow_filesystem", derive(serde::Serialize, serde::Deserialize))]
pub enum Robot {
    /// Patient positioning robot carrying the table top.
    Table,
    /// Imaging robot carrying the X-ray C-arm.
    CArm,
}

impl Robot {
    pub const ALL: [Robot; 2] = [Robot::Table, Robot::CArm];

    pub fn name(&self) -> &'static str {
        match self {
            Robot::Table => "Table",
            Robot::CArm => "CArm",
        }
    }

    /// First frame of the robot, mounted directly on the room reference.
    pub fn base_frame(&self) -> FrameId {
        match self {
            Robot::Table => FrameId::TableBaseFixed,
            Robot::CArm => FrameId::CArmBaseFixed,
        }
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a coordinate frame. The discriminant is the dense arena index used by
/// [`crate::graph::FrameGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FrameId {
    /// Treatment room reference system, origin at the room isocenter. Root of the tree.
    FixedReference = 0,
    TableBaseFixed,
    TableBaseRotation,
    TableShoulder,
    TableElbow,
    TableWrist,
    TableFlange,
    TableTop,
    Patient,
    /// Patient image coordinate system (right, anterior, superior).
    Ras,
    CArmBaseFixed,
    CArmBaseRotation,
    CArmShoulder,
    CArmElbow,
    CArmWrist,
    CArm,
    /// X-ray source mounted on the C-arm.
    XrayImager,
    XrayImageReceptor,
    ExternalXrayBeam,
}

/// One row of the registration table.
struct FrameEntry {
    id: FrameId,
    name: &'static str,
    /// Parent in the treatment room tree, `None` for the root.
    parent: Option<FrameId>,
    /// Robot whose reset and update cycle drives the edge to the parent.
    robot: Option<Robot>,
    /// Name of the treatment machine part modelled in this frame, if any.
    part: Option<&'static str>,
}

const fn entry(
    id: FrameId,
    name: &'static str,
    parent: Option<FrameId>,
    robot: Option<Robot>,
    part: Option<&'static str>,
) -> FrameEntry {
    FrameEntry { id, name, parent, robot, part }
}

use FrameId::*;

/// Static id -> name registration table, in ordinal order.
const REGISTRY: [FrameEntry; FrameId::COUNT] = [
    entry(FixedReference, "FixedReference", None, None, Some("FixedReference")),
    entry(TableBaseFixed, "TableBaseFixed", Some(FixedReference), Some(Robot::Table), Some("TableRobotBaseFixed")),
    entry(TableBaseRotation, "TableBaseRotation", Some(TableBaseFixed), Some(Robot::Table), Some("TableRobotBaseRotation")),
    entry(TableShoulder, "TableShoulder", Some(TableBaseRotation), Some(Robot::Table), Some("TableRobotShoulder")),
    entry(TableElbow, "TableElbow", Some(TableShoulder), Some(Robot::Table), Some("TableRobotElbow")),
    entry(TableWrist, "TableWrist", Some(TableElbow), Some(Robot::Table), Some("TableRobotWrist")),
    entry(TableFlange, "TableFlange", Some(TableWrist), Some(Robot::Table), Some("TableFlange")),
    entry(TableTop, "TableTop", Some(TableFlange), Some(Robot::Table), Some("TableTop")),
    entry(Patient, "Patient", Some(TableTop), Some(Robot::Table), Some("Patient")),
    entry(Ras, "RAS", Some(Patient), Some(Robot::Table), None),
    entry(CArmBaseFixed, "CArmBaseFixed", Some(FixedReference), Some(Robot::CArm), Some("CArmRobotBaseFixed")),
    entry(CArmBaseRotation, "CArmBaseRotation", Some(CArmBaseFixed), Some(Robot::CArm), Some("CArmRobotBaseRotation")),
    entry(CArmShoulder, "CArmShoulder", Some(CArmBaseRotation), Some(Robot::CArm), Some("CArmRobotShoulder")),
    entry(CArmElbow, "CArmElbow", Some(CArmShoulder), Some(Robot::CArm), Some("CArmRobotElbow")),
    entry(CArmWrist, "CArmWrist", Some(CArmElbow), Some(Robot::CArm), Some("CArmRobotWrist")),
    entry(CArm, "CArm", Some(CArmWrist), Some(Robot::CArm), Some("CArm")),
    entry(XrayImager, "XrayImager", Some(CArm), Some(Robot::CArm), Some("XrayImager")),
    entry(XrayImageReceptor, "XrayImageReceptor", Some(CArm), Some(Robot::CArm), Some("XrayImageReceptor")),
    entry(ExternalXrayBeam, "ExternalXrayBeam", Some(XrayImager), Some(Robot::CArm), None),
];

impl FrameId {
    pub const COUNT: usize = 19;

    /// All frames in ordinal order.
    pub const ALL: [FrameId; FrameId::COUNT] = [
        FixedReference,
        TableBaseFixed,
        TableBaseRotation,
        TableShoulder,
        TableElbow,
        TableWrist,
        TableFlange,
        TableTop,
        Patient,
        Ras,
        CArmBaseFixed,
        CArmBaseRotation,
        CArmShoulder,
        CArmElbow,
        CArmWrist,
        CArm,
        XrayImager,
        XrayImageReceptor,
        ExternalXrayBeam,
    ];

    /// Dense arena index of this frame.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name, also used for the scene node names of the edges.
    pub fn name(self) -> &'static str {
        REGISTRY[self.index()].name
    }

    /// Reverse lookup of [`FrameId::name`]. Case-insensitive, so "Ras" and "RAS" both resolve.
    pub fn from_name(name: &str) -> Option<FrameId> {
        REGISTRY
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| e.id)
    }

    /// Parent of this frame in the treatment room topology.
    pub fn room_parent(self) -> Option<FrameId> {
        REGISTRY[self.index()].parent
    }

    /// Robot driving the edge from this frame to its parent.
    pub fn robot(self) -> Option<Robot> {
        REGISTRY[self.index()].robot
    }

    /// Treatment machine part type name, `None` for frames that carry no machine model.
    pub fn treatment_machine_part_name(self) -> Option<&'static str> {
        REGISTRY[self.index()].part
    }

    /// Frames driven by the given robot, in ordinal order (which is also root-to-leaf).
    pub fn of_robot(robot: Robot) -> impl Iterator<Item = FrameId> {
        FrameId::ALL.into_iter().filter(move |f| f.robot() == Some(robot))
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of the transform node holding the edge `child -> parent`, e.g.
/// `TableTopToTableFlangeTransform`.
pub fn edge_name(child: FrameId, parent: FrameId) -> String {
    format!("{}To{}Transform", child.name(), parent.name())
}

#[cfg(feature = "allow_filesystem")]
impl serde::Serialize for FrameId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "allow_filesystem")]
impl<'de> serde::Deserialize<'de> for FrameId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        FrameId::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown frame '{}'", name)))
    }
}
