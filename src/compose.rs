//! Composition of edge transforms along the path between two frames.
//!
//! Both modes walk through the root; no common ancestor shortcut is taken. Poses compose with
//! the column vector convention, so the transform applied first is the rightmost factor.

use tracing::trace;

use crate::error::Result;
use crate::frame::FrameId;
use crate::graph::FrameGraph;
use crate::kinematic_traits::{Pose, TransformResolver};
use crate::point;
use nalgebra::Point3;

/// Transform mapping coordinates expressed in `from` to coordinates expressed in `to`.
///
/// Walking up from `from` applies each stored child-to-parent transform directly; walking down to
/// `to` applies the inverse. Identity when `from == to`. Any unset edge on the way gives
/// `BrokenChain`.
pub fn static_model_pose(graph: &FrameGraph, from: FrameId, to: FrameId) -> Result<Pose> {
    graph.check(from)?;
    graph.check(to)?;
    if from == to {
        return Ok(Pose::identity());
    }

    let up = up_to_root(graph, from)?;
    let mut down = Pose::identity();
    for pair in graph.path_from_root(to)?.windows(2) {
        let (_, local) = graph.edge(pair[1])?;
        down = local.inverse() * down;
    }
    trace!("Static pose {} -> {} composed", from, to);
    Ok(down * up)
}

/// Beam mode composition. Like [`static_model_pose`] on the way up, but the `to` side applies
/// the forward edge transforms root to leaf, and `from == to` is composed like any other pair.
pub fn dynamic_beam_pose(graph: &FrameGraph, from: FrameId, to: FrameId) -> Result<Pose> {
    graph.check(from)?;
    graph.check(to)?;

    let up = up_to_root(graph, from)?;
    let mut down = Pose::identity();
    for pair in graph.path_from_root(to)?.windows(2) {
        let (_, local) = graph.edge(pair[1])?;
        down = local * down;
    }
    trace!("Beam pose {} -> {} composed", from, to);
    Ok(down * up)
}

/// Pose of `frame` in root coordinates.
fn up_to_root(graph: &FrameGraph, frame: FrameId) -> Result<Pose> {
    let mut acc = Pose::identity();
    for child in graph.path_to_root(frame)?.iter().take_while(|f| **f != graph.root()) {
        let (_, local) = graph.edge(*child)?;
        acc = local * acc;
    }
    Ok(acc)
}

impl TransformResolver for FrameGraph {
    fn static_model_pose(&self, from: FrameId, to: FrameId) -> Result<Pose> {
        static_model_pose(self, from, to)
    }

    fn dynamic_beam_pose(&self, from: FrameId, to: FrameId) -> Result<Pose> {
        dynamic_beam_pose(self, from, to)
    }

    fn transform_point(&self, p: &Point3<f64>, from: FrameId, to: FrameId) -> Result<Point3<f64>> {
        point::transform_point(self, p, from, to)
    }
}
