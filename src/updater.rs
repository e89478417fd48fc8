//! Turns joint values into edge transforms, in dependency order.
//!
//! A joint whose pivot is an [`Pivot::Anchor`] reads the current graph while it is updated: the
//! anchor point is re-expressed in the joint's parent frame through every edge on the path from
//! the anchor frame and from the parent up to the root. Such a joint therefore depends on the
//! joints and fixed edges along these two paths. Dependencies are resolved once, when the updater
//! is built, into a global topological order. Afterwards:
//!
//! * setting a joint value marks that joint dirty;
//! * rewriting an edge marks every joint that reads the edge dirty;
//! * updating a joint first refreshes its dirty upstream joints in topological order.
//!
//! The result of any sequence of single joint updates is then the same as a full ordered update.

use nalgebra::Point3;
use tracing::debug;

use crate::chain::KinematicChain;
use crate::compose::static_model_pose;
use crate::error::{KinematicsError, Result};
use crate::frame::{FrameId, Robot};
use crate::graph::FrameGraph;
use crate::joint::{Joint, Pivot};
use crate::kinematic_traits::Pose;

/// Joint of one of the robots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointId {
    pub robot: Robot,
    pub index: usize,
}

impl JointId {
    pub fn new(robot: Robot, index: usize) -> Self {
        JointId { robot, index }
    }
}

/// Owns both chains, the joint dependency information and the dirty flags. The frame graph it
/// writes into is passed in by the caller.
#[derive(Debug, Clone)]
pub struct JointKinematicsUpdater {
    chains: [KinematicChain; 2],
    /// All joints, upstream first.
    order: Vec<JointId>,
    /// Transitive upstream joints, per joint (dense numbering, see `slot`).
    upstream: Vec<Vec<bool>>,
    /// Joints reading the edge owned by a frame, indexed by frame.
    readers: Vec<Vec<JointId>>,
    dirty: Vec<bool>,
}

fn chain_slot(robot: Robot) -> usize {
    match robot {
        Robot::Table => 0,
        Robot::CArm => 1,
    }
}

impl JointKinematicsUpdater {
    /// Analyse anchor dependencies of both chains. Fails with `InvalidFrame` when an anchor lies
    /// below its own joint, and with `CyclicJointDependency` when anchors form a loop.
    pub fn new(graph: &FrameGraph, table: KinematicChain, carm: KinematicChain) -> Result<Self> {
        for (chain, robot) in [(&table, Robot::Table), (&carm, Robot::CArm)] {
            if chain.robot() != robot {
                return Err(KinematicsError::InvalidFrame {
                    frame: graph.root(),
                    reason: format!("chain of the {} robot given in place of the {} robot", chain.robot(), robot),
                });
            }
        }

        let chains = [table, carm];
        let ids: Vec<JointId> = chains
            .iter()
            .flat_map(|c| (0..c.len()).map(move |i| JointId::new(c.robot(), i)))
            .collect();
        let count = ids.len();
        let offset = chains[0].len();
        let slot = |id: JointId| match id.robot {
            Robot::Table => id.index,
            Robot::CArm => offset + id.index,
        };

        // Edge driver lookup: which joint, if any, writes the edge of a frame
        let mut driver: Vec<Option<JointId>> = vec![None; FrameId::COUNT];
        for id in &ids {
            let joint = chains[chain_slot(id.robot)].joint(id.index)?;
            driver[joint.frame.index()] = Some(*id);
        }

        let mut readers: Vec<Vec<JointId>> = vec![Vec::new(); FrameId::COUNT];
        let mut direct: Vec<Vec<usize>> = vec![Vec::new(); count];
        for id in &ids {
            let joint = chains[chain_slot(id.robot)].joint(id.index)?;
            let Some(anchor) = joint.pivot.anchor_frame() else {
                continue;
            };
            graph.check(anchor)?;
            if graph.is_ancestor(joint.frame, anchor)? {
                return Err(KinematicsError::InvalidFrame {
                    frame: anchor,
                    reason: format!("anchor of joint {} must not move with the joint", joint.name),
                });
            }
            let parent = graph
                .parent(joint.frame)?
                .ok_or(KinematicsError::DisconnectedFrame { frame: joint.frame })?;

            let mut read = graph.path_to_root(anchor)?;
            read.extend(graph.path_to_root(parent)?);
            read.retain(|f| *f != graph.root());
            read.sort();
            read.dedup();
            for frame in read {
                readers[frame.index()].push(*id);
                if let Some(upstream) = driver[frame.index()] {
                    direct[slot(*id)].push(slot(upstream));
                }
            }
        }

        // Kahn's algorithm over upstream -> downstream links, ties broken by joint numbering
        let mut incoming: Vec<usize> = direct.iter().map(|d| d.len()).collect();
        let mut downstream: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (s, ups) in direct.iter().enumerate() {
            for u in ups {
                downstream[*u].push(s);
            }
        }
        let mut ready: Vec<usize> = (0..count).filter(|s| incoming[*s] == 0).collect();
        ready.reverse();
        let mut sorted: Vec<usize> = Vec::with_capacity(count);
        while let Some(s) = ready.pop() {
            sorted.push(s);
            for d in &downstream[s] {
                incoming[*d] -= 1;
                if incoming[*d] == 0 {
                    ready.push(*d);
                    ready.sort_by(|a, b| b.cmp(a));
                }
            }
        }
        if sorted.len() < count {
            let stuck = (0..count).find(|s| incoming[*s] > 0).unwrap_or(0);
            let id = ids[stuck];
            let joint = chains[chain_slot(id.robot)].joint(id.index)?;
            return Err(KinematicsError::CyclicJointDependency { joint: joint.name.clone() });
        }

        // Transitive closure in topological order: upstream sets are complete when visited
        let mut upstream: Vec<Vec<bool>> = vec![vec![false; count]; count];
        for s in &sorted {
            for u in direct[*s].clone() {
                upstream[*s][u] = true;
                for k in 0..count {
                    if upstream[u][k] {
                        upstream[*s][k] = true;
                    }
                }
            }
        }

        let order: Vec<JointId> = sorted.iter().map(|s| ids[*s]).collect();
        debug!(
            "Joint update order: {}",
            order
                .iter()
                .filter_map(|id| chains[chain_slot(id.robot)].joint(id.index).ok())
                .map(|j| j.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(JointKinematicsUpdater {
            chains,
            order,
            upstream,
            readers,
            dirty: vec![true; count],
        })
    }

    pub fn chain(&self, robot: Robot) -> &KinematicChain {
        &self.chains[chain_slot(robot)]
    }

    fn chain_mut(&mut self, robot: Robot) -> &mut KinematicChain {
        &mut self.chains[chain_slot(robot)]
    }

    fn slot(&self, id: JointId) -> usize {
        match id.robot {
            Robot::Table => id.index,
            Robot::CArm => self.chains[0].len() + id.index,
        }
    }

    /// Global update order, upstream first.
    pub fn order(&self) -> &[JointId] {
        &self.order
    }

    pub fn is_dirty(&self, robot: Robot, index: usize) -> Result<bool> {
        self.chain(robot).joint(index)?;
        Ok(self.dirty[self.slot(JointId::new(robot, index))])
    }

    /// True if `joint` must be refreshed before `dependant` can be computed.
    pub fn depends_on(&self, dependant: JointId, joint: JointId) -> bool {
        self.upstream[self.slot(dependant)][self.slot(joint)]
    }

    /// Store a clamped joint value and mark the joint dirty. No edge is written.
    pub fn set_joint_value(&mut self, robot: Robot, index: usize, value: f64) -> Result<f64> {
        let applied = self.chain_mut(robot).set_value(index, value)?;
        let slot = self.slot(JointId::new(robot, index));
        self.dirty[slot] = true;
        Ok(applied)
    }

    /// Write one edge and mark every joint reading it dirty.
    pub(crate) fn write_edge(&mut self, graph: &mut FrameGraph, frame: FrameId, pose: Pose) -> Result<()> {
        graph.set_local_transform(frame, pose)?;
        debug!("Edge {} updated: {:?}", frame, pose.translation.vector);
        for reader in self.readers[frame.index()].clone() {
            let slot = self.slot(reader);
            self.dirty[slot] = true;
        }
        Ok(())
    }

    /// Rewrite the configured fixed edges of the robot.
    pub fn write_fixed_edges(&mut self, graph: &mut FrameGraph, robot: Robot) -> Result<()> {
        let fixed = self.chain(robot).fixed_edges().to_vec();
        for edge in fixed {
            self.write_edge(graph, edge.frame, edge.pose)?;
        }
        Ok(())
    }

    /// Pivot of the joint in its parent frame, reading anchors from the current graph.
    fn resolve_pivot(&self, graph: &FrameGraph, joint: &Joint) -> Result<Point3<f64>> {
        match joint.pivot {
            Pivot::Anchor { frame, point } => {
                let parent = graph
                    .parent(joint.frame)?
                    .ok_or(KinematicsError::DisconnectedFrame { frame: joint.frame })?;
                let pivot = static_model_pose(graph, frame, parent)? * point;
                debug!("Joint {} anchored at {:?} in {}, {:?} in {}", joint.name, point, frame, pivot, parent);
                Ok(pivot)
            }
            _ => Ok(joint.local_pivot().unwrap_or_else(Point3::origin)),
        }
    }

    /// Compute and write the edge of one joint from its current value.
    fn recompute(&mut self, graph: &mut FrameGraph, id: JointId) -> Result<()> {
        let chain = self.chain(id.robot);
        let joint = chain.joint(id.index)?;
        let value = chain.value(id.index)?;
        let local = if value == 0.0 {
            joint.home
        } else {
            let pivot = self.resolve_pivot(graph, joint)?;
            joint.local_transform(value, &pivot)
        };
        let frame = joint.frame;
        self.write_edge(graph, frame, local)?;
        let slot = self.slot(id);
        self.dirty[slot] = false;
        Ok(())
    }

    /// Refresh the dirty joints upstream of the given one, then recompute the joint itself.
    pub fn update_joint(&mut self, graph: &mut FrameGraph, robot: Robot, index: usize) -> Result<()> {
        self.chain(robot).joint(index)?;
        let target = JointId::new(robot, index);
        for id in self.order.clone() {
            if id != target && self.depends_on(target, id) && self.dirty[self.slot(id)] {
                self.recompute(graph, id)?;
            }
        }
        self.recompute(graph, target)
    }

    /// Rewrite the robot's fixed edges, then every joint of the robot in topological order. Dirty
    /// joints of the other robot that any of these depend on are refreshed first.
    pub fn update_all(&mut self, graph: &mut FrameGraph, robot: Robot) -> Result<()> {
        self.write_fixed_edges(graph, robot)?;
        let own: Vec<JointId> = self.order.iter().copied().filter(|id| id.robot == robot).collect();
        for id in self.order.clone() {
            if id.robot == robot {
                self.recompute(graph, id)?;
            } else if self.dirty[self.slot(id)] && own.iter().any(|o| self.depends_on(*o, id)) {
                self.recompute(graph, id)?;
            }
        }
        Ok(())
    }

    /// Zero every joint of the robot and write its edges root to leaf: fixed edges with their
    /// configured pose, joint edges with the transform for the zeroed value. The robot's dirty
    /// flags are cleared; joints of the other robot reading these edges become dirty.
    pub fn reset_to_initial_pose(&mut self, graph: &mut FrameGraph, robot: Robot) -> Result<()> {
        self.chain_mut(robot).zero();
        let mut frames: Vec<FrameId> = FrameId::of_robot(robot).collect();
        frames.sort_by_key(|f| graph.depth(*f).unwrap_or(usize::MAX));
        for frame in frames {
            let chain = self.chain(robot);
            if let Some(edge) = chain.fixed_edge(frame) {
                let pose = edge.pose;
                self.write_edge(graph, frame, pose)?;
            } else if let Some(index) = chain.joint_index(frame) {
                self.recompute(graph, JointId::new(robot, index))?;
            }
        }
        for index in 0..self.chain(robot).len() {
            let slot = self.slot(JointId::new(robot, index));
            self.dirty[slot] = false;
        }
        debug!("{} robot reset to initial pose", robot);
        Ok(())
    }

    /// Replace the configured pose of a fixed edge and write it into the graph.
    /// Reset both robots together. Every edge is first written with its configured or home pose,
    /// then joints whose zero lies outside their limits are recomputed in global dependency order.
    /// Anchors in the other robot are therefore always set when read.
    pub fn reset_all(&mut self, graph: &mut FrameGraph) -> Result<()> {
        for robot in Robot::ALL {
            self.chain_mut(robot).zero();
            self.write_fixed_edges(graph, robot)?;
            let homes: Vec<(FrameId, Pose)> =
                self.chain(robot).joints().iter().map(|j| (j.frame, j.home)).collect();
            for (frame, home) in homes {
                self.write_edge(graph, frame, home)?;
            }
        }
        for id in self.order.clone() {
            if self.chain(id.robot).value(id.index)? != 0.0 {
                self.recompute(graph, id)?;
            }
        }
        self.dirty.fill(false);
        debug!("Both robots reset to initial pose");
        Ok(())
    }

    pub fn set_fixed_edge(&mut self, graph: &mut FrameGraph, robot: Robot, frame: FrameId, pose: Pose) -> Result<()> {
        self.chain_mut(robot).set_fixed_edge(frame, pose)?;
        self.write_edge(graph, frame, pose)
    }
}
