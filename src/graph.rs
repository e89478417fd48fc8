//! Parent/child tree over the registered frames.
//!
//! Frames live in a dense arena indexed by [`FrameId::index`]. Every non-root frame owns exactly
//! one edge to its parent, stored as `(parent, local transform)` in a flat array, where the local
//! transform is the pose of the child expressed in the parent's coordinates. The topology is
//! fixed once [`FrameGraphBuilder::build`] succeeds; only edge transforms change afterwards.

use tracing::debug;

use crate::error::{KinematicsError, Result};
use crate::frame::FrameId;
use crate::kinematic_traits::Pose;

#[derive(Debug, Clone, Default)]
struct Edge {
    parent: Option<FrameId>,
    /// `None` until first written.
    local: Option<Pose>,
}

/// Collects frames and parent links, then validates them into a [`FrameGraph`].
#[derive(Debug, Clone)]
pub struct FrameGraphBuilder {
    root: FrameId,
    registered: [bool; FrameId::COUNT],
    parents: [Option<FrameId>; FrameId::COUNT],
}

impl FrameGraphBuilder {
    /// Start a graph with the given root frame already registered.
    pub fn new(root: FrameId) -> Self {
        let mut registered = [false; FrameId::COUNT];
        registered[root.index()] = true;
        FrameGraphBuilder {
            root,
            registered,
            parents: [None; FrameId::COUNT],
        }
    }

    /// Register a frame. Registering the same frame twice is harmless.
    pub fn add_frame(&mut self, frame: FrameId) -> &mut Self {
        self.registered[frame.index()] = true;
        self
    }

    /// Declare `parent` as the parent of `child`. Both must be registered.
    pub fn set_parent(&mut self, child: FrameId, parent: FrameId) -> Result<&mut Self> {
        for frame in [child, parent] {
            if !self.registered[frame.index()] {
                return Err(KinematicsError::InvalidFrame {
                    frame,
                    reason: "frame is not registered".into(),
                });
            }
        }
        if child == self.root {
            return Err(KinematicsError::InvalidFrame {
                frame: child,
                reason: "the root frame cannot have a parent".into(),
            });
        }
        if child == parent {
            return Err(KinematicsError::InvalidFrame {
                frame: child,
                reason: "frame cannot be its own parent".into(),
            });
        }
        if let Some(existing) = self.parents[child.index()] {
            return Err(KinematicsError::InvalidFrame {
                frame: child,
                reason: format!("frame already has parent {}", existing),
            });
        }
        self.parents[child.index()] = Some(parent);
        Ok(self)
    }

    /// Validate the tree: every registered frame must reach the root, without cycles.
    pub fn build(&self) -> Result<FrameGraph> {
        for frame in FrameId::ALL.into_iter().filter(|f| self.registered[f.index()]) {
            let mut current = frame;
            let mut steps = 0;
            while current != self.root {
                match self.parents[current.index()] {
                    Some(parent) => current = parent,
                    None => return Err(KinematicsError::DisconnectedFrame { frame }),
                }
                steps += 1;
                if steps > FrameId::COUNT {
                    // Walked more edges than there are frames: cycle
                    return Err(KinematicsError::DisconnectedFrame { frame });
                }
            }
        }

        let mut edges: Vec<Edge> = vec![Edge::default(); FrameId::COUNT];
        let mut children: Vec<Vec<FrameId>> = vec![Vec::new(); FrameId::COUNT];
        for frame in FrameId::ALL.into_iter().filter(|f| self.registered[f.index()]) {
            if let Some(parent) = self.parents[frame.index()] {
                edges[frame.index()].parent = Some(parent);
                children[parent.index()].push(frame);
            }
        }

        debug!(
            "Frame graph rooted at {} built with {} frames",
            self.root,
            self.registered.iter().filter(|r| **r).count()
        );

        Ok(FrameGraph {
            root: self.root,
            registered: self.registered,
            edges,
            children,
        })
    }
}

/// Immutable tree topology with mutable edge transforms.
#[derive(Debug, Clone)]
pub struct FrameGraph {
    root: FrameId,
    registered: [bool; FrameId::COUNT],
    edges: Vec<Edge>,
    children: Vec<Vec<FrameId>>,
}

impl FrameGraph {
    /// The standard treatment room tree: both robot chains under `FixedReference`.
    /// No edge transform is set yet.
    pub fn treatment_room() -> Result<FrameGraph> {
        let mut builder = FrameGraphBuilder::new(FrameId::FixedReference);
        for frame in FrameId::ALL {
            builder.add_frame(frame);
        }
        for frame in FrameId::ALL {
            if let Some(parent) = frame.room_parent() {
                builder.set_parent(frame, parent)?;
            }
        }
        builder.build()
    }

    pub fn root(&self) -> FrameId {
        self.root
    }

    pub fn contains(&self, frame: FrameId) -> bool {
        self.registered[frame.index()]
    }

    /// Registered frames in ordinal order.
    pub fn frames(&self) -> impl Iterator<Item = FrameId> + '_ {
        FrameId::ALL.into_iter().filter(|f| self.registered[f.index()])
    }

    pub(crate) fn check(&self, frame: FrameId) -> Result<()> {
        if self.contains(frame) {
            Ok(())
        } else {
            Err(KinematicsError::InvalidFrame {
                frame,
                reason: "frame is not part of the graph".into(),
            })
        }
    }

    /// Parent of the frame, `None` for the root.
    pub fn parent(&self, frame: FrameId) -> Result<Option<FrameId>> {
        self.check(frame)?;
        Ok(self.edges[frame.index()].parent)
    }

    pub fn children(&self, frame: FrameId) -> Result<&[FrameId]> {
        self.check(frame)?;
        Ok(&self.children[frame.index()])
    }

    /// Local transform of the edge `child -> parent`, `None` while unset.
    pub fn local_transform(&self, child: FrameId) -> Result<Option<&Pose>> {
        self.check(child)?;
        Ok(self.edges[child.index()].local.as_ref())
    }

    /// Parent and local transform of the edge owned by `child`. Fails with `BrokenChain` when the
    /// transform has not been written yet.
    pub fn edge(&self, child: FrameId) -> Result<(FrameId, &Pose)> {
        self.check(child)?;
        let edge = &self.edges[child.index()];
        let parent = edge.parent.ok_or(KinematicsError::DisconnectedFrame { frame: child })?;
        let local = edge
            .local
            .as_ref()
            .ok_or(KinematicsError::BrokenChain { child, parent })?;
        Ok((parent, local))
    }

    /// Overwrite the local transform of the edge owned by `child`.
    pub fn set_local_transform(&mut self, child: FrameId, local: Pose) -> Result<()> {
        self.check(child)?;
        if child == self.root {
            return Err(KinematicsError::InvalidFrame {
                frame: child,
                reason: "the root frame has no edge".into(),
            });
        }
        self.edges[child.index()].local = Some(local);
        Ok(())
    }

    /// True if `ancestor` lies on the path from `frame` to the root (a frame is its own ancestor).
    pub fn is_ancestor(&self, ancestor: FrameId, frame: FrameId) -> Result<bool> {
        Ok(self.path_to_root(frame)?.contains(&ancestor))
    }

    /// Depth of the frame, the root having depth 0.
    pub fn depth(&self, frame: FrameId) -> Result<usize> {
        Ok(self.path_to_root(frame)?.len() - 1)
    }
}
