//! Frame sequences between a frame and the root of the graph.

use tracing::trace;

use crate::error::{KinematicsError, Result};
use crate::frame::FrameId;
use crate::graph::FrameGraph;

impl FrameGraph {
    /// Frames visited walking parent links from `frame` up to the root, both ends included.
    /// The root alone yields `[root]`.
    pub fn path_to_root(&self, frame: FrameId) -> Result<Vec<FrameId>> {
        self.check(frame)?;
        let mut path = Vec::with_capacity(FrameId::COUNT);
        let mut current = frame;
        path.push(current);
        while current != self.root() {
            let parent = self
                .parent(current)?
                .ok_or(KinematicsError::DisconnectedFrame { frame })?;
            if path.len() > FrameId::COUNT {
                return Err(KinematicsError::DisconnectedFrame { frame });
            }
            path.push(parent);
            current = parent;
        }
        trace!("Path {} -> root: {:?}", frame, path);
        Ok(path)
    }

    /// Reverse of [`FrameGraph::path_to_root`]: starts at the root, ends at `frame`.
    pub fn path_from_root(&self, frame: FrameId) -> Result<Vec<FrameId>> {
        let mut path = self.path_to_root(frame)?;
        path.reverse();
        Ok(path)
    }
}
