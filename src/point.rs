use nalgebra::Point3;
use tracing::trace;

use crate::error::Result;
use crate::frame::FrameId;
use crate::graph::FrameGraph;

/// Map a point expressed in `from` into `to`, applying each edge along the path to the point in
/// turn: forward transforms up to the root, then inverse transforms down to `to`. The point is
/// returned unchanged when `from == to`.
pub fn transform_point(
    graph: &FrameGraph,
    point: &Point3<f64>,
    from: FrameId,
    to: FrameId,
) -> Result<Point3<f64>> {
    graph.check(from)?;
    graph.check(to)?;
    if from == to {
        return Ok(*point);
    }

    let mut p = *point;
    for child in graph.path_to_root(from)?.iter().take_while(|f| **f != graph.root()) {
        let (_, local) = graph.edge(*child)?;
        p = local.transform_point(&p);
    }
    for pair in graph.path_from_root(to)?.windows(2) {
        let (_, local) = graph.edge(pair[1])?;
        p = local.inverse_transform_point(&p);
    }
    trace!("Point {:?} mapped {} -> {}", point, from, to);
    Ok(p)
}
