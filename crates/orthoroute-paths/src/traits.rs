use std::fmt::Debug;
use std::hash::Hash;

use orthoroute_core::{Point, Rect};

/// Read-only view of the diagram the router works on.
pub trait Scene {
    /// Opaque shape handle.
    type Shape: Copy + Eq + Hash + Debug;

    /// Bounding box of `shape`, or `None` if the shape is unknown.
    fn bounds(&self, shape: Self::Shape) -> Option<Rect>;

    /// Containing shape of `shape`, or `None` at the top level.
    fn parent(&self, shape: Self::Shape) -> Option<Self::Shape>;

    /// Append every vertex shape (anything but connectors) into `buf`.
    /// The caller clears `buf` before calling.
    fn vertices(&self, buf: &mut Vec<Self::Shape>);

    /// Append the chain of containers of `shape`, innermost first, into
    /// `buf`. Stops early if the parent chain loops back on itself.
    fn ancestors(&self, shape: Self::Shape, buf: &mut Vec<Self::Shape>) {
        let start = buf.len();
        let mut cur = shape;
        while let Some(parent) = self.parent(cur) {
            if parent == shape || buf[start..].contains(&parent) {
                break;
            }
            buf.push(parent);
            cur = parent;
        }
    }
}

/// How a fallback connector is asked to connect an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FallbackKind {
    /// Follow the caller's waypoints; used when the user placed points or
    /// an endpoint is missing.
    Segment,
    /// Connect the two boxes directly; used when the search found no route.
    Orthogonal,
}

/// A connector that does not avoid obstacles, used when the Manhattan
/// router declines an edge.
pub trait Connector {
    /// Append waypoints for the edge into `result`.
    fn connect(
        &self,
        kind: FallbackKind,
        source: Option<Rect>,
        target: Option<Rect>,
        points: &[Point],
        result: &mut Vec<Point>,
    );
}
