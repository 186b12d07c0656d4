//! An owned, in-memory [`Scene`] implementation.
//!
//! Hosts with their own diagram model implement [`Scene`] directly; this
//! type serves tests, the demo, and callers that only have a list of boxes.

use orthoroute_core::Rect;

use crate::traits::Scene;

/// Handle of a shape inside a [`SceneGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ShapeId(pub usize);

/// What a shape is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShapeKind {
    /// A box: a node or a container of other nodes.
    Vertex,
    /// A connector between two shapes. Never an obstacle.
    Edge { source: ShapeId, target: ShapeId },
}

/// A shape stored in a [`SceneGraph`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeNode {
    pub bounds: Rect,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<ShapeId>,
    pub kind: ShapeKind,
}

/// A flat list of shapes with parent links.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneGraph {
    shapes: Vec<ShapeNode>,
}

impl SceneGraph {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: ShapeNode) -> ShapeId {
        self.shapes.push(node);
        ShapeId(self.shapes.len() - 1)
    }

    /// Add a top-level box.
    pub fn add_vertex(&mut self, bounds: Rect) -> ShapeId {
        self.push(ShapeNode {
            bounds,
            parent: None,
            kind: ShapeKind::Vertex,
        })
    }

    /// Add a box nested inside `parent`.
    pub fn add_child(&mut self, parent: ShapeId, bounds: Rect) -> ShapeId {
        self.push(ShapeNode {
            bounds,
            parent: Some(parent),
            kind: ShapeKind::Vertex,
        })
    }

    /// Add a connector from `source` to `target`.
    pub fn add_edge(&mut self, source: ShapeId, target: ShapeId) -> ShapeId {
        self.push(ShapeNode {
            bounds: Rect::default(),
            parent: None,
            kind: ShapeKind::Edge { source, target },
        })
    }

    /// Re-parent a shape. Returns `false` if `shape` does not exist.
    pub fn set_parent(&mut self, shape: ShapeId, parent: Option<ShapeId>) -> bool {
        match self.shapes.get_mut(shape.0) {
            Some(node) => {
                node.parent = parent;
                true
            }
            None => false,
        }
    }

    /// Look up a shape.
    #[inline]
    pub fn get(&self, shape: ShapeId) -> Option<&ShapeNode> {
        self.shapes.get(shape.0)
    }

    /// Number of shapes, connectors included.
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the scene has no shapes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Every connector as `(edge, source, target)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (ShapeId, ShapeId, ShapeId)> + '_ {
        self.shapes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match node.kind {
                ShapeKind::Edge { source, target } => Some((ShapeId(i), source, target)),
                ShapeKind::Vertex => None,
            })
    }
}

impl Scene for SceneGraph {
    type Shape = ShapeId;

    fn bounds(&self, shape: ShapeId) -> Option<Rect> {
        self.get(shape).map(|node| node.bounds)
    }

    fn parent(&self, shape: ShapeId) -> Option<ShapeId> {
        self.get(shape).and_then(|node| node.parent)
    }

    fn vertices(&self, buf: &mut Vec<ShapeId>) {
        buf.extend(
            self.shapes
                .iter()
                .enumerate()
                .filter(|(_, node)| node.kind == ShapeKind::Vertex)
                .map(|(i, _)| ShapeId(i)),
        );
    }
}
