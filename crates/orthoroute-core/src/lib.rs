//! **orthoroute-core** — geometry value types for orthogonal connector routing.
//!
//! This crate provides the small set of primitives the router is written
//! against: floating-point [`Point`] and [`Rect`] values, a hashable
//! [`PointKey`] for grid-aligned points, and the compass-angle helpers used
//! by the routing cost model.

pub mod geom;

pub use geom::{
    Point, PointKey, Rect, direction_angle, direction_change, normalize_angle, snap_to_grid,
};
