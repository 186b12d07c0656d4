//! Obstacle-avoiding orthogonal routing for diagram connectors.
//!
//! Given a scene of rectangular shapes, this crate computes the bend points
//! of an edge that leaves its source box and enters its target box using
//! only horizontal and vertical segments, keeping clear of every other box:
//!
//! - [`Router`] is the entry point, deciding between search, drag override
//!   and fallback for one edge ([`Router::route`])
//! - [`find_route`] is the best-first grid search itself, with turn
//!   penalties and a hard iteration budget
//! - [`ObstacleMap`] buckets padded obstacle boxes into grid cells for
//!   point queries
//! - [`PriorityFrontier`] is the open set with in-place priority updates
//!
//! # Trait seams
//!
//! | Trait | Implemented by |
//! |---|---|
//! | [`Scene`] | the host's diagram model, or [`SceneGraph`] |
//! | [`Connector`] | the host's plain connectors, or [`ElbowConnector`] |
//!
//! Every routing call is self-contained: obstacle map and search state are
//! built per call, and the only state carried between calls for an edge is
//! the caller-owned [`EdgeContext`].

mod config;
mod connector;
mod finder;
mod frontier;
mod obstacles;
mod reconstruct;
mod router;
mod scene;
mod traits;

pub use config::{
    ConfigError, DraggingRoute, EdgeContext, Penalties, ResolvedConfig, ResolvedStep,
    RouterConfig, Side, StepDirection,
};
pub use connector::ElbowConnector;
pub use finder::{FoundRoute, NoRoute, find_route, rect_points};
pub use frontier::{NodeStatus, PriorityFrontier};
pub use obstacles::ObstacleMap;
pub use reconstruct::reconstruct_route;
pub use router::{FallbackReason, RouteOutcome, Router};
pub use scene::{SceneGraph, ShapeId, ShapeKind, ShapeNode};
pub use traits::{Connector, FallbackKind, Scene};
