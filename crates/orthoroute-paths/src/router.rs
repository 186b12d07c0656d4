use orthoroute_core::{Point, Rect};

use crate::config::{ConfigError, EdgeContext, ResolvedConfig, RouterConfig};
use crate::finder::{FoundRoute, NoRoute, find_route};
use crate::obstacles::ObstacleMap;
use crate::traits::{Connector, FallbackKind, Scene};

/// Why an edge was handed to the fallback connector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// The caller supplied waypoints of its own.
    ExistingWaypoints,
    /// An endpoint shape is absent or has no bounds.
    MissingEndpoint,
    /// The search declined.
    NoRoute(NoRoute),
}

/// What [`Router::route`] did with an edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The search found a route with this many bend points.
    Routed { bends: usize },
    /// The configured dragging override produced the points.
    DragOverride,
    /// The fallback connector produced the points.
    Fallback(FallbackReason),
}

impl RouteOutcome {
    /// Whether the search produced the route.
    #[inline]
    pub fn is_routed(&self) -> bool {
        matches!(self, Self::Routed { .. })
    }
}

/// Obstacle-avoiding orthogonal edge router.
///
/// A `Router` holds a validated configuration and nothing else; every call
/// builds its own obstacle map and search state, so one router can serve
/// any number of edges.
///
/// # Example
///
/// ```
/// use orthoroute_core::Rect;
/// use orthoroute_paths::{EdgeContext, ElbowConnector, Router, SceneGraph};
///
/// let mut scene = SceneGraph::new();
/// let a = scene.add_vertex(Rect::new(0.0, 0.0, 60.0, 40.0));
/// let b = scene.add_vertex(Rect::new(300.0, 200.0, 60.0, 40.0));
///
/// let router = Router::default();
/// let mut waypoints = Vec::new();
/// let mut ctx = EdgeContext::default();
/// let outcome = router.route(
///     &scene,
///     Some(a),
///     Some(b),
///     &[],
///     &mut waypoints,
///     &mut ctx,
///     &ElbowConnector,
/// );
/// assert!(outcome.is_routed());
/// assert!(!waypoints.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Router {
    config: ResolvedConfig,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            config: ResolvedConfig::default(),
        }
    }
}

impl Router {
    /// Create a router, validating `config`.
    pub fn new(config: RouterConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.resolve()?,
        })
    }

    /// The resolved configuration in use.
    #[inline]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Route the edge from `source` to `target`, appending its bend points
    /// to `result`.
    ///
    /// Caller-supplied `points`, or a missing endpoint, bypass the search
    /// and go to `fallback` as [`FallbackKind::Segment`]. While
    /// `ctx.dragging` is set and a dragging override is configured, the
    /// override replaces the search. Otherwise the search runs on the
    /// padded endpoint boxes; if it declines, `fallback` is asked for a
    /// [`FallbackKind::Orthogonal`] connection.
    ///
    /// On success `ctx.previous_direction` receives the direction the route
    /// entered the target with. It is fed back into the search only while
    /// dragging.
    #[allow(clippy::too_many_arguments)]
    pub fn route<S, C>(
        &self,
        scene: &S,
        source: Option<S::Shape>,
        target: Option<S::Shape>,
        points: &[Point],
        result: &mut Vec<Point>,
        ctx: &mut EdgeContext,
        fallback: &C,
    ) -> RouteOutcome
    where
        S: Scene,
        C: Connector + ?Sized,
    {
        let source_bounds = source.and_then(|s| scene.bounds(s));
        let target_bounds = target.and_then(|t| scene.bounds(t));

        if !points.is_empty() {
            log::debug!(
                "edge {source:?} -> {target:?}: {} caller waypoints, using segment connector",
                points.len()
            );
            fallback.connect(
                FallbackKind::Segment,
                source_bounds,
                target_bounds,
                points,
                result,
            );
            return RouteOutcome::Fallback(FallbackReason::ExistingWaypoints);
        }

        let (Some(source), Some(target), Some(source_box), Some(target_box)) =
            (source, target, source_bounds, target_bounds)
        else {
            log::debug!("edge {source:?} -> {target:?}: missing endpoint, using segment connector");
            fallback.connect(
                FallbackKind::Segment,
                source_bounds,
                target_bounds,
                points,
                result,
            );
            return RouteOutcome::Fallback(FallbackReason::MissingEndpoint);
        };

        let start = source_box.expanded(&self.config.padding);
        let end = target_box.expanded(&self.config.padding);

        if ctx.dragging {
            if let Some(dragging_route) = self.config.dragging_route {
                result.extend((dragging_route.0)(start, end, &self.config));
                return RouteOutcome::DragOverride;
            }
        }

        let obstacles = ObstacleMap::build(scene, source, target, &self.config);
        log::debug!(
            "edge {source:?} -> {target:?}: {} obstacles in {} cells",
            obstacles.len(),
            obstacles.cell_count()
        );

        let hint = if ctx.dragging {
            ctx.previous_direction
        } else {
            None
        };
        match find_route(&start, &end, &obstacles, &self.config, hint) {
            Ok(found) => {
                let bends = found.waypoints.len();
                log::debug!(
                    "edge {source:?} -> {target:?}: routed with {bends} bends, cost {}, {} expansions",
                    found.cost,
                    found.loops
                );
                ctx.previous_direction = Some(found.end_direction);
                result.extend(found.waypoints);
                RouteOutcome::Routed { bends }
            }
            Err(reason) => {
                log::debug!(
                    "edge {source:?} -> {target:?}: {reason}, using orthogonal connector"
                );
                fallback.connect(
                    FallbackKind::Orthogonal,
                    Some(source_box),
                    Some(target_box),
                    points,
                    result,
                );
                RouteOutcome::Fallback(FallbackReason::NoRoute(reason))
            }
        }
    }

    /// Run the search directly between two boxes that already carry the
    /// obstacle padding.
    pub fn find(
        &self,
        start: &Rect,
        end: &Rect,
        obstacles: &ObstacleMap,
        hint: Option<i32>,
    ) -> Result<FoundRoute, NoRoute> {
        find_route(start, end, obstacles, &self.config, hint)
    }
}
