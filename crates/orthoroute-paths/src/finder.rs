//! Best-first search for an orthogonal route between two boxes.
//!
//! The search runs on the implicit grid spanned by the configured step
//! directions, starting from boundary points of the source box and ending
//! at boundary points of the target box. Moves cost their configured step
//! cost plus a turn penalty; turns sharper than the configured limit are
//! not explored once a point has a parent. Points are ordered by cost so
//! far plus the Manhattan distance to the nearest target boundary point.

use std::collections::{HashMap, HashSet};
use std::fmt;

use orthoroute_core::{Point, PointKey, Rect, direction_angle, direction_change};

use crate::config::{ResolvedConfig, Side};
use crate::frontier::PriorityFrontier;
use crate::obstacles::ObstacleMap;
use crate::reconstruct::reconstruct_route;

/// A route accepted by [`find_route`].
#[derive(Clone, Debug, PartialEq)]
pub struct FoundRoute {
    /// Bend points from source to target; empty for a straight connection.
    pub waypoints: Vec<Point>,
    /// Source boundary point the route leaves from.
    pub start: Point,
    /// Target boundary point the route was accepted at.
    pub end: Point,
    /// Accumulated cost at the accepted target boundary point.
    pub cost: f64,
    /// Direction of travel, in degrees, when the route reached the target.
    pub end_direction: i32,
    /// Number of points popped from the frontier.
    pub loops: usize,
}

/// Why [`find_route`] declined to produce a route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoRoute {
    /// Every boundary point of the source is inside an obstacle.
    NoStartPoints,
    /// Every boundary point of the target is inside an obstacle.
    NoEndPoints,
    /// All reachable points were explored without reaching the target.
    FrontierExhausted { loops: usize },
    /// The iteration budget ran out.
    LoopBudgetExhausted { loops: usize },
}

impl fmt::Display for NoRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStartPoints => write!(f, "no accessible source boundary point"),
            Self::NoEndPoints => write!(f, "no accessible target boundary point"),
            Self::FrontierExhausted { loops } => {
                write!(f, "target unreachable after {loops} expansions")
            }
            Self::LoopBudgetExhausted { loops } => {
                write!(f, "search budget of {loops} expansions exhausted")
            }
        }
    }
}

impl std::error::Error for NoRoute {}

/// Boundary points of `bbox` on each of `sides`, snapped to `step`.
///
/// Each point starts at the middle of the side and is pushed one step
/// outward while it is still on the box, so routes start just outside it.
pub fn rect_points(bbox: &Rect, sides: &[Side], step: f64) -> Vec<Point> {
    let center = bbox.center();
    // Clamped extent: a box with negative size is a single point.
    let size = bbox.corner() - bbox.origin();
    sides
        .iter()
        .map(|side| {
            let unit = side.unit();
            let mut point = center.offset_by(unit.x * size.x / 2.0, unit.y * size.y / 2.0);
            if bbox.contains_point(point) {
                point.offset(unit.x * step, unit.y * step);
            }
            point.snapped(step)
        })
        .collect()
}

/// Grid index of a point on the `step` grid.
#[inline]
fn grid_key(p: Point, step: f64) -> PointKey {
    Point::new(p.x / step, p.y / step).key()
}

/// The point at grid index `key`.
#[inline]
fn grid_point(key: PointKey, step: f64) -> Point {
    key.point() * step
}

/// Manhattan distance from `from` to the closest of `ends`.
fn estimate_cost(from: Point, ends: &[Point]) -> f64 {
    ends.iter()
        .map(|&end| from.manhattan_distance(end))
        .fold(f64::INFINITY, f64::min)
}

/// Search for a route from the box `start` to the box `end`.
///
/// Both boxes should already carry the obstacle padding. `previous_direction`,
/// when given, stands in for the incoming direction at the start points
/// instead of the direction from the source center.
pub fn find_route(
    start: &Rect,
    end: &Rect,
    obstacles: &ObstacleMap,
    config: &ResolvedConfig,
    previous_direction: Option<i32>,
) -> Result<FoundRoute, NoRoute> {
    let step = config.step;
    let sectors = config.direction_count();

    let start_points: Vec<Point> = rect_points(start, &config.start_directions, step)
        .into_iter()
        .filter(|&p| obstacles.is_point_accessible(p))
        .collect();
    if start_points.is_empty() {
        return Err(NoRoute::NoStartPoints);
    }
    let end_points: Vec<Point> = rect_points(end, &config.end_directions, step)
        .into_iter()
        .filter(|&p| obstacles.is_point_accessible(p))
        .collect();
    if end_points.is_empty() {
        return Err(NoRoute::NoEndPoints);
    }

    let start_center = start.center().snapped(step);
    let end_center = end.center().snapped(step);
    let end_keys: HashSet<PointKey> = end_points.iter().map(|&p| grid_key(p, step)).collect();

    // Nodes are keyed by grid index, so any positive step keeps the search
    // on its grid.
    let mut open = PriorityFrontier::new();
    let mut parents: HashMap<PointKey, PointKey> = HashMap::new();
    let mut origins: HashMap<PointKey, PointKey> = HashMap::new();
    let mut costs: HashMap<PointKey, f64> = HashMap::new();

    for &p in &start_points {
        let key = grid_key(p, step);
        open.add(key, estimate_cost(p, &end_points));
        origins.insert(key, key);
        costs.insert(key, 0.0);
    }

    for loops in 1..=config.maximum_loops {
        let Some(current_key) = open.pop() else {
            return Err(NoRoute::FrontierExhausted { loops: loops - 1 });
        };
        let current = grid_point(current_key, step);
        let current_cost = costs.get(&current_key).copied().unwrap_or(0.0);
        let origin = origins.get(&current_key).copied().unwrap_or(current_key);
        let parent = parents.get(&current_key).copied();
        let current_angle = match parent {
            Some(parent) => direction_angle(grid_point(parent, step), current, sectors),
            None => previous_direction
                .unwrap_or_else(|| direction_angle(start_center, current, sectors)),
        };

        // Accept a target boundary point unless the route would have to
        // double back to enter the target.
        if end_keys.contains(&current_key) {
            let entry = direction_angle(current, end_center, sectors);
            if current == end_center || direction_change(current_angle, entry) < 180 {
                let waypoints: Vec<Point> = reconstruct_route(
                    &parents,
                    current_key,
                    grid_key(start_center, step).point(),
                    grid_key(end_center, step).point(),
                )
                .into_iter()
                .map(|p| p * step)
                .collect();
                log::trace!(
                    "route found: {} waypoints, cost {}, {} expansions",
                    waypoints.len(),
                    current_cost,
                    loops
                );
                return Ok(FoundRoute {
                    waypoints,
                    start: grid_point(origin, step),
                    end: current,
                    cost: current_cost,
                    end_direction: current_angle,
                    loops,
                });
            }
        }

        for dir in &config.directions {
            let change = direction_change(current_angle, dir.angle);
            if parent.is_some() && change > config.max_allowed_direction_change {
                continue;
            }

            let neighbor_key = grid_key(current + dir.offset, step);
            let neighbor = grid_point(neighbor_key, step);
            if open.is_closed(&neighbor_key) || !obstacles.is_point_accessible(neighbor) {
                continue;
            }

            let cost = current_cost + dir.cost + config.penalties.get(change);
            let improves = costs.get(&neighbor_key).is_none_or(|&known| cost < known);
            if !open.is_open(&neighbor_key) || improves {
                parents.insert(neighbor_key, current_key);
                origins.insert(neighbor_key, origin);
                costs.insert(neighbor_key, cost);
                open.add(neighbor_key, cost + estimate_cost(neighbor, &end_points));
            }
        }
    }

    log::trace!(
        "search budget exhausted with {} points still open",
        open.len()
    );
    Err(NoRoute::LoopBudgetExhausted {
        loops: config.maximum_loops,
    })
}
