use std::collections::HashMap;

use orthoroute_core::{Point, PointKey};

/// Turn a chain of parent links into the bend points of a route.
///
/// Walks back from `end` and keeps only the points where the direction of
/// travel changes. The segment entering the target is compared with the
/// straight line from `end` to `end_center`, and the segment leaving the
/// source with the line from `start_center`, so a boundary point is only
/// emitted when the route actually bends there. The result runs from
/// source to target and is empty for a straight connection.
pub fn reconstruct_route(
    parents: &HashMap<PointKey, PointKey>,
    end: PointKey,
    start_center: Point,
    end_center: Point,
) -> Vec<Point> {
    let mut route = Vec::new();
    let mut previous = end_center.difference(end.point()).sign();
    let mut current = end;

    // A well-formed parent chain visits each key once.
    let mut budget = parents.len();
    while let Some(&parent) = parents.get(&current) {
        if budget == 0 {
            break;
        }
        budget -= 1;

        let direction = current.point().difference(parent.point()).sign();
        if direction != previous {
            route.push(current.point());
            previous = direction;
        }
        current = parent;
    }

    let start_direction = current.point().difference(start_center).sign();
    if start_direction != previous {
        route.push(current.point());
    }

    route.reverse();
    route
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(points: &[(i64, i64)]) -> HashMap<PointKey, PointKey> {
        points
            .windows(2)
            .map(|w| (PointKey::new(w[1].0, w[1].1), PointKey::new(w[0].0, w[0].1)))
            .collect()
    }

    #[test]
    fn straight_run_has_no_waypoints() {
        let parents = chain(&[(10, 0), (20, 0), (30, 0), (40, 0)]);
        let route = reconstruct_route(
            &parents,
            PointKey::new(40, 0),
            Point::new(0.0, 0.0),
            Point::new(60.0, 0.0),
        );
        assert!(route.is_empty());
    }

    #[test]
    fn single_bend_is_kept() {
        let parents = chain(&[(24, 0), (36, 0), (48, 0), (48, 12), (48, 24)]);
        let route = reconstruct_route(
            &parents,
            PointKey::new(48, 24),
            Point::new(0.0, 0.0),
            Point::new(48.0, 48.0),
        );
        assert_eq!(route, vec![Point::new(48.0, 0.0)]);
    }

    #[test]
    fn boundary_points_are_added_when_centers_are_offset() {
        let parents = chain(&[(24, 0), (36, 0), (48, 0)]);
        // The source center sits below the start point, so leaving it is a
        // bend; likewise the target center sits above the end point.
        let route = reconstruct_route(
            &parents,
            PointKey::new(48, 0),
            Point::new(0.0, 12.0),
            Point::new(72.0, -12.0),
        );
        assert_eq!(route, vec![Point::new(24.0, 0.0), Point::new(48.0, 0.0)]);
    }

    #[test]
    fn start_point_alone() {
        let parents = HashMap::new();
        let route = reconstruct_route(
            &parents,
            PointKey::new(12, 0),
            Point::new(0.0, 0.0),
            Point::new(24.0, 0.0),
        );
        assert!(route.is_empty());

        let route = reconstruct_route(
            &parents,
            PointKey::new(12, 0),
            Point::new(0.0, 0.0),
            Point::new(12.0, 24.0),
        );
        assert_eq!(route, vec![Point::new(12.0, 0.0)]);
    }

    #[test]
    fn cyclic_links_terminate() {
        let mut parents = HashMap::new();
        parents.insert(PointKey::new(0, 0), PointKey::new(12, 0));
        parents.insert(PointKey::new(12, 0), PointKey::new(0, 0));
        let route = reconstruct_route(
            &parents,
            PointKey::new(0, 0),
            Point::new(-12.0, 0.0),
            Point::new(0.0, 12.0),
        );
        assert!(route.len() <= 3);
    }
}
