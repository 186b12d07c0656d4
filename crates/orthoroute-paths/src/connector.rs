//! Default fallback connector.

use orthoroute_core::{Point, Rect};

use crate::traits::{Connector, FallbackKind};

/// Coordinates closer than this are treated as aligned.
const ALIGN_TOLERANCE: f64 = 0.5;

#[inline]
fn aligned(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < ALIGN_TOLERANCE || (a.y - b.y).abs() < ALIGN_TOLERANCE
}

/// Connects edges with axis-aligned elbows, ignoring obstacles.
///
/// For [`FallbackKind::Segment`] the caller's waypoints are kept and a
/// horizontal-first elbow is inserted wherever two consecutive points of
/// the chain `source center, waypoints.., target center` are not aligned.
/// For [`FallbackKind::Orthogonal`] the two box centers are joined through
/// a channel halfway between them along the axis of greater separation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ElbowConnector;

impl ElbowConnector {
    fn segments(
        source: Option<Rect>,
        target: Option<Rect>,
        points: &[Point],
        result: &mut Vec<Point>,
    ) {
        let mut previous = source.map(|r| r.center());
        for &p in points {
            if let Some(prev) = previous.filter(|&prev| !aligned(prev, p)) {
                result.push(Point::new(p.x, prev.y));
            }
            result.push(p);
            previous = Some(p);
        }
        if points.is_empty() {
            return;
        }
        if let (Some(prev), Some(end)) = (previous, target.map(|r| r.center())) {
            if !aligned(prev, end) {
                result.push(Point::new(end.x, prev.y));
            }
        }
    }

    fn orthogonal(source: Rect, target: Rect, result: &mut Vec<Point>) {
        let s = source.center();
        let t = target.center();
        if aligned(s, t) {
            return;
        }
        let d = t.difference(s);
        if d.x.abs() >= d.y.abs() {
            let channel = (s.x + t.x) / 2.0;
            result.push(Point::new(channel, s.y));
            result.push(Point::new(channel, t.y));
        } else {
            let channel = (s.y + t.y) / 2.0;
            result.push(Point::new(s.x, channel));
            result.push(Point::new(t.x, channel));
        }
    }
}

impl Connector for ElbowConnector {
    fn connect(
        &self,
        kind: FallbackKind,
        source: Option<Rect>,
        target: Option<Rect>,
        points: &[Point],
        result: &mut Vec<Point>,
    ) {
        match kind {
            FallbackKind::Segment => Self::segments(source, target, points, result),
            FallbackKind::Orthogonal => {
                if let (Some(source), Some(target)) = (source, target) {
                    Self::orthogonal(source, target, result);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(
        kind: FallbackKind,
        source: Option<Rect>,
        target: Option<Rect>,
        points: &[Point],
    ) -> Vec<Point> {
        let mut result = Vec::new();
        ElbowConnector.connect(kind, source, target, points, &mut result);
        result
    }

    #[test]
    fn orthogonal_aligned_centers_are_direct() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(200.0, 0.0, 40.0, 40.0);
        assert!(connect(FallbackKind::Orthogonal, Some(a), Some(b), &[]).is_empty());
    }

    #[test]
    fn orthogonal_uses_wider_axis_channel() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(200.0, 100.0, 40.0, 40.0);
        assert_eq!(
            connect(FallbackKind::Orthogonal, Some(a), Some(b), &[]),
            vec![Point::new(120.0, 20.0), Point::new(120.0, 120.0)]
        );

        let c = Rect::new(60.0, 300.0, 40.0, 40.0);
        assert_eq!(
            connect(FallbackKind::Orthogonal, Some(a), Some(c), &[]),
            vec![Point::new(20.0, 170.0), Point::new(80.0, 170.0)]
        );
    }

    #[test]
    fn orthogonal_without_both_boxes_adds_nothing() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert!(connect(FallbackKind::Orthogonal, Some(a), None, &[]).is_empty());
        assert!(connect(FallbackKind::Orthogonal, None, None, &[]).is_empty());
    }

    #[test]
    fn segment_keeps_waypoints_and_adds_elbows() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(300.0, 200.0, 40.0, 40.0);
        let points = [Point::new(100.0, 20.0), Point::new(150.0, 80.0)];
        assert_eq!(
            connect(FallbackKind::Segment, Some(a), Some(b), &points),
            vec![
                Point::new(100.0, 20.0),
                Point::new(150.0, 20.0),
                Point::new(150.0, 80.0),
                Point::new(320.0, 80.0),
            ]
        );
    }

    #[test]
    fn segment_without_boxes_only_joins_waypoints() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert_eq!(
            connect(FallbackKind::Segment, None, None, &points),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)]
        );
        assert!(connect(FallbackKind::Segment, None, None, &[]).is_empty());
    }
}
