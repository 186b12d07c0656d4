//! Geometry primitives: [`Point`], [`PointKey`] and [`Rect`].
//!
//! Coordinates are screen coordinates: X grows right, Y grows down. Angles
//! are measured in degrees counter-clockwise from the positive X axis with
//! the Y axis flipped, so "up" on screen is 90°.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Coordinates closer to zero than this are treated as zero by
/// [`Point::theta`] (ten decimal places).
const THETA_EPSILON: f64 = 5e-11;

/// Round half up, the way the grid snapping of diagram editors does.
#[inline]
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Snap a single coordinate to the nearest multiple of `grid`.
#[inline]
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    grid * round_half_up(value / grid)
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Move the point in place by (dx, dy).
    #[inline]
    pub fn offset(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Return a point shifted by (dx, dy).
    #[inline]
    pub fn offset_by(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Vector from `other` to `self`.
    #[inline]
    pub fn difference(self, other: Point) -> Point {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Manhattan (L1) distance to `other`.
    #[inline]
    pub fn manhattan_distance(self, other: Point) -> f64 {
        (other.x - self.x).abs() + (other.y - self.y).abs()
    }

    /// Snap both coordinates in place to the nearest multiple of `grid`.
    #[inline]
    pub fn snap_to_grid(&mut self, grid: f64) -> &mut Self {
        self.x = snap_to_grid(self.x, grid);
        self.y = snap_to_grid(self.y, grid);
        self
    }

    /// Return a copy snapped to the nearest multiple of `grid`.
    #[inline]
    pub fn snapped(self, grid: f64) -> Self {
        Self::new(snap_to_grid(self.x, grid), snap_to_grid(self.y, grid))
    }

    /// Angle in degrees, in `[0, 360)`, of the vector from `self` to `p`.
    ///
    /// The Y axis is inverted so that a point straight above `self` on
    /// screen is at 90°. A vector whose components both round to zero has
    /// angle 0.
    pub fn theta(self, p: Point) -> f64 {
        let y = -(p.y - self.y);
        let x = p.x - self.x;
        if y.abs() < THETA_EPSILON && x.abs() < THETA_EPSILON {
            return 0.0;
        }
        normalize_angle(y.atan2(x).to_degrees())
    }

    /// Component-wise sign: each axis becomes -1, 0 or 1.
    #[inline]
    pub fn sign(self) -> Point {
        fn axis(v: f64) -> f64 {
            if v == 0.0 { 0.0 } else { v.signum() }
        }
        Self::new(axis(self.x), axis(self.y))
    }

    /// Hashable integer key for this point.
    #[inline]
    pub fn key(self) -> PointKey {
        PointKey::from(self)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ---------------------------------------------------------------------------
// PointKey
// ---------------------------------------------------------------------------

/// Integer identity of a grid-aligned [`Point`].
///
/// Converting from a [`Point`] rounds half up, so it is only lossless for
/// whole-unit coordinates. Searches on a fractional step key points by
/// their grid index instead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointKey {
    pub x: i64,
    pub y: i64,
}

impl PointKey {
    /// Create a key from integer coordinates.
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The point this key identifies.
    #[inline]
    pub fn point(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }
}

impl From<Point> for PointKey {
    #[inline]
    fn from(p: Point) -> Self {
        Self::new(round_half_up(p.x) as i64, round_half_up(p.y) as i64)
    }
}

impl fmt::Display for PointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle given by its top-left corner and size.
///
/// Negative sizes are tolerated: the queries below clamp them to zero, so a
/// malformed rectangle behaves like the single point at its origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`.
    #[inline]
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Add each field of `delta` to the matching field of `self`.
    ///
    /// A delta of `(-p, -p, 2p, 2p)` grows the rectangle by `p` on every side.
    #[inline]
    pub fn move_and_expand(&mut self, delta: &Rect) -> &mut Self {
        self.x += delta.x;
        self.y += delta.y;
        self.width += delta.width;
        self.height += delta.height;
        self
    }

    /// Copy of `self` with [`move_and_expand`](Self::move_and_expand) applied.
    #[inline]
    pub fn expanded(mut self, delta: &Rect) -> Self {
        self.move_and_expand(delta);
        self
    }

    #[inline]
    fn w(&self) -> f64 {
        self.width.max(0.0)
    }

    #[inline]
    fn h(&self) -> f64 {
        self.height.max(0.0)
    }

    /// Top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[inline]
    pub fn corner(&self) -> Point {
        Point::new(self.x + self.w(), self.y + self.h())
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w() / 2.0, self.y + self.h() / 2.0)
    }

    /// Whether `p` lies inside the rectangle or on its border.
    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w() && p.y >= self.y && p.y <= self.y + self.h()
    }

    /// Whether the two closed rectangles share at least one point.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.w()
            && other.x <= self.x + self.w()
            && self.y <= other.y + other.h()
            && other.y <= self.y + self.h()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {} {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}

// ---------------------------------------------------------------------------
// Angles
// ---------------------------------------------------------------------------

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Angle from `from` to `to`, bucketed to the nearest of `directions`
/// evenly spaced compass directions, in whole degrees.
///
/// With 4 directions the result is one of 0, 90, 180 or 270.
pub fn direction_angle(from: Point, to: Point, directions: usize) -> i32 {
    let q = 360.0 / directions.max(1) as f64;
    let bucket = (normalize_angle(from.theta(to) + q / 2.0) / q).floor();
    (bucket * q).round() as i32
}

/// Smallest angular difference between two directions, in `0..=180`.
#[inline]
pub fn direction_change(a: i32, b: i32) -> i32 {
    let change = (a - b).abs() % 360;
    if change > 180 { 360 - change } else { change }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // -----------------------------------------------------------------------
    // Point
    // -----------------------------------------------------------------------

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 5.0);
        assert_eq!(a + b, Point::new(4.0, 7.0));
        assert_eq!(b - a, Point::new(2.0, 3.0));
        assert_eq!(b.difference(a), Point::new(2.0, 3.0));
        assert_eq!(a * 3.0, Point::new(3.0, 6.0));
        assert_eq!(a.manhattan_distance(b), 5.0);
    }

    #[test]
    fn offset_in_place_chains() {
        let mut p = Point::new(1.0, 1.0);
        p.offset(2.0, 3.0).offset(-1.0, 0.0);
        assert_eq!(p, Point::new(2.0, 4.0));
        assert_eq!(Point::ZERO.offset_by(5.0, -5.0), Point::new(5.0, -5.0));
    }

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        assert_eq!(Point::new(17.0, 18.0).snapped(12.0), Point::new(12.0, 24.0));
        assert_eq!(Point::new(149.0, 151.0).snapped(100.0), Point::new(100.0, 200.0));
        // Halfway values round up.
        assert_eq!(snap_to_grid(6.0, 12.0), 12.0);
        assert_eq!(snap_to_grid(-6.0, 12.0), 0.0);

        let mut p = Point::new(-13.0, 5.0);
        p.snap_to_grid(12.0);
        assert_eq!(p, Point::new(-12.0, 0.0));
    }

    #[test]
    fn theta_uses_screen_orientation() {
        let o = Point::ZERO;
        assert_eq!(o.theta(Point::new(10.0, 0.0)), 0.0);
        assert_eq!(o.theta(Point::new(0.0, -10.0)), 90.0);
        assert_eq!(o.theta(Point::new(-10.0, 0.0)), 180.0);
        assert_eq!(o.theta(Point::new(0.0, 10.0)), 270.0);
        assert!((o.theta(Point::new(10.0, -10.0)) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn theta_of_zero_vector_is_zero() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.theta(p), 0.0);
        assert_eq!(p.theta(Point::new(3.0 + 1e-12, 4.0)), 0.0);
    }

    #[test]
    fn sign_keeps_zero() {
        assert_eq!(Point::new(-7.0, 0.0).sign(), Point::new(-1.0, 0.0));
        assert_eq!(Point::new(0.0, 3.5).sign(), Point::new(0.0, 1.0));
        assert_eq!(Point::ZERO.sign(), Point::ZERO);
    }

    #[test]
    fn keys_are_structural() {
        let mut set = HashSet::new();
        set.insert(Point::new(12.0, 24.0).key());
        assert!(set.contains(&PointKey::new(12, 24)));
        assert!(!set.contains(&PointKey::new(24, 12)));
        assert_eq!(PointKey::new(-12, 36).point(), Point::new(-12.0, 36.0));
        assert_eq!(PointKey::new(3, 4).to_string(), "3@4");
    }

    // -----------------------------------------------------------------------
    // Rect
    // -----------------------------------------------------------------------

    #[test]
    fn rect_corners_and_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.origin(), Point::new(10.0, 20.0));
        assert_eq!(r.corner(), Point::new(110.0, 70.0));
        assert_eq!(r.center(), Point::new(60.0, 45.0));
        assert_eq!(Rect::centered(Point::new(60.0, 45.0), 100.0, 50.0), r);
    }

    #[test]
    fn move_and_expand_grows_symmetrically() {
        let pad = Rect::new(-12.0, -12.0, 24.0, 24.0);
        let mut r = Rect::new(0.0, 0.0, 10.0, 10.0);
        r.move_and_expand(&pad);
        assert_eq!(r, Rect::new(-12.0, -12.0, 34.0, 34.0));
        assert_eq!(r.center(), Point::new(5.0, 5.0));
        assert_eq!(Rect::new(0.0, 0.0, 10.0, 10.0).expanded(&pad), r);
    }

    #[test]
    fn contains_point_is_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Point::new(0.0, 0.0)));
        assert!(r.contains_point(Point::new(10.0, 10.0)));
        assert!(r.contains_point(Point::new(5.0, 10.0)));
        assert!(!r.contains_point(Point::new(10.1, 5.0)));
        assert!(!r.contains_point(Point::new(-0.1, 5.0)));
    }

    #[test]
    fn degenerate_rect_behaves_as_point() {
        let dot = Rect::new(4.0, 4.0, 0.0, 0.0);
        assert!(dot.contains_point(Point::new(4.0, 4.0)));
        assert!(!dot.contains_point(Point::new(4.0, 5.0)));
        assert_eq!(dot.center(), Point::new(4.0, 4.0));

        let negative = Rect::new(4.0, 4.0, -10.0, -3.0);
        assert_eq!(negative.corner(), Point::new(4.0, 4.0));
        assert_eq!(negative.center(), Point::new(4.0, 4.0));
        assert!(negative.contains_point(Point::new(4.0, 4.0)));
        assert!(!negative.contains_point(Point::new(0.0, 2.0)));
    }

    #[test]
    fn intersects_closed_boxes() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(a.intersects(&Rect::new(2.0, 2.0, 1.0, 1.0)));
        assert!(!a.intersects(&Rect::new(11.0, 0.0, 5.0, 5.0)));
    }

    // -----------------------------------------------------------------------
    // Angles
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_wraps_into_range() {
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(405.0), 45.0);
    }

    #[test]
    fn direction_angle_buckets_to_quadrants() {
        let o = Point::ZERO;
        assert_eq!(direction_angle(o, Point::new(10.0, 1.0), 4), 0);
        assert_eq!(direction_angle(o, Point::new(10.0, -9.0), 4), 0);
        assert_eq!(direction_angle(o, Point::new(9.0, -10.0), 4), 90);
        assert_eq!(direction_angle(o, Point::new(-10.0, 3.0), 4), 180);
        assert_eq!(direction_angle(o, Point::new(0.0, 10.0), 4), 270);
        // Slightly below the x axis still belongs to the 0° sector.
        assert_eq!(direction_angle(o, Point::new(10.0, 2.0), 4), 0);
        assert_eq!(direction_angle(o, Point::new(10.0, -10.0), 8), 45);
    }

    #[test]
    fn direction_change_takes_short_way_round() {
        assert_eq!(direction_change(0, 90), 90);
        assert_eq!(direction_change(0, 270), 90);
        assert_eq!(direction_change(90, 270), 180);
        assert_eq!(direction_change(180, 180), 0);
        assert_eq!(direction_change(315, 45), 90);
    }
}
