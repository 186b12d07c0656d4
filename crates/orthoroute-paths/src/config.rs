//! Router configuration and per-edge routing context.
//!
//! [`RouterConfig`] is the user-facing, serializable option set. Several of
//! its tables default to values derived from `step`; [`RouterConfig::resolve`]
//! fills those in, precomputes step-direction angles and validates the
//! result into a [`ResolvedConfig`], which is what the search runs on.

use std::collections::BTreeMap;
use std::fmt;

use orthoroute_core::{Point, Rect, normalize_angle};

/// One of the four sides of a shape, used to pick boundary points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Every side, in default preference order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];

    /// Unit vector pointing out of the shape through this side.
    #[inline]
    pub const fn unit(self) -> Point {
        match self {
            Side::Right => Point::new(1.0, 0.0),
            Side::Bottom => Point::new(0.0, 1.0),
            Side::Left => Point::new(-1.0, 0.0),
            Side::Top => Point::new(0.0, -1.0),
        }
    }
}

/// A move the search may make from a point, with its base cost.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepDirection {
    pub offset_x: f64,
    pub offset_y: f64,
    pub cost: f64,
}

impl StepDirection {
    /// Create a step direction.
    #[inline]
    pub const fn new(offset_x: f64, offset_y: f64, cost: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            cost,
        }
    }

    /// The four axis-aligned moves of length `step`: right, down, left, up.
    pub fn cardinal(step: f64) -> Vec<StepDirection> {
        vec![
            Self::new(step, 0.0, step),
            Self::new(0.0, step, step),
            Self::new(-step, 0.0, step),
            Self::new(0.0, -step, step),
        ]
    }

    /// The move as a vector.
    #[inline]
    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    /// Compass angle of the move in whole degrees.
    pub fn angle(&self) -> i32 {
        let a = normalize_angle(Point::ZERO.theta(self.offset())).round() as i32;
        a % 360
    }
}

/// Extra cost charged for changing direction, keyed by the exact change
/// angle in degrees. Angles missing from the table cost nothing.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Penalties(BTreeMap<i32, f64>);

impl Penalties {
    /// An empty table: turning is free.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The default table for a grid of size `step`. Reversals (180°) are
    /// free; the turn limit already excludes them after the first move.
    pub fn from_step(step: f64) -> Self {
        let mut table = BTreeMap::new();
        table.insert(0, 0.0);
        table.insert(45, step / 2.0);
        table.insert(90, step / 2.0);
        table.insert(180, 0.0);
        Self(table)
    }

    /// Set the penalty for a direction change of `angle` degrees.
    pub fn with(mut self, angle: i32, cost: f64) -> Self {
        self.0.insert(angle, cost);
        self
    }

    /// Penalty for a direction change of `angle` degrees.
    #[inline]
    pub fn get(&self, angle: i32) -> f64 {
        self.0.get(&angle).copied().unwrap_or(0.0)
    }
}

/// Caller-supplied replacement for the search, used while an edge end is
/// being dragged. Receives the padded source and target boxes.
#[derive(Copy, Clone)]
pub struct DraggingRoute(pub fn(Rect, Rect, &ResolvedConfig) -> Vec<Point>);

impl fmt::Debug for DraggingRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DraggingRoute(..)")
    }
}

// ---------------------------------------------------------------------------
// RouterConfig
// ---------------------------------------------------------------------------

/// Options controlling the Manhattan router.
///
/// `padding`, `directions` and `penalties` default to `None`, meaning
/// "derive from `step`" at [`resolve`](Self::resolve) time, so changing
/// `step` alone rescales the whole cost model.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouterConfig {
    /// Size of the routing grid and of one search step.
    pub step: f64,
    /// Maximum number of points expanded before the search gives up.
    pub maximum_loops: usize,
    /// Sides a route may leave the source through.
    pub start_directions: Vec<Side>,
    /// Sides a route may enter the target through.
    pub end_directions: Vec<Side>,
    /// Largest direction change, in degrees, allowed at a single point.
    pub max_allowed_direction_change: i32,
    /// Cell size of the obstacle lookup grid.
    pub map_grid_size: f64,
    /// Inflation applied to every box, as a `move_and_expand` delta.
    pub padding: Option<Rect>,
    /// Moves available to the search.
    pub directions: Option<Vec<StepDirection>>,
    /// Turn penalty table.
    pub penalties: Option<Penalties>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub dragging_route: Option<DraggingRoute>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            step: 12.0,
            maximum_loops: 2000,
            start_directions: Side::ALL.to_vec(),
            end_directions: Side::ALL.to_vec(),
            max_allowed_direction_change: 90,
            map_grid_size: 100.0,
            padding: None,
            directions: None,
            penalties: None,
            dragging_route: None,
        }
    }
}

impl RouterConfig {
    /// Set the grid step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set the search iteration budget.
    pub fn with_maximum_loops(mut self, loops: usize) -> Self {
        self.maximum_loops = loops;
        self
    }

    /// Restrict the sides a route may leave the source through.
    pub fn with_start_directions(mut self, sides: impl Into<Vec<Side>>) -> Self {
        self.start_directions = sides.into();
        self
    }

    /// Restrict the sides a route may enter the target through.
    pub fn with_end_directions(mut self, sides: impl Into<Vec<Side>>) -> Self {
        self.end_directions = sides.into();
        self
    }

    /// Set the explicit padding delta.
    pub fn with_padding(mut self, padding: Rect) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Set the explicit turn penalty table.
    pub fn with_penalties(mut self, penalties: Penalties) -> Self {
        self.penalties = Some(penalties);
        self
    }

    /// Install a drag-time override.
    pub fn with_dragging_route(mut self, route: DraggingRoute) -> Self {
        self.dragging_route = Some(route);
        self
    }

    /// Derive defaults and validate.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.validate()?;
        Ok(self.derive())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::InvalidStep(self.step));
        }
        if !self.map_grid_size.is_finite() || self.map_grid_size <= 0.0 {
            return Err(ConfigError::InvalidMapGridSize(self.map_grid_size));
        }
        if self.maximum_loops == 0 {
            return Err(ConfigError::ZeroLoopBudget);
        }
        if self.start_directions.is_empty() {
            return Err(ConfigError::NoStartDirections);
        }
        if self.end_directions.is_empty() {
            return Err(ConfigError::NoEndDirections);
        }
        if let Some(moves) = &self.directions {
            if moves.is_empty() {
                return Err(ConfigError::NoStepDirections);
            }
            if let Some(i) = moves
                .iter()
                .position(|m| m.offset_x == 0.0 && m.offset_y == 0.0)
            {
                return Err(ConfigError::ZeroStepOffset(i));
            }
        }
        Ok(())
    }

    /// Fill in the tables left as `None`. Assumes `validate` passed.
    fn derive(&self) -> ResolvedConfig {
        let step = self.step;
        let directions = match &self.directions {
            Some(moves) => moves.clone(),
            None => StepDirection::cardinal(step),
        }
        .into_iter()
        .map(|m| ResolvedStep {
            offset: m.offset(),
            cost: m.cost,
            angle: m.angle(),
        })
        .collect();

        ResolvedConfig {
            step,
            maximum_loops: self.maximum_loops,
            start_directions: self.start_directions.clone(),
            end_directions: self.end_directions.clone(),
            max_allowed_direction_change: self.max_allowed_direction_change,
            map_grid_size: self.map_grid_size,
            padding: self
                .padding
                .unwrap_or_else(|| Rect::new(-step, -step, 2.0 * step, 2.0 * step)),
            directions,
            penalties: self
                .penalties
                .clone()
                .unwrap_or_else(|| Penalties::from_step(step)),
            dragging_route: self.dragging_route,
        }
    }
}

/// A step direction with its compass angle precomputed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedStep {
    pub offset: Point,
    pub cost: f64,
    pub angle: i32,
}

/// A validated configuration with every derived table filled in.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub step: f64,
    pub maximum_loops: usize,
    pub start_directions: Vec<Side>,
    pub end_directions: Vec<Side>,
    pub max_allowed_direction_change: i32,
    pub map_grid_size: f64,
    pub padding: Rect,
    pub directions: Vec<ResolvedStep>,
    pub penalties: Penalties,
    pub dragging_route: Option<DraggingRoute>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        RouterConfig::default().derive()
    }
}

impl ResolvedConfig {
    /// Number of compass sectors used when bucketing angles.
    #[inline]
    pub fn direction_count(&self) -> usize {
        self.directions.len()
    }
}

// ---------------------------------------------------------------------------
// EdgeContext
// ---------------------------------------------------------------------------

/// Routing state carried by the caller for one edge across calls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeContext {
    /// Incoming direction at the target on the last successful route.
    pub previous_direction: Option<i32>,
    /// Whether an end of the edge is currently being dragged.
    pub dragging: bool,
}

impl EdgeContext {
    /// Context for an edge being dragged interactively.
    pub fn dragging() -> Self {
        Self {
            previous_direction: None,
            dragging: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a [`RouterConfig`] cannot be used.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `step` is zero, negative or not finite.
    InvalidStep(f64),
    /// `map_grid_size` is zero, negative or not finite.
    InvalidMapGridSize(f64),
    /// `maximum_loops` is zero.
    ZeroLoopBudget,
    /// `start_directions` is empty.
    NoStartDirections,
    /// `end_directions` is empty.
    NoEndDirections,
    /// The step-direction table is empty.
    NoStepDirections,
    /// The step direction at this index does not move.
    ZeroStepOffset(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStep(s) => write!(f, "router: step must be positive, got {s}"),
            Self::InvalidMapGridSize(s) => {
                write!(f, "router: map grid size must be positive, got {s}")
            }
            Self::ZeroLoopBudget => write!(f, "router: maximum loops must be at least 1"),
            Self::NoStartDirections => write!(f, "router: no start directions"),
            Self::NoEndDirections => write!(f, "router: no end directions"),
            Self::NoStepDirections => write!(f, "router: no step directions"),
            Self::ZeroStepOffset(i) => write!(f, "router: step direction {i} has zero offset"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_from_step() {
        let cfg = RouterConfig::default().with_step(10.0).resolve().unwrap();
        assert_eq!(cfg.padding, Rect::new(-10.0, -10.0, 20.0, 20.0));
        assert_eq!(cfg.direction_count(), 4);
        assert_eq!(cfg.penalties.get(90), 5.0);
        assert_eq!(cfg.penalties.get(45), 5.0);
        assert_eq!(cfg.penalties.get(180), 0.0);
        assert_eq!(cfg.penalties.get(0), 0.0);
        assert!(cfg.directions.iter().all(|d| d.cost == 10.0));
    }

    #[test]
    fn step_angles_follow_screen_orientation() {
        let cfg = RouterConfig::default().resolve().unwrap();
        let angles: Vec<i32> = cfg.directions.iter().map(|d| d.angle).collect();
        // right, down, left, up
        assert_eq!(angles, vec![0, 270, 180, 90]);
    }

    #[test]
    fn missing_penalty_is_free() {
        let p = Penalties::new().with(90, 3.0);
        assert_eq!(p.get(90), 3.0);
        assert_eq!(p.get(135), 0.0);
    }

    #[test]
    fn explicit_tables_override_derived_ones() {
        let mut cfg = RouterConfig::default()
            .with_padding(Rect::new(-1.0, -1.0, 2.0, 2.0))
            .with_penalties(Penalties::new());
        cfg.directions = Some(vec![StepDirection::new(0.0, -12.0, 7.0)]);
        let r = cfg.resolve().unwrap();
        assert_eq!(r.padding, Rect::new(-1.0, -1.0, 2.0, 2.0));
        assert_eq!(r.penalties.get(90), 0.0);
        assert_eq!(r.directions.len(), 1);
        assert_eq!(r.directions[0].angle, 90);
        assert_eq!(r.directions[0].cost, 7.0);
    }

    #[test]
    fn rejects_invalid_values() {
        let base = RouterConfig::default;
        assert_eq!(
            base().with_step(0.0).resolve().unwrap_err(),
            ConfigError::InvalidStep(0.0)
        );
        assert!(matches!(
            base().with_step(f64::NAN).resolve(),
            Err(ConfigError::InvalidStep(_))
        ));
        assert_eq!(
            base().with_maximum_loops(0).resolve().unwrap_err(),
            ConfigError::ZeroLoopBudget
        );
        assert_eq!(
            base().with_start_directions(Vec::<Side>::new()).resolve().unwrap_err(),
            ConfigError::NoStartDirections
        );
        assert_eq!(
            base().with_end_directions(Vec::<Side>::new()).resolve().unwrap_err(),
            ConfigError::NoEndDirections
        );

        let mut cfg = base();
        cfg.map_grid_size = -5.0;
        assert_eq!(cfg.resolve().unwrap_err(), ConfigError::InvalidMapGridSize(-5.0));

        let mut cfg = base();
        cfg.directions = Some(Vec::new());
        assert_eq!(cfg.resolve().unwrap_err(), ConfigError::NoStepDirections);

        let mut cfg = base();
        cfg.directions = Some(vec![
            StepDirection::new(12.0, 0.0, 12.0),
            StepDirection::new(0.0, 0.0, 12.0),
        ]);
        assert_eq!(cfg.resolve().unwrap_err(), ConfigError::ZeroStepOffset(1));
    }

    #[test]
    fn error_messages_are_prefixed() {
        let msg = ConfigError::ZeroStepOffset(2).to_string();
        assert_eq!(msg, "router: step direction 2 has zero offset");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let cfg = RouterConfig::default()
            .with_step(8.0)
            .with_end_directions(vec![Side::Top, Side::Bottom])
            .with_penalties(Penalties::from_step(8.0));
        let json = serde_json::to_string(&cfg).unwrap();
        let back: RouterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.step, 8.0);
        assert_eq!(back.end_directions, vec![Side::Top, Side::Bottom]);
        assert_eq!(back.penalties, cfg.penalties);
        assert!(back.dragging_route.is_none());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let back: RouterConfig =
            serde_json::from_str(r#"{"step": 20, "start_directions": ["left"]}"#).unwrap();
        assert_eq!(back.step, 20.0);
        assert_eq!(back.start_directions, vec![Side::Left]);
        assert_eq!(back.maximum_loops, 2000);
    }

    #[test]
    fn context_round_trip() {
        let ctx = EdgeContext {
            previous_direction: Some(270),
            dragging: true,
        };
        let json = serde_json::to_string(&ctx).unwrap();
        let back: EdgeContext = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, back);
    }
}
