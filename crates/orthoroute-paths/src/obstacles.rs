//! Spatial index of padded obstacle boxes.
//!
//! The plane is divided into square cells of `grid_size`. Every obstacle is
//! recorded in each cell its box spans, so a point query only inspects the
//! obstacles of the one cell the point snaps to.

use std::collections::{HashMap, HashSet};

use orthoroute_core::{Point, PointKey, Rect};

use crate::config::ResolvedConfig;
use crate::traits::Scene;

/// Grid-bucketed set of obstacle rectangles, built once per routing call.
#[derive(Clone, Debug)]
pub struct ObstacleMap {
    cells: HashMap<PointKey, Vec<Rect>>,
    grid_size: f64,
    obstacles: usize,
}

impl ObstacleMap {
    /// Create an empty map with the given cell size.
    pub fn new(grid_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            grid_size,
            obstacles: 0,
        }
    }

    /// Build the obstacle map for routing an edge from `source` to `target`.
    ///
    /// Every vertex of `scene` becomes a padded obstacle except the two
    /// endpoints and all of their containers, so routes may start and end
    /// inside nested shapes.
    pub fn build<S: Scene>(
        scene: &S,
        source: S::Shape,
        target: S::Shape,
        config: &ResolvedConfig,
    ) -> Self {
        let mut map = Self::new(config.map_grid_size);

        let mut buf = vec![source, target];
        scene.ancestors(source, &mut buf);
        scene.ancestors(target, &mut buf);
        let excluded: HashSet<S::Shape> = buf.drain(..).collect();

        scene.vertices(&mut buf);
        for &shape in buf.iter() {
            if excluded.contains(&shape) {
                continue;
            }
            if let Some(bounds) = scene.bounds(shape) {
                map.insert(bounds.expanded(&config.padding));
            }
        }

        log::trace!(
            "obstacle map: {} obstacles over {} cells ({} shapes excluded)",
            map.obstacles,
            map.cells.len(),
            excluded.len()
        );
        map
    }

    /// Cell index of the cell `p` snaps to.
    #[inline]
    fn cell_of(&self, p: Point) -> PointKey {
        let index = |v: f64| (v / self.grid_size + 0.5).floor() as i64;
        PointKey::new(index(p.x), index(p.y))
    }

    /// Record an already padded obstacle in every cell it spans.
    pub fn insert(&mut self, obstacle: Rect) {
        let from = self.cell_of(obstacle.origin());
        let to = self.cell_of(obstacle.corner());
        for x in from.x..=to.x {
            for y in from.y..=to.y {
                self.cells
                    .entry(PointKey::new(x, y))
                    .or_default()
                    .push(obstacle);
            }
        }
        self.obstacles += 1;
    }

    /// Whether `p` lies outside every obstacle.
    pub fn is_point_accessible(&self, p: Point) -> bool {
        self.cells
            .get(&self.cell_of(p))
            .is_none_or(|obstacles| obstacles.iter().all(|o| !o.contains_point(p)))
    }

    /// Number of obstacles inserted.
    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles
    }

    /// Whether the map holds no obstacles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles == 0
    }

    /// Number of non-empty cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
