//! Scenes and text rendering shared by the `route-demo` binary.
//!
//! Demonstrates: building a [`SceneGraph`] by hand, loading one from JSON,
//! seeded random obstacle fields, routing every edge with a [`Router`],
//! and drawing the result as a character map.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use orthoroute_core::{Point, Rect};
use orthoroute_paths::{
    ConfigError, EdgeContext, ElbowConnector, RouteOutcome, Router, Scene, SceneGraph, ShapeId,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Extent of the area [`random_scene`] scatters obstacles over.
pub const FIELD_WIDTH: f64 = 1000.0;
pub const FIELD_HEIGHT: f64 = 600.0;

/// Clearance kept between random obstacles and the two endpoints.
const ENDPOINT_CLEARANCE: Rect = Rect::new(-24.0, -24.0, 48.0, 48.0);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors the demo reports before exiting.
#[derive(Debug)]
pub enum DemoError {
    /// The scene file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// The scene file is not a valid scene.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The router options are invalid.
    Config(ConfigError),
    /// The map cell size is not positive.
    InvalidCell(f64),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "invalid scene {}: {source}", path.display()),
            Self::Config(err) => write!(f, "{err}"),
            Self::InvalidCell(cell) => write!(f, "cell size must be positive, got {cell}"),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Config(err) => Some(err),
            Self::InvalidCell(_) => None,
        }
    }
}

impl From<ConfigError> for DemoError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// Two boxes joined by an edge, with two obstacles between them.
pub fn demo_scene() -> SceneGraph {
    let mut scene = SceneGraph::new();
    let hello = scene.add_vertex(Rect::new(50.0, 50.0, 140.0, 70.0));
    let world = scene.add_vertex(Rect::new(750.0, 450.0, 140.0, 70.0));
    scene.add_vertex(Rect::new(350.0, 150.0, 140.0, 80.0));
    scene.add_vertex(Rect::new(300.0, 50.0, 140.0, 80.0));
    scene.add_edge(hello, world);
    scene
}

/// A source on the left, a target on the right and up to `obstacles`
/// random boxes, reproducible from `seed`.
///
/// Boxes that would crowd either endpoint are redrawn; after a bounded
/// number of attempts the scene may hold fewer obstacles than requested.
pub fn random_scene(obstacles: usize, seed: u64) -> SceneGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = SceneGraph::new();

    let source_box = Rect::new(40.0, 270.0, 100.0, 60.0);
    let target_box = Rect::new(860.0, 270.0, 100.0, 60.0);
    let source = scene.add_vertex(source_box);
    let target = scene.add_vertex(target_box);

    let mut placed = 0;
    let mut attempts = 0;
    while placed < obstacles && attempts < obstacles * 20 {
        attempts += 1;
        let w = rng.random_range(30.0..120.0);
        let h = rng.random_range(30.0..120.0);
        let x = rng.random_range(0.0..FIELD_WIDTH - w);
        let y = rng.random_range(0.0..FIELD_HEIGHT - h);
        let obstacle = Rect::new(x, y, w, h);
        let crowded = obstacle.expanded(&ENDPOINT_CLEARANCE);
        if crowded.intersects(&source_box) || crowded.intersects(&target_box) {
            continue;
        }
        scene.add_vertex(obstacle);
        placed += 1;
    }
    log::debug!("random scene: {placed} obstacles after {attempts} attempts (seed {seed})");

    scene.add_edge(source, target);
    scene
}

/// Read a scene from a JSON file.
pub fn load_scene(path: &Path) -> Result<SceneGraph, DemoError> {
    let text = fs::read_to_string(path).map_err(|source| DemoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DemoError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// The result of routing one edge of a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutedEdge {
    pub edge: ShapeId,
    pub source: ShapeId,
    pub target: ShapeId,
    pub outcome: RouteOutcome,
    pub waypoints: Vec<Point>,
}

/// Route every edge of `scene`, each with a fresh context.
pub fn route_all(router: &Router, scene: &SceneGraph) -> Vec<RoutedEdge> {
    scene
        .edges()
        .map(|(edge, source, target)| {
            let mut waypoints = Vec::new();
            let mut ctx = EdgeContext::default();
            let outcome = router.route(
                scene,
                Some(source),
                Some(target),
                &[],
                &mut waypoints,
                &mut ctx,
                &ElbowConnector,
            );
            RoutedEdge {
                edge,
                source,
                target,
                outcome,
                waypoints,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text map
// ---------------------------------------------------------------------------

const BLANK: u8 = b' ';
const WALL: u8 = b'#';
const SOURCE: u8 = b'S';
const TARGET: u8 = b'T';
const ROUTE: u8 = b'*';

/// A character raster of a scene, `cell` scene units per character.
#[derive(Clone, Debug)]
pub struct AsciiMap {
    origin: Point,
    cell: f64,
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl AsciiMap {
    /// A blank map covering `bounds`.
    pub fn new(bounds: Rect, cell: f64) -> Result<Self, DemoError> {
        if !cell.is_finite() || cell <= 0.0 {
            return Err(DemoError::InvalidCell(cell));
        }
        let cols = (bounds.width.max(0.0) / cell).ceil() as usize + 1;
        let rows = (bounds.height.max(0.0) / cell).ceil() as usize + 1;
        Ok(Self {
            origin: bounds.origin(),
            cell,
            cols,
            rows,
            cells: vec![BLANK; cols * rows],
        })
    }

    /// Column and row of `p`, clamped to the map.
    fn cell_of(&self, p: Point) -> (usize, usize) {
        let index = |v: f64, max: usize| {
            (v / self.cell).round().clamp(0.0, (max - 1) as f64) as usize
        };
        (
            index(p.x - self.origin.x, self.cols),
            index(p.y - self.origin.y, self.rows),
        )
    }

    /// Character at `col`, `row`.
    pub fn get(&self, col: usize, row: usize) -> Option<u8> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    fn set(&mut self, col: usize, row: usize, c: u8) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = c;
        }
    }

    /// Fill the cells covered by `r`.
    pub fn fill(&mut self, r: Rect, c: u8) {
        let (c0, r0) = self.cell_of(r.origin());
        let (c1, r1) = self.cell_of(r.corner());
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.set(col, row, c);
            }
        }
    }

    /// Draw the border of `r` only.
    pub fn outline(&mut self, r: Rect, c: u8) {
        let (c0, r0) = self.cell_of(r.origin());
        let (c1, r1) = self.cell_of(r.corner());
        for col in c0..=c1 {
            self.set(col, r0, c);
            self.set(col, r1, c);
        }
        for row in r0..=r1 {
            self.set(c0, row, c);
            self.set(c1, row, c);
        }
    }

    /// Draw a polyline with `ROUTE`, horizontal leg first for any
    /// diagonal pair. Endpoint letters are kept.
    pub fn polyline(&mut self, points: &[Point]) {
        for pair in points.windows(2) {
            let (c0, r0) = self.cell_of(pair[0]);
            let (c1, r1) = self.cell_of(pair[1]);
            for col in c0.min(c1)..=c0.max(c1) {
                self.mark(col, r0);
            }
            for row in r0.min(r1)..=r0.max(r1) {
                self.mark(c1, row);
            }
        }
    }

    fn mark(&mut self, col: usize, row: usize) {
        if !matches!(self.get(col, row), Some(SOURCE | TARGET)) {
            self.set(col, row, ROUTE);
        }
    }
}

impl fmt::Display for AsciiMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.cells.chunks(self.cols) {
            let text = String::from_utf8_lossy(line);
            writeln!(f, "{}", text.trim_end())?;
        }
        Ok(())
    }
}

/// Smallest box holding every vertex of `scene` and every routed point,
/// grown by one `cell` on each side.
fn scene_bounds(scene: &SceneGraph, routes: &[RoutedEdge], cell: f64) -> Rect {
    let mut shapes = Vec::new();
    scene.vertices(&mut shapes);
    let boxes = shapes.iter().filter_map(|&s| scene.bounds(s));
    let points = routes.iter().flat_map(|r| r.waypoints.iter().copied());

    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    let mut grow = |p: Point| {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    };
    for b in boxes {
        grow(b.origin());
        grow(b.corner());
    }
    points.for_each(&mut grow);

    if min.x > max.x {
        return Rect::new(0.0, 0.0, 0.0, 0.0);
    }
    Rect::new(
        min.x - cell,
        min.y - cell,
        max.x - min.x + 2.0 * cell,
        max.y - min.y + 2.0 * cell,
    )
}

/// Draw `scene` with its routed edges: `#` for obstacles, `S` and `T` for
/// edge endpoints, `*` for routes. Shapes that contain other shapes are
/// drawn as outlines.
pub fn render(
    scene: &SceneGraph,
    routes: &[RoutedEdge],
    cell: f64,
) -> Result<AsciiMap, DemoError> {
    let mut map = AsciiMap::new(scene_bounds(scene, routes, cell), cell)?;

    let mut shapes = Vec::new();
    scene.vertices(&mut shapes);
    let containers: HashSet<ShapeId> = shapes.iter().filter_map(|&s| scene.parent(s)).collect();
    let sources: HashSet<ShapeId> = routes.iter().map(|r| r.source).collect();
    let targets: HashSet<ShapeId> = routes.iter().map(|r| r.target).collect();

    for &shape in &shapes {
        let Some(bounds) = scene.bounds(shape) else {
            continue;
        };
        if containers.contains(&shape) {
            map.outline(bounds, WALL);
        } else if sources.contains(&shape) {
            map.fill(bounds, SOURCE);
        } else if targets.contains(&shape) {
            map.fill(bounds, TARGET);
        } else {
            map.fill(bounds, WALL);
        }
    }

    for route in routes {
        let (Some(s), Some(t)) = (scene.bounds(route.source), scene.bounds(route.target)) else {
            continue;
        };
        let mut line = vec![s.center()];
        line.extend_from_slice(&route.waypoints);
        line.push(t.center());
        map.polyline(&line);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_routes_its_edge() {
        let scene = demo_scene();
        assert_eq!(scene.len(), 5);
        let routes = route_all(&Router::default(), &scene);
        assert_eq!(routes.len(), 1);
        assert!(routes[0].outcome.is_routed(), "{:?}", routes[0].outcome);
    }

    #[test]
    fn random_scene_is_reproducible() {
        let a = random_scene(15, 7);
        let b = random_scene(15, 7);
        assert_eq!(a.len(), b.len());
        for i in 0..a.len() {
            assert_eq!(a.get(ShapeId(i)), b.get(ShapeId(i)));
        }
        assert_eq!(a.edges().count(), 1);
    }

    #[test]
    fn random_obstacles_keep_clear_of_endpoints() {
        let scene = random_scene(40, 3);
        let mut shapes = Vec::new();
        scene.vertices(&mut shapes);
        let source = scene.bounds(shapes[0]).unwrap();
        let target = scene.bounds(shapes[1]).unwrap();
        for &s in &shapes[2..] {
            let b = scene.bounds(s).unwrap();
            assert!(!b.intersects(&source) && !b.intersects(&target));
            assert!(b.corner().x <= FIELD_WIDTH && b.corner().y <= FIELD_HEIGHT);
        }
    }

    #[test]
    fn render_marks_endpoints_obstacles_and_route() {
        let scene = demo_scene();
        let routes = route_all(&Router::default(), &scene);
        let text = render(&scene, &routes, 20.0).unwrap().to_string();
        for c in ['S', 'T', '#', '*'] {
            assert!(text.contains(c), "missing {c:?} in\n{text}");
        }
    }

    #[test]
    fn polyline_draws_both_legs() {
        let mut map = AsciiMap::new(Rect::new(0.0, 0.0, 40.0, 40.0), 10.0).unwrap();
        map.polyline(&[Point::new(0.0, 0.0), Point::new(40.0, 20.0)]);
        assert_eq!(map.get(2, 0), Some(b'*'));
        assert_eq!(map.get(4, 1), Some(b'*'));
        assert_eq!(map.get(0, 2), Some(b' '));
    }

    #[test]
    fn invalid_cell_is_rejected() {
        let err = AsciiMap::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0).unwrap_err();
        assert!(matches!(err, DemoError::InvalidCell(_)));
    }

    #[test]
    fn missing_scene_file_is_reported() {
        let err = load_scene(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(matches!(err, DemoError::Io { .. }));
        assert!(err.to_string().contains("scene.json"));
    }

    #[test]
    fn scene_json_loads() {
        let json = serde_json::to_string(&demo_scene()).unwrap();
        let path =
            std::env::temp_dir().join(format!("orthoroute-demo-{}.json", std::process::id()));
        fs::write(&path, json).unwrap();
        let scene = load_scene(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(scene.len(), 5);
        assert_eq!(scene.edges().count(), 1);
    }
}
