//! Route every edge of a scene and print the result as a text map.
//!
//! Run: cargo run --bin route-demo
//!      cargo run --bin route-demo -- --random 25 --seed 7
//!      cargo run --bin route-demo -- --scene my_scene.json --cell 10
//!
//! Set `RUST_LOG=debug` to see the router's decisions.

use std::path::PathBuf;

use clap::Parser;
use orthoroute_demos::{DemoError, demo_scene, load_scene, random_scene, render, route_all};
use orthoroute_paths::{FallbackReason, RouteOutcome, Router, RouterConfig};

/// Orthogonal edge routing demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene file (a serialized `SceneGraph`) to route instead of the
    /// built-in scene
    #[arg(long, conflicts_with = "random")]
    scene: Option<PathBuf>,

    /// Route across a random field with this many obstacles
    #[arg(long)]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Grid step of the search
    #[arg(long, default_value = "12")]
    step: f64,

    /// Search iteration budget per edge
    #[arg(long, default_value = "2000")]
    max_loops: usize,

    /// Scene units per character of the printed map
    #[arg(long, default_value = "20")]
    cell: f64,
}

fn describe(outcome: &RouteOutcome) -> String {
    match outcome {
        RouteOutcome::Routed { bends } => format!("routed, {bends} bends"),
        RouteOutcome::DragOverride => "drag override".to_string(),
        RouteOutcome::Fallback(FallbackReason::NoRoute(reason)) => format!("fallback: {reason}"),
        RouteOutcome::Fallback(reason) => format!("fallback: {reason:?}"),
    }
}

fn run(args: &Args) -> Result<(), DemoError> {
    let scene = match (&args.scene, args.random) {
        (Some(path), _) => load_scene(path)?,
        (None, Some(n)) => random_scene(n, args.seed),
        (None, None) => demo_scene(),
    };
    let router = Router::new(
        RouterConfig::default()
            .with_step(args.step)
            .with_maximum_loops(args.max_loops),
    )?;

    let routes = route_all(&router, &scene);
    for r in &routes {
        let points: Vec<String> = r.waypoints.iter().map(|p| p.to_string()).collect();
        println!(
            "edge {} ({} -> {}): {} [{}]",
            r.edge.0,
            r.source.0,
            r.target.0,
            describe(&r.outcome),
            points.join(", ")
        );
    }
    println!();
    print!("{}", render(&scene, &routes, args.cell)?);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
