#![deny(clippy::all, clippy::pedantic)]

use std::fs;

use anyhow::{Context, Result};
use physics::{Body, World};
use scene::Scene;

const DEFAULT_SCENE: &str = include_str!("../scenes/default.json");
const DEFAULT_STEPS: u32 = 600;
const REPORT_EVERY: u32 = 60;

/// `runtime_main [scene.json] [steps]`
fn parse_args(args: &[String]) -> Result<(Option<&str>, u32)> {
    let path = args.get(1).map(String::as_str);
    let steps = match args.get(2) {
        Some(raw) => raw.parse().with_context(|| format!("invalid step count {raw:?}"))?,
        None => DEFAULT_STEPS,
    };
    Ok((path, steps))
}

fn load_world(path: Option<&str>) -> Result<World> {
    let json = match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading scene {path}"))?,
        None => DEFAULT_SCENE.to_owned(),
    };
    Scene::from_str(&json)?.into_world()
}

fn report(world: &World) -> Result<()> {
    for index in 0..world.len() {
        let id = physics::EntityId(index);
        let name = world.name(id)?;
        match world.body(id)? {
            Some(Body::Rigid(body)) => tracing::info!(
                entity = name,
                position = ?body.position(),
                velocity = ?body.velocity(),
                "rigid body"
            ),
            Some(Body::Soft(body)) => tracing::info!(
                entity = name,
                nodes = body.nodes().len(),
                revision = body.render_mesh().map_or(0, physics::DeformableMesh::revision),
                "soft body"
            ),
            None => {}
        }
    }
    Ok(())
}

fn run(world: &mut World, steps: u32) -> Result<()> {
    let frame_dt = world.config().fixed_dt;
    tracing::info!(steps, dt = frame_dt, entities = world.len(), "starting simulation loop");

    for i in 0..steps {
        world.step(frame_dt);
        if (i + 1) % REPORT_EVERY == 0 {
            tracing::info!(step = i + 1, ticks = world.ticks(), "simulation progress");
            report(world)?;
        }
    }

    tracing::info!(ticks = world.ticks(), "simulation finished");
    report(world)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let (path, steps) = parse_args(&args)?;
    let mut world = load_world(path)?;
    run(&mut world, steps)
}
