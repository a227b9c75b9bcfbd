// Headless demo: a handful of agents wander a walled isometric map while one
// of them follows an A* route. Set RUST_LOG=debug for per-route logging.
//
// Usage: isoengine [config.json]

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::IVec2;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use isoengine::{EngineConfig, HitTestTable, Layer, SpatialEngine, TileMap, TileProperties};

const COLUMNS: u32 = 24;
const ROWS: u32 = 48;
const AGENTS: u32 = 32;
const FRAMES: u32 = 120;
const FLOOR: u32 = 1;
const WALL: u32 = 2;
const WALL_HEIGHT: f32 = 16.0;
const NEIGHBOR_RADIUS: i32 = 96;
const WALK_SPEED: i32 = 4;
const MAX_STEPS_PER_WAYPOINT: u32 = 64;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!(error = %err, "demo failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    let map = build_map(&config)?;
    let hit_table = HitTestTable::diamond(config.tile_width, config.tile_height)?;
    let mut engine: SpatialEngine<u32> = SpatialEngine::new(config, map, hit_table)?;

    let bounds = engine.mapper().world_bounds();
    let mut agents: HashMap<u32, (IVec2, IVec2)> = HashMap::new();
    for id in 0..AGENTS {
        let angle = id as f32 / AGENTS as f32 * TAU;
        let position = IVec2::new(bounds.x / 4 + (id as i32 * 37) % (bounds.x / 2), bounds.y / 4);
        let velocity = IVec2::new((angle.cos() * 6.0) as i32, (angle.sin() * 3.0) as i32);
        engine.register(id, position);
        agents.insert(id, (position, velocity));
    }

    for frame in 0..FRAMES {
        let mut blocked = 0;
        for (&id, (position, velocity)) in agents.iter_mut() {
            let trace = engine.test(*position, *velocity, 0.0);
            if !trace.is_clear() {
                blocked += 1;
                *velocity = -*velocity;
            }
            *position = trace.point;
            engine.track(id, *position);
        }

        if frame % 30 == 0 {
            let crowd: usize = agents
                .values()
                .map(|(p, _)| engine.find(p.x, p.y, NEIGHBOR_RADIUS, false).len())
                .sum();
            info!(frame, blocked, avg_neighbors = crowd as f32 / AGENTS as f32, "simulation step");
        }
    }

    let from = engine.mapper().tile_to_world(2, 2);
    let to = engine.mapper().tile_to_world(COLUMNS as i32 - 3, ROWS as i32 - 3);
    let waypoints = engine.waypoints(from, to, 0.0);
    info!(waypoints = waypoints.len(), "route planned");

    let mut position = from;
    let mut stalls = 0;
    for waypoint in &waypoints {
        for _ in 0..MAX_STEPS_PER_WAYPOINT {
            if position == *waypoint {
                break;
            }
            let delta = (*waypoint - position).clamp(IVec2::splat(-WALK_SPEED), IVec2::splat(WALK_SPEED));
            let trace = engine.test(position, delta, 0.0);
            if trace.point == position {
                stalls += 1;
                break;
            }
            position = trace.point;
        }
    }
    info!(x = position.x, y = position.y, stalls, "route walked");

    Ok(())
}

/// Walled map with an inner wall that has a single gap.
fn build_map(config: &EngineConfig) -> Result<TileMap, isoengine::MapError> {
    let mut gids = vec![FLOOR; (COLUMNS * ROWS) as usize];
    for row in 0..ROWS {
        for col in 0..COLUMNS {
            let border = col == 0 || row < 2 || col == COLUMNS - 1 || row >= ROWS - 2;
            let inner = row == ROWS / 2 && col != COLUMNS / 2;
            if border || inner {
                gids[(row * COLUMNS + col) as usize] = WALL;
            }
        }
    }

    let mut tileset = HashMap::new();
    tileset.insert(FLOOR, TileProperties::default());
    tileset.insert(WALL, TileProperties::with_height(WALL_HEIGHT));

    TileMap::new(
        COLUMNS,
        ROWS,
        config.tile_width,
        config.tile_height,
        tileset,
        vec![Layer::from_gids("ground", &gids)],
    )
}
