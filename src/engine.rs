use std::hash::Hash;

use glam::{IVec2, UVec2};
use tracing::info;

use crate::collision::{AreaTracer, LineTracer, Trace, Tracer};
use crate::config::EngineConfig;
use crate::coords::IsoMapper;
use crate::error::{EngineError, MapError};
use crate::map::{HitTestTable, TileMap};
use crate::pathfinding::Pathfinder;
use crate::proximity::ProximityTracker;

// ── SpatialEngine ───────────────────────────────────────────────────────────

/// The spatial core wired together: one mapper shared by the tracer, the
/// proximity tracker and the pathfinder.
///
/// Everything runs synchronously on the caller's frame. Agents are
/// identified by `K` (an entity id, typically).
pub struct SpatialEngine<K = u32> {
    config: EngineConfig,
    mapper: IsoMapper,
    tracer: Tracer,
    tracker: ProximityTracker<K>,
    pathfinder: Pathfinder,
}

impl<K: Copy + Eq + Hash> SpatialEngine<K> {
    /// Validate `config` against the map and build every component.
    pub fn new(config: EngineConfig, map: TileMap, hit_table: HitTestTable) -> Result<Self, EngineError> {
        config.validate()?;
        if map.tile_width() != config.tile_width || map.tile_height() != config.tile_height {
            return Err(MapError::TileSizeMismatch {
                map_w: map.tile_width(),
                map_h: map.tile_height(),
                config_w: config.tile_width,
                config_h: config.tile_height,
            }
            .into());
        }

        let viewport = UVec2::new(config.viewport_width, config.viewport_height);
        let mapper = IsoMapper::new(map, hit_table, viewport)?;
        let tracer = match config.trace_radius {
            Some(radius) => Tracer::Area(AreaTracer::new(radius, config.auto_slip)?),
            None => Tracer::Line(LineTracer::new(config.auto_slip)),
        };
        let tracker = ProximityTracker::new(mapper.world_bounds(), config.proximity_cell_size)?;
        let grid = mapper.grid_size();
        let pathfinder = Pathfinder::new(grid.x, grid.y, config.path_config())?;

        info!(
            columns = grid.x,
            rows = grid.y,
            world_w = mapper.world_bounds().x,
            world_h = mapper.world_bounds().y,
            trace_radius = ?config.trace_radius,
            "spatial engine ready"
        );

        Ok(Self { config, mapper, tracer, tracker, pathfinder })
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn mapper(&self) -> &IsoMapper { &self.mapper }
    pub fn mapper_mut(&mut self) -> &mut IsoMapper { &mut self.mapper }
    pub fn tracer(&self) -> &Tracer { &self.tracer }
    pub fn tracker(&self) -> &ProximityTracker<K> { &self.tracker }
    pub fn pathfinder(&self) -> &Pathfinder { &self.pathfinder }

    pub fn scroll_to(&mut self, x: i32, y: i32) {
        self.mapper.scroll_to(x, y);
    }

    // ── Collision ───────────────────────────────────────────────────────────

    /// How far an agent with clearance `h` gets from `start` along `delta`.
    pub fn test(&self, start: IVec2, delta: IVec2, h: f32) -> Trace {
        self.tracer.test(&self.mapper, start, delta, h)
    }

    // ── Proximity ───────────────────────────────────────────────────────────

    pub fn register(&mut self, agent: K, position: IVec2) {
        self.tracker.register(agent, position);
    }

    pub fn unregister(&mut self, agent: K) -> bool {
        self.tracker.unregister(agent)
    }

    pub fn track(&mut self, agent: K, position: IVec2) -> bool {
        self.tracker.track(agent, position)
    }

    pub fn find(&mut self, x: i32, y: i32, radius: i32, sort: bool) -> Vec<K> {
        self.tracker.find(x, y, radius, sort)
    }

    // ── Pathfinding ─────────────────────────────────────────────────────────

    /// Route over the ground layer for an agent with clearance `clearance`:
    /// tiles taller than that, or marked solid, are impassable.
    pub fn route(&mut self, from: (i32, i32), to: (i32, i32), clearance: f32) -> Vec<(i32, i32)> {
        let map = self.mapper.map();
        self.pathfinder.route(from, to, |x, y| ground_blocks(map, x, y, clearance))
    }

    /// Route with a caller-supplied solidity predicate.
    pub fn route_with(
        &mut self,
        from: (i32, i32),
        to: (i32, i32),
        solid: impl FnMut(i32, i32) -> bool,
    ) -> Vec<(i32, i32)> {
        self.pathfinder.route(from, to, solid)
    }

    /// Route between two world positions and return tile centres in walking
    /// order (first waypoint after the start tile, goal last).
    pub fn waypoints(&mut self, from: IVec2, to: IVec2, clearance: f32) -> Vec<IVec2> {
        let start = self.mapper.world_to_tile(from.x, from.y).tile;
        let goal = self.mapper.world_to_tile(to.x, to.y).tile;
        let mut tiles = self.route((start.x, start.y), (goal.x, goal.y), clearance);
        tiles.reverse();
        tiles
            .into_iter()
            .map(|(col, row)| self.mapper.tile_to_world(col, row))
            .collect()
    }
}

fn ground_blocks(map: &TileMap, col: i32, row: i32, clearance: f32) -> bool {
    map.ground(col, row, |p| p.solid) == Some(true)
        || map.ground_height(col, row).is_some_and(|h| h > clearance)
}
