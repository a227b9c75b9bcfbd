pub mod camera;
pub mod collision;
pub mod config;
pub mod coords;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod map;
pub mod pathfinding;
pub mod proximity;

pub use collision::{AreaTracer, LineTracer, Trace, Tracer};
pub use config::EngineConfig;
pub use coords::{IsoMapper, TileHit};
pub use engine::SpatialEngine;
pub use error::{ConfigError, EngineError, MapError};
pub use map::{HitTestTable, Layer, Tile, TileMap, TileProperties};
pub use pathfinding::{PathConfig, Pathfinder};
pub use proximity::ProximityTracker;
