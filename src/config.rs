use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pathfinding::PathConfig;

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Static configuration of the spatial core.
///
/// All fields have defaults, so a JSON file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tile image width in pixels. Must be even.
    pub tile_width: u32,
    /// Tile image height in pixels. Must be even; each row advances half of it.
    pub tile_height: u32,
    /// Visible area in pixels, used to clamp scrolling.
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Width of a proximity cell in pixels (cells are half as tall). Must be even.
    pub proximity_cell_size: u32,
    /// Footprint radius for area traces; `None` traces a single point.
    pub trace_radius: Option<i32>,
    /// Nudge traces off single-pixel staircase seams.
    pub auto_slip: bool,
    /// Allow diagonal steps in pathfinding.
    pub diagonal: bool,
    /// Allow diagonal steps that squeeze past a solid tile.
    pub cut_corners: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_width:          64,
            tile_height:         32,
            viewport_width:      1280,
            viewport_height:     720,
            proximity_cell_size: 64,
            trace_radius:        None,
            auto_slip:           true,
            diagonal:            true,
            cut_corners:         true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let even = |v: u32| v > 0 && v % 2 == 0;
        if !even(self.tile_width) || !even(self.tile_height) {
            return Err(ConfigError::InvalidTileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if !even(self.proximity_cell_size) {
            return Err(ConfigError::InvalidCellSize(self.proximity_cell_size));
        }
        if let Some(radius) = self.trace_radius.filter(|&r| r <= 0) {
            return Err(ConfigError::InvalidTraceRadius(radius));
        }
        Ok(())
    }

    pub fn path_config(&self) -> PathConfig {
        PathConfig {
            diagonal: self.diagonal,
            cut_corners: self.cut_corners,
        }
    }
}
