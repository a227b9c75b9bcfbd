//! Tile layers and their typed property bags.
//!
//! The map is stored as an orthogonal `columns × rows` grid in which odd rows
//! are shifted right by half a tile. Each tile row occupies half a tile's
//! height in world space, so a map is `columns * tile_width` pixels wide and
//! `rows * tile_height / 2` pixels tall.


use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

pub use hit_test::{HitSample, HitTestTable};

// ── Properties ──────────────────────────────────────────────────────────────

/// Per-tile properties. `None` means "not defined here"; lookups fall back
/// from the tile instance to the tileset default, then to the next layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileProperties {
    /// Vertical clearance needed to stand on this tile.
    pub height: Option<f32>,
    /// Hard block for navigation, independent of height.
    pub solid: Option<bool>,
}

impl TileProperties {
    pub fn with_height(height: f32) -> Self {
        Self { height: Some(height), ..Self::default() }
    }

    pub fn solid() -> Self {
        Self { solid: Some(true), ..Self::default() }
    }

    pub fn get(&self, property: TileProperty) -> Option<PropertyValue> {
        match property {
            TileProperty::Height => self.height.map(PropertyValue::Height),
            TileProperty::Solid => self.solid.map(PropertyValue::Solid),
        }
    }
}

/// Key for dynamic property lookups.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileProperty {
    Height,
    Solid,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Height(f32),
    Solid(bool),
}

// ── Tiles and layers ────────────────────────────────────────────────────────

/// A placed tile: tileset id plus instance overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub gid: u32,
    #[serde(default)]
    pub properties: TileProperties,
}

impl Tile {
    pub fn new(gid: u32) -> Self {
        Self { gid, properties: TileProperties::default() }
    }

    pub fn with_properties(gid: u32, properties: TileProperties) -> Self {
        Self { gid, properties }
    }
}

/// One row-major layer of optional tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub tiles: Vec<Option<Tile>>,
}

impl Layer {
    /// Layer with every slot empty.
    pub fn empty(name: impl Into<String>, columns: u32, rows: u32) -> Self {
        Self {
            name: name.into(),
            tiles: vec![None; columns as usize * rows as usize],
        }
    }

    /// Build a layer from raw tileset ids, `0` meaning "no tile" (the Tiled
    /// convention).
    pub fn from_gids(name: impl Into<String>, gids: &[u32]) -> Self {
        Self {
            name: name.into(),
            tiles: gids
                .iter()
                .map(|&gid| (gid != 0).then(|| Tile::new(gid)))
                .collect(),
        }
    }
}

// ── TileMap ─────────────────────────────────────────────────────────────────

/// Layered staggered-isometric tile map. Layer 0 is the ground layer.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    tileset: HashMap<u32, TileProperties>,
    layers: Vec<Layer>,
}

#[derive(Deserialize)]
struct RawMap {
    columns: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    #[serde(default)]
    tileset: HashMap<u32, TileProperties>,
    #[serde(default)]
    layers: Vec<Layer>,
}

impl TileMap {
    pub fn new(
        columns: u32,
        rows: u32,
        tile_width: u32,
        tile_height: u32,
        tileset: HashMap<u32, TileProperties>,
        layers: Vec<Layer>,
    ) -> Result<Self, MapError> {
        if columns == 0 || rows == 0 {
            return Err(MapError::EmptyMap { columns, rows });
        }
        let mut map = Self {
            columns,
            rows,
            tile_width,
            tile_height,
            tileset,
            layers: Vec::with_capacity(layers.len()),
        };
        for layer in layers {
            map.push_layer(layer)?;
        }
        Ok(map)
    }

    /// Map with a single empty ground layer.
    pub fn empty(columns: u32, rows: u32, tile_width: u32, tile_height: u32) -> Result<Self, MapError> {
        Self::new(
            columns,
            rows,
            tile_width,
            tile_height,
            HashMap::new(),
            vec![Layer::empty("ground", columns, rows)],
        )
    }

    /// Deserialise a map from JSON.
    ///
    /// ```json
    /// { "columns": 2, "rows": 2, "tile_width": 64, "tile_height": 32,
    ///   "tileset": { "1": { "height": 2.0 } },
    ///   "layers": [ { "name": "ground", "tiles": [ {"gid": 1}, null, null, null ] } ] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let raw: RawMap = serde_json::from_str(json)?;
        Self::new(raw.columns, raw.rows, raw.tile_width, raw.tile_height, raw.tileset, raw.layers)
    }

    pub fn push_layer(&mut self, layer: Layer) -> Result<(), MapError> {
        let expected = self.tile_count();
        if layer.tiles.len() != expected {
            return Err(MapError::LayerSizeMismatch {
                layer: layer.name,
                expected,
                actual: layer.tiles.len(),
            });
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn columns(&self) -> u32 { self.columns }
    pub fn rows(&self) -> u32 { self.rows }
    pub fn tile_width(&self) -> u32 { self.tile_width }
    pub fn tile_height(&self) -> u32 { self.tile_height }
    pub fn layers(&self) -> &[Layer] { &self.layers }

    pub fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// World size in pixels. Each row covers half a tile height.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.columns * self.tile_width, self.rows * self.tile_height / 2)
    }

    pub fn index_of(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as u32 >= self.columns || row as u32 >= self.rows {
            return None;
        }
        Some(row as usize * self.columns as usize + col as usize)
    }

    /// Set the tileset default for `gid`.
    pub fn set_default(&mut self, gid: u32, properties: TileProperties) {
        self.tileset.insert(gid, properties);
    }

    /// Place (or clear) a tile. Returns false when the layer or cell does not exist.
    pub fn set_tile(&mut self, layer: usize, col: i32, row: i32, tile: Option<Tile>) -> bool {
        let Some(index) = self.index_of(col, row) else {
            return false;
        };
        match self.layers.get_mut(layer) {
            Some(layer) => {
                layer.tiles[index] = tile;
                true
            }
            None => false,
        }
    }

    pub fn tile(&self, layer: usize, col: i32, row: i32) -> Option<&Tile> {
        let index = self.index_of(col, row)?;
        self.layers.get(layer)?.tiles.get(index)?.as_ref()
    }

    /// Resolve a property on tile (col, row): layers are walked top to
    /// bottom, and on each occupied slot the instance value wins over the
    /// tileset default. The first defined value is returned.
    pub fn resolve<T>(
        &self,
        col: i32,
        row: i32,
        pick: impl Fn(&TileProperties) -> Option<T>,
    ) -> Option<T> {
        let index = self.index_of(col, row)?;
        self.layers.iter().rev().find_map(|layer| {
            let tile = layer.tiles.get(index)?.as_ref()?;
            pick(&tile.properties).or_else(|| self.tileset.get(&tile.gid).and_then(|p| pick(p)))
        })
    }

    pub fn property(&self, property: TileProperty, col: i32, row: i32) -> Option<PropertyValue> {
        self.resolve(col, row, |p| p.get(property))
    }

    pub fn height(&self, col: i32, row: i32) -> Option<f32> {
        self.resolve(col, row, |p| p.height)
    }

    /// Properties of the ground layer only, with the same override order.
    pub fn ground<T>(&self, col: i32, row: i32, pick: impl Fn(&TileProperties) -> Option<T>) -> Option<T> {
        let tile = self.tile(0, col, row)?;
        pick(&tile.properties).or_else(|| self.tileset.get(&tile.gid).and_then(|p| pick(p)))
    }

    pub fn ground_height(&self, col: i32, row: i32) -> Option<f32> {
        self.ground(col, row, |p| p.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_overrides_tileset_default() {
        let mut map = TileMap::empty(2, 2, 64, 32).unwrap();
        map.set_default(1, TileProperties::with_height(5.0));
        map.set_tile(0, 0, 0, Some(Tile::new(1)));
        map.set_tile(0, 1, 0, Some(Tile::with_properties(1, TileProperties::with_height(1.0))));
        assert_eq!(map.height(0, 0), Some(5.0));
        assert_eq!(map.height(1, 0), Some(1.0));
        assert_eq!(map.height(0, 1), None);
    }

    #[test]
    fn upper_layer_wins_only_when_defined() {
        let mut map = TileMap::empty(1, 1, 64, 32).unwrap();
        map.push_layer(Layer::empty("decor", 1, 1)).unwrap();
        map.set_tile(0, 0, 0, Some(Tile::with_properties(1, TileProperties::with_height(2.0))));
        map.set_tile(1, 0, 0, Some(Tile::with_properties(2, TileProperties::solid())));
        // Decor tile has no height, so the ground value shows through.
        assert_eq!(map.height(0, 0), Some(2.0));
        assert_eq!(map.ground_height(0, 0), Some(2.0));
        assert_eq!(map.ground(0, 0, |p| p.solid), None);
        assert_eq!(map.property(TileProperty::Solid, 0, 0), Some(PropertyValue::Solid(true)));
    }

    #[test]
    fn layer_size_is_checked() {
        let mut map = TileMap::empty(2, 2, 64, 32).unwrap();
        let err = map.push_layer(Layer::empty("bad", 3, 3));
        assert!(matches!(err, Err(MapError::LayerSizeMismatch { expected: 4, actual: 9, .. })));
    }
}
