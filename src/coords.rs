// =============================================================================
// COORDS.RS: Screen / world / tile conversions for a staggered isometric map
//
// World space is pixel space with the origin at the map's top-left corner.
// The map is an orthogonal grid whose odd rows are shifted right by half a
// tile, and every row advances half a tile height. Which tile a pixel belongs
// to is decided by the hit-test table, which knows whether the pixel falls
// inside the even diamond or one of the odd corners of its rectangle.
// =============================================================================

use glam::{IVec2, UVec2};

use crate::camera::Camera;
use crate::error::MapError;
use crate::map::{HitTestTable, PropertyValue, TileMap, TileProperty};

/// Result of a world → tile lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileHit {
    /// Column and row in the storage grid. Rows are even for even tiles and
    /// odd for half-offset tiles.
    pub tile: IVec2,
    /// Pixel steps that cannot leave `tile` (0..=127).
    pub edge_distance: u8,
}

/// Coordinate mapper and height-query primitive shared by the spatial core.
#[derive(Clone, Debug)]
pub struct IsoMapper {
    map: TileMap,
    hit_table: HitTestTable,
    camera: Camera,
    tile_size: IVec2,
    bounds: IVec2,
}

impl IsoMapper {
    /// The hit-test table must cover exactly one tile rectangle.
    pub fn new(map: TileMap, hit_table: HitTestTable, viewport: UVec2) -> Result<Self, MapError> {
        if hit_table.width() != map.tile_width() || hit_table.height() != map.tile_height() {
            return Err(MapError::HitTableSizeMismatch {
                actual_w: hit_table.width(),
                actual_h: hit_table.height(),
                tile_w: map.tile_width(),
                tile_h: map.tile_height(),
            });
        }
        let (world_w, world_h) = map.pixel_size();
        let bounds = UVec2::new(world_w, world_h);
        Ok(Self {
            tile_size: IVec2::new(map.tile_width() as i32, map.tile_height() as i32),
            bounds: bounds.as_ivec2(),
            camera: Camera::new(bounds, viewport),
            map,
            hit_table,
        })
    }

    pub fn map(&self) -> &TileMap { &self.map }
    pub fn hit_table(&self) -> &HitTestTable { &self.hit_table }
    pub fn camera(&self) -> &Camera { &self.camera }
    pub fn camera_mut(&mut self) -> &mut Camera { &mut self.camera }
    pub fn tile_size(&self) -> IVec2 { self.tile_size }

    /// World size in pixels; valid positions are `0..bounds` on each axis.
    pub fn world_bounds(&self) -> IVec2 { self.bounds }

    /// Storage grid size (columns, rows).
    pub fn grid_size(&self) -> IVec2 {
        IVec2::new(self.map.columns() as i32, self.map.rows() as i32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.bounds.x && y < self.bounds.y
    }

    /// Clamp a world point into the world rectangle.
    pub fn clamp_to_bounds(&self, p: IVec2) -> IVec2 {
        p.clamp(IVec2::ZERO, (self.bounds - IVec2::ONE).max(IVec2::ZERO))
    }

    /// Tile under a world pixel.
    ///
    /// Even tiles: `(x / W, (y / H) * 2)`. Odd tiles are shifted by half a
    /// tile on both axes: `((x - W/2) / W, ((y - H/2) / H) * 2 + 1)`.
    /// Divisions floor, so negative coordinates land on negative tiles.
    #[inline]
    pub fn world_to_tile(&self, x: i32, y: i32) -> TileHit {
        let (w, h) = (self.tile_size.x, self.tile_size.y);
        let sample = self.hit_table.lookup(x, y);
        let tile = if sample.odd {
            IVec2::new((x - w / 2).div_euclid(w), (y - h / 2).div_euclid(h) * 2 + 1)
        } else {
            IVec2::new(x.div_euclid(w), y.div_euclid(h) * 2)
        };
        TileHit { tile, edge_distance: sample.edge_distance }
    }

    /// World pixel at the centre of a tile.
    pub fn tile_to_world(&self, col: i32, row: i32) -> IVec2 {
        let (w, h) = (self.tile_size.x, self.tile_size.y);
        let stagger = if row.rem_euclid(2) == 1 { w / 2 } else { 0 };
        IVec2::new(col * w + stagger + w / 2, row * (h / 2) + h / 2)
    }

    #[inline]
    pub fn screen_to_world(&self, screen: IVec2) -> IVec2 {
        self.camera.screen_to_world(screen)
    }

    #[inline]
    pub fn world_to_screen(&self, world: IVec2) -> IVec2 {
        self.camera.world_to_screen(world)
    }

    pub fn screen_to_tile(&self, screen: IVec2) -> TileHit {
        let world = self.screen_to_world(screen);
        self.world_to_tile(world.x, world.y)
    }

    /// Clamp-scroll the view; see [`Camera::scroll_to`].
    pub fn scroll_to(&mut self, x: i32, y: i32) {
        self.camera.scroll_to(x, y);
    }

    /// First defined value of `property` on the tile under (x, y).
    pub fn tile_property_at(&self, property: TileProperty, x: i32, y: i32) -> Option<PropertyValue> {
        let hit = self.world_to_tile(x, y);
        self.map.property(property, hit.tile.x, hit.tile.y)
    }

    /// Obstruction height under (x, y); `None` means nothing is in the way.
    #[inline]
    pub fn height_at(&self, x: i32, y: i32) -> Option<f32> {
        let hit = self.world_to_tile(x, y);
        self.map.height(hit.tile.x, hit.tile.y)
    }

    /// Whether an agent with vertical clearance `h` cannot stand on (x, y).
    /// Off-world pixels always obstruct.
    #[inline]
    pub fn is_obstructed(&self, x: i32, y: i32, h: f32) -> bool {
        if !self.in_bounds(x, y) {
            return true;
        }
        self.height_at(x, y).is_some_and(|height| height > h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> IsoMapper {
        let map = TileMap::empty(10, 20, 64, 32).unwrap();
        let table = HitTestTable::diamond(64, 32).unwrap();
        IsoMapper::new(map, table, UVec2::new(320, 160)).unwrap()
    }

    #[test]
    fn diamond_centre_maps_to_even_tile() {
        let m = mapper();
        let hit = m.world_to_tile(64 + 32, 32 + 16);
        assert_eq!(hit.tile, IVec2::new(1, 2));
    }

    #[test]
    fn corner_maps_to_odd_tile() {
        let m = mapper();
        // Top-left corner of the rectangle at (1, 1) belongs to the odd tile above-left.
        let hit = m.world_to_tile(64, 32);
        assert_eq!(hit.tile, IVec2::new(0, 1));
        let hit = m.world_to_tile(127, 32);
        assert_eq!(hit.tile, IVec2::new(1, 1));
        let hit = m.world_to_tile(64, 63);
        assert_eq!(hit.tile, IVec2::new(0, 3));
    }

    #[test]
    fn mismatched_hit_table_is_rejected() {
        let map = TileMap::empty(4, 4, 64, 32).unwrap();
        let table = HitTestTable::diamond(32, 16).unwrap();
        assert!(IsoMapper::new(map, table, UVec2::new(100, 100)).is_err());
    }
}
