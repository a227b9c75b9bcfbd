// =============================================================================
// PROXIMITY.RS: Uniform spatial hash for radius queries over moving agents
//
// Cells are `cell_size` wide and `cell_size / 2` tall, so on the ground plane
// (world y doubled) every cell is square. Agents are bucketed by the cell of
// their last tracked position; queries only ever read those buckets.
// =============================================================================

use std::collections::HashMap;
use std::hash::Hash;

use glam::IVec2;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::geometry::iso_distance_squared;

/// 3×3 block of cell offsets used for radii up to one cell.
const NEIGHBORHOOD_3X3: [IVec2; 9] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(0, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// Cell offsets around a query cell for one radius.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellPattern {
    /// Cells entirely inside the radius wherever the query point sits in its cell.
    pub certain: Vec<IVec2>,
    /// Cells that straddle the radius; their agents are distance-tested.
    pub uncertain: Vec<IVec2>,
}

impl CellPattern {
    /// Classify cell offsets for `radius` pixels with square (ground-plane)
    /// cells of side `cell_size`.
    pub fn classify(radius: i32, cell_size: i32) -> Self {
        if radius <= cell_size {
            // Every corner of a 3×3 block can be in or out depending on where
            // the query point sits, so nothing is certain at this scale.
            return Self {
                certain: Vec::new(),
                uncertain: NEIGHBORHOOD_3X3.to_vec(),
            };
        }

        let r2 = radius as i64 * radius as i64;
        let c = cell_size as i64;
        let reach = radius / cell_size + 1;
        let mut pattern = Self::default();

        for oy in -reach..=reach {
            for ox in -reach..=reach {
                let (ax, ay) = (ox.unsigned_abs() as i64, oy.unsigned_abs() as i64);
                let far_x = (ax + 1) * c - 1;
                let far_y = (ay + 1) * c - 1;
                let near_x = if ax == 0 { 0 } else { (ax - 1) * c + 1 };
                let near_y = if ay == 0 { 0 } else { (ay - 1) * c + 1 };

                if far_x * far_x + far_y * far_y <= r2 {
                    pattern.certain.push(IVec2::new(ox, oy));
                } else if near_x * near_x + near_y * near_y <= r2 {
                    pattern.uncertain.push(IVec2::new(ox, oy));
                }
            }
        }
        pattern
    }
}

#[derive(Copy, Clone, Debug)]
struct Membership {
    position: IVec2,
    slot: usize,
}

/// Spatial hash over agent keys.
///
/// Callers must [`track`](Self::track) an agent whenever it moves; queries
/// see each agent at its last tracked position.
#[derive(Clone, Debug)]
pub struct ProximityTracker<K> {
    cell_size: i32,
    columns: i32,
    rows: i32,
    bounds: IVec2,
    /// `columns * rows` grid cells followed by one bucket for agents
    /// outside the world.
    cells: Vec<Vec<K>>,
    agents: HashMap<K, Membership>,
    patterns: HashMap<i32, CellPattern>,
}

impl<K: Copy + Eq + Hash> ProximityTracker<K> {
    /// Tracker covering `0..bounds` world pixels. `cell_size` must be
    /// positive and even (cells are half as tall as they are wide).
    pub fn new(bounds: IVec2, cell_size: u32) -> Result<Self, ConfigError> {
        if cell_size == 0 || cell_size % 2 != 0 {
            return Err(ConfigError::InvalidCellSize(cell_size));
        }
        let cell = cell_size as i32;
        let columns = ((bounds.x + cell - 1) / cell).max(1);
        let rows = ((bounds.y + cell / 2 - 1) / (cell / 2)).max(1);
        let count = columns as usize * rows as usize;

        Ok(Self {
            cell_size: cell,
            columns,
            rows,
            bounds,
            cells: vec![Vec::new(); count + 1],
            agents: HashMap::new(),
            patterns: HashMap::new(),
        })
    }

    pub fn cell_size(&self) -> i32 { self.cell_size }
    pub fn grid_size(&self) -> IVec2 { IVec2::new(self.columns, self.rows) }
    pub fn len(&self) -> usize { self.agents.len() }
    pub fn is_empty(&self) -> bool { self.agents.is_empty() }

    pub fn contains(&self, key: K) -> bool {
        self.agents.contains_key(&key)
    }

    /// Last tracked position of `key`.
    pub fn position(&self, key: K) -> Option<IVec2> {
        self.agents.get(&key).map(|m| m.position)
    }

    /// Grid cell `key` is filed under; `None` when unknown or off-world.
    pub fn cell_of(&self, key: K) -> Option<IVec2> {
        let slot = self.agents.get(&key)?.slot;
        self.slot_to_cell(slot)
    }

    /// Grid cell containing a world position; `None` off-world.
    pub fn cell_at(&self, position: IVec2) -> Option<IVec2> {
        self.slot_to_cell(self.slot_for(position))
    }

    /// Number of agents filed under a grid cell.
    pub fn cell_population(&self, cell: IVec2) -> usize {
        self.cell_slot(cell).map_or(0, |slot| self.cells[slot].len())
    }

    /// Insert `key` at `position`. Re-registering a known key tracks it.
    pub fn register(&mut self, key: K, position: IVec2) {
        if self.agents.contains_key(&key) {
            self.track(key, position);
            return;
        }
        let slot = self.slot_for(position);
        self.cells[slot].push(key);
        self.agents.insert(key, Membership { position, slot });
    }

    /// Remove `key`. Returns false when it was not registered.
    pub fn unregister(&mut self, key: K) -> bool {
        match self.agents.remove(&key) {
            Some(membership) => {
                remove_from(&mut self.cells[membership.slot], key);
                true
            }
            None => false,
        }
    }

    /// Record a new position for `key` and refile it if its cell changed.
    /// Returns whether the cell changed; unknown keys are ignored.
    pub fn track(&mut self, key: K, position: IVec2) -> bool {
        let slot = self.slot_for(position);
        let Some(membership) = self.agents.get_mut(&key) else {
            return false;
        };
        membership.position = position;
        if membership.slot == slot {
            return false;
        }
        let old = std::mem::replace(&mut membership.slot, slot);
        remove_from(&mut self.cells[old], key);
        self.cells[slot].push(key);
        trace!(from = old, to = slot, "proximity: agent changed cell");
        true
    }

    /// Agents within `radius` (ground-plane distance) of (x, y).
    pub fn find(&mut self, x: i32, y: i32, radius: i32, sort: bool) -> Vec<K> {
        let mut out = Vec::new();
        self.find_into(x, y, radius, sort, &mut out);
        out
    }

    /// Like [`find`](Self::find) but appends into a caller-owned buffer,
    /// which is cleared first.
    pub fn find_into(&mut self, x: i32, y: i32, radius: i32, sort: bool, out: &mut Vec<K>) {
        out.clear();
        if radius < 0 || !self.in_bounds(x, y) {
            return;
        }

        let cell_size = self.cell_size;
        let pattern = self.patterns.entry(radius).or_insert_with(|| {
            debug!(radius, cell_size, "proximity: caching cell pattern");
            CellPattern::classify(radius, cell_size)
        });

        let origin = IVec2::new(x.div_euclid(cell_size), y.div_euclid(cell_size / 2));
        let r2 = radius as i64 * radius as i64;
        let within = |key: &K| {
            self.agents
                .get(key)
                .is_some_and(|m| iso_distance_squared(m.position.x - x, m.position.y - y) <= r2)
        };

        for &offset in &pattern.certain {
            let cell = origin + offset;
            if let Some(slot) = grid_slot(cell, self.columns, self.rows) {
                out.extend_from_slice(&self.cells[slot]);
            }
        }
        for &offset in &pattern.uncertain {
            let cell = origin + offset;
            if let Some(slot) = grid_slot(cell, self.columns, self.rows) {
                out.extend(self.cells[slot].iter().copied().filter(|k| within(k)));
            }
        }
        let outside = self.cells.len() - 1;
        out.extend(self.cells[outside].iter().copied().filter(|k| within(k)));

        if sort {
            out.sort_by_cached_key(|key| {
                self.agents
                    .get(key)
                    .map_or(i64::MAX, |m| iso_distance_squared(m.position.x - x, m.position.y - y))
            });
        }
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.bounds.x && y < self.bounds.y
    }

    fn slot_for(&self, position: IVec2) -> usize {
        if !self.in_bounds(position.x, position.y) {
            return self.cells.len() - 1;
        }
        let cell = IVec2::new(position.x / self.cell_size, position.y / (self.cell_size / 2));
        grid_slot(cell, self.columns, self.rows).unwrap_or(self.cells.len() - 1)
    }

    fn cell_slot(&self, cell: IVec2) -> Option<usize> {
        grid_slot(cell, self.columns, self.rows)
    }

    fn slot_to_cell(&self, slot: usize) -> Option<IVec2> {
        (slot < self.cells.len() - 1).then(|| {
            let slot = slot as i32;
            IVec2::new(slot % self.columns, slot / self.columns)
        })
    }
}

#[inline]
fn grid_slot(cell: IVec2, columns: i32, rows: i32) -> Option<usize> {
    if cell.x < 0 || cell.y < 0 || cell.x >= columns || cell.y >= rows {
        return None;
    }
    Some(cell.y as usize * columns as usize + cell.x as usize)
}

fn remove_from<K: PartialEq>(bucket: &mut Vec<K>, key: K) {
    if let Some(index) = bucket.iter().position(|k| *k == key) {
        bucket.swap_remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_radius_uses_3x3_block() {
        let pattern = CellPattern::classify(10, 32);
        assert!(pattern.certain.is_empty());
        assert_eq!(pattern.uncertain.len(), 9);
    }

    #[test]
    fn large_radius_has_certain_core() {
        let pattern = CellPattern::classify(200, 32);
        assert!(pattern.certain.contains(&IVec2::ZERO));
        assert!(!pattern.uncertain.contains(&IVec2::ZERO));
        // Corners of the scanned square are beyond reach.
        let reach = 200 / 32 + 1;
        assert!(!pattern.certain.contains(&IVec2::new(reach, reach)));
        assert!(!pattern.uncertain.contains(&IVec2::new(reach, reach)));
    }
}
