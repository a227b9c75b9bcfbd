use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use tracing::debug;

use crate::error::ConfigError;
use crate::geometry::{distance_squared, CARDINALS, DIAGONALS};

// =============================================================================
// A* PATHFINDING
// =============================================================================

const NO_NODE: u32 = u32::MAX;

/// Movement rules for [`Pathfinder`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PathConfig {
    /// Allow the four diagonal moves (cost √2) next to the cardinal ones (cost 1).
    pub diagonal: bool,
    /// Allow a diagonal move when one of the two tiles it squeezes between is solid.
    pub cut_corners: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self { diagonal: true, cut_corners: true }
    }
}

#[derive(Clone, Debug)]
struct Node {
    x: i32,
    y: i32,
    /// Cost from the start.
    g: f32,
    /// Estimate to the goal.
    h: f32,
    parent: u32,
    closed: bool,
    /// Solidity, asked once when the node is created.
    solid: bool,
}

/// Open-set entry; ordered so `BinaryHeap` pops the lowest `f` first.
#[derive(Copy, Clone, Debug)]
struct Open {
    f: f32,
    index: u32,
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; older nodes win ties for determinism.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// A* over a `width × height` tile grid.
///
/// Nodes live in an arena that is truncated, not freed, at the start of
/// every search. A dense slot grid maps (x, y) to arena indices and is
/// invalidated by bumping a search stamp, so repeated searches on the same
/// grid do not allocate once the buffers have grown.
///
/// Not re-entrant: one search at a time per instance.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    width: i32,
    height: i32,
    config: PathConfig,
    nodes: Vec<Node>,
    slots: Vec<u32>,
    stamps: Vec<u32>,
    stamp: u32,
    goal: (i32, i32),
    open: BinaryHeap<Open>,
    expanded: usize,
}

impl Pathfinder {
    pub fn new(width: i32, height: i32, config: PathConfig) -> Result<Self, ConfigError> {
        if width <= 0 || height <= 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        let cells = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            config,
            nodes: Vec::new(),
            slots: vec![NO_NODE; cells],
            stamps: vec![0; cells],
            stamp: 0,
            goal: (0, 0),
            open: BinaryHeap::new(),
            expanded: 0,
        })
    }

    pub fn width(&self) -> i32 { self.width }
    pub fn height(&self) -> i32 { self.height }
    pub fn config(&self) -> PathConfig { self.config }

    pub fn set_config(&mut self, config: PathConfig) {
        self.config = config;
    }

    /// Nodes closed by the last search.
    pub fn last_expanded(&self) -> usize {
        self.expanded
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Find a route from `from` to `to`.
    ///
    /// Returns the tiles from the goal back to the start, start excluded.
    /// An empty result means there is no route (or `from == to`, or an
    /// endpoint is off the grid, or the goal is solid). `solid` is asked at
    /// most once per tile per search.
    ///
    /// The heuristic is the squared Euclidean distance to the goal. It
    /// overestimates, which makes the search greedy and fast but can yield
    /// slightly longer paths than optimal when diagonals are enabled.
    pub fn route(
        &mut self,
        from: (i32, i32),
        to: (i32, i32),
        mut solid: impl FnMut(i32, i32) -> bool,
    ) -> Vec<(i32, i32)> {
        self.begin_search(to);

        if !self.in_bounds(from.0, from.1) || !self.in_bounds(to.0, to.1) {
            debug!(?from, ?to, "route endpoint off the grid");
            return Vec::new();
        }
        if from == to {
            return Vec::new();
        }

        let Some(goal) = self.node_at(to.0, to.1, &mut solid) else {
            return Vec::new();
        };
        if self.nodes[goal as usize].solid {
            debug!(?to, "route goal is solid");
            return Vec::new();
        }
        let Some(start) = self.node_at(from.0, from.1, &mut solid) else {
            return Vec::new();
        };

        let start_node = &mut self.nodes[start as usize];
        start_node.g = 0.0;
        let f = start_node.h;
        self.open.push(Open { f, index: start });

        while let Some(Open { index, .. }) = self.open.pop() {
            let current = &mut self.nodes[index as usize];
            if current.closed {
                continue;
            }
            current.closed = true;
            let (cx, cy, cg) = (current.x, current.y, current.g);
            self.expanded += 1;

            if index == goal {
                let path = self.trace_back(goal, start);
                debug!(?from, ?to, steps = path.len(), expanded = self.expanded, "route found");
                return path;
            }

            self.relax_neighbors(index, cx, cy, cg, &mut solid);
        }

        debug!(?from, ?to, expanded = self.expanded, "no route");
        Vec::new()
    }

    fn relax_neighbors(
        &mut self,
        index: u32,
        cx: i32,
        cy: i32,
        cg: f32,
        solid: &mut impl FnMut(i32, i32) -> bool,
    ) {
        for (dx, dy) in CARDINALS {
            self.relax(index, cx + dx, cy + dy, cg + 1.0, solid);
        }

        if !self.config.diagonal {
            return;
        }

        for (dx, dy) in DIAGONALS {
            if !self.config.cut_corners
                && (!self.passable(cx + dx, cy, solid) || !self.passable(cx, cy + dy, solid))
            {
                continue;
            }
            self.relax(index, cx + dx, cy + dy, cg + SQRT_2, solid);
        }
    }

    fn relax(&mut self, parent: u32, x: i32, y: i32, g: f32, solid: &mut impl FnMut(i32, i32) -> bool) {
        let Some(index) = self.node_at(x, y, solid) else {
            return;
        };
        let node = &mut self.nodes[index as usize];
        if node.solid || node.closed || g >= node.g {
            return;
        }
        node.g = g;
        node.parent = parent;
        let f = g + node.h;
        self.open.push(Open { f, index });
    }

    fn passable(&mut self, x: i32, y: i32, solid: &mut impl FnMut(i32, i32) -> bool) -> bool {
        self.node_at(x, y, solid)
            .is_some_and(|index| !self.nodes[index as usize].solid)
    }

    fn begin_search(&mut self, goal: (i32, i32)) {
        self.nodes.clear();
        self.open.clear();
        self.expanded = 0;
        self.goal = goal;
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            // Stamps wrapped: old entries could alias the new search.
            self.stamps.fill(0);
            self.stamp = 1;
        }
    }

    /// Arena index of the node at (x, y), creating it on first visit.
    fn node_at(&mut self, x: i32, y: i32, solid: &mut impl FnMut(i32, i32) -> bool) -> Option<u32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let slot = y as usize * self.width as usize + x as usize;
        if self.stamps[slot] == self.stamp {
            return Some(self.slots[slot]);
        }

        let index = self.nodes.len() as u32;
        self.nodes.push(Node {
            x,
            y,
            g: f32::INFINITY,
            h: distance_squared(x, y, self.goal.0, self.goal.1) as f32,
            parent: NO_NODE,
            closed: false,
            solid: solid(x, y),
        });
        self.slots[slot] = index;
        self.stamps[slot] = self.stamp;
        Some(index)
    }

    fn trace_back(&self, goal: u32, start: u32) -> Vec<(i32, i32)> {
        let mut path = Vec::new();
        let mut current = goal;
        while current != start && current != NO_NODE {
            let node = &self.nodes[current as usize];
            path.push((node.x, node.y));
            current = node.parent;
        }
        path
    }
}

/// Convenience for one-off searches: builds a [`Pathfinder`] and runs it once.
///
/// A grid with no cells has no route, so an empty `width` or `height` gives
/// an empty path, the same as an unreachable goal.
pub fn astar(
    start: (i32, i32),
    goal: (i32, i32),
    width: i32,
    height: i32,
    config: PathConfig,
    solid: impl FnMut(i32, i32) -> bool,
) -> Vec<(i32, i32)> {
    match Pathfinder::new(width, height, config) {
        Ok(mut finder) => finder.route(start, goal, solid),
        Err(err) => {
            debug!(error = %err, "no grid to search");
            Vec::new()
        }
    }
}
