use glam::IVec2;

use crate::collision::Trace;
use crate::collision::slip::auto_slip;
use crate::coords::IsoMapper;
use crate::geometry::walk_line;

/// Point trace along a Bresenham line.
#[derive(Copy, Clone, Debug)]
pub struct LineTracer {
    auto_slip: bool,
}

impl Default for LineTracer {
    fn default() -> Self {
        Self { auto_slip: true }
    }
}

/// Result of walking a rasterised line until it hits something.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Walk {
    /// Number of Bresenham steps from origin to target.
    pub steps: i32,
    /// Index of the last clear pixel (0 is the origin).
    pub last_clear: i32,
    pub stop: IVec2,
    pub completed: bool,
}

impl Walk {
    /// Share of the path's pixels, origin included, that were clear.
    pub fn ratio_at(&self, index: i32) -> f32 {
        (index + 1) as f32 / (self.steps + 1) as f32
    }
}

impl LineTracer {
    pub fn new(auto_slip: bool) -> Self {
        Self { auto_slip }
    }

    pub fn auto_slip(&self) -> bool {
        self.auto_slip
    }

    /// Trace `delta` from `start`. The first pixel is assumed clear, so a
    /// stationary agent is never blocked by the tile it stands on.
    ///
    /// With auto-slip on, a blocked trace is retried from the nudged start
    /// and the further of the two wins. A clear path is never nudged.
    pub fn test(&self, mapper: &IsoMapper, start: IVec2, delta: IVec2, h: f32) -> Trace {
        if delta == IVec2::ZERO {
            return Trace::clear(start);
        }

        let direct = trace_from(mapper, start, delta, h);
        if direct.is_clear() {
            return direct;
        }
        match self.slipped_origin(mapper, start, delta, h) {
            Some(origin) => {
                let slipped = trace_from(mapper, origin, delta, h);
                if slipped.ratio > direct.ratio { slipped } else { direct }
            }
            None => direct,
        }
    }

    /// Start point after the seam correction, if it moved.
    pub(crate) fn slipped_origin(&self, mapper: &IsoMapper, start: IVec2, delta: IVec2, h: f32) -> Option<IVec2> {
        if !self.auto_slip {
            return None;
        }
        let origin = auto_slip(start, delta, |x, y| mapper.is_obstructed(x, y, h));
        (origin != start).then_some(origin)
    }
}

fn trace_from(mapper: &IsoMapper, origin: IVec2, delta: IVec2, h: f32) -> Trace {
    if fits_in_tile(mapper, origin, delta, h) {
        return Trace::clear(origin + delta);
    }

    let walk = walk_route(mapper, origin, delta, h, |_| {});
    if walk.completed {
        Trace::clear(walk.stop)
    } else {
        Trace {
            ratio: walk.ratio_at(walk.last_clear),
            point: mapper.clamp_to_bounds(walk.stop),
        }
    }
}

/// Cheap rejection: a move shorter than the origin's edge distance stays on
/// the origin's tile, so if that tile is passable and both ends are inside
/// the world the whole line is clear.
fn fits_in_tile(mapper: &IsoMapper, origin: IVec2, delta: IVec2, h: f32) -> bool {
    let steps = delta.x.abs().max(delta.y.abs());
    let end = origin + delta;
    if !mapper.in_bounds(origin.x, origin.y) || !mapper.in_bounds(end.x, end.y) {
        return false;
    }
    let hit = mapper.world_to_tile(origin.x, origin.y);
    steps <= hit.edge_distance as i32 && !mapper.is_obstructed(origin.x, origin.y, h)
}

/// Walk the line from `origin` to `origin + delta`, handing every clear
/// pixel (origin first) to `visit`, and stop before the first obstructed one.
pub(crate) fn walk_route(
    mapper: &IsoMapper,
    origin: IVec2,
    delta: IVec2,
    h: f32,
    mut visit: impl FnMut(IVec2),
) -> Walk {
    let end = origin + delta;
    let mut index = 0;
    let mut stop = origin;

    let completed = walk_line(origin.x, origin.y, end.x, end.y, |x, y| {
        if index > 0 && mapper.is_obstructed(x, y, h) {
            return false;
        }
        stop = IVec2::new(x, y);
        visit(stop);
        index += 1;
        true
    });

    Walk {
        steps: delta.x.abs().max(delta.y.abs()),
        last_clear: index - 1,
        stop,
        completed,
    }
}
