use glam::IVec2;
use tracing::trace;

use crate::collision::Trace;
use crate::collision::line::{walk_route, LineTracer};
use crate::coords::IsoMapper;
use crate::error::ConfigError;
use crate::geometry::ellipse_outline;

/// Trace for agents with a footprint: an ellipse with half the horizontal
/// radius vertically, matching isometric foreshortening.
#[derive(Clone, Debug)]
pub struct AreaTracer {
    radius: i32,
    outline: Vec<IVec2>,
    line: LineTracer,
}

impl AreaTracer {
    pub fn new(radius: i32, auto_slip: bool) -> Result<Self, ConfigError> {
        if radius <= 0 {
            return Err(ConfigError::InvalidTraceRadius(radius));
        }
        Ok(Self {
            radius,
            outline: ellipse_outline(radius, (radius / 2).max(1)),
            line: LineTracer::new(auto_slip),
        })
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Sample offsets, relative to the agent's position.
    pub fn outline(&self) -> &[IVec2] {
        &self.outline
    }

    /// Whether every outline sample around `p` is passable.
    pub fn fits(&self, mapper: &IsoMapper, p: IVec2, h: f32) -> bool {
        self.outline
            .iter()
            .all(|o| !mapper.is_obstructed(p.x + o.x, p.y + o.y, h))
    }

    /// Line-trace the centre, then walk back along the recorded route until
    /// the whole ellipse fits. Pixels between accepted route positions are
    /// not re-validated. Auto-slip only gets a say when the direct sweep is
    /// cut short.
    pub fn test(&self, mapper: &IsoMapper, start: IVec2, delta: IVec2, h: f32) -> Trace {
        if delta == IVec2::ZERO {
            return Trace::clear(start);
        }

        let direct = self.sweep(mapper, start, delta, h);
        if let Some(trace) = direct.filter(|t| t.is_clear()) {
            return trace;
        }
        let slipped = self
            .line
            .slipped_origin(mapper, start, delta, h)
            .and_then(|origin| self.sweep(mapper, origin, delta, h));

        let best = match (direct, slipped) {
            (Some(d), Some(s)) => Some(if s.ratio > d.ratio { s } else { d }),
            (d, s) => d.or(s),
        };
        best.unwrap_or_else(|| {
            trace!(x = start.x, y = start.y, radius = self.radius, "area trace: no room to move");
            Trace {
                ratio: 0.0,
                point: mapper.clamp_to_bounds(start),
            }
        })
    }

    /// Furthest route position from `origin` where the ellipse fits, if any.
    fn sweep(&self, mapper: &IsoMapper, origin: IVec2, delta: IVec2, h: f32) -> Option<Trace> {
        let mut route = Vec::with_capacity(delta.x.abs().max(delta.y.abs()) as usize + 1);
        let walk = walk_route(mapper, origin, delta, h, |p| route.push(p));

        let (index, &p) = route
            .iter()
            .enumerate()
            .rev()
            .find(|(_, p)| self.fits(mapper, **p, h))?;
        let index = index as i32;
        if walk.completed && index == walk.last_clear {
            return Some(Trace::clear(p));
        }
        Some(Trace {
            ratio: walk.ratio_at(index),
            point: mapper.clamp_to_bounds(p),
        })
    }
}
