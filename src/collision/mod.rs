//! Movement traces against the height map.
//!
//! A trace answers "how far can an agent get from `start` along `delta`
//! with vertical clearance `h`?". Leaving the world counts the same as
//! hitting a tile that is too high.

mod area;
mod line;
pub mod slip;

use glam::IVec2;

use crate::coords::IsoMapper;

pub use area::AreaTracer;
pub use line::LineTracer;

/// Outcome of a trace.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trace {
    /// 1.0 when the full displacement was possible, less when stopped early.
    pub ratio: f32,
    /// Where the agent ends up.
    pub point: IVec2,
}

impl Trace {
    pub fn clear(point: IVec2) -> Self {
        Self { ratio: 1.0, point }
    }

    pub fn is_clear(&self) -> bool {
        self.ratio >= 1.0
    }
}

/// Either tracer, picked once from configuration.
#[derive(Clone, Debug)]
pub enum Tracer {
    Line(LineTracer),
    Area(AreaTracer),
}

impl Tracer {
    pub fn test(&self, mapper: &IsoMapper, start: IVec2, delta: IVec2, h: f32) -> Trace {
        match self {
            Tracer::Line(tracer) => tracer.test(mapper, start, delta, h),
            Tracer::Area(tracer) => tracer.test(mapper, start, delta, h),
        }
    }
}
