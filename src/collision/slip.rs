//! Auto-slip: nudging a trace off single-pixel staircase seams.
//!
//! Diagonal walls on an isometric map rasterise into 2:1 pixel staircases.
//! An agent sliding along such a wall keeps catching on the individual
//! steps. Before a near-diagonal trace, the pixels around the start point
//! are compared against known seam shapes and, on a match, the start is
//! moved one pixel vertically.
//!
//! Everything here works in the *motion frame*: offsets are mirrored so the
//! movement always points toward +x / +y (east / south).

use std::ops::BitOr;

use glam::IVec2;

/// Neighbour of a pixel, in the motion frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub fn offset(self) -> IVec2 {
        match self {
            Direction::N => IVec2::new(0, -1),
            Direction::NE => IVec2::new(1, -1),
            Direction::E => IVec2::new(1, 0),
            Direction::SE => IVec2::new(1, 1),
            Direction::S => IVec2::new(0, 1),
            Direction::SW => IVec2::new(-1, 1),
            Direction::W => IVec2::new(-1, 0),
            Direction::NW => IVec2::new(-1, -1),
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of obstructed neighbours around a pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighborhood(u8);

impl Neighborhood {
    pub const EMPTY: Self = Self(0);

    pub const fn of(direction: Direction) -> Self {
        Self(direction.bit())
    }

    /// Sample all eight neighbours with `blocked(offset)`.
    pub fn sample(mut blocked: impl FnMut(IVec2) -> bool) -> Self {
        Direction::ALL
            .iter()
            .filter(|d| blocked(d.offset()))
            .fold(Self::EMPTY, |n, &d| n | Self::of(d))
    }

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }
}

impl BitOr for Neighborhood {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<Direction> for Neighborhood {
    type Output = Self;

    fn bitor(self, rhs: Direction) -> Self {
        self | Neighborhood::of(rhs)
    }
}

/// Known seam shapes. Only the three pixels ahead of the agent
/// (E, SE and S in the motion frame) take part in the match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Seam {
    /// Wall below and diagonally ahead, open straight ahead: the next
    /// diagonal step would clip the stair edge. Slip up.
    Below,
    /// Wall straight and diagonally ahead, open below. Slip down.
    Ahead,
}

impl Seam {
    const PROBE: Neighborhood = Neighborhood(Direction::E.bit() | Direction::SE.bit() | Direction::S.bit());
    const BELOW: Neighborhood = Neighborhood(Direction::SE.bit() | Direction::S.bit());
    const AHEAD: Neighborhood = Neighborhood(Direction::E.bit() | Direction::SE.bit());

    /// Seam whose pattern equals the probed pixels exactly.
    pub fn matching(neighbors: Neighborhood) -> Option<Seam> {
        let probed = neighbors.intersect(Self::PROBE);
        if probed == Self::BELOW {
            Some(Seam::Below)
        } else if probed == Self::AHEAD {
            Some(Seam::Ahead)
        } else {
            None
        }
    }

    /// Pixel the start point moves to; must be clear for the slip to apply.
    pub fn destination(self) -> Direction {
        match self {
            Seam::Below => Direction::N,
            Seam::Ahead => Direction::S,
        }
    }
}

/// Whether `delta` points along the isometric diagonal, i.e.
/// `1.5 <= |dx| / |dy| <= 3`.
pub fn in_slip_band(delta: IVec2) -> bool {
    let ax = delta.x.abs() as i64;
    let ay = delta.y.abs() as i64;
    ay != 0 && 2 * ax >= 3 * ay && ax <= 3 * ay
}

/// Start point for a trace along `delta`, nudged by one pixel vertically if
/// it sits inside a staircase seam. `blocked` answers for world pixels.
pub fn auto_slip(start: IVec2, delta: IVec2, blocked: impl Fn(i32, i32) -> bool) -> IVec2 {
    if !in_slip_band(delta) {
        return start;
    }
    let sign = delta.signum();
    let to_world = |offset: IVec2| start + offset * sign;

    let neighbors = Neighborhood::sample(|offset| {
        let p = to_world(offset);
        blocked(p.x, p.y)
    });

    match Seam::matching(neighbors) {
        Some(seam) if !neighbors.contains(seam.destination()) => to_world(seam.destination().offset()),
        _ => start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_covers_isometric_diagonal_only() {
        assert!(in_slip_band(IVec2::new(2, 1)));
        assert!(in_slip_band(IVec2::new(-6, 2)));
        assert!(in_slip_band(IVec2::new(3, -2)));
        assert!(!in_slip_band(IVec2::new(1, 1)));
        assert!(!in_slip_band(IVec2::new(4, 1)));
        assert!(!in_slip_band(IVec2::new(5, 0)));
    }

    #[test]
    fn patterns_must_match_exactly() {
        let below = Neighborhood::EMPTY | Direction::SE | Direction::S;
        assert_eq!(Seam::matching(below), Some(Seam::Below));
        let ahead = Neighborhood::EMPTY | Direction::E | Direction::SE;
        assert_eq!(Seam::matching(ahead), Some(Seam::Ahead));
        // Pixels behind the agent do not take part.
        assert_eq!(Seam::matching(ahead | Direction::W | Direction::NW), Some(Seam::Ahead));
        let wall = Neighborhood::EMPTY | Direction::E | Direction::SE | Direction::S;
        assert_eq!(Seam::matching(wall), None);
        assert_eq!(Seam::matching(Neighborhood::EMPTY), None);
    }

    #[test]
    fn slips_up_off_a_lower_seam() {
        // Moving east-south along a wall that starts one row below the agent.
        let blocked = |x: i32, y: i32| x >= 10 && y >= 11;
        let start = IVec2::new(10, 10);
        assert_eq!(auto_slip(start, IVec2::new(4, 2), blocked), IVec2::new(10, 9));
    }

    #[test]
    fn slip_is_mirrored_for_negative_motion() {
        let blocked = |x: i32, y: i32| x <= 10 && y <= 9;
        let start = IVec2::new(10, 10);
        assert_eq!(auto_slip(start, IVec2::new(-4, -2), blocked), IVec2::new(10, 11));
    }

    #[test]
    fn no_slip_outside_band_or_without_seam() {
        let blocked = |_: i32, y: i32| y >= 12;
        let start = IVec2::new(10, 10);
        assert_eq!(auto_slip(start, IVec2::new(4, 2), blocked), start);
        assert_eq!(auto_slip(start, IVec2::new(4, 4), |_, _| true), start);
    }
}
