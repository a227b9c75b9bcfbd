// =============================================================================
// GEOMETRY.RS: Integer geometry shared by the spatial core
//
// - Distance calculations (plain and isometric-weighted)
// - Line rasterisation (for collision traces)
// - Ellipse outlines (for area traces)
// =============================================================================

use glam::IVec2;

/// Calculate Chebyshev distance between two points.
/// This is the number of Bresenham steps needed to go from one point to the other.
#[inline]
pub fn distance_chebyshev(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    (x1 - x2).abs().max((y1 - y2).abs())
}

/// Calculate squared Euclidean distance (avoids sqrt).
/// Useful when you only need to compare distances.
#[inline]
pub fn distance_squared(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    dx * dx + dy * dy
}

/// Squared isometric distance of a world-space offset.
///
/// World y is compressed by half under the isometric projection, so a
/// vertical world offset counts double. A circle on the ground plane is an
/// ellipse with half the horizontal radius on screen; this metric turns
/// that ellipse back into a circle.
#[inline]
pub fn iso_distance_squared(dx: i32, dy: i32) -> i64 {
    let dx = dx as i64;
    let dy = dy as i64 * 2;
    dx * dx + dy * dy
}

// =============================================================================
// BRESENHAM'S LINE ALGORITHM
// =============================================================================

/// Generate all points along a line from (x1, y1) to (x2, y2).
///
/// Uses Bresenham's line algorithm, which produces a line with no gaps.
/// The returned Vec includes both endpoints.
pub fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::with_capacity(distance_chebyshev(x1, y1, x2, y2) as usize + 1);
    walk_line(x1, y1, x2, y2, |x, y| {
        points.push((x, y));
        true
    });
    points
}

/// Iterate along a line, calling a function for each point.
/// Stops early if the function returns false.
///
/// Returns true if the line completed, false if it was interrupted.
pub fn walk_line(
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    mut callback: impl FnMut(i32, i32) -> bool,
) -> bool {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };

    let mut x = x1;
    let mut y = y1;
    let mut err = dx - dy;

    loop {
        if !callback(x, y) {
            return false;
        }

        if x == x2 && y == y2 {
            break;
        }

        let e2 = 2 * err;

        if e2 > -dy {
            err -= dy;
            x += sx;
        }

        if e2 < dx {
            err += dx;
            y += sy;
        }
    }

    true
}

// =============================================================================
// MIDPOINT ELLIPSE
// =============================================================================

/// Outline of an axis-aligned ellipse centred on the origin.
///
/// Integer midpoint algorithm: one quadrant is rasterised in two regions
/// (slope above and below -1) and mirrored into the other three. The
/// decision variable is kept scaled by 4 so everything stays integral.
/// Points are sorted and deduplicated.
pub fn ellipse_outline(rx: i32, ry: i32) -> Vec<IVec2> {
    let rx = rx.max(0);
    let ry = ry.max(0);

    if rx == 0 || ry == 0 {
        let mut points: Vec<IVec2> = if ry == 0 {
            (-rx..=rx).map(|x| IVec2::new(x, 0)).collect()
        } else {
            (-ry..=ry).map(|y| IVec2::new(0, y)).collect()
        };
        points.sort_by_key(|p| (p.x, p.y));
        return points;
    }

    let rx2 = rx as i64 * rx as i64;
    let ry2 = ry as i64 * ry as i64;

    let mut quadrant: Vec<(i32, i32)> = Vec::new();
    let mut x: i64 = 0;
    let mut y: i64 = ry as i64;
    let mut px: i64 = 0;
    let mut py: i64 = 2 * rx2 * y;

    // Region 1: |slope| < 1, step x every iteration.
    let mut p = 4 * ry2 - 4 * rx2 * ry as i64 + rx2;
    while px < py {
        quadrant.push((x as i32, y as i32));
        x += 1;
        px += 2 * ry2;
        if p < 0 {
            p += 4 * (ry2 + px);
        } else {
            y -= 1;
            py -= 2 * rx2;
            p += 4 * (ry2 + px - py);
        }
    }

    // Region 2: |slope| >= 1, step y every iteration.
    p = ry2 * (2 * x + 1) * (2 * x + 1) + 4 * rx2 * (y - 1) * (y - 1) - 4 * rx2 * ry2;
    while y >= 0 {
        quadrant.push((x as i32, y as i32));
        y -= 1;
        py -= 2 * rx2;
        if p > 0 {
            p += 4 * (rx2 - py);
        } else {
            x += 1;
            px += 2 * ry2;
            p += 4 * (rx2 - py + px);
        }
    }

    let mut points = Vec::with_capacity(quadrant.len() * 4);
    for (qx, qy) in quadrant {
        points.push(IVec2::new(qx, qy));
        points.push(IVec2::new(-qx, qy));
        points.push(IVec2::new(qx, -qy));
        points.push(IVec2::new(-qx, -qy));
    }

    // Mirrored axis points appear twice.
    points.sort_by_key(|p| (p.x, p.y));
    points.dedup();
    points
}

// =============================================================================
// DIRECTION HELPERS
// =============================================================================

/// The 4 cardinal directions as (dx, dy) offsets.
pub const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// The 4 diagonal directions as (dx, dy) offsets.
pub const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
