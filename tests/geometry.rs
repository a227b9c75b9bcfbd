use glam::IVec2;
use isoengine::geometry::*;

#[test]
fn test_chebyshev_distance() {
    assert_eq!(distance_chebyshev(0, 0, 3, 4), 4);
    assert_eq!(distance_chebyshev(0, 0, 3, 3), 3);
}

#[test]
fn test_squared_distance() {
    assert_eq!(distance_squared(0, 0, 3, 4), 25);
    assert_eq!(distance_squared(-1, -1, 1, 1), 8);
}

#[test]
fn test_iso_distance_is_symmetric() {
    assert_eq!(iso_distance_squared(5, 2), iso_distance_squared(-5, -2));
    // A ground-plane circle of radius 10 reaches 10 px sideways but only 5 px down.
    assert_eq!(iso_distance_squared(10, 0), iso_distance_squared(0, 5));
}

#[test]
fn test_line_horizontal() {
    let points = line(0, 0, 5, 0);
    assert_eq!(points, vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);
}

#[test]
fn test_line_vertical() {
    let points = line(0, 0, 0, 3);
    assert_eq!(points, vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
}

#[test]
fn test_line_diagonal() {
    let points = line(0, 0, 3, 3);
    assert_eq!(points.len(), 4);
    assert!(points.contains(&(0, 0)));
    assert!(points.contains(&(3, 3)));
}

#[test]
fn test_line_steps_match_chebyshev() {
    let points = line(2, -3, -7, 1);
    assert_eq!(points.len() as i32, distance_chebyshev(2, -3, -7, 1) + 1);
    // No gaps: consecutive points are 8-neighbours.
    for pair in points.windows(2) {
        assert_eq!(distance_chebyshev(pair[0].0, pair[0].1, pair[1].0, pair[1].1), 1);
    }
}

#[test]
fn test_walk_line_completes() {
    let mut visited = Vec::new();
    let completed = walk_line(0, 0, 3, 0, |x, y| { visited.push((x, y)); true });
    assert!(completed);
    assert_eq!(visited, vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
}

#[test]
fn test_walk_line_stops_early() {
    let mut count = 0;
    let completed = walk_line(0, 0, 5, 0, |_, _| { count += 1; count < 3 });
    assert!(!completed);
    assert_eq!(count, 3);
}

// ── Ellipse outline ──────────────────────────────────────────────────────────

#[test]
fn test_ellipse_radius_zero() {
    assert_eq!(ellipse_outline(0, 0), vec![IVec2::ZERO]);
}

#[test]
fn test_ellipse_flat() {
    let pts = ellipse_outline(2, 0);
    assert_eq!(pts.len(), 5);
    assert!(pts.iter().all(|p| p.y == 0));
}

#[test]
fn test_ellipse_is_mirrored() {
    let pts = ellipse_outline(12, 6);
    for p in &pts {
        assert!(pts.contains(&IVec2::new(-p.x, p.y)));
        assert!(pts.contains(&IVec2::new(p.x, -p.y)));
    }
}

#[test]
fn test_ellipse_has_no_duplicates() {
    let pts = ellipse_outline(9, 4);
    let mut sorted = pts.clone();
    sorted.dedup();
    assert_eq!(sorted.len(), pts.len());
}

#[test]
fn test_ellipse_stays_near_boundary() {
    let (rx, ry) = (16.0_f32, 8.0_f32);
    for p in ellipse_outline(16, 8) {
        let v = (p.x as f32 / rx).powi(2) + (p.y as f32 / ry).powi(2);
        assert!((0.7..=1.3).contains(&v), "{p:?} is off the ellipse ({v})");
    }
}
