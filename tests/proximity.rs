use glam::IVec2;
use isoengine::geometry::iso_distance_squared;
use isoengine::proximity::{CellPattern, ProximityTracker};

fn tracker() -> ProximityTracker<u32> {
    ProximityTracker::new(IVec2::new(640, 320), 64).unwrap()
}

/// Deterministic scatter over (and slightly beyond) the world.
fn scatter(count: u32) -> Vec<(u32, IVec2)> {
    let mut seed: u32 = 0x2545_f491;
    let mut next = move |span: i32| {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (seed >> 8) as i32 % span
    };
    (0..count)
        .map(|id| (id, IVec2::new(next(700) - 30, next(380) - 30)))
        .collect()
}

fn brute_force(agents: &[(u32, IVec2)], x: i32, y: i32, radius: i32) -> Vec<u32> {
    let r2 = radius as i64 * radius as i64;
    let mut found: Vec<u32> = agents
        .iter()
        .filter(|(_, p)| iso_distance_squared(p.x - x, p.y - y) <= r2)
        .map(|(id, _)| *id)
        .collect();
    found.sort_unstable();
    found
}

// ── Construction ─────────────────────────────────────────────────────────────

#[test]
fn cells_are_half_as_tall_as_wide() {
    let t = tracker();
    assert_eq!(t.cell_size(), 64);
    assert_eq!(t.grid_size(), IVec2::new(10, 10));
    assert!(t.is_empty());
}

#[test]
fn odd_or_zero_cell_size_is_rejected() {
    assert!(ProximityTracker::<u32>::new(IVec2::new(640, 320), 0).is_err());
    assert!(ProximityTracker::<u32>::new(IVec2::new(640, 320), 63).is_err());
}

// ── Queries ──────────────────────────────────────────────────────────────────

#[test]
fn radius_boundary_is_inclusive() {
    let mut t = tracker();
    t.register(1, IVec2::new(369, 160));
    t.register(2, IVec2::new(370, 160));
    t.register(3, IVec2::new(371, 160));
    let mut found = t.find(320, 160, 50, false);
    found.sort_unstable();
    assert_eq!(found, vec![1, 2]);
}

#[test]
fn vertical_distance_counts_double() {
    let mut t = tracker();
    t.register(1, IVec2::new(320, 185));
    t.register(2, IVec2::new(320, 186));
    t.register(3, IVec2::new(320, 135));
    let mut found = t.find(320, 160, 50, false);
    found.sort_unstable();
    assert_eq!(found, vec![1, 3]);
}

#[test]
fn matches_brute_force_for_all_radii() {
    let agents = scatter(400);
    let mut t = tracker();
    for &(id, p) in &agents {
        t.register(id, p);
    }

    for radius in [0, 10, 31, 64, 65, 100, 130, 200, 500] {
        for (x, y) in [(0, 0), (320, 160), (639, 319), (33, 290), (600, 10)] {
            let mut found = t.find(x, y, radius, false);
            found.sort_unstable();
            assert_eq!(found, brute_force(&agents, x, y, radius), "radius {radius} at ({x}, {y})");
        }
    }
}

#[test]
fn sorted_results_are_nearest_first() {
    let agents = scatter(200);
    let mut t = tracker();
    for &(id, p) in &agents {
        t.register(id, p);
    }
    let (x, y) = (300, 150);
    let found = t.find(x, y, 150, true);
    assert!(!found.is_empty());
    let distances: Vec<i64> = found
        .iter()
        .map(|&id| {
            let p = t.position(id).unwrap();
            iso_distance_squared(p.x - x, p.y - y)
        })
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn query_outside_world_is_empty() {
    let mut t = tracker();
    t.register(1, IVec2::new(0, 0));
    assert!(t.find(-1, 0, 100, false).is_empty());
    assert!(t.find(0, 320, 100, false).is_empty());
    assert!(t.find(0, 0, -1, false).is_empty());
}

#[test]
fn agents_outside_world_are_still_found() {
    let mut t = tracker();
    t.register(1, IVec2::new(-5, 100));
    t.register(2, IVec2::new(-50, 100));
    assert_eq!(t.cell_of(1), None);
    assert_eq!(t.find(0, 100, 10, false), vec![1]);
}

#[test]
fn find_into_clears_the_buffer() {
    let mut t = tracker();
    t.register(7, IVec2::new(100, 100));
    let mut out = vec![1, 2, 3];
    t.find_into(100, 100, 5, false, &mut out);
    assert_eq!(out, vec![7]);
}

// ── Membership ───────────────────────────────────────────────────────────────

#[test]
fn track_is_idempotent() {
    let mut t = tracker();
    let p = IVec2::new(100, 100);
    t.register(1, p);
    let cell = t.cell_of(1).unwrap();
    assert!(!t.track(1, p));
    assert!(!t.track(1, p));
    assert_eq!(t.cell_population(cell), 1);
    assert_eq!(t.len(), 1);
}

#[test]
fn track_refiles_on_cell_change() {
    let mut t = tracker();
    t.register(1, IVec2::new(10, 10));
    let before = t.cell_of(1).unwrap();
    assert!(!t.track(1, IVec2::new(20, 20)));
    assert!(t.track(1, IVec2::new(300, 200)));
    let after = t.cell_of(1).unwrap();
    assert_ne!(before, after);
    assert_eq!(t.cell_population(before), 0);
    assert_eq!(t.cell_population(after), 1);
    assert_eq!(t.position(1), Some(IVec2::new(300, 200)));
    assert_eq!(t.find(300, 200, 1, false), vec![1]);
    assert!(t.find(10, 10, 20, false).is_empty());
}

#[test]
fn track_unknown_agent_is_ignored() {
    let mut t = tracker();
    assert!(!t.track(9, IVec2::new(10, 10)));
    assert!(!t.contains(9));
}

#[test]
fn register_twice_moves_the_agent() {
    let mut t = tracker();
    t.register(1, IVec2::new(10, 10));
    t.register(1, IVec2::new(400, 250));
    assert_eq!(t.len(), 1);
    assert_eq!(t.cell_of(1), t.cell_at(IVec2::new(400, 250)));
}

#[test]
fn unregister_removes_the_agent() {
    let mut t = tracker();
    t.register(1, IVec2::new(10, 10));
    t.register(2, IVec2::new(12, 10));
    assert!(t.unregister(1));
    assert!(!t.unregister(1));
    assert_eq!(t.find(10, 10, 10, false), vec![2]);
    assert_eq!(t.len(), 1);
}

// ── Cell patterns ────────────────────────────────────────────────────────────

#[test]
fn large_radius_pattern_is_symmetric() {
    let pattern = CellPattern::classify(300, 64);
    assert!(!pattern.certain.is_empty());
    for set in [&pattern.certain, &pattern.uncertain] {
        for c in set.iter() {
            assert!(set.contains(&IVec2::new(-c.x, c.y)));
            assert!(set.contains(&IVec2::new(c.x, -c.y)));
        }
    }
    assert!(pattern.certain.iter().all(|c| !pattern.uncertain.contains(c)));
}
