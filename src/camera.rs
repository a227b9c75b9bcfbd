use glam::{IVec2, UVec2};

/// 2D view over the world: a scroll offset kept inside the map.
///
/// `offset` is the world position shown at the top-left of the viewport.
/// It is always clamped to `[min_offset, max_offset]`, so the viewport never
/// shows anything beyond the map edges.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// World-space pixel position at the top-left corner of the screen.
    offset: IVec2,
    /// Viewport size in pixels.
    viewport: UVec2,
    /// Size of the world in pixels.
    world: UVec2,
    min_offset: IVec2,
    max_offset: IVec2,
}

impl Camera {
    pub fn new(world: UVec2, viewport: UVec2) -> Self {
        let mut camera = Self {
            offset: IVec2::ZERO,
            viewport,
            world,
            min_offset: IVec2::ZERO,
            max_offset: IVec2::ZERO,
        };
        camera.recompute_bounds();
        camera
    }

    pub fn offset(&self) -> IVec2 { self.offset }
    pub fn viewport(&self) -> UVec2 { self.viewport }
    pub fn min_offset(&self) -> IVec2 { self.min_offset }
    pub fn max_offset(&self) -> IVec2 { self.max_offset }

    /// Scroll so `(x, y)` is the top-left world pixel, clamped to the map.
    pub fn scroll_to(&mut self, x: i32, y: i32) {
        self.offset = IVec2::new(x, y).clamp(self.min_offset, self.max_offset);
    }

    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        self.scroll_to(self.offset.x + dx, self.offset.y + dy);
    }

    /// Scroll so `world` sits in the middle of the viewport (as far as the
    /// map edges allow).
    pub fn center_on(&mut self, world: IVec2) {
        let half = (self.viewport / 2).as_ivec2();
        self.scroll_to(world.x - half.x, world.y - half.y);
    }

    /// Resize the viewport and re-clamp the current offset.
    pub fn set_viewport(&mut self, viewport: UVec2) {
        self.viewport = viewport;
        self.recompute_bounds();
        self.scroll_to(self.offset.x, self.offset.y);
    }

    #[inline]
    pub fn screen_to_world(&self, screen: IVec2) -> IVec2 {
        screen + self.offset
    }

    #[inline]
    pub fn world_to_screen(&self, world: IVec2) -> IVec2 {
        world - self.offset
    }

    fn recompute_bounds(&mut self) {
        // A map smaller than the viewport pins the offset to the origin.
        let span = self.world.as_ivec2() - self.viewport.as_ivec2();
        self.max_offset = span.max(self.min_offset);
    }
}
