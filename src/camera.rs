//! World-to-screen mapping.
//!
//! Both spaces have +y pointing down, so the mapping is a translation and a
//! uniform scale. The zoom is the number of world units visible across the
//! window width.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    center: Vec2,
    tiles_per_screen: f32,
    viewport: Vec2,
}

impl Camera {
    pub fn new(width: u32, height: u32, tiles_per_screen: f32) -> Self {
        Camera {
            center: Vec2::ZERO,
            tiles_per_screen,
            viewport: Vec2::new(width as f32, height as f32),
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    /// Puts the world point (`x`, `y`) in the middle of the window.
    pub fn center(&mut self, x: f32, y: f32) {
        self.center = Vec2::new(x, y);
    }

    pub fn zoom(&mut self, tiles_per_screen: f32) {
        self.tiles_per_screen = tiles_per_screen;
    }

    pub fn position(&self) -> Vec2 {
        self.center
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.viewport.x / self.tiles_per_screen
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.center) * self.pixels_per_unit() + self.viewport * 0.5
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.viewport * 0.5) / self.pixels_per_unit() + self.center
    }
}
