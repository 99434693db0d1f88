/// Layered debug renderer for the platformer world.
///
/// Every entity is drawn as an outlined, filled quad in its body's pose, colored
/// by kind and (for enemies) by the current animation frame. Waves are drawn as
/// rings. The geometry is computed without SDL so it can be tested; only the
/// final drawing calls need the `sdl` feature.
///
/// # Draw order
///
/// Entities are sorted by [`layer`] (ground, then pieces, then enemies, then the
/// player) and waves are drawn last. The sort is stable, so entities on the same
/// layer keep their update order.
use crate::animation::{self, ENEMY_SHEET_GRID, PlayerPose, WaveAppearance};
use crate::camera::Camera;
use crate::entity::Tag;
use crate::game::EntityView;
use glam::Vec2;

/// Segments used to approximate a wave ring.
pub const RING_SEGMENTS: usize = 32;

/// RGBA color, kept independent from SDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

/// Back-to-front layer of an entity.
pub fn layer(view: &EntityView) -> u8 {
    if view.has_tag(Tag::Player) {
        3
    } else if view.has_tag(Tag::Enemy) {
        2
    } else if view.behavior.is_none() && view.name == "EnemyShootPiece" {
        1
    } else {
        0
    }
}

/// Views sorted back to front.
pub fn draw_order(views: &[EntityView]) -> Vec<&EntityView> {
    let mut sorted: Vec<&EntityView> = views.iter().collect();
    sorted.sort_by_key(|view| layer(view));
    sorted
}

/// Fill color for an entity.
///
/// Enemies get lighter as their animation frame advances.
pub fn entity_color(view: &EntityView) -> Rgba {
    if view.has_tag(Tag::Player) {
        return match animation::determine_player_pose(view.on_ground, view.velocity) {
            PlayerPose::Idle => Rgba(90, 160, 230, 255),
            PlayerPose::Running => Rgba(110, 190, 255, 255),
            PlayerPose::Airborne => Rgba(160, 210, 255, 255),
        };
    }
    if let Some(state) = view.behavior {
        let frames = ENEMY_SHEET_GRID.0 + 1;
        let frame = animation::enemy_frame(state.mode, state.timer).min(frames - 1);
        let shade = 120 + (frame * 120 / (frames - 1)) as u8;
        return Rgba(shade, 60, 60, 255);
    }
    if view.has_tag(Tag::Ground) && view.name == "Ground" {
        return Rgba(110, 80, 50, 255);
    }
    Rgba(150, 150, 160, 255)
}

/// Corners of an entity's box in screen space, clockwise from top-left.
pub fn screen_corners(view: &EntityView, camera: &Camera) -> [Vec2; 4] {
    let half = view.size * 0.5;
    let rotation = Vec2::from_angle(view.angle);
    [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|corner| camera.to_screen(view.position + rotation.rotate(corner)))
}

/// Closed polyline approximating a wave ring in screen space.
pub fn ring_points(look: &WaveAppearance, camera: &Camera) -> Vec<Vec2> {
    let radius = look.radius();
    (0..=RING_SEGMENTS)
        .map(|i| {
            let angle = i as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
            camera.to_screen(look.center + Vec2::from_angle(angle) * radius)
        })
        .collect()
}

#[cfg(feature = "sdl")]
mod canvas {
    use super::*;
    use crate::game::World;
    use sdl2::pixels::Color;
    use sdl2::rect::{Point, Rect};
    use sdl2::render::{BlendMode, Canvas};
    use sdl2::video::Window;

    fn to_point(v: Vec2) -> Point {
        Point::new(v.x.round() as i32, v.y.round() as i32)
    }

    fn to_color(c: Rgba) -> Color {
        Color::RGBA(c.0, c.1, c.2, c.3)
    }

    fn draw_entity(canvas: &mut Canvas<Window>, view: &EntityView, camera: &Camera) -> Result<(), String> {
        let corners = screen_corners(view, camera);
        canvas.set_draw_color(to_color(entity_color(view)));

        if view.angle.abs() < 1e-3 {
            let min = corners[0].min(corners[2]);
            let max = corners[0].max(corners[2]);
            let size = (max - min).max(Vec2::ONE);
            canvas.fill_rect(Rect::new(
                min.x.round() as i32,
                min.y.round() as i32,
                size.x.round() as u32,
                size.y.round() as u32,
            ))?;
        }

        let mut outline: Vec<Point> = corners.iter().copied().map(to_point).collect();
        outline.push(to_point(corners[0]));
        canvas.set_draw_color(Color::RGB(20, 20, 20));
        canvas.draw_lines(outline.as_slice())?;

        // Facing marker on the side the entity looks at.
        if view.behavior.is_some() || view.has_tag(Tag::Player) {
            let side = if view.face_right { 1.0 } else { -1.0 };
            let eye = view.position + Vec2::new(side * view.size.x * 0.3, -view.size.y * 0.25);
            let eye = to_point(camera.to_screen(eye));
            canvas.set_draw_color(Color::RGB(255, 255, 255));
            canvas.fill_rect(Rect::new(eye.x() - 2, eye.y() - 2, 4, 4))?;
        }
        Ok(())
    }

    fn draw_wave(canvas: &mut Canvas<Window>, look: &WaveAppearance, camera: &Camera) -> Result<(), String> {
        let alpha = (look.alpha * 255.0).round().clamp(0.0, 255.0) as u8;
        canvas.set_draw_color(Color::RGBA(255, 255, 255, alpha));
        let points: Vec<Point> = ring_points(look, camera).into_iter().map(to_point).collect();
        canvas.draw_lines(points.as_slice())
    }

    /// Clears the canvas and draws the whole world. Does not present.
    pub fn render_world(canvas: &mut Canvas<Window>, world: &World, camera: &Camera) -> Result<(), String> {
        canvas.set_blend_mode(BlendMode::Blend);
        canvas.set_draw_color(Color::RGB(30, 30, 40));
        canvas.clear();

        let views = world.snapshot();
        for view in draw_order(&views) {
            draw_entity(canvas, view, camera)?;
        }
        for wave in world.waves() {
            draw_wave(canvas, &WaveAppearance::of(wave), camera)?;
        }
        Ok(())
    }
}

#[cfg(feature = "sdl")]
pub use canvas::render_world;
