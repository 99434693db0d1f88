use crate::entity::Entity;
use crate::input_system::{Control, InputSource};
use crate::physics::PhysicsWorld;
use glam::Vec2;

/// Horizontal force per unit of input.
pub const MOVE_FORCE: f32 = 1000.0 / 60.0;

/// Force multiplier while standing on something.
pub const GROUND_TRACTION: f32 = 2.0;

pub const JUMP_IMPULSE: f32 = 10.0;

/// Distance the body is lifted on a jump so the next contact pass does not see it
/// still standing.
pub const JUMP_LIFT: f32 = 0.1;

/// Extra upward force while jump is held shortly after leaving the ground.
pub const JUMP_HANG_FORCE: f32 = 10.0;

/// Seconds of air time during which holding jump keeps pushing up.
pub const JUMP_HANG_WINDOW: f32 = 0.5;

pub const MAX_HORIZONTAL_VELOCITY: f32 = 10.0;
pub const MAX_VERTICAL_VELOCITY: f32 = 20.0;

/// Squared magnitudes at or below this are treated as zero.
const NEGLIGIBLE: f32 = 0.00001;

/// What the control step decided, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlOutcome {
    /// Force applied at the body center (zero when skipped).
    pub force: Vec2,
    pub jumped: bool,
    /// The slow-down would have overshot, so horizontal velocity was zeroed.
    pub stopped: bool,
}

/// Clamps `value` to `[-limit, limit]`.
pub fn limit_magnitude(value: f32, limit: f32) -> f32 {
    value.clamp(-limit, limit)
}

/// Turns held controls into forces on the player body.
///
/// Runs once per world tick, after the behaviors and before the physics step.
///
/// # Movement
///
/// Left/right push with [`MOVE_FORCE`], doubled on the ground. With no input on
/// the ground the player brakes by pushing against its own motion; if that push
/// would reverse direction within this tick the body is stopped outright.
///
/// # Jumping
///
/// A jump is only allowed while `on_ground`. It applies [`JUMP_IMPULSE`] upward
/// and lifts the body by [`JUMP_LIFT`]. Holding jump in the air for less than
/// [`JUMP_HANG_WINDOW`] seconds adds [`JUMP_HANG_FORCE`] upward, so longer
/// presses jump higher.
///
/// # Returns
///
/// The forces and decisions taken. Velocity is always clamped to
/// ±[`MAX_HORIZONTAL_VELOCITY`] / ±[`MAX_VERTICAL_VELOCITY`] afterwards.
pub fn apply_player_control(
    player: &mut Entity,
    physics: &mut PhysicsWorld,
    input: &impl InputSource,
    dt: f32,
) -> ControlOutcome {
    let body = player.body();
    let velocity = physics.velocity(body);
    let mut outcome = ControlOutcome::default();

    let mut movement = Vec2::new(input.movement_axis(), 0.0);
    if movement.length_squared() > 0.0 {
        movement = movement.normalize();
        player.face_right = movement.x > 0.0;
    }

    let mut slowing_down = false;
    if movement.length_squared() < NEGLIGIBLE && player.on_ground && velocity.x.abs() > 0.0 {
        movement.x = -velocity.x.signum();
        slowing_down = true;
    }

    movement *= MOVE_FORCE;
    if player.on_ground {
        movement *= GROUND_TRACTION;
    }

    if input.is_pressed(Control::Jump) {
        if player.on_ground {
            physics.apply_impulse(body, Vec2::new(0.0, -JUMP_IMPULSE));
            let lifted = physics.position(body) + Vec2::new(0.0, -JUMP_LIFT);
            let angle = physics.angle(body);
            physics.set_transform(body, lifted, angle);
            outcome.jumped = true;
        } else if player.air_time < JUMP_HANG_WINDOW {
            movement.y -= JUMP_HANG_FORCE;
        }
    }

    if slowing_down && movement.x.abs() * dt > physics.velocity(body).x.abs() {
        movement.x = 0.0;
        let current = physics.velocity(body);
        physics.set_velocity(body, Vec2::new(0.0, current.y));
        outcome.stopped = true;
    }

    if movement.length_squared() > NEGLIGIBLE {
        let center = physics.position(body);
        physics.apply_force(body, movement, center);
        outcome.force = movement;
    }

    let current = physics.velocity(body);
    physics.set_velocity(
        body,
        Vec2::new(
            limit_magnitude(current.x, MAX_HORIZONTAL_VELOCITY),
            limit_magnitude(current.y, MAX_VERTICAL_VELOCITY),
        ),
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, EntityStore, Tag};
    use crate::input_system::InputState;
    use crate::physics::BodyDef;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (EntityStore, PhysicsWorld, EntityId) {
        let mut physics = PhysicsWorld::new(Vec2::new(0.0, 20.0));
        let body = physics.create_body(&BodyDef {
            fixed_rotation: true,
            ..BodyDef::dynamic_box(Vec2::new(0.0, -5.0), Vec2::new(1.0, 2.0))
        });
        let mut entities = EntityStore::new();
        let id = entities.insert("Player", Tag::Player, body, Vec2::new(1.0, 2.0));
        (entities, physics, id)
    }

    #[test]
    fn test_limit_magnitude() {
        assert_eq!(limit_magnitude(15.0, 10.0), 10.0);
        assert_eq!(limit_magnitude(-15.0, 10.0), -10.0);
        assert_eq!(limit_magnitude(3.0, 10.0), 3.0);
    }

    #[test]
    fn test_airborne_move_uses_plain_force_and_faces() {
        let (mut entities, mut physics, id) = setup();

        let outcome = apply_player_control(&mut entities[id], &mut physics, &InputState::left(), DT);

        assert_relative_eq!(outcome.force.x, -MOVE_FORCE);
        assert_eq!(outcome.force.y, 0.0);
        assert!(!entities[id].face_right);

        apply_player_control(&mut entities[id], &mut physics, &InputState::right(), DT);
        assert!(entities[id].face_right);
    }

    #[test]
    fn test_grounded_move_is_doubled() {
        let (mut entities, mut physics, id) = setup();
        entities[id].land();

        let outcome = apply_player_control(&mut entities[id], &mut physics, &InputState::right(), DT);

        assert_relative_eq!(outcome.force.x, MOVE_FORCE * GROUND_TRACTION);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let (mut entities, mut physics, id) = setup();
        let body = entities[id].body();
        entities[id].land();

        let outcome = apply_player_control(&mut entities[id], &mut physics, &InputState::jump(), DT);

        assert!(outcome.jumped);
        assert!(physics.velocity(body).y < 0.0);
        assert_relative_eq!(physics.position(body).y, -5.1, epsilon = 1e-5);
    }

    #[test]
    fn test_airborne_jump_within_window_hangs() {
        let (mut entities, mut physics, id) = setup();
        entities[id].air_time = 0.2;

        let outcome = apply_player_control(&mut entities[id], &mut physics, &InputState::jump(), DT);

        assert!(!outcome.jumped);
        assert_relative_eq!(outcome.force.y, -JUMP_HANG_FORCE);
        assert_eq!(physics.velocity(entities[id].body()), Vec2::ZERO);
    }

    #[test]
    fn test_airborne_jump_after_window_does_nothing() {
        let (mut entities, mut physics, id) = setup();
        entities[id].air_time = 0.5;

        let outcome = apply_player_control(&mut entities[id], &mut physics, &InputState::jump(), DT);

        assert!(!outcome.jumped);
        assert_eq!(outcome.force, Vec2::ZERO);
    }

    #[test]
    fn test_slow_down_pushes_against_motion() {
        let (mut entities, mut physics, id) = setup();
        let body = entities[id].body();
        entities[id].land();
        physics.set_velocity(body, Vec2::new(5.0, 0.0));

        let outcome = apply_player_control(&mut entities[id], &mut physics, &InputState::NONE, DT);

        assert!(!outcome.stopped);
        assert_relative_eq!(outcome.force.x, -MOVE_FORCE * GROUND_TRACTION);
    }

    #[test]
    fn test_slow_down_overshoot_stops_dead() {
        let (mut entities, mut physics, id) = setup();
        let body = entities[id].body();
        entities[id].land();
        physics.set_velocity(body, Vec2::new(-0.1, 2.0));

        let outcome = apply_player_control(&mut entities[id], &mut physics, &InputState::NONE, DT);

        assert!(outcome.stopped);
        assert_eq!(outcome.force, Vec2::ZERO);
        assert_eq!(physics.velocity(body), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_no_slow_down_in_the_air() {
        let (mut entities, mut physics, id) = setup();
        let body = entities[id].body();
        physics.set_velocity(body, Vec2::new(5.0, 0.0));

        let outcome = apply_player_control(&mut entities[id], &mut physics, &InputState::NONE, DT);

        assert_eq!(outcome, ControlOutcome::default());
        assert_eq!(physics.velocity(body), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_velocity_is_clamped() {
        let (mut entities, mut physics, id) = setup();
        let body = entities[id].body();
        physics.set_velocity(body, Vec2::new(-40.0, 55.0));

        apply_player_control(&mut entities[id], &mut physics, &InputState::left(), DT);

        assert_eq!(physics.velocity(body), Vec2::new(-10.0, 20.0));
    }

    #[test]
    fn test_grounded_jump_impulse_is_clamped_too() {
        let (mut entities, mut physics, id) = setup();
        let body = entities[id].body();
        entities[id].land();
        physics.set_velocity(body, Vec2::new(0.0, -15.0));

        apply_player_control(&mut entities[id], &mut physics, &InputState::jump(), DT);

        assert!(physics.velocity(body).y >= -MAX_VERTICAL_VELOCITY);
    }
}
