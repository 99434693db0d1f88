//! Enemy behavior state machines.
//!
//! A behavior is owned by its enemy entity and refers back to it by
//! [`EntityId`]. The world runs every behavior once per tick, before player
//! control and before the physics step.
//!
//! All behaviors share the same "wake up" rule: while the player is within
//! [`AWARENESS_RANGE`] the timer fills, otherwise it drains, and once it passes
//! [`WAKE_DELAY`] the enemy wakes.
//!
//! Every mode change subtracts the threshold that was crossed from the timer, so
//! overshoot carries into the next mode and the timer never goes negative.

mod enemy_clap;
mod enemy_shoot;

pub use enemy_clap::{ClapMode, EnemyClap};
pub use enemy_shoot::{CENTER_OFFSET_PIXELS, EnemyShoot, PIXEL_SCALE, Piece, ShootMode, socket};

use crate::entity::{EntityId, EntityStore};
use crate::physics::PhysicsWorld;
use crate::wave::WaveList;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Player distance below which an enemy notices them.
pub const AWARENESS_RANGE: f32 = 8.0;

/// Seconds in range before a sleeping enemy wakes.
pub const WAKE_DELAY: f32 = 0.5;

/// Seconds between waking and the attack.
pub const WIND_UP: f32 = 0.2;

/// Seconds after an attack before the next wind-up.
pub const RECOVERY: f32 = 1.0;

/// Everything a behavior may touch during its update.
pub struct BehaviorContext<'a> {
    pub entities: &'a mut EntityStore,
    pub physics: &'a mut PhysicsWorld,
    pub waves: &'a mut WaveList,
    pub player_position: Vec2,
}

impl BehaviorContext<'_> {
    pub fn position_of(&self, id: EntityId) -> Vec2 {
        self.entities.position(&*self.physics, id)
    }
}

/// Mode of any behavior, as shown to rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorMode {
    Clap(ClapMode),
    Shoot(ShootMode),
}

#[derive(Debug)]
pub enum Behavior {
    Clap(EnemyClap),
    Shoot(EnemyShoot),
}

impl Behavior {
    pub fn update(&mut self, dt: f32, ctx: &mut BehaviorContext<'_>) {
        match self {
            Behavior::Clap(clap) => clap.update(dt, ctx),
            Behavior::Shoot(shoot) => shoot.update(dt, ctx),
        }
        debug_assert!(
            self.timer() >= 0.0,
            "behavior of {} left a negative timer: {}",
            self.owner(),
            self.timer()
        );
    }

    pub fn mode(&self) -> BehaviorMode {
        match self {
            Behavior::Clap(clap) => BehaviorMode::Clap(clap.mode()),
            Behavior::Shoot(shoot) => BehaviorMode::Shoot(shoot.mode()),
        }
    }

    pub fn timer(&self) -> f32 {
        match self {
            Behavior::Clap(clap) => clap.timer(),
            Behavior::Shoot(shoot) => shoot.timer(),
        }
    }

    pub fn owner(&self) -> EntityId {
        match self {
            Behavior::Clap(clap) => clap.owner(),
            Behavior::Shoot(shoot) => shoot.owner(),
        }
    }

    /// Back to asleep with an empty timer.
    pub fn reset(&mut self) {
        match self {
            Behavior::Clap(clap) => clap.reset(),
            Behavior::Shoot(shoot) => shoot.reset(),
        }
    }
}

pub fn player_in_range(player: Vec2, enemy: Vec2) -> bool {
    player.distance(enemy) < AWARENESS_RANGE
}

/// Fills or drains a sleeping timer. Returns true once it passes [`WAKE_DELAY`],
/// with the delay already subtracted.
fn wake_timer(timer: &mut f32, in_range: bool, dt: f32) -> bool {
    if in_range {
        *timer += dt;
        if *timer > WAKE_DELAY {
            *timer -= WAKE_DELAY;
            return true;
        }
    } else {
        *timer = (*timer - dt).max(0.0);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_player_in_range_is_strict() {
        assert!(player_in_range(Vec2::ZERO, Vec2::new(7.99, 0.0)));
        assert!(!player_in_range(Vec2::ZERO, Vec2::new(8.0, 0.0)));
        assert!(player_in_range(Vec2::new(3.0, 4.0), Vec2::ZERO));
    }

    #[test]
    fn test_wake_timer_drains_to_zero() {
        let mut timer = 0.1;

        assert!(!wake_timer(&mut timer, false, 0.25));
        assert_eq!(timer, 0.0);
    }

    #[test]
    fn test_wake_timer_keeps_overshoot() {
        let mut timer = 0.45;

        assert!(wake_timer(&mut timer, true, 0.1));
        assert_relative_eq!(timer, 0.05, epsilon = 1e-6);
    }

    #[test]
    fn test_wake_timer_exact_threshold_does_not_wake() {
        let mut timer = 0.25;

        assert!(!wake_timer(&mut timer, true, 0.25));
        assert_eq!(timer, 0.5);
    }
}
