use crate::behavior::{BehaviorMode, ClapMode, RECOVERY, ShootMode, WAKE_DELAY, WIND_UP};
use crate::wave::Wave;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Columns and rows of the enemy sprite sheets.
pub const ENEMY_SHEET_GRID: (u32, u32) = (4, 4);

/// Coarse phase shared by every behavior, used to pick sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    Sleeping,
    WindingUp,
    Recovering,
}

impl AnimationState {
    pub fn of(mode: BehaviorMode) -> Self {
        match mode {
            BehaviorMode::Clap(ClapMode::Asleep) | BehaviorMode::Shoot(ShootMode::Asleep) => {
                AnimationState::Sleeping
            }
            BehaviorMode::Clap(ClapMode::Awake) | BehaviorMode::Shoot(ShootMode::PreShoot) => {
                AnimationState::WindingUp
            }
            BehaviorMode::Clap(ClapMode::Attacked) | BehaviorMode::Shoot(ShootMode::PostShoot) => {
                AnimationState::Recovering
            }
        }
    }
}

/// Sprite index (row-major on a 4x4 sheet) for an enemy in `mode` with `timer`.
///
/// - Sleeping: frames 0-1, opening the eyes as the wake timer fills.
/// - Winding up: frames 2-3.
/// - Recovering: holds frame 4, dropping to 3 over the last 0.1 s.
pub fn enemy_frame(mode: BehaviorMode, timer: f32) -> u32 {
    let frame = match AnimationState::of(mode) {
        AnimationState::Sleeping => ((timer / (WAKE_DELAY / 2.0)) as i32).clamp(0, 1),
        AnimationState::WindingUp => ((2.0 + timer / (WIND_UP / 2.0)) as i32).clamp(2, 3),
        AnimationState::Recovering => {
            ((5.0 - (timer - (RECOVERY - WIND_UP)) / (WIND_UP / 2.0)) as i32).clamp(3, 4)
        }
    };
    frame as u32
}

/// How a wave should look at its current age.
///
/// The ring grows from the center, then thins and fades out over the last 0.2 s
/// of its life. `relative_radius` and `relative_thickness` are fractions of
/// `scale`, the side of the square the ring is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveAppearance {
    pub center: Vec2,
    pub scale: f32,
    pub relative_radius: f32,
    pub relative_thickness: f32,
    pub alpha: f32,
}

impl WaveAppearance {
    pub fn of(wave: &Wave) -> Self {
        let t = wave.timer;
        let scale = t.max(0.1) * 15.0;
        let relative_radius = if t < 0.1 { t / 0.1 * 0.4 } else { 0.4 };
        let relative_thickness = if t < 0.1 { 0.2 } else { 0.2 / scale };
        let fade = if t < 0.8 { 1.0 } else { 1.0 - (t - 0.8) / 0.2 };

        WaveAppearance {
            center: wave.center,
            scale,
            relative_radius,
            relative_thickness,
            alpha: fade.clamp(0.0, 1.0) * 0.8,
        }
    }

    /// Ring radius in world units.
    pub fn radius(&self) -> f32 {
        self.scale * self.relative_radius
    }

    /// Ring thickness in world units.
    pub fn thickness(&self) -> f32 {
        self.scale * self.relative_thickness
    }
}

/// Player pose derived from physics state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerPose {
    Idle,
    Running,
    Airborne,
}

/// Horizontal speed under which a grounded player counts as standing still.
const RUN_THRESHOLD: f32 = 0.1;

pub fn determine_player_pose(on_ground: bool, velocity: Vec2) -> PlayerPose {
    if !on_ground {
        PlayerPose::Airborne
    } else if velocity.x.abs() > RUN_THRESHOLD {
        PlayerPose::Running
    } else {
        PlayerPose::Idle
    }
}
