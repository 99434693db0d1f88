use super::{BehaviorContext, RECOVERY, WAKE_DELAY, WIND_UP, player_in_range, wake_timer};
use crate::entity::EntityId;
use crate::physics::CollisionFilter;
use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

/// Texels per world unit of the enemy sprite.
pub const PIXEL_SCALE: f32 = 1.0 / 16.0;

/// Offset from the enemy center to the sprite origin, in texels.
pub const CENTER_OFFSET_PIXELS: Vec2 = Vec2::new(-0.5, 7.5);

/// Impulse applied to every piece when the enemy shoots. The pieces fly away
/// from the socket.
pub const LAUNCH_IMPULSE: f32 = 10.0;

/// Force pulling each piece back toward the socket while the player is in range.
pub const ATTRACTION_FORCE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShootMode {
    Asleep,
    PreShoot,
    PostShoot,
}

/// One physical chunk of a shooting enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub entity: EntityId,
    /// World position the piece was created at.
    pub rest_position: Vec2,
    /// World units.
    pub size: Vec2,
    pub sprite: u8,
}

/// Ranged enemy built from loose pieces.
///
/// Once awake the pieces lose gravity and float back into the body. Every
/// attack blows them outward, after which they are pulled back again for as long
/// as the player stays close.
#[derive(Debug, Clone)]
pub struct EnemyShoot {
    owner: EntityId,
    mode: ShootMode,
    timer: f32,
    pieces: Vec<Piece>,
}

/// Point the pieces gather around, for an enemy centered at `enemy`.
pub fn socket(enemy: Vec2) -> Vec2 {
    enemy + CENTER_OFFSET_PIXELS * PIXEL_SCALE
}

impl EnemyShoot {
    pub fn new(owner: EntityId, pieces: Vec<Piece>) -> Self {
        EnemyShoot {
            owner,
            mode: ShootMode::Asleep,
            timer: 0.0,
            pieces,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn mode(&self) -> ShootMode {
        self.mode
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn reset(&mut self) {
        self.mode = ShootMode::Asleep;
        self.timer = 0.0;
    }

    pub fn update(&mut self, dt: f32, ctx: &mut BehaviorContext<'_>) {
        let enemy = ctx.position_of(self.owner);
        let in_range = player_in_range(ctx.player_position, enemy);

        match self.mode {
            ShootMode::Asleep => {
                if wake_timer(&mut self.timer, in_range, dt) {
                    self.enter(ShootMode::PreShoot);
                    for piece in &self.pieces {
                        let body = ctx.entities[piece.entity].body();
                        ctx.physics.set_gravity_scale(body, 0.0);
                        ctx.physics.set_collision_filter(body, CollisionFilter::DETACHED);
                    }
                }
            }
            ShootMode::PreShoot => {
                if !in_range {
                    // The detached filter stays until the next shot.
                    for piece in &self.pieces {
                        let body = ctx.entities[piece.entity].body();
                        ctx.physics.set_gravity_scale(body, 1.0);
                    }
                    self.enter(ShootMode::Asleep);
                    self.timer = WAKE_DELAY;
                } else {
                    self.timer += dt;
                    if self.timer > WIND_UP {
                        self.timer -= WIND_UP;
                        self.enter(ShootMode::PostShoot);
                        ctx.waves.emit(enemy);
                        self.launch(enemy, ctx);
                    }
                }
            }
            ShootMode::PostShoot => {
                self.timer += dt;
                if self.timer > RECOVERY {
                    self.timer -= RECOVERY;
                    self.enter(ShootMode::PreShoot);
                }
            }
        }

        if in_range {
            self.attract(enemy, ctx);
        }
    }

    fn launch(&self, enemy: Vec2, ctx: &mut BehaviorContext<'_>) {
        let socket = socket(enemy);
        for piece in &self.pieces {
            let body = ctx.entities[piece.entity].body();
            let position = ctx.physics.position(body);
            if let Some(toward_socket) = (socket - position).try_normalize() {
                ctx.physics.apply_impulse(body, toward_socket * -LAUNCH_IMPULSE);
            }
            ctx.physics.set_collision_filter(body, CollisionFilter::PIECE);
        }
    }

    fn attract(&self, enemy: Vec2, ctx: &mut BehaviorContext<'_>) {
        let socket = socket(enemy);
        for piece in &self.pieces {
            let body = ctx.entities[piece.entity].body();
            let position = ctx.physics.position(body);
            if let Some(toward_socket) = (socket - position).try_normalize() {
                ctx.physics
                    .apply_force(body, toward_socket * ATTRACTION_FORCE, position);
            }
        }
    }

    fn enter(&mut self, mode: ShootMode) {
        debug!("shoot {}: {:?} -> {:?}", self.owner, self.mode, mode);
        self.mode = mode;
    }
}
