use super::{BehaviorContext, RECOVERY, WIND_UP, player_in_range, wake_timer};
use crate::entity::EntityId;
use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

/// Where the clap wave appears relative to the enemy, for an enemy facing right.
/// Mirrored on x when facing left.
pub const CLAP_WAVE_OFFSET: Vec2 = Vec2::new(0.76, -0.65);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClapMode {
    Asleep,
    Awake,
    Attacked,
}

/// Melee enemy: wakes when the player is near, winds up, claps a wave in front
/// of itself, recovers, repeats. It never moves its own body.
#[derive(Debug, Clone)]
pub struct EnemyClap {
    owner: EntityId,
    mode: ClapMode,
    timer: f32,
}

impl EnemyClap {
    pub fn new(owner: EntityId) -> Self {
        EnemyClap {
            owner,
            mode: ClapMode::Asleep,
            timer: 0.0,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn mode(&self) -> ClapMode {
        self.mode
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn reset(&mut self) {
        self.mode = ClapMode::Asleep;
        self.timer = 0.0;
    }

    pub fn update(&mut self, dt: f32, ctx: &mut BehaviorContext<'_>) {
        let enemy = ctx.position_of(self.owner);
        let player = ctx.player_position;
        let in_range = player_in_range(player, enemy);

        match self.mode {
            ClapMode::Asleep => {
                if wake_timer(&mut self.timer, in_range, dt) {
                    self.enter(ClapMode::Awake);
                    ctx.entities[self.owner].face_toward(enemy.x, player.x);
                }
            }
            ClapMode::Awake => {
                if !in_range {
                    self.enter(ClapMode::Asleep);
                    self.timer = super::WAKE_DELAY;
                } else {
                    self.timer += dt;
                    if self.timer > WIND_UP {
                        self.timer -= WIND_UP;
                        self.enter(ClapMode::Attacked);

                        let mut offset = CLAP_WAVE_OFFSET;
                        if !ctx.entities[self.owner].face_right {
                            offset.x = -offset.x;
                        }
                        ctx.waves.emit(enemy + offset);
                    }
                }
            }
            ClapMode::Attacked => {
                self.timer += dt;
                if self.timer > RECOVERY {
                    self.timer -= RECOVERY;
                    self.enter(ClapMode::Awake);
                    ctx.entities[self.owner].face_toward(enemy.x, player.x);
                }
            }
        }
    }

    fn enter(&mut self, mode: ClapMode) {
        debug!("clap {}: {:?} -> {:?}", self.owner, self.mode, mode);
        self.mode = mode;
    }
}
