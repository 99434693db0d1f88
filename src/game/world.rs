// World struct and the per-tick update
//
// The World owns the physics instance, every entity (pieces included), the
// wave list, and the dedicated player/ground/enemy slots. It is the only thing
// that mutates simulation state.

use crate::behavior::{Behavior, BehaviorContext};
use crate::collision;
use crate::config::{EnemyKind, GameConfig, LevelConfig};
use crate::entity::{Entity, EntityId, EntityStore};
use crate::input_system::InputSource;
use crate::physics::PhysicsWorld;
use crate::player::{self, ControlOutcome};
use crate::wave::{Wave, WaveList};
use glam::Vec2;
use log::{debug, info};

use super::constructors;
use super::types::{BehaviorState, EntityView};

pub struct World {
    physics: PhysicsWorld,
    entities: EntityStore,
    waves: WaveList,
    player: EntityId,
    ground: EntityId,
    enemies: Vec<EntityId>,
    player_spawn: Vec2,
}

impl World {
    /// Builds a level: player first, then the ground, then enemies in the order
    /// listed.
    pub fn new(level: &LevelConfig, gravity: Vec2) -> Self {
        let mut physics = PhysicsWorld::new(gravity);
        let mut entities = EntityStore::new();

        let player = constructors::make_player(&mut physics, &mut entities, level.player);
        let ground = constructors::make_ground(
            &mut physics,
            &mut entities,
            level.ground.center,
            level.ground.size,
        );
        let enemies = level
            .enemies
            .iter()
            .map(|spawn| match spawn.kind {
                EnemyKind::Clap => {
                    constructors::make_enemy_clap(&mut physics, &mut entities, spawn.position)
                }
                EnemyKind::Shoot => {
                    constructors::make_enemy_shoot(&mut physics, &mut entities, spawn.position)
                }
            })
            .collect::<Vec<_>>();

        info!(
            "World built: {} entities ({} enemies), {} bodies",
            entities.len(),
            enemies.len(),
            physics.body_count()
        );

        World {
            physics,
            entities,
            waves: WaveList::new(),
            player,
            ground,
            enemies,
            player_spawn: level.player,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        World::new(&config.level, config.gravity)
    }

    /// Advances the simulation by one fixed step.
    ///
    /// Order within a tick:
    /// 1. every behavior, in entity order
    /// 2. player control from `input`
    /// 3. wave aging
    /// 4. ground flags cleared on awake bodies
    /// 5. physics step, then ground contacts re-applied
    ///
    /// `dt` must be the same every call; a zero `dt` changes nothing.
    pub fn update(&mut self, dt: f32, input: &impl InputSource) -> ControlOutcome {
        self.run_behaviors(dt);

        let outcome = player::apply_player_control(
            &mut self.entities[self.player],
            &mut self.physics,
            input,
            dt,
        );
        if outcome.jumped {
            debug!("player jumped");
        }

        self.waves.age(dt);

        self.entities.begin_substep(&self.physics, dt);
        self.physics.step(dt);
        collision::apply_ground_contacts(&mut self.entities, &self.physics);

        outcome
    }

    fn run_behaviors(&mut self, dt: f32) {
        let player_position = self.entities.position(&self.physics, self.player);
        let ids: Vec<EntityId> = self.entities.ids().collect();

        for id in ids {
            let Some(mut behavior) = self.entities[id].behavior.take() else {
                continue;
            };
            let mut ctx = BehaviorContext {
                entities: &mut self.entities,
                physics: &mut self.physics,
                waves: &mut self.waves,
                player_position,
            };
            behavior.update(dt, &mut ctx);
            self.entities[id].behavior = Some(behavior);
        }
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn ground(&self) -> EntityId {
        self.ground
    }

    pub fn enemies(&self) -> &[EntityId] {
        &self.enemies
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id]
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn behavior(&self, id: EntityId) -> Option<&Behavior> {
        self.entities[id].behavior.as_ref()
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn waves(&self) -> &[Wave] {
        self.waves.as_slice()
    }

    pub fn position(&self, id: EntityId) -> Vec2 {
        self.entities.position(&self.physics, id)
    }

    /// Moves an entity's body and stops it.
    pub fn teleport(&mut self, id: EntityId, position: Vec2) {
        let body = self.entities[id].body();
        let angle = self.physics.angle(body);
        self.physics.set_transform(body, position, angle);
        self.physics.set_velocity(body, Vec2::ZERO);
    }

    /// Puts the player back where the level started it.
    pub fn respawn_player(&mut self) {
        info!("Respawning player");
        self.teleport(self.player, self.player_spawn);
        let player = &mut self.entities[self.player];
        player.on_ground = false;
        player.air_time = 0.0;
    }

    /// Sends every enemy back to sleep.
    pub fn reset_behaviors(&mut self) {
        for entity in self.entities.iter_mut() {
            if let Some(behavior) = entity.behavior.as_mut() {
                behavior.reset();
            }
        }
    }

    pub fn view(&self, id: EntityId) -> EntityView {
        let entity = &self.entities[id];
        let body = entity.body();
        EntityView {
            id,
            name: entity.name(),
            tags: entity.tags(),
            position: self.physics.position(body),
            velocity: self.physics.velocity(body),
            angle: self.physics.angle(body),
            size: entity.size(),
            face_right: entity.face_right,
            on_ground: entity.on_ground,
            air_time: entity.air_time,
            behavior: entity.behavior.as_ref().map(|behavior| BehaviorState {
                mode: behavior.mode(),
                timer: behavior.timer(),
            }),
        }
    }

    /// Views of every entity in update order.
    pub fn snapshot(&self) -> Vec<EntityView> {
        self.entities.ids().map(|id| self.view(id)).collect()
    }
}
