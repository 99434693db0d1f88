// Level construction: one function per kind of entity.
//
// Each constructor creates the physics body first and then registers the entity
// that owns it, so the body→entity table is always complete.

use crate::behavior::{Behavior, CENTER_OFFSET_PIXELS, EnemyClap, EnemyShoot, PIXEL_SCALE, Piece};
use crate::entity::{EntityId, EntityStore, Tag, Tags};
use crate::physics::{BodyDef, BodyKind, CollisionFilter, PhysicsWorld, Shape};
use glam::Vec2;

pub const PLAYER_SIZE: Vec2 = Vec2::new(1.0, 2.0);
pub const PLAYER_FRICTION: f32 = 0.3;

/// Outline of an enemy body: a box with its two lower corners cut off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyShape {
    pub size: Vec2,
    /// How far the lower corners are cut in along x.
    pub shear_x: f32,
    /// How far the lower corners are cut up along y.
    pub shear_y: f32,
}

impl EnemyShape {
    pub const CLAP: EnemyShape = EnemyShape {
        size: Vec2::new(1.0, 1.0),
        shear_x: 0.3,
        shear_y: 0.03,
    };

    pub const SHOOT: EnemyShape = EnemyShape {
        size: Vec2::new(1.0, 0.9),
        shear_x: 0.3,
        shear_y: 0.03,
    };

    /// Six vertices in body-local coordinates, +y down.
    pub fn vertices(&self) -> Vec<Vec2> {
        let h = self.size * 0.5;
        vec![
            Vec2::new(h.x, -h.y),
            Vec2::new(-h.x, -h.y),
            Vec2::new(-h.x, h.y - self.shear_y),
            Vec2::new(-h.x + self.shear_x, h.y),
            Vec2::new(h.x - self.shear_x, h.y),
            Vec2::new(h.x, h.y - self.shear_y),
        ]
    }
}

/// Texel layout of the shooting enemy's pieces: offset, size, sprite index.
const SHOOT_PIECES: [(Vec2, Vec2, u8); 4] = [
    (Vec2::new(7.0, 0.0), Vec2::new(9.0, 7.0), 0),
    (Vec2::new(0.0, -7.5), Vec2::new(7.0, 10.0), 1),
    (Vec2::new(-6.5, 2.5), Vec2::new(8.0, 8.0), 4),
    (Vec2::new(1.0, 7.0), Vec2::new(9.0, 9.0), 5),
];

pub fn make_player(physics: &mut PhysicsWorld, entities: &mut EntityStore, position: Vec2) -> EntityId {
    let body = physics.create_body(&BodyDef {
        fixed_rotation: true,
        friction: PLAYER_FRICTION,
        ..BodyDef::dynamic_box(position, PLAYER_SIZE)
    });
    entities.insert("Player", Tag::Player, body, PLAYER_SIZE)
}

pub fn make_ground(
    physics: &mut PhysicsWorld,
    entities: &mut EntityStore,
    center: Vec2,
    size: Vec2,
) -> EntityId {
    let body = physics.create_body(&BodyDef {
        friction: 1.0,
        ..BodyDef::static_box(center, size)
    });
    entities.insert("Ground", Tag::Ground, body, size)
}

/// Creates an enemy body without any behavior attached.
///
/// Enemies are solid, rotation-locked and can be stood on.
pub fn make_enemy_body(
    physics: &mut PhysicsWorld,
    entities: &mut EntityStore,
    name: &'static str,
    position: Vec2,
    shape: EnemyShape,
) -> EntityId {
    let body = physics.create_body(&BodyDef {
        kind: BodyKind::Dynamic,
        position,
        fixed_rotation: true,
        shape: Shape::Polygon(shape.vertices()),
        density: 1.0,
        friction: 1.0,
        restitution: 0.0,
        filter: CollisionFilter::DEFAULT,
    });
    let tags: Tags = [Tag::Enemy, Tag::Ground].into_iter().collect();
    entities.insert(name, tags, body, shape.size)
}

pub fn make_enemy_clap(physics: &mut PhysicsWorld, entities: &mut EntityStore, position: Vec2) -> EntityId {
    let id = make_enemy_body(physics, entities, "EnemyClap", position, EnemyShape::CLAP);
    entities[id].behavior = Some(Behavior::Clap(EnemyClap::new(id)));
    id
}

/// Creates the shooting enemy and its four pieces.
///
/// The pieces are registered right after the enemy, so they follow it in
/// update order.
pub fn make_enemy_shoot(physics: &mut PhysicsWorld, entities: &mut EntityStore, position: Vec2) -> EntityId {
    let id = make_enemy_body(physics, entities, "EnemyShoot", position, EnemyShape::SHOOT);

    let pieces = SHOOT_PIECES
        .iter()
        .map(|&(offset, texels, sprite)| {
            let size = texels * PIXEL_SCALE;
            let center = position + (offset + CENTER_OFFSET_PIXELS) * PIXEL_SCALE;
            let body = physics.create_body(&BodyDef {
                friction: 0.8,
                restitution: 0.2,
                filter: CollisionFilter::PIECE,
                ..BodyDef::dynamic_box(center, size)
            });
            let entity = entities.insert("EnemyShootPiece", Tag::Ground, body, size);
            Piece {
                entity,
                rest_position: center,
                size,
                sprite,
            }
        })
        .collect();

    entities[id].behavior = Some(Behavior::Shoot(EnemyShoot::new(id, pieces)));
    id
}
