/// Physics-backed game objects and the store that owns them.
///
/// An [`Entity`] is a thin record: identity, a tag set, a body handle and a bit of
/// gameplay state (facing, ground contact, air time). Position, velocity and
/// rotation always come from the physics world through the body handle.
///
/// # Ground state
///
/// `on_ground` is cleared at the start of every physics sub-step for awake bodies
/// and set again only by the ground-contact pass after the step (see
/// `collision::apply_ground_contacts`). `air_time` counts seconds since the last
/// landing.
use crate::behavior::Behavior;
use crate::physics::{BodyHandle, PhysicsWorld};
use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Stable index of an entity in its [`EntityStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification of an entity. An entity may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Player,
    /// Something other entities can stand on.
    Ground,
    Enemy,
}

impl Tag {
    fn bit(self) -> u8 {
        match self {
            Tag::Player => 1 << 0,
            Tag::Ground => 1 << 1,
            Tag::Enemy => 1 << 2,
        }
    }
}

/// Small bit set of [`Tag`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tags(u8);

impl Tags {
    pub const NONE: Tags = Tags(0);

    pub fn with(self, tag: Tag) -> Tags {
        Tags(self.0 | tag.bit())
    }

    pub fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Tag> for Tags {
    fn from(tag: Tag) -> Self {
        Tags::NONE.with(tag)
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        iter.into_iter().fold(Tags::NONE, Tags::with)
    }
}

pub struct Entity {
    id: EntityId,
    name: &'static str,
    tags: Tags,
    body: BodyHandle,
    size: Vec2,
    pub on_ground: bool,
    pub air_time: f32,
    pub face_right: bool,
    /// Taken out while it runs so it can borrow the store mutably.
    pub behavior: Option<Behavior>,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tags(&self) -> Tags {
        self.tags
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Full width and height in world units, used for drawing.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Turns to look at `target_x` from `own_x`.
    pub fn face_toward(&mut self, own_x: f32, target_x: f32) {
        self.face_right = target_x > own_x;
    }

    /// Start of a physics sub-step: assume airborne until a contact says otherwise.
    pub fn begin_substep(&mut self, dt: f32) {
        self.on_ground = false;
        self.air_time += dt;
    }

    /// Called by the ground-contact pass.
    pub fn land(&mut self) {
        self.on_ground = true;
        self.air_time = 0.0;
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("on_ground", &self.on_ground)
            .field("air_time", &self.air_time)
            .field("face_right", &self.face_right)
            .field("behavior", &self.behavior.as_ref().map(Behavior::mode))
            .finish()
    }
}

/// All entities of a world in insertion order, plus the body→entity table.
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    by_body: HashMap<RigidBodyHandle, EntityId>,
}

impl EntityStore {
    pub fn new() -> Self {
        EntityStore::default()
    }

    /// Registers a new entity for an already created body.
    ///
    /// New entities face left, stand nowhere and have no behavior.
    pub fn insert(
        &mut self,
        name: &'static str,
        tags: impl Into<Tags>,
        body: BodyHandle,
        size: Vec2,
    ) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity {
            id,
            name,
            tags: tags.into(),
            body,
            size,
            on_ground: false,
            air_time: 0.0,
            face_right: false,
            behavior: None,
        });
        self.by_body.insert(body.rigid_body(), id);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    /// Resolves a rapier body back to the entity that owns it.
    pub fn resolve_body(&self, body: RigidBodyHandle) -> Option<EntityId> {
        self.by_body.get(&body).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(Entity::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Clears ground contact and advances air time on every awake body.
    pub fn begin_substep(&mut self, physics: &PhysicsWorld, dt: f32) {
        for entity in &mut self.entities {
            if physics.is_awake(entity.body) {
                entity.begin_substep(dt);
            }
        }
    }

    /// World position of an entity's body.
    pub fn position(&self, physics: &PhysicsWorld, id: EntityId) -> Vec2 {
        physics.position(self[id].body)
    }
}

impl Index<EntityId> for EntityStore {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }
}

impl IndexMut<EntityId> for EntityStore {
    fn index_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::BodyDef;

    fn store_with_box() -> (EntityStore, PhysicsWorld, EntityId) {
        let mut physics = PhysicsWorld::new(Vec2::new(0.0, 20.0));
        let body = physics.create_body(&BodyDef::dynamic_box(Vec2::ZERO, Vec2::ONE));
        let mut store = EntityStore::new();
        let id = store.insert("Crate", Tag::Ground, body, Vec2::ONE);
        (store, physics, id)
    }

    #[test]
    fn test_tags_are_non_exclusive() {
        let tags: Tags = [Tag::Enemy, Tag::Ground].into_iter().collect();

        assert!(tags.contains(Tag::Enemy));
        assert!(tags.contains(Tag::Ground));
        assert!(!tags.contains(Tag::Player));
        assert!(Tags::NONE.is_empty());
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let (mut store, mut physics, first) = store_with_box();
        let body = physics.create_body(&BodyDef::dynamic_box(Vec2::X, Vec2::ONE));
        let second = store.insert("Other", Tags::NONE, body, Vec2::ONE);

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![first, second]);
    }

    #[test]
    fn test_resolve_body_finds_owner() {
        let (store, _physics, id) = store_with_box();
        let body = store[id].body().rigid_body();

        assert_eq!(store.resolve_body(body), Some(id));
        assert_eq!(store[id].name(), "Crate");
    }

    #[test]
    fn test_begin_substep_then_land() {
        let (mut store, physics, id) = store_with_box();
        store[id].on_ground = true;

        store.begin_substep(&physics, 0.25);
        assert!(!store[id].on_ground);
        assert_eq!(store[id].air_time, 0.25);

        store[id].land();
        assert!(store[id].on_ground);
        assert_eq!(store[id].air_time, 0.0);
    }

    #[test]
    fn test_face_toward() {
        let (mut store, _physics, id) = store_with_box();

        store[id].face_toward(0.0, 3.0);
        assert!(store[id].face_right);

        store[id].face_toward(0.0, -3.0);
        assert!(!store[id].face_right);
    }
}
