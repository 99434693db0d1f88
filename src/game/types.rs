// Read-only views handed to rendering and tests.

use crate::behavior::BehaviorMode;
use crate::entity::{EntityId, Tag, Tags};
use glam::Vec2;

/// Behavior state exactly as the behavior holds it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorState {
    pub mode: BehaviorMode,
    pub timer: f32,
}

/// Everything needed to draw one entity, copied out after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub name: &'static str,
    pub tags: Tags,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radians.
    pub angle: f32,
    pub size: Vec2,
    pub face_right: bool,
    pub on_ground: bool,
    pub air_time: f32,
    pub behavior: Option<BehaviorState>,
}

impl EntityView {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(tag)
    }
}
