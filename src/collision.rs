/// Ground contact detection.
///
/// After every physics step the world asks this module which entities are
/// standing on something. An entity is grounded when it touches a
/// [`Tag::Ground`] entity that lies beneath it: the contact normal is mostly
/// vertical and the other body's center is lower on screen (+y is down).
///
/// Side contacts against a wall and bodies resting on top of an entity do not
/// count.
use crate::entity::{EntityId, EntityStore, Tag};
use crate::physics::{PhysicsWorld, Touch};

/// Minimum |normal.y| for a contact to count as floor rather than wall.
pub const GROUND_NORMAL_THRESHOLD: f32 = 0.5;

/// Which entity is standing on which.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundContact {
    pub standing: EntityId,
    pub ground: EntityId,
}

/// Resolves one touching pair into zero, one or two ground contacts.
///
/// Both directions are checked since either body may carry the ground tag.
fn ground_contacts_for(
    touch: &Touch,
    entities: &EntityStore,
    physics: &PhysicsWorld,
) -> Vec<GroundContact> {
    if touch.normal.y.abs() < GROUND_NORMAL_THRESHOLD {
        return Vec::new();
    }
    let (Some(first), Some(second)) = (
        entities.resolve_body(touch.first),
        entities.resolve_body(touch.second),
    ) else {
        return Vec::new();
    };

    let mut contacts = Vec::with_capacity(2);
    for (standing, ground) in [(first, second), (second, first)] {
        if !entities[ground].has_tag(Tag::Ground) {
            continue;
        }
        let standing_y = entities.position(physics, standing).y;
        let ground_y = entities.position(physics, ground).y;
        if ground_y > standing_y {
            contacts.push(GroundContact { standing, ground });
        }
    }
    contacts
}

/// Every ground contact in the current physics state.
pub fn find_ground_contacts(entities: &EntityStore, physics: &PhysicsWorld) -> Vec<GroundContact> {
    physics
        .touching_pairs()
        .iter()
        .flat_map(|touch| ground_contacts_for(touch, entities, physics))
        .collect()
}

/// Marks every entity that stands on ground as landed.
///
/// Returns the number of contacts applied.
pub fn apply_ground_contacts(entities: &mut EntityStore, physics: &PhysicsWorld) -> usize {
    let contacts = find_ground_contacts(entities, physics);
    for contact in &contacts {
        entities[contact.standing].land();
    }
    contacts.len()
}
