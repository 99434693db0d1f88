//! Rigid-body adapter over rapier2d.
//!
//! The simulation core never talks to rapier directly. Everything it needs from
//! the engine goes through [`PhysicsWorld`] and a copyable [`BodyHandle`]:
//! reading position, velocity and angle, pushing forces and impulses, changing
//! gravity scale and collision filters, teleporting, and stepping by a fixed dt.
//!
//! # Conventions
//!
//! - World units, +y points down. Gravity is positive on y.
//! - Forces accumulate until the next [`PhysicsWorld::step`] and are cleared
//!   afterwards, the way Box2D clears them.
//! - Every body carries exactly one collider.

use glam::Vec2;
use rapier2d::prelude::*;
use std::num::NonZeroUsize;

/// Solver iterations per step.
pub const VELOCITY_ITERATIONS: usize = 8;

/// Stabilization iterations per step.
pub const POSITION_ITERATIONS: usize = 3;

/// Contacts farther apart than this are ignored by [`PhysicsWorld::touching_pairs`].
pub const CONTACT_SLOP: f32 = 0.05;

/// Handle to one body and its collider.
///
/// Handles are only valid for the [`PhysicsWorld`] that created them; using a
/// handle with another world panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl BodyHandle {
    /// The rapier rigid-body handle, used as the key for body→entity lookup.
    pub fn rigid_body(&self) -> RigidBodyHandle {
        self.body
    }
}

/// Whether a body is simulated or immovable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Static,
}

/// Collider geometry in body-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box with full width and height `size`.
    Box { size: Vec2 },
    /// Convex polygon given by its vertices.
    Polygon(Vec<Vec2>),
}

/// Box2D-style collision filter.
///
/// A body collides with another when the category of each is in the mask of the
/// other. A negative `group` switches collisions off entirely, which is the only
/// way the group is used here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
    pub group: i16,
}

impl CollisionFilter {
    /// Collides with everything.
    pub const DEFAULT: CollisionFilter = CollisionFilter {
        category: 1,
        mask: u32::MAX,
        group: 0,
    };

    /// Category 1 colliding with category 1 only.
    pub const PIECE: CollisionFilter = CollisionFilter {
        category: 1,
        mask: 1,
        group: 0,
    };

    /// Collides with nothing.
    pub const DETACHED: CollisionFilter = CollisionFilter {
        category: 0,
        mask: 0,
        group: -1,
    };

    fn interaction_groups(self) -> InteractionGroups {
        if self.group < 0 || self.category == 0 || self.mask == 0 {
            InteractionGroups::none()
        } else {
            InteractionGroups::new(
                Group::from_bits_truncate(self.category),
                Group::from_bits_truncate(self.mask),
            )
        }
    }
}

/// Everything needed to create one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub fixed_rotation: bool,
    pub shape: Shape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub filter: CollisionFilter,
}

impl BodyDef {
    /// A dynamic box with density 1 and no friction or bounce.
    pub fn dynamic_box(position: Vec2, size: Vec2) -> Self {
        BodyDef {
            kind: BodyKind::Dynamic,
            position,
            fixed_rotation: false,
            shape: Shape::Box { size },
            density: 1.0,
            friction: 0.0,
            restitution: 0.0,
            filter: CollisionFilter::DEFAULT,
        }
    }

    /// An immovable box.
    pub fn static_box(position: Vec2, size: Vec2) -> Self {
        BodyDef {
            kind: BodyKind::Static,
            ..BodyDef::dynamic_box(position, size)
        }
    }
}

/// Two bodies whose colliders are in contact after the last step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub first: RigidBodyHandle,
    pub second: RigidBodyHandle,
    /// Contact normal in world space, pointing from `first` toward `second`.
    pub normal: Vec2,
}

fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_vector(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Owns every rapier set plus the pipeline that steps them.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Creates an empty world with the given gravity vector.
    pub fn new(gravity: Vec2) -> Self {
        PhysicsWorld {
            gravity: to_vector(gravity),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        from_vector(&self.gravity)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Creates a body with a single collider.
    ///
    /// Polygons that fail to form a convex hull fall back to their bounding box.
    pub fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let builder = match def.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let mut builder = builder.translation(to_vector(def.position));
        if def.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let body = self.bodies.insert(builder.build());

        let collider = collider_builder(&def.shape)
            .density(def.density)
            .friction(def.friction)
            .restitution(def.restitution)
            .collision_groups(def.filter.interaction_groups())
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        BodyHandle { body, collider }
    }

    pub fn position(&self, handle: BodyHandle) -> Vec2 {
        from_vector(self.bodies[handle.body].translation())
    }

    pub fn velocity(&self, handle: BodyHandle) -> Vec2 {
        from_vector(self.bodies[handle.body].linvel())
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        self.bodies[handle.body].set_linvel(to_vector(velocity), true);
    }

    /// Accumulates a force applied at a world-space point until the next step.
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec2, point: Vec2) {
        self.bodies[handle.body].add_force_at_point(
            to_vector(force),
            point![point.x, point.y],
            true,
        );
    }

    /// Applies an impulse at the center of mass.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec2) {
        self.bodies[handle.body].apply_impulse(to_vector(impulse), true);
    }

    /// Rotation in radians.
    pub fn angle(&self, handle: BodyHandle) -> f32 {
        self.bodies[handle.body].rotation().angle()
    }

    pub fn is_awake(&self, handle: BodyHandle) -> bool {
        !self.bodies[handle.body].is_sleeping()
    }

    pub fn set_collision_filter(&mut self, handle: BodyHandle, filter: CollisionFilter) {
        self.colliders[handle.collider].set_collision_groups(filter.interaction_groups());
    }

    /// False when the current filter keeps the body out of every contact.
    pub fn is_collidable(&self, handle: BodyHandle) -> bool {
        let groups = self.colliders[handle.collider].collision_groups();
        !groups.memberships.is_empty() && !groups.filter.is_empty()
    }

    pub fn gravity_scale(&self, handle: BodyHandle) -> f32 {
        self.bodies[handle.body].gravity_scale()
    }

    pub fn set_gravity_scale(&mut self, handle: BodyHandle, scale: f32) {
        self.bodies[handle.body].set_gravity_scale(scale, true);
    }

    /// Teleports a body. Velocity is left untouched.
    pub fn set_transform(&mut self, handle: BodyHandle, position: Vec2, angle: f32) {
        self.bodies[handle.body].set_position(Isometry::new(to_vector(position), angle), true);
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// A non-positive `dt` only clears accumulated forces.
    pub fn step(&mut self, dt: f32) {
        if dt > 0.0 {
            let params = IntegrationParameters {
                dt,
                num_solver_iterations: NonZeroUsize::new(VELOCITY_ITERATIONS)
                    .unwrap_or(NonZeroUsize::MIN),
                num_internal_stabilization_iterations: POSITION_ITERATIONS,
                ..IntegrationParameters::default()
            };

            self.pipeline.step(
                &self.gravity,
                &params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &(),
            );
        }

        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }
    }

    /// Body pairs that are touching after the last step.
    ///
    /// Only manifolds with at least one point closer than [`CONTACT_SLOP`] count.
    pub fn touching_pairs(&self) -> Vec<Touch> {
        let mut touches = Vec::new();

        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let (Some(first), Some(second)) = (
                self.colliders.get(pair.collider1).and_then(|c| c.parent()),
                self.colliders.get(pair.collider2).and_then(|c| c.parent()),
            ) else {
                continue;
            };

            for manifold in &pair.manifolds {
                if manifold.points.iter().any(|p| p.dist <= CONTACT_SLOP) {
                    touches.push(Touch {
                        first,
                        second,
                        normal: from_vector(&manifold.data.normal),
                    });
                    break;
                }
            }
        }

        touches
    }
}

fn collider_builder(shape: &Shape) -> ColliderBuilder {
    match shape {
        Shape::Box { size } => ColliderBuilder::cuboid(size.x * 0.5, size.y * 0.5),
        Shape::Polygon(vertices) => {
            let points: Vec<Point<Real>> = vertices.iter().map(|v| point![v.x, v.y]).collect();
            ColliderBuilder::convex_hull(&points).unwrap_or_else(|| {
                let half = bounding_half_extents(vertices);
                ColliderBuilder::cuboid(half.x, half.y)
            })
        }
    }
}

fn bounding_half_extents(vertices: &[Vec2]) -> Vec2 {
    let extent = vertices
        .iter()
        .fold(Vec2::ZERO, |acc, v| acc.max(v.abs()));
    extent.max(Vec2::splat(0.01))
}
