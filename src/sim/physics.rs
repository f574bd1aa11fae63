//! Physics world wrapper
//!
//! Owns every rapier2d set and exposes the handful of body primitives the
//! game layer needs. Everything above this module speaks glam types and
//! `BodyHandle`s; nalgebra never leaks out.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use super::entity::EntityTag;
use crate::consts::{GRAVITY, SIM_DT, VELOCITY_ITERATIONS};

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Fixed bodies never move under simulation; dynamic ones integrate forces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Fixed,
    Dynamic,
}

impl BodyKind {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyKind::Fixed => RigidBodyType::Fixed,
            BodyKind::Dynamic => RigidBodyType::Dynamic,
        }
    }
}

/// Description of a box-shaped body
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec2,
    pub half_extents: Vec2,
    pub density: f32,
    pub fixed_rotation: bool,
    pub sensor: bool,
    pub enabled: bool,
    pub can_sleep: bool,
}

impl BodyDesc {
    pub fn fixed(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            kind: BodyKind::Fixed,
            position,
            half_extents,
            density: 1.0,
            fixed_rotation: false,
            sensor: false,
            enabled: true,
            can_sleep: true,
        }
    }

    pub fn dynamic(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            ..Self::fixed(position, half_extents)
        }
    }

    pub fn fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }
}

/// A body and its single box collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyHandle {
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

/// A pair of bodies currently touching, resolved to their tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchingPair {
    pub a: Option<EntityTag>,
    pub b: Option<EntityTag>,
}

/// The physics world: all rapier state plus the fixed step configuration
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    /// Force and torque queued on each body since the last step
    pending: HashMap<RigidBodyHandle, (Vec2, f32)>,
    steps: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty world with level gravity and the fixed step settings
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = SIM_DT;
        if let Some(iterations) = NonZeroUsize::new(VELOCITY_ITERATIONS) {
            integration_parameters.num_solver_iterations = iterations;
        }

        Self {
            gravity: to_na(GRAVITY),
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            pending: HashMap::new(),
            steps: 0,
        }
    }

    /// Create a body with one box collider. The tag (if any) is stored in
    /// the body's user data so contacts can be traced back to entities.
    pub fn create_body(&mut self, tag: Option<EntityTag>, desc: &BodyDesc) -> BodyHandle {
        let body = RigidBodyBuilder::new(desc.kind.to_rapier())
            .translation(to_na(desc.position))
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .can_sleep(desc.can_sleep)
            .enabled(desc.enabled)
            .user_data(tag.map_or(0, EntityTag::to_user_data))
            .build();
        let body = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(desc.half_extents.x, desc.half_extents.y)
            .density(desc.density)
            .sensor(desc.sensor)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        BodyHandle { body, collider }
    }

    /// Advance exactly one fixed step. Forces applied since the previous
    /// step act for this step only and are cleared afterwards.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for (handle, _) in self.pending.drain() {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.reset_forces(false);
                body.reset_torques(false);
            }
        }
        self.steps += 1;
    }

    /// Number of fixed steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Every pair of bodies touching after the last step.
    ///
    /// Solid pairs count when they have an active contact point, sensor
    /// pairs when their shapes currently intersect.
    pub fn touching_pairs(&self) -> Vec<TouchingPair> {
        let solid = self
            .narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .map(|pair| (pair.collider1, pair.collider2));
        let sensors = self
            .narrow_phase
            .intersection_pairs()
            .filter(|(_, _, intersecting)| *intersecting)
            .map(|(a, b, _)| (a, b));

        solid
            .chain(sensors)
            .map(|(a, b)| TouchingPair {
                a: self.collider_tag(a),
                b: self.collider_tag(b),
            })
            .collect()
    }

    fn collider_tag(&self, collider: ColliderHandle) -> Option<EntityTag> {
        let parent = self.colliders.get(collider)?.parent()?;
        EntityTag::from_user_data(self.bodies.get(parent)?.user_data)
    }

    /// Tag stored on a body
    pub fn tag(&self, handle: BodyHandle) -> Option<EntityTag> {
        EntityTag::from_user_data(self.bodies.get(handle.body)?.user_data)
    }

    pub fn position(&self, handle: BodyHandle) -> Vec2 {
        self.bodies
            .get(handle.body)
            .map(|b| from_na(b.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Rotation about the axis out of the play plane (radians)
    pub fn angle(&self, handle: BodyHandle) -> f32 {
        self.bodies
            .get(handle.body)
            .map(|b| b.rotation().angle())
            .unwrap_or(0.0)
    }

    pub fn linear_velocity(&self, handle: BodyHandle) -> Vec2 {
        self.bodies
            .get(handle.body)
            .map(|b| from_na(b.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Force queued for the next step
    pub fn pending_force(&self, handle: BodyHandle) -> Vec2 {
        self.pending
            .get(&handle.body)
            .map(|(force, _)| *force)
            .unwrap_or(Vec2::ZERO)
    }

    /// Torque queued for the next step
    pub fn pending_torque(&self, handle: BodyHandle) -> f32 {
        self.pending
            .get(&handle.body)
            .map(|(_, torque)| *torque)
            .unwrap_or(0.0)
    }

    /// Teleport a body
    pub fn set_transform(&mut self, handle: BodyHandle, position: Vec2, angle: f32) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.set_position(Isometry::new(to_na(position), angle), true);
        }
    }

    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.set_linvel(to_na(velocity), true);
        }
    }

    /// Queue a force through the centre of mass for the next step.
    /// Only dynamic bodies respond.
    pub fn apply_force_to_center(&mut self, handle: BodyHandle, force: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            if !body.is_dynamic() {
                return;
            }
            body.add_force(to_na(force), true);
            self.pending.entry(handle.body).or_default().0 += force;
        }
    }

    pub fn apply_torque(&mut self, handle: BodyHandle, torque: f32) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            if !body.is_dynamic() {
                return;
            }
            body.add_torque(torque, true);
            self.pending.entry(handle.body).or_default().1 += torque;
        }
    }

    pub fn set_enabled(&mut self, handle: BodyHandle, enabled: bool) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self, handle: BodyHandle) -> bool {
        self.bodies
            .get(handle.body)
            .is_some_and(|b| b.is_enabled())
    }

    pub fn set_body_kind(&mut self, handle: BodyHandle, kind: BodyKind) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.set_body_type(kind.to_rapier(), true);
        }
    }

    pub fn body_kind(&self, handle: BodyHandle) -> BodyKind {
        match self.bodies.get(handle.body).map(|b| b.body_type()) {
            Some(RigidBodyType::Dynamic) => BodyKind::Dynamic,
            _ => BodyKind::Fixed,
        }
    }

    pub fn set_sensor(&mut self, handle: BodyHandle, sensor: bool) {
        if let Some(collider) = self.colliders.get_mut(handle.collider) {
            collider.set_sensor(sensor);
        }
    }

    pub fn is_sensor(&self, handle: BodyHandle) -> bool {
        self.colliders
            .get(handle.collider)
            .is_some_and(|c| c.is_sensor())
    }

    /// Wake a body so the solver picks up external changes immediately
    pub fn wake(&mut self, handle: BodyHandle) {
        if let Some(body) = self.bodies.get_mut(handle.body) {
            body.wake_up(true);
        }
    }

    /// Number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = PhysicsWorld::new();
        let body = world.create_body(None, &BodyDesc::dynamic(Vec2::new(0.0, 10.0), Vec2::splat(0.5)));
        for _ in 0..30 {
            world.step();
        }
        assert!(world.position(body).y < 10.0);
        assert!(world.linear_velocity(body).y < 0.0);
        assert_eq!(world.steps(), 30);
    }

    #[test]
    fn test_force_lasts_one_step() {
        let mut world = PhysicsWorld::new();
        let body = world.create_body(None, &BodyDesc::dynamic(Vec2::ZERO, Vec2::splat(0.5)));
        world.apply_force_to_center(body, Vec2::new(100.0, 0.0));
        assert_eq!(world.pending_force(body), Vec2::new(100.0, 0.0));

        world.step();
        assert_eq!(world.pending_force(body), Vec2::ZERO);
        let vx = world.linear_velocity(body).x;
        assert!(vx > 0.0);

        // No further acceleration once the force is cleared
        world.step();
        assert!((world.linear_velocity(body).x - vx).abs() < 1e-4);
    }

    #[test]
    fn test_resting_contact_is_touching() {
        let mut world = PhysicsWorld::new();
        world.create_body(
            Some(EntityTag::Ground(0)),
            &BodyDesc::fixed(Vec2::ZERO, Vec2::new(5.0, 0.5)),
        );
        world.create_body(
            Some(EntityTag::Player),
            &BodyDesc::dynamic(Vec2::new(0.0, 1.0), Vec2::splat(0.5)).fixed_rotation(true),
        );
        for _ in 0..60 {
            world.step();
        }
        let pairs = world.touching_pairs();
        assert!(pairs.iter().any(|p| {
            matches!(
                (p.a, p.b),
                (Some(EntityTag::Player), Some(EntityTag::Ground(0)))
                    | (Some(EntityTag::Ground(0)), Some(EntityTag::Player))
            )
        }));
    }

    #[test]
    fn test_sensor_overlap_is_touching() {
        let mut world = PhysicsWorld::new();
        world.create_body(
            Some(EntityTag::Coin(3)),
            &BodyDesc::fixed(Vec2::ZERO, Vec2::splat(0.3)).sensor(true),
        );
        world.create_body(
            Some(EntityTag::Player),
            &BodyDesc::dynamic(Vec2::ZERO, Vec2::splat(0.5)),
        );
        world.step();
        let pairs = world.touching_pairs();
        assert!(pairs.iter().any(|p| p.a == Some(EntityTag::Coin(3)) || p.b == Some(EntityTag::Coin(3))));
    }

    #[test]
    fn test_body_mutators() {
        let mut world = PhysicsWorld::new();
        let body = world.create_body(
            Some(EntityTag::Crusher(1)),
            &BodyDesc::fixed(Vec2::new(1.0, 2.0), Vec2::splat(1.0)),
        );
        assert_eq!(world.tag(body), Some(EntityTag::Crusher(1)));
        assert_eq!(world.body_kind(body), BodyKind::Fixed);

        world.set_body_kind(body, BodyKind::Dynamic);
        assert_eq!(world.body_kind(body), BodyKind::Dynamic);

        world.set_sensor(body, true);
        assert!(world.is_sensor(body));

        world.set_enabled(body, false);
        assert!(!world.is_enabled(body));

        world.set_transform(body, Vec2::new(4.0, 5.0), 0.0);
        assert_eq!(world.position(body), Vec2::new(4.0, 5.0));
    }
}
