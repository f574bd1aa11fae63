//! Entities and the tags that link physics bodies back to them

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::physics::{BodyDesc, BodyHandle, BodyKind, PhysicsWorld};

/// Gameplay type of an entity, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Ground,
    Enemy,
    Sawblade,
    Crusher,
    Crate,
    Coin,
    Checkpoint,
    /// Scenery and debris: collides but never triggers a gameplay rule
    None,
}

/// Reference from a physics body to the entity that owns it.
///
/// Indices point into the Level's collections. Crate planks and crate coins
/// are addressed through their owning crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Player,
    Ground(u32),
    Wall(u32),
    Enemy(u32),
    Sawblade(u32),
    Crusher(u32),
    Crate(u32),
    Plank { crate_index: u32, slot: u8 },
    Coin(u32),
    CrateCoin { crate_index: u32, slot: u8 },
    Checkpoint(u32),
}

impl EntityTag {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityTag::Player => EntityKind::Player,
            EntityTag::Ground(_) => EntityKind::Ground,
            EntityTag::Enemy(_) => EntityKind::Enemy,
            EntityTag::Sawblade(_) => EntityKind::Sawblade,
            EntityTag::Crusher(_) => EntityKind::Crusher,
            EntityTag::Crate(_) => EntityKind::Crate,
            EntityTag::Coin(_) | EntityTag::CrateCoin { .. } => EntityKind::Coin,
            EntityTag::Checkpoint(_) => EntityKind::Checkpoint,
            EntityTag::Wall(_) | EntityTag::Plank { .. } => EntityKind::None,
        }
    }

    /// Pack into rapier user data: variant code in the top 32 bits, index
    /// in the next 32, sub-entity slot in the low byte. Zero is "untagged".
    pub fn to_user_data(self) -> u128 {
        let (code, index, slot): (u128, u32, u8) = match self {
            EntityTag::Player => (1, 0, 0),
            EntityTag::Ground(i) => (2, i, 0),
            EntityTag::Wall(i) => (3, i, 0),
            EntityTag::Enemy(i) => (4, i, 0),
            EntityTag::Sawblade(i) => (5, i, 0),
            EntityTag::Crusher(i) => (6, i, 0),
            EntityTag::Crate(i) => (7, i, 0),
            EntityTag::Plank { crate_index, slot } => (8, crate_index, slot),
            EntityTag::Coin(i) => (9, i, 0),
            EntityTag::CrateCoin { crate_index, slot } => (10, crate_index, slot),
            EntityTag::Checkpoint(i) => (11, i, 0),
        };
        (code << 96) | ((index as u128) << 32) | slot as u128
    }

    pub fn from_user_data(data: u128) -> Option<Self> {
        let code = data >> 96;
        let index = ((data >> 32) & 0xFFFF_FFFF) as u32;
        let slot = (data & 0xFF) as u8;
        let tag = match code {
            1 => EntityTag::Player,
            2 => EntityTag::Ground(index),
            3 => EntityTag::Wall(index),
            4 => EntityTag::Enemy(index),
            5 => EntityTag::Sawblade(index),
            6 => EntityTag::Crusher(index),
            7 => EntityTag::Crate(index),
            8 => EntityTag::Plank {
                crate_index: index,
                slot,
            },
            9 => EntityTag::Coin(index),
            10 => EntityTag::CrateCoin {
                crate_index: index,
                slot,
            },
            11 => EntityTag::Checkpoint(index),
            _ => return None,
        };
        Some(tag)
    }
}

/// A simulated object: kind, render transform and exactly one body.
///
/// The body is created in `spawn` and never replaced. All mutation goes
/// through the world so the entity only ever touches its own body.
#[derive(Debug, Clone)]
pub struct Entity {
    kind: EntityKind,
    body: BodyHandle,
    transform: Mat4,
}

impl Entity {
    pub fn spawn(world: &mut PhysicsWorld, tag: EntityTag, desc: &BodyDesc) -> Self {
        let body = world.create_body(Some(tag), desc);
        let mut entity = Self {
            kind: tag.kind(),
            body,
            transform: Mat4::IDENTITY,
        };
        entity.sync_from_body(world);
        entity
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Last transform synced from the body
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Copy the body's pose into the render transform. Rotation is only
    /// ever about the axis facing the camera.
    pub fn sync_from_body(&mut self, world: &PhysicsWorld) {
        let pos = world.position(self.body);
        let angle = world.angle(self.body);
        self.transform = Mat4::from_rotation_translation(
            Quat::from_rotation_z(angle),
            Vec3::new(pos.x, pos.y, 0.0),
        );
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        world.position(self.body)
    }

    pub fn angle(&self, world: &PhysicsWorld) -> f32 {
        world.angle(self.body)
    }

    pub fn velocity(&self, world: &PhysicsWorld) -> Vec2 {
        world.linear_velocity(self.body)
    }

    pub fn set_position(&self, world: &mut PhysicsWorld, position: Vec2) {
        world.set_transform(self.body, position, 0.0);
    }

    pub fn set_transform(&self, world: &mut PhysicsWorld, position: Vec2, angle: f32) {
        world.set_transform(self.body, position, angle);
    }

    pub fn set_velocity(&self, world: &mut PhysicsWorld, velocity: Vec2) {
        world.set_linear_velocity(self.body, velocity);
    }

    pub fn apply_force(&self, world: &mut PhysicsWorld, force: Vec2) {
        world.apply_force_to_center(self.body, force);
    }

    pub fn apply_torque(&self, world: &mut PhysicsWorld, torque: f32) {
        world.apply_torque(self.body, torque);
    }

    pub fn set_enabled(&self, world: &mut PhysicsWorld, enabled: bool) {
        world.set_enabled(self.body, enabled);
    }

    pub fn set_sensor(&self, world: &mut PhysicsWorld, sensor: bool) {
        world.set_sensor(self.body, sensor);
    }

    pub fn is_sensor(&self, world: &PhysicsWorld) -> bool {
        world.is_sensor(self.body)
    }

    pub fn set_dynamic(&self, world: &mut PhysicsWorld, dynamic: bool) {
        let kind = if dynamic {
            BodyKind::Dynamic
        } else {
            BodyKind::Fixed
        };
        world.set_body_kind(self.body, kind);
    }

    pub fn wake(&self, world: &mut PhysicsWorld) {
        world.wake(self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_user_data_roundtrip() {
        let tags = [
            EntityTag::Player,
            EntityTag::Ground(9),
            EntityTag::Wall(0),
            EntityTag::Enemy(6),
            EntityTag::Crate(39),
            EntityTag::Plank {
                crate_index: 12,
                slot: 3,
            },
            EntityTag::CrateCoin {
                crate_index: 7,
                slot: 2,
            },
            EntityTag::Checkpoint(3),
        ];
        for tag in tags {
            assert_eq!(EntityTag::from_user_data(tag.to_user_data()), Some(tag));
        }
    }

    #[test]
    fn test_untagged_user_data() {
        assert_eq!(EntityTag::from_user_data(0), None);
        assert_eq!(EntityTag::from_user_data(42u128 << 96), None);
    }

    #[test]
    fn test_tag_kinds() {
        assert_eq!(EntityTag::Wall(0).kind(), EntityKind::None);
        assert_eq!(
            EntityTag::Plank {
                crate_index: 0,
                slot: 0
            }
            .kind(),
            EntityKind::None
        );
        assert_eq!(
            EntityTag::CrateCoin {
                crate_index: 0,
                slot: 1
            }
            .kind(),
            EntityKind::Coin
        );
    }

    #[test]
    fn test_sync_from_body() {
        let mut world = PhysicsWorld::new();
        let mut entity = Entity::spawn(
            &mut world,
            EntityTag::Sawblade(0),
            &BodyDesc::fixed(Vec2::new(3.0, 4.0), Vec2::ONE),
        );
        assert_eq!(entity.kind(), EntityKind::Sawblade);

        entity.set_transform(&mut world, Vec2::new(5.0, 6.0), 0.5);
        entity.sync_from_body(&world);
        let (_, rotation, translation) = entity.transform().to_scale_rotation_translation();
        assert_eq!(translation, Vec3::new(5.0, 6.0, 0.0));
        let (axis, angle) = rotation.to_axis_angle();
        assert!((angle - 0.5).abs() < 1e-4);
        assert!((axis.z - 1.0).abs() < 1e-4);
    }
}
