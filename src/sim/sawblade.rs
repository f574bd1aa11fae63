//! Sawblade hazard patrolling a rectangle

use glam::Vec2;

use super::entity::{Entity, EntityTag};
use super::physics::{BodyDesc, PhysicsWorld};
use crate::consts::{SAWBLADE_DISTANCE, SAWBLADE_HITBOX_SCALE, SAWBLADE_ROTATION_SPEED, SAWBLADE_SPEED};

/// One patrol axis: bounces between `low` and `high` at `speed`.
/// A flip happens only at the bound the blade is travelling toward, and the
/// blade is clamped there, so it never leaves the range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PatrolAxis {
    low: f32,
    high: f32,
    speed: f32,
    velocity: f32,
}

impl PatrolAxis {
    fn new(low: f32, high: f32, speed: f32) -> Self {
        Self {
            low,
            high,
            speed,
            velocity: speed,
        }
    }

    fn advance(&mut self, position: f32, dt: f32) -> f32 {
        let next = position + self.velocity * dt;
        if self.velocity > 0.0 && next >= self.high {
            self.velocity = -self.speed;
            self.high
        } else if self.velocity < 0.0 && next <= self.low {
            self.velocity = self.speed;
            self.low
        } else {
            next
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sawblade {
    entity: Entity,
    /// Visual half size; the hitbox is a little smaller
    half_size: f32,
    start_position: Vec2,
    distance: f32,
    horizontal: PatrolAxis,
    vertical: PatrolAxis,
    angle: f32,
    rotation_speed: f32,
}

impl Sawblade {
    /// `distance` is the patrol reach: ±distance horizontally, up to
    /// +distance vertically.
    pub fn new(
        world: &mut PhysicsWorld,
        index: u32,
        position: Vec2,
        half_size: f32,
        vertical_speed: f32,
        horizontal_speed: f32,
        distance: f32,
    ) -> Self {
        let desc = BodyDesc::fixed(position, Vec2::splat(half_size * SAWBLADE_HITBOX_SCALE))
            .fixed_rotation(true)
            .sensor(true);
        Self {
            entity: Entity::spawn(world, EntityTag::Sawblade(index), &desc),
            half_size,
            start_position: position,
            distance,
            horizontal: PatrolAxis::new(position.x - distance, position.x + distance, horizontal_speed),
            vertical: PatrolAxis::new(position.y, position.y + distance, vertical_speed),
            angle: 0.0,
            rotation_speed: SAWBLADE_ROTATION_SPEED,
        }
    }

    /// A blade with the default speeds and reach
    pub fn with_defaults(world: &mut PhysicsWorld, index: u32, position: Vec2, half_size: f32) -> Self {
        Self::new(
            world,
            index,
            position,
            half_size,
            SAWBLADE_SPEED,
            SAWBLADE_SPEED,
            SAWBLADE_DISTANCE,
        )
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn half_size(&self) -> f32 {
        self.half_size
    }

    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        self.entity.position(world)
    }

    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f32) {
        let pos = self.entity.position(world);
        let next = Vec2::new(
            self.horizontal.advance(pos.x, dt),
            self.vertical.advance(pos.y, dt),
        );
        self.angle = (self.angle - self.rotation_speed * dt) % std::f32::consts::TAU;
        self.entity.set_transform(world, next, self.angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_vertical_blade_bounces() {
        let mut world = PhysicsWorld::new();
        let mut blade = Sawblade::new(&mut world, 0, Vec2::new(79.0, 11.0), 1.0, 2.0, 0.0, 6.0);

        // Up 6 units at 2 u/s, then back down
        for _ in 0..12 {
            blade.update(&mut world, 0.25);
        }
        assert_eq!(blade.position(&world), Vec2::new(79.0, 17.0));
        blade.update(&mut world, 0.25);
        assert_eq!(blade.position(&world), Vec2::new(79.0, 16.5));
    }

    #[test]
    fn test_horizontal_blade_reaches_both_ends() {
        let mut world = PhysicsWorld::new();
        let mut blade = Sawblade::new(&mut world, 3, Vec2::new(124.0, 15.5), 0.5, 0.0, 2.0, 3.0);
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for _ in 0..200 {
            blade.update(&mut world, 0.05);
            let x = blade.position(&world).x;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
        assert_eq!(min_x, 121.0);
        assert_eq!(max_x, 127.0);
        assert_eq!(blade.position(&world).y, 15.5);
    }

    #[test]
    fn test_blade_spins() {
        let mut world = PhysicsWorld::new();
        let mut blade = Sawblade::with_defaults(&mut world, 0, Vec2::ZERO, 1.0);
        blade.update(&mut world, 0.001);
        assert!(blade.entity().angle(&world) != 0.0);
    }

    proptest! {
        #[test]
        fn prop_patrol_stays_in_bounds(
            x0 in -50.0f32..250.0,
            y0 in 0.0f32..30.0,
            distance in 0.5f32..8.0,
            h_speed in 0.0f32..6.0,
            v_speed in 0.0f32..6.0,
            steps in proptest::collection::vec(0.001f32..0.1, 1..400),
        ) {
            let mut world = PhysicsWorld::new();
            let mut blade = Sawblade::new(&mut world, 0, Vec2::new(x0, y0), 1.0, v_speed, h_speed, distance);
            for dt in steps {
                blade.update(&mut world, dt);
                let pos = blade.position(&world);
                prop_assert!(pos.x >= x0 - distance && pos.x <= x0 + distance);
                prop_assert!(pos.y >= y0 && pos.y <= y0 + distance);
            }
        }
    }
}
