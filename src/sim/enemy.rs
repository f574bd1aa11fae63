//! Patrolling enemy

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::animation::{ClipId, ClipLibrary, ClipPlayer};
use super::entity::{Entity, EntityTag};
use super::physics::{BodyDesc, PhysicsWorld};
use super::state::{Direction, Facing};
use crate::consts::{ENEMY_HALF_SIZE, ENEMY_MODEL_OFFSET, ENEMY_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    Running,
    /// Terminal until the level resets
    Dead,
}

/// Launch force for a kill from the given side
pub fn launch_force(direction: Direction) -> Vec2 {
    match direction {
        Direction::Left => Vec2::new(5000.0, 2000.0),
        Direction::Right => Vec2::new(-5000.0, 2000.0),
        Direction::Up => Vec2::new(0.0, -100.0),
    }
}

/// An enemy walks `walk_distance` away from its start, waits `idle_time`,
/// turns round and walks back.
#[derive(Debug, Clone)]
pub struct Enemy {
    entity: Entity,
    state: EnemyState,
    previous_state: EnemyState,
    facing: Facing,
    speed: f32,
    walk_distance: f32,
    idle_time: f32,
    timer: f32,
    start_position: Vec2,
    clips: ClipLibrary,
    anim: ClipPlayer,
}

impl Enemy {
    pub fn new(
        world: &mut PhysicsWorld,
        index: u32,
        position: Vec2,
        walk_distance: f32,
        idle_time: f32,
        clips: ClipLibrary,
    ) -> Self {
        let desc = BodyDesc::dynamic(position, ENEMY_HALF_SIZE).fixed_rotation(true);
        Self {
            entity: Entity::spawn(world, EntityTag::Enemy(index), &desc),
            state: EnemyState::Running,
            previous_state: EnemyState::Idle,
            facing: Facing::Left,
            speed: ENEMY_SPEED,
            walk_distance,
            idle_time,
            timer: 0.0,
            start_position: position,
            clips,
            anim: ClipPlayer::default(),
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn set_state(&mut self, state: EnemyState) {
        self.state = state;
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        self.entity.position(world)
    }

    pub fn clip(&self) -> Option<ClipId> {
        self.anim.clip()
    }

    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f32) {
        self.timer += dt;

        match self.state {
            EnemyState::Idle if self.timer >= self.idle_time => {
                self.facing = self.facing.flipped();
                self.state = EnemyState::Running;
            }
            EnemyState::Running => {
                let pos = self.entity.position(world);
                let (x, out_of_range) = match self.facing {
                    Facing::Left => {
                        let x = pos.x - self.speed * dt;
                        (x, x < self.start_position.x - self.walk_distance)
                    }
                    Facing::Right => {
                        let x = pos.x + self.speed * dt;
                        (x, x > self.start_position.x + self.walk_distance)
                    }
                };
                self.entity.set_position(world, Vec2::new(x, pos.y));
                if out_of_range {
                    self.timer = 0.0;
                    self.state = EnemyState::Idle;
                }
            }
            _ => {}
        }

        if self.previous_state != self.state {
            let clip = match self.state {
                EnemyState::Running => ClipId::Run,
                EnemyState::Idle | EnemyState::Dead => ClipId::Idle,
            };
            self.anim.play(&self.clips, clip, true, 1.0);
            self.previous_state = self.state;
        }
        self.anim.update(dt);
    }

    /// Knock the enemy out of the level
    pub fn set_dead(&mut self, world: &mut PhysicsWorld, direction: Direction) {
        self.entity.apply_force(world, launch_force(direction));
        self.entity.set_sensor(world, true);
        self.state = EnemyState::Dead;
    }

    pub fn reset(&mut self, world: &mut PhysicsWorld) {
        self.entity.wake(world);
        self.entity.set_sensor(world, false);
        self.entity.set_position(world, self.start_position);
        self.entity.set_velocity(world, Vec2::ZERO);
        self.entity.sync_from_body(world);
        self.state = EnemyState::Idle;
        self.timer = 0.0;
    }

    /// Model transform; the offset mirrors with facing
    pub fn model_transform(&self, world: &PhysicsWorld) -> Mat4 {
        let offset = match self.facing {
            Facing::Left => ENEMY_MODEL_OFFSET,
            Facing::Right => Vec2::new(-ENEMY_MODEL_OFFSET.x, ENEMY_MODEL_OFFSET.y),
        };
        let pos = self.entity.position(world) + offset;
        let yaw = match self.facing {
            Facing::Left => -std::f32::consts::FRAC_PI_2,
            Facing::Right => std::f32::consts::FRAC_PI_2,
        };
        let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_z(self.entity.angle(world));
        Mat4::from_scale_rotation_translation(Vec3::splat(0.01), rotation, Vec3::new(pos.x, pos.y, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(walk_distance: f32, idle_time: f32) -> (PhysicsWorld, Enemy) {
        let mut world = PhysicsWorld::new();
        let enemy = Enemy::new(
            &mut world,
            0,
            Vec2::new(36.0, 14.5),
            walk_distance,
            idle_time,
            ClipLibrary::enemy(),
        );
        (world, enemy)
    }

    #[test]
    fn test_idle_to_running_and_back() {
        let (mut world, mut enemy) = spawn(2.0, 4.0);
        enemy.set_state(EnemyState::Idle);
        let facing = enemy.facing();

        // 4.0s idle in exact steps
        for _ in 0..7 {
            enemy.update(&mut world, 0.5);
            assert_eq!(enemy.state(), EnemyState::Idle);
        }
        enemy.update(&mut world, 0.5);
        assert_eq!(enemy.state(), EnemyState::Running);
        assert_eq!(enemy.facing(), facing.flipped());

        // Walks speed * dt per frame until past the walk distance
        let dt = 0.125;
        let mut last_x = enemy.position(&world).x;
        let mut frames = 0;
        while enemy.state() == EnemyState::Running {
            enemy.update(&mut world, dt);
            let x = enemy.position(&world).x;
            assert!(((x - last_x).abs() - ENEMY_SPEED * dt).abs() < 1e-4);
            last_x = x;
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(enemy.state(), EnemyState::Idle);
        assert_eq!(enemy.timer(), 0.0);
        assert!((last_x - enemy.start_position().x).abs() > 2.0);
    }

    #[test]
    fn test_zero_idle_time_turns_immediately() {
        let (mut world, mut enemy) = spawn(2.0, 0.0);
        enemy.set_state(EnemyState::Idle);
        enemy.update(&mut world, 0.01);
        assert_eq!(enemy.state(), EnemyState::Running);
    }

    #[test]
    fn test_dead_is_terminal() {
        let (mut world, mut enemy) = spawn(2.0, 1.0);
        enemy.set_dead(&mut world, Direction::Left);
        assert_eq!(world.pending_force(enemy.entity().body()), Vec2::new(5000.0, 2000.0));
        assert!(enemy.entity().is_sensor(&world));
        let x = enemy.position(&world).x;
        for _ in 0..100 {
            enemy.update(&mut world, 0.1);
        }
        assert_eq!(enemy.state(), EnemyState::Dead);
        assert_eq!(enemy.position(&world).x, x);
    }

    #[test]
    fn test_reset_restores_start() {
        let (mut world, mut enemy) = spawn(2.0, 1.0);
        for _ in 0..10 {
            enemy.update(&mut world, 0.1);
        }
        enemy.set_dead(&mut world, Direction::Up);
        enemy.reset(&mut world);
        assert_eq!(enemy.state(), EnemyState::Idle);
        assert_eq!(enemy.position(&world), enemy.start_position());
        assert!(!enemy.entity().is_sensor(&world));
        assert_eq!(enemy.timer(), 0.0);
    }

    #[test]
    fn test_launch_forces() {
        assert_eq!(launch_force(Direction::Right), Vec2::new(-5000.0, 2000.0));
        assert_eq!(launch_force(Direction::Up), Vec2::new(0.0, -100.0));
    }
}
