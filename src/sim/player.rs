//! Player character state machine

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::animation::{ClipId, ClipLibrary, ClipPlayer};
use super::entity::{Entity, EntityTag};
use super::physics::{BodyDesc, PhysicsWorld};
use super::state::Facing;
use crate::consts::*;

/// Player behaviour states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Running,
    Kicking,
    Jumping,
    Falling,
    Landing,
    Dancing,
    Dead,
}

impl PlayerState {
    /// Clip, looping flag and playback speed for this state
    pub fn clip(self) -> (ClipId, bool, f32) {
        match self {
            PlayerState::Idle => (ClipId::Idle, true, 1.0),
            PlayerState::Running => (ClipId::Run, true, 1.0),
            PlayerState::Kicking => (ClipId::Kick, false, 3.0),
            PlayerState::Jumping => (ClipId::Jump, false, 1.0),
            PlayerState::Falling => (ClipId::Fall, true, 1.0),
            PlayerState::Landing => (ClipId::Land, false, 3.0),
            PlayerState::Dancing => (ClipId::Dance, true, 1.0),
            PlayerState::Dead => (ClipId::Death, true, 1.0),
        }
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    entity: Entity,
    state: PlayerState,
    /// State the current clip was selected for
    previous_state: PlayerState,
    facing: Facing,
    lives: u32,
    respawn_position: Vec2,
    death_timer: f32,
    speed: f32,
    clips: ClipLibrary,
    anim: ClipPlayer,
}

impl Player {
    pub fn new(world: &mut PhysicsWorld, position: Vec2, clips: ClipLibrary) -> Self {
        let desc = BodyDesc::dynamic(position, PLAYER_HALF_SIZE)
            .fixed_rotation(true)
            .can_sleep(false);
        Self {
            entity: Entity::spawn(world, EntityTag::Player, &desc),
            state: PlayerState::Idle,
            // Differs from `state` so the first update selects a clip
            previous_state: PlayerState::Running,
            facing: Facing::Right,
            lives: PLAYER_LIVES,
            respawn_position: position,
            death_timer: 0.0,
            speed: PLAYER_SPEED,
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

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn set_state(&mut self, state: PlayerState) {
        self.state = state;
    }

    pub fn previous_state(&self) -> PlayerState {
        self.previous_state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    pub fn respawn_position(&self) -> Vec2 {
        self.respawn_position
    }

    pub fn set_respawn_position(&mut self, position: Vec2) {
        self.respawn_position = position;
    }

    pub fn death_timer(&self) -> f32 {
        self.death_timer
    }

    pub fn position(&self, world: &PhysicsWorld) -> Vec2 {
        self.entity.position(world)
    }

    pub fn velocity(&self, world: &PhysicsWorld) -> Vec2 {
        self.entity.velocity(world)
    }

    /// Currently playing clip
    pub fn clip(&self) -> Option<ClipId> {
        self.anim.clip()
    }

    pub fn jump(&mut self, world: &mut PhysicsWorld) {
        self.entity.apply_force(world, PLAYER_JUMP_FORCE);
        self.state = PlayerState::Jumping;
    }

    /// Horizontal moves shift the body directly rather than pushing it
    pub fn move_left(&mut self, world: &mut PhysicsWorld, dt: f32) {
        self.step_horizontal(world, -self.speed * dt);
        self.facing = Facing::Left;
    }

    pub fn move_right(&mut self, world: &mut PhysicsWorld, dt: f32) {
        self.step_horizontal(world, self.speed * dt);
        self.facing = Facing::Right;
    }

    fn step_horizontal(&mut self, world: &mut PhysicsWorld, dx: f32) {
        let pos = self.entity.position(world);
        self.entity.set_position(world, Vec2::new(pos.x + dx, pos.y));
        if self.state == PlayerState::Idle {
            self.state = PlayerState::Running;
        }
    }

    pub fn attack(&mut self) {
        self.state = PlayerState::Kicking;
    }

    /// Launch upward and drop through the floor
    pub fn set_dead(&mut self, world: &mut PhysicsWorld) {
        self.entity.apply_force(world, PLAYER_DEATH_FORCE);
        self.entity.set_sensor(world, true);
        self.state = PlayerState::Dead;
        log::info!("Player died ({} lives left)", self.lives);
    }

    /// Put the player back at `position`, alive and still
    pub fn reset(&mut self, world: &mut PhysicsWorld, position: Vec2, lives: u32) {
        self.lives = lives;
        self.respawn_position = position;
        self.death_timer = 0.0;
        self.state = PlayerState::Idle;
        self.entity.set_position(world, position);
        self.entity.set_velocity(world, Vec2::ZERO);
        self.entity.set_sensor(world, false);
        self.entity.sync_from_body(world);
    }

    /// Per-frame behaviour, run after collision dispatch
    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f32) {
        if self.state == PlayerState::Dead {
            self.death_timer += dt;
            if self.death_timer >= DEATH_RESET_TIME {
                self.entity.set_sensor(world, false);
                self.entity.set_velocity(world, Vec2::ZERO);
                self.entity.set_position(world, self.respawn_position);
                self.state = PlayerState::Idle;
                self.lives = self.lives.saturating_sub(1);
                self.death_timer = 0.0;
                log::info!("Player respawned at {:?}", self.respawn_position);
            }
        }

        // Any downward motion is a fall, except mid-kick or dead
        let falling = self.entity.velocity(world).y < 0.0;
        if falling && !matches!(self.state, PlayerState::Kicking | PlayerState::Dead) {
            self.state = PlayerState::Falling;
        }

        if self.previous_state != self.state {
            let (clip, looping, speed) = self.state.clip();
            self.anim.play(&self.clips, clip, looping, speed);
            self.previous_state = self.state;
        }

        if self.anim.update(dt) {
            match self.anim.clip() {
                Some(ClipId::Kick) => self.state = PlayerState::Landing,
                Some(ClipId::Jump) => self.state = PlayerState::Falling,
                Some(ClipId::Land) => self.state = PlayerState::Idle,
                _ => {}
            }
        }
    }

    /// Model transform: body pose plus model offset, turned to face the
    /// direction of travel. Dead players are pulled toward the camera so
    /// they draw over the floor they fall through.
    pub fn model_transform(&self, world: &PhysicsWorld) -> Mat4 {
        let pos = self.entity.position(world) + PLAYER_MODEL_OFFSET;
        let depth = if self.state == PlayerState::Dead { 2.0 } else { 0.0 };
        let yaw = match (self.state, self.facing) {
            (PlayerState::Kicking, _) => 0.0,
            (_, Facing::Left) => -std::f32::consts::FRAC_PI_2,
            (_, Facing::Right) => std::f32::consts::FRAC_PI_2,
        };
        let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_z(self.entity.angle(world));
        Mat4::from_scale_rotation_translation(Vec3::splat(0.01), rotation, Vec3::new(pos.x, pos.y, depth))
    }
}
