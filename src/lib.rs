//! Crate Kicker - a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Level simulation (physics driver, collision dispatch, entity state machines)
//! - `audio`: Sound catalogue and the audio output seam
//! - `render`: Draw list handed to whatever renders the level
//! - `settings`: Player preferences shared between screens
//! - `game`: Top-level screen orchestration

pub mod audio;
pub mod game;
pub mod render;
pub mod settings;
pub mod sim;

pub use audio::{AudioQueue, AudioSink, SoundEffect};
pub use game::{Game, GameInput, RunSummary, Screen};
pub use settings::{ControllerKind, LivesChoice, Settings};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed physics step (60 Hz, one step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Constraint solver iterations per step. Rapier folds position
    /// correction into these, so there is no separate position count.
    pub const VELOCITY_ITERATIONS: usize = 6;
    /// World gravity (units/s²)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -9.81);

    /// Player defaults
    pub const PLAYER_HALF_SIZE: Vec2 = Vec2::new(0.5, 0.8);
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_START: Vec2 = Vec2::new(-8.0, 3.0);
    pub const PLAYER_LIVES: u32 = 3;
    pub const PLAYER_MODEL_OFFSET: Vec2 = Vec2::new(0.0, -0.8);
    pub const PLAYER_JUMP_FORCE: Vec2 = Vec2::new(0.0, 600.0);
    pub const PLAYER_DEATH_FORCE: Vec2 = Vec2::new(0.0, 400.0);
    /// Seconds a dead player waits before respawning
    pub const DEATH_RESET_TIME: f32 = 2.0;

    /// Enemy defaults
    pub const ENEMY_HALF_SIZE: Vec2 = Vec2::new(0.3, 0.8);
    pub const ENEMY_SPEED: f32 = 4.0;
    pub const ENEMY_MODEL_OFFSET: Vec2 = Vec2::new(0.15, -0.8);

    /// Crusher defaults
    pub const CRUSHER_HALF_SIZE: Vec2 = Vec2::new(1.0, 2.0);
    pub const CRUSHER_INTERVAL: f32 = 3.0;
    pub const CRUSHER_WARNING_TIME: f32 = 0.5;
    pub const CRUSHER_RESET_TIME: f32 = 2.0;
    pub const CRUSHER_FORCE: Vec2 = Vec2::new(0.0, -8000.0);
    /// Creep speed during the warning shudder (units/s)
    pub const CRUSHER_WARNING_SPEED: f32 = 1.0;
    /// Speed when returning to the start position (units/s)
    pub const CRUSHER_RISE_SPEED: f32 = 2.0;

    /// Sawblade defaults
    pub const SAWBLADE_SPEED: f32 = 2.0;
    pub const SAWBLADE_DISTANCE: f32 = 3.0;
    pub const SAWBLADE_ROTATION_SPEED: f32 = 1000.0;
    /// Collision box relative to the visual size
    pub const SAWBLADE_HITBOX_SCALE: f32 = 0.8;

    /// Crate defaults
    pub const CRATE_HALF_SIZE: Vec2 = Vec2::new(0.5, 0.5);
    pub const PLANK_HALF_SIZE: Vec2 = Vec2::new(0.1, 0.4);
    pub const PLANK_COUNT: usize = 4;
    pub const PLANK_TORQUE: f32 = 20.0;
    /// Seconds after destruction before dropped coins become solid
    pub const CRATE_COIN_SOLID_DELAY: f32 = 0.2;

    /// Pickups
    pub const COIN_HALF_SIZE: Vec2 = Vec2::new(0.3, 0.3);
    /// Checkpoints are tall so a jumping player cannot skip over them
    pub const CHECKPOINT_HALF_SIZE: Vec2 = Vec2::new(0.3, 1.3);

    /// Dispatcher tuning
    pub const JUMP_CRATE_FORCE: Vec2 = Vec2::new(0.0, 1000.0);
    pub const WOOD_CRATE_FORCE: Vec2 = Vec2::new(0.0, 500.0);
    pub const STOMP_BOUNCE_FORCE: Vec2 = Vec2::new(0.0, 400.0);
    /// Vertical gap below which a player is hitting a crate from underneath
    pub const CRATE_HEADBUTT_GAP: f32 = -2.5;
    /// Horizontal radius inside which the crusher clang is audible
    pub const AUDIO_PROXIMITY: f32 = 15.0;

    /// Level flow
    pub const FOOTSTEP_INTERVAL: f32 = 0.3;
    pub const END_SEQUENCE_TIME: f32 = 5.0;
    /// Players below this height have fallen out of the level
    pub const KILL_PLANE_Y: f32 = 0.0;
    pub const SPLASH_TIME: f32 = 2.0;
}
