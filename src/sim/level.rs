//! The level aggregate
//!
//! Owns the physics world and every entity placed in it. Nothing outside
//! `tick` and the collision dispatcher mutates it during play; `reset`
//! rebuilds the starting state without recreating any body.

use glam::Vec2;

use super::animation::ClipLibrary;
use super::crate_box::{Crate, CrateKind};
use super::crusher::Crusher;
use super::enemy::Enemy;
use super::entity::{Entity, EntityTag};
use super::layout::{LayoutError, LevelLayout};
use super::physics::{BodyDesc, PhysicsWorld};
use super::player::Player;
use super::sawblade::Sawblade;
use super::state::{Checkpoint, Coin, Hud, LevelOutcome};

pub struct Level {
    pub(crate) world: PhysicsWorld,
    pub(crate) player: Player,
    pub(crate) grounds: Vec<Entity>,
    pub(crate) ground_sizes: Vec<Vec2>,
    pub(crate) walls: Vec<Entity>,
    pub(crate) wall_sizes: Vec<Vec2>,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) crates: Vec<Crate>,
    /// Coins placed in the level (crate coins live in their crate)
    pub(crate) coins: Vec<Coin>,
    pub(crate) sawblades: Vec<Sawblade>,
    pub(crate) crushers: Vec<Crusher>,
    pub(crate) checkpoints: Vec<Checkpoint>,

    pub(crate) start_position: Vec2,
    pub(crate) respawn_position: Vec2,
    /// Coins collected
    pub(crate) score: u32,
    /// Level time, frozen once the finish is reached
    pub(crate) timer: f32,
    /// Time spent celebrating at the finish
    pub(crate) end_timer: f32,
    pub(crate) footstep_timer: f32,
    pub(crate) alternate_footstep: bool,
    pub(crate) music_playing: bool,
    /// Master volume (0.0 - 1.0) pushed to the audio sink every frame
    pub(crate) master_volume: f32,
    pub(crate) outcome: LevelOutcome,
}

impl Level {
    /// Build a level with the shipped animation clips
    pub fn new(layout: &LevelLayout) -> Result<Self, LayoutError> {
        Self::with_clips(layout, ClipLibrary::player(), ClipLibrary::enemy())
    }

    pub fn with_clips(
        layout: &LevelLayout,
        player_clips: ClipLibrary,
        enemy_clips: ClipLibrary,
    ) -> Result<Self, LayoutError> {
        layout.validate()?;

        let mut world = PhysicsWorld::new();

        let mut grounds = Vec::with_capacity(layout.grounds.len());
        let mut ground_sizes = Vec::with_capacity(layout.grounds.len());
        for (i, g) in layout.grounds.iter().enumerate() {
            let desc = BodyDesc::fixed(g.position, g.half_size);
            grounds.push(Entity::spawn(&mut world, EntityTag::Ground(i as u32), &desc));
            ground_sizes.push(g.half_size);
        }

        let mut walls = Vec::with_capacity(layout.walls.len());
        let mut wall_sizes = Vec::with_capacity(layout.walls.len());
        for (i, w) in layout.walls.iter().enumerate() {
            let desc = BodyDesc::fixed(w.position, w.half_size);
            walls.push(Entity::spawn(&mut world, EntityTag::Wall(i as u32), &desc));
            wall_sizes.push(w.half_size);
        }

        let player = Player::new(&mut world, layout.player_start, player_clips);

        let enemies = layout
            .enemies
            .iter()
            .enumerate()
            .map(|(i, e)| {
                Enemy::new(
                    &mut world,
                    i as u32,
                    e.position,
                    e.walk_distance,
                    e.idle_time,
                    enemy_clips.clone(),
                )
            })
            .collect();

        let crates = layout
            .crates
            .iter()
            .enumerate()
            .map(|(i, c)| Crate::new(&mut world, i as u32, c.position, c.kind))
            .collect();

        let coins = layout
            .coins
            .iter()
            .enumerate()
            .map(|(i, pos)| Coin::placed(&mut world, i as u32, *pos))
            .collect();

        let sawblades = layout
            .sawblades
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Sawblade::new(
                    &mut world,
                    i as u32,
                    s.position,
                    s.half_size,
                    s.vertical_speed,
                    s.horizontal_speed,
                    s.distance,
                )
            })
            .collect();

        let crushers = layout
            .crushers
            .iter()
            .enumerate()
            .map(|(i, c)| Crusher::new(&mut world, i as u32, c.position, c.delay, c.interval))
            .collect();

        let checkpoints = layout
            .checkpoints
            .iter()
            .enumerate()
            .map(|(i, pos)| Checkpoint::new(&mut world, i as u32, *pos))
            .collect();

        log::info!(
            "Level built: {} bodies, {} crates, {} coins, {} checkpoints",
            world.body_count(),
            layout.crates.len(),
            layout.coins.len(),
            layout.checkpoints.len()
        );

        Ok(Self {
            world,
            player,
            grounds,
            ground_sizes,
            walls,
            wall_sizes,
            enemies,
            crates,
            coins,
            sawblades,
            crushers,
            checkpoints,
            start_position: layout.player_start,
            respawn_position: layout.player_start,
            score: 0,
            timer: 0.0,
            end_timer: 0.0,
            footstep_timer: 0.0,
            alternate_footstep: false,
            music_playing: false,
            master_volume: 0.5,
            outcome: LevelOutcome::Playing,
        })
    }

    /// Back to the starting state with `lives` lives
    pub fn reset(&mut self, lives: u32) {
        self.music_playing = false;
        self.score = 0;
        self.timer = 0.0;
        self.end_timer = 0.0;
        self.footstep_timer = 0.0;
        self.alternate_footstep = false;
        self.outcome = LevelOutcome::Playing;

        self.respawn_position = self.start_position;
        self.player.reset(&mut self.world, self.start_position, lives);

        for checkpoint in &mut self.checkpoints {
            checkpoint.reset();
        }
        for enemy in &mut self.enemies {
            enemy.reset(&mut self.world);
        }
        for crate_box in &mut self.crates {
            crate_box.reset(&mut self.world);
        }
        for coin in &mut self.coins {
            coin.reset_placed(&mut self.world);
        }

        log::info!("Level reset ({} lives)", lives);
    }

    /// Copy every moving body's pose into its render transform
    pub(crate) fn sync_transforms(&mut self) {
        self.player.entity_mut().sync_from_body(&self.world);
        for enemy in &mut self.enemies {
            enemy.entity_mut().sync_from_body(&self.world);
        }
        for crate_box in &mut self.crates {
            if crate_box.kind() == CrateKind::Destroyed {
                crate_box.sync_debris(&self.world);
            }
        }
        for sawblade in &mut self.sawblades {
            sawblade.entity_mut().sync_from_body(&self.world);
        }
        for crusher in &mut self.crushers {
            crusher.entity_mut().sync_from_body(&self.world);
        }
    }

    /// The last checkpoint ends the level
    pub fn finish_reached(&self) -> bool {
        self.checkpoints.last().is_some_and(Checkpoint::is_triggered)
    }

    pub fn hud(&self) -> Hud {
        Hud {
            lives: self.player.lives(),
            time: self.timer,
            coins: self.score,
        }
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn crates(&self) -> &[Crate] {
        &self.crates
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn sawblades(&self) -> &[Sawblade] {
        &self.sawblades
    }

    pub fn crushers(&self) -> &[Crusher] {
        &self.crushers
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn respawn_position(&self) -> Vec2 {
        self.respawn_position
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn end_timer(&self) -> f32 {
        self.end_timer
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }
}
