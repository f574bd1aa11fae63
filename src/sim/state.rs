//! Shared level types: pickups, facing, outcomes

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityTag};
use super::physics::{BodyDesc, PhysicsWorld};
use crate::consts::{CHECKPOINT_HALF_SIZE, COIN_HALF_SIZE};

/// Which way a character model faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Side an enemy was hit from, which decides its launch force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Attacker stood to the left
    Left,
    /// Attacker stood to the right
    Right,
    /// Stomped from above
    Up,
}

/// What the level wants the orchestrator to do after this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Playing,
    Paused,
    Win,
    Lose,
}

/// Values shown on the heads-up display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub lives: u32,
    /// Elapsed level time (seconds)
    pub time: f32,
    pub coins: u32,
}

/// A collectible coin, either placed in the level or carried by a crate
#[derive(Debug, Clone)]
pub struct Coin {
    entity: Entity,
    collected: bool,
}

impl Coin {
    /// A coin placed in the level: fixed sensor, always live
    pub fn placed(world: &mut PhysicsWorld, index: u32, position: Vec2) -> Self {
        let desc = BodyDesc::fixed(position, COIN_HALF_SIZE).sensor(true);
        Self {
            entity: Entity::spawn(world, EntityTag::Coin(index), &desc),
            collected: false,
        }
    }

    /// A coin stored inside a crate: dynamic but dormant until released
    pub fn stored(world: &mut PhysicsWorld, crate_index: u32, slot: u8, position: Vec2) -> Self {
        let desc = BodyDesc::dynamic(position, COIN_HALF_SIZE)
            .fixed_rotation(true)
            .sensor(true)
            .enabled(false);
        Self {
            entity: Entity::spawn(world, EntityTag::CrateCoin { crate_index, slot }, &desc),
            collected: false,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Mark collected. Returns false if it already was, so callers score
    /// each coin at most once.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    /// Keep a collected coin out of the simulation
    pub fn update(&self, world: &mut PhysicsWorld) {
        if self.collected {
            self.entity.set_sensor(world, true);
            self.entity.set_enabled(world, false);
        }
    }

    /// Return a placed coin to its live state
    pub fn reset_placed(&mut self, world: &mut PhysicsWorld) {
        self.collected = false;
        self.entity.set_sensor(world, true);
        self.entity.set_enabled(world, true);
    }

    /// Return a crate coin to its dormant state at `position`
    pub fn reset_stored(&mut self, world: &mut PhysicsWorld, position: Vec2) {
        self.collected = false;
        self.entity.set_velocity(world, Vec2::ZERO);
        self.entity.set_position(world, position);
        self.entity.set_enabled(world, false);
        self.entity.set_sensor(world, true);
        self.entity.sync_from_body(world);
    }
}

/// A checkpoint post. Once triggered it stays triggered until reset.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    entity: Entity,
    position: Vec2,
    triggered: bool,
}

impl Checkpoint {
    pub fn new(world: &mut PhysicsWorld, index: u32, position: Vec2) -> Self {
        let desc = BodyDesc::fixed(position, CHECKPOINT_HALF_SIZE).sensor(true);
        Self {
            entity: Entity::spawn(world, EntityTag::Checkpoint(index), &desc),
            position,
            triggered: false,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Returns true only on the first trigger
    pub fn trigger(&mut self) -> bool {
        let fresh = !self.triggered;
        self.triggered = true;
        fresh
    }

    pub fn reset(&mut self) {
        self.triggered = false;
    }
}
