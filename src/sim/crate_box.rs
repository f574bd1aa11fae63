//! Breakable and bouncy crates
//!
//! A crate body is fixed. Wooden crates carry coins, and every crate carries
//! planks. Both sit dormant (disabled sensors) at the crate position until
//! the crate is destroyed. On the first update after that, they are enabled
//! and thrown outward once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityTag};
use super::physics::{BodyDesc, PhysicsWorld};
use super::state::Coin;
use crate::consts::{CRATE_COIN_SOLID_DELAY, CRATE_HALF_SIZE, PLANK_COUNT, PLANK_HALF_SIZE, PLANK_TORQUE};

/// Explosion force per plank slot
const PLANK_FORCES: [Vec2; PLANK_COUNT] = [
    Vec2::new(-100.0, 100.0),
    Vec2::new(-100.0, 200.0),
    Vec2::new(100.0, 200.0),
    Vec2::new(100.0, 100.0),
];

/// Explosion force per coin slot
const COIN_FORCES: [Vec2; 3] = [
    Vec2::new(0.0, 150.0),
    Vec2::new(-25.0, 150.0),
    Vec2::new(25.0, 150.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrateKind {
    Wood,
    Metal,
    JumpWood,
    JumpMetal,
    Destroyed,
}

impl CrateKind {
    /// Coins packed inside a crate of this kind
    pub fn coin_count(self) -> usize {
        match self {
            CrateKind::Wood => 3,
            CrateKind::JumpWood => 1,
            _ => 0,
        }
    }

    /// Bounces a player that lands on it
    pub fn is_jump(self) -> bool {
        matches!(self, CrateKind::JumpWood | CrateKind::JumpMetal)
    }

    /// Breaks when kicked
    pub fn is_wooden(self) -> bool {
        matches!(self, CrateKind::Wood | CrateKind::JumpWood)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CrateKind::Wood => "wood",
            CrateKind::Metal => "metal",
            CrateKind::JumpWood => "jump_wood",
            CrateKind::JumpMetal => "jump_metal",
            CrateKind::Destroyed => "destroyed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Crate {
    entity: Entity,
    kind: CrateKind,
    initial_kind: CrateKind,
    /// Set on the first update after destruction, so the debris is thrown
    /// exactly once
    destroyed: bool,
    /// Time since the debris was thrown
    timer: f32,
    position: Vec2,
    planks: Vec<Entity>,
    coins: Vec<Coin>,
}

impl Crate {
    pub fn new(world: &mut PhysicsWorld, index: u32, position: Vec2, kind: CrateKind) -> Self {
        let desc = BodyDesc::fixed(position, CRATE_HALF_SIZE);
        let entity = Entity::spawn(world, EntityTag::Crate(index), &desc);

        let plank_desc = BodyDesc::dynamic(position, PLANK_HALF_SIZE)
            .sensor(true)
            .enabled(false);
        let planks = (0..PLANK_COUNT)
            .map(|slot| {
                let tag = EntityTag::Plank {
                    crate_index: index,
                    slot: slot as u8,
                };
                Entity::spawn(world, tag, &plank_desc)
            })
            .collect();

        let coins = (0..kind.coin_count())
            .map(|slot| Coin::stored(world, index, slot as u8, position))
            .collect();

        Self {
            entity,
            kind,
            initial_kind: kind,
            destroyed: false,
            timer: 0.0,
            position,
            planks,
            coins,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn kind(&self) -> CrateKind {
        self.kind
    }

    pub fn initial_kind(&self) -> CrateKind {
        self.initial_kind
    }

    /// Whether the debris has already been thrown
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn planks(&self) -> &[Entity] {
        &self.planks
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn coin_mut(&mut self, slot: usize) -> Option<&mut Coin> {
        self.coins.get_mut(slot)
    }

    /// Break the crate. Its own body becomes a sensor so the player passes
    /// through. Returns true if it was intact.
    pub fn destroy(&mut self, world: &mut PhysicsWorld) -> bool {
        let was_intact = self.kind != CrateKind::Destroyed;
        if was_intact {
            log::info!("{} crate at {:?} destroyed", self.kind.as_str(), self.position);
        }
        self.kind = CrateKind::Destroyed;
        self.entity.set_sensor(world, true);
        was_intact
    }

    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f32) {
        if self.kind == CrateKind::Destroyed && !self.destroyed {
            self.destroyed = true;
            for (plank, force) in self.planks.iter().zip(PLANK_FORCES) {
                plank.set_enabled(world, true);
                plank.apply_force(world, force);
                plank.apply_torque(world, PLANK_TORQUE);
            }
            for (coin, force) in self.coins.iter().zip(COIN_FORCES) {
                coin.entity().set_enabled(world, true);
                coin.entity().apply_force(world, force);
            }
        }

        if self.destroyed {
            self.timer += dt;
            if self.timer >= CRATE_COIN_SOLID_DELAY {
                for coin in &self.coins {
                    coin.entity().set_sensor(world, false);
                }
            }
        }

        for coin in &self.coins {
            coin.update(world);
        }
    }

    /// Copy debris poses from the simulation
    pub fn sync_debris(&mut self, world: &PhysicsWorld) {
        for plank in &mut self.planks {
            plank.sync_from_body(world);
        }
        for coin in &mut self.coins {
            coin.entity_mut().sync_from_body(world);
        }
    }

    pub fn reset(&mut self, world: &mut PhysicsWorld) {
        self.kind = self.initial_kind;
        self.destroyed = false;
        self.timer = 0.0;
        self.entity.set_sensor(world, false);

        for plank in &mut self.planks {
            plank.set_velocity(world, Vec2::ZERO);
            plank.set_transform(world, self.position, 0.0);
            plank.set_enabled(world, false);
            plank.sync_from_body(world);
        }
        for coin in &mut self.coins {
            coin.reset_stored(world, self.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(kind: CrateKind) -> (PhysicsWorld, Crate) {
        let mut world = PhysicsWorld::new();
        let crate_box = Crate::new(&mut world, 0, Vec2::new(0.0, 3.0), kind);
        (world, crate_box)
    }

    #[test]
    fn test_coin_counts() {
        assert_eq!(spawn(CrateKind::Wood).1.coins().len(), 3);
        assert_eq!(spawn(CrateKind::JumpWood).1.coins().len(), 1);
        assert_eq!(spawn(CrateKind::Metal).1.coins().len(), 0);
        assert_eq!(spawn(CrateKind::JumpMetal).1.coins().len(), 0);
        assert_eq!(spawn(CrateKind::Metal).1.planks().len(), PLANK_COUNT);
    }

    #[test]
    fn test_debris_dormant_until_destroyed() {
        let (mut world, mut crate_box) = spawn(CrateKind::Wood);
        crate_box.update(&mut world, 0.1);
        for plank in crate_box.planks() {
            assert!(!world.is_enabled(plank.body()));
            assert!(plank.is_sensor(&world));
        }
        for coin in crate_box.coins() {
            assert!(!world.is_enabled(coin.entity().body()));
        }
        assert_eq!(crate_box.timer(), 0.0);
    }

    #[test]
    fn test_destroy_throws_debris_once() {
        let (mut world, mut crate_box) = spawn(CrateKind::Wood);
        assert!(crate_box.destroy(&mut world));
        assert_eq!(crate_box.kind(), CrateKind::Destroyed);
        assert!(crate_box.entity().is_sensor(&world));
        // Nothing thrown until the next update
        assert!(!crate_box.is_destroyed());
        assert_eq!(world.pending_force(crate_box.planks()[0].body()), Vec2::ZERO);

        crate_box.update(&mut world, 0.05);
        assert!(crate_box.is_destroyed());
        for (plank, force) in crate_box.planks().iter().zip(PLANK_FORCES) {
            assert!(world.is_enabled(plank.body()));
            assert_eq!(world.pending_force(plank.body()), force);
            assert_eq!(world.pending_torque(plank.body()), PLANK_TORQUE);
        }
        for (coin, force) in crate_box.coins().iter().zip(COIN_FORCES) {
            assert!(world.is_enabled(coin.entity().body()));
            assert_eq!(world.pending_force(coin.entity().body()), force);
        }

        world.step();

        // Destroying again and updating many times throws nothing more
        assert!(!crate_box.destroy(&mut world));
        for _ in 0..10 {
            crate_box.update(&mut world, 0.05);
            for plank in crate_box.planks() {
                assert_eq!(world.pending_force(plank.body()), Vec2::ZERO);
                assert_eq!(world.pending_torque(plank.body()), 0.0);
            }
            for coin in crate_box.coins() {
                assert_eq!(world.pending_force(coin.entity().body()), Vec2::ZERO);
            }
            world.step();
        }
    }

    #[test]
    fn test_coins_turn_solid_after_delay() {
        let (mut world, mut crate_box) = spawn(CrateKind::Wood);
        crate_box.destroy(&mut world);
        crate_box.update(&mut world, 0.1);
        assert!(crate_box.coins().iter().all(|c| c.entity().is_sensor(&world)));
        crate_box.update(&mut world, 0.1);
        assert!(crate_box.coins().iter().all(|c| !c.entity().is_sensor(&world)));
    }

    #[test]
    fn test_collected_coin_stays_dormant() {
        let (mut world, mut crate_box) = spawn(CrateKind::Wood);
        crate_box.destroy(&mut world);
        crate_box.update(&mut world, 0.1);
        if let Some(coin) = crate_box.coin_mut(1) {
            assert!(coin.collect());
        }
        for _ in 0..5 {
            crate_box.update(&mut world, 0.1);
        }
        let coin = &crate_box.coins()[1];
        assert!(coin.entity().is_sensor(&world));
        assert!(!world.is_enabled(coin.entity().body()));
        assert!(!crate_box.coins()[0].entity().is_sensor(&world));
    }

    #[test]
    fn test_reset_restores_crate() {
        let (mut world, mut crate_box) = spawn(CrateKind::JumpWood);
        crate_box.destroy(&mut world);
        crate_box.update(&mut world, 0.1);
        if let Some(coin) = crate_box.coin_mut(0) {
            coin.collect();
        }
        for _ in 0..30 {
            world.step();
            crate_box.update(&mut world, 0.1);
        }

        crate_box.reset(&mut world);
        assert_eq!(crate_box.kind(), CrateKind::JumpWood);
        assert!(!crate_box.is_destroyed());
        assert_eq!(crate_box.timer(), 0.0);
        assert!(!crate_box.entity().is_sensor(&world));
        for plank in crate_box.planks() {
            assert!(!world.is_enabled(plank.body()));
            assert_eq!(plank.position(&world), crate_box.position());
        }
        let coin = &crate_box.coins()[0];
        assert!(!coin.is_collected());
        assert!(coin.entity().is_sensor(&world));
        assert_eq!(coin.entity().position(&world), crate_box.position());
    }

    #[test]
    fn test_kind_families() {
        assert!(CrateKind::JumpWood.is_jump());
        assert!(CrateKind::JumpWood.is_wooden());
        assert!(!CrateKind::JumpMetal.is_wooden());
        assert!(!CrateKind::Destroyed.is_jump());
        assert_eq!(CrateKind::JumpMetal.as_str(), "jump_metal");
    }
}
