//! Collision classification and response
//!
//! After every physics step the dispatcher walks the touching pairs, sorts
//! the two bodies of each pair into roles by their tag, then applies the
//! response rules in a fixed order. Rules are independent: one contact can
//! fire several of them, and a rule sees the state left by the rules before
//! it.

use glam::Vec2;

use super::crate_box::CrateKind;
use super::enemy::EnemyState;
use super::entity::EntityTag;
use super::level::Level;
use super::physics::TouchingPair;
use super::player::PlayerState;
use super::state::{Coin, Direction};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;

/// A coin is either placed in the level or carried by a crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinRef {
    Placed(usize),
    Stored { crate_index: usize, slot: usize },
}

/// Roles present in one touching pair. Untagged bodies (walls, planks)
/// fill no role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    pub player: bool,
    pub ground: bool,
    pub enemy: Option<usize>,
    pub crate_index: Option<usize>,
    pub coin: Option<CoinRef>,
    pub sawblade: Option<usize>,
    pub crusher: Option<usize>,
    pub checkpoint: Option<usize>,
}

impl Contact {
    /// Sort both sides of a pair into roles. Order within the pair does
    /// not matter.
    pub fn classify(pair: &TouchingPair) -> Self {
        let mut contact = Self::default();
        for tag in [pair.a, pair.b].into_iter().flatten() {
            contact.absorb(tag);
        }
        contact
    }

    fn absorb(&mut self, tag: EntityTag) {
        match tag {
            EntityTag::Player => self.player = true,
            EntityTag::Ground(_) => self.ground = true,
            EntityTag::Enemy(i) => self.enemy = Some(i as usize),
            EntityTag::Crate(i) => self.crate_index = Some(i as usize),
            EntityTag::Coin(i) => self.coin = Some(CoinRef::Placed(i as usize)),
            EntityTag::CrateCoin { crate_index, slot } => {
                self.coin = Some(CoinRef::Stored {
                    crate_index: crate_index as usize,
                    slot: slot as usize,
                })
            }
            EntityTag::Sawblade(i) => self.sawblade = Some(i as usize),
            EntityTag::Crusher(i) => self.crusher = Some(i as usize),
            EntityTag::Checkpoint(i) => self.checkpoint = Some(i as usize),
            EntityTag::Wall(_) | EntityTag::Plank { .. } => {}
        }
    }
}

/// Apply the response rules to every touching pair
pub fn dispatch(level: &mut Level, pairs: &[TouchingPair], audio: &mut dyn AudioSink) {
    for pair in pairs {
        resolve(level, Contact::classify(pair), audio);
    }
}

/// Apply the response rules to one contact
pub fn resolve(level: &mut Level, contact: Contact, audio: &mut dyn AudioSink) {
    if let (Some(crusher), true) = (contact.crusher, contact.ground) {
        crusher_hits_ground(level, crusher, audio);
    }

    if !contact.player {
        return;
    }

    land_on_surface(level, &contact);

    if let Some(checkpoint) = contact.checkpoint {
        trigger_checkpoint(level, checkpoint);
    }
    if let Some(enemy) = contact.enemy {
        player_meets_enemy(level, enemy, audio);
    }
    if let Some(crate_index) = contact.crate_index {
        player_meets_crate(level, crate_index, audio);
    }
    if let Some(coin) = contact.coin {
        collect_coin(level, coin, audio);
    }
    if contact.sawblade.is_some() && level.player.state() != PlayerState::Dead {
        level.player.set_dead(&mut level.world);
        audio.play(SoundEffect::Scream);
    }
    if let Some(crusher) = contact.crusher {
        player_meets_crusher(level, crusher, audio);
    }
}

fn crusher_hits_ground(level: &mut Level, index: usize, audio: &mut dyn AudioSink) {
    let player_x = level.player.position(&level.world).x;
    let Some(crusher) = level.crushers.get_mut(index) else {
        return;
    };
    if !crusher.is_crushing() {
        return;
    }
    let crusher_x = crusher.position(&level.world).x;
    if (player_x - crusher_x).abs() < AUDIO_PROXIMITY {
        audio.play(SoundEffect::Clang);
    }
    crusher.land();
    log::debug!("Crusher {} landed", index);
}

/// A falling player touching something solid lands on it. Broken crates
/// are not solid.
fn land_on_surface(level: &mut Level, contact: &Contact) {
    if level.player.state() != PlayerState::Falling {
        return;
    }
    let intact_crate = contact
        .crate_index
        .and_then(|i| level.crates.get(i))
        .is_some_and(|c| c.kind() != CrateKind::Destroyed);
    if contact.ground || contact.enemy.is_some() || intact_crate {
        level.player.set_state(PlayerState::Landing);
    }
}

fn trigger_checkpoint(level: &mut Level, index: usize) {
    let Some(checkpoint) = level.checkpoints.get_mut(index) else {
        return;
    };
    if checkpoint.trigger() {
        log::info!("Checkpoint {} reached at {:?}", index, checkpoint.position());
    }
}

fn player_meets_enemy(level: &mut Level, index: usize, audio: &mut dyn AudioSink) {
    if level.player.state() == PlayerState::Dead {
        return;
    }
    let Some(enemy) = level.enemies.get_mut(index) else {
        return;
    };
    if enemy.state() == EnemyState::Dead {
        return;
    }

    let delta = level.player.position(&level.world) - enemy.position(&level.world);
    if level.player.state() == PlayerState::Kicking {
        let side = if delta.x < 0.0 {
            Direction::Left
        } else {
            Direction::Right
        };
        enemy.set_dead(&mut level.world, side);
        audio.play(SoundEffect::EnemyHit);
    } else if delta.y > 0.0 {
        enemy.set_dead(&mut level.world, Direction::Up);
        level.player.entity().apply_force(&mut level.world, STOMP_BOUNCE_FORCE);
        level.player.set_state(PlayerState::Jumping);
        audio.play(SoundEffect::Bounce);
    } else {
        level.player.set_dead(&mut level.world);
        audio.play(SoundEffect::Scream);
    }
}

fn player_meets_crate(level: &mut Level, index: usize, audio: &mut dyn AudioSink) {
    let Some(crate_box) = level.crates.get_mut(index) else {
        return;
    };
    let player = &mut level.player;
    let world = &mut level.world;

    // Gap between the player's feet and the crate's lid
    let gap = player.position(world).y - PLAYER_HALF_SIZE.y - crate_box.entity().position(world).y - CRATE_HALF_SIZE.y;

    if player.state() == PlayerState::Landing && gap > 0.0 {
        let velocity = player.velocity(world);
        player.entity().set_velocity(world, Vec2::new(velocity.x, 0.0));

        if crate_box.kind().is_jump() {
            player.entity().apply_force(world, JUMP_CRATE_FORCE);
            player.set_state(PlayerState::Jumping);
            audio.play(SoundEffect::Bounce);
        } else if crate_box.kind() == CrateKind::Wood {
            player.entity().apply_force(world, WOOD_CRATE_FORCE);
            player.set_state(PlayerState::Jumping);
            audio.play(SoundEffect::CrateBreak);
            audio.play(SoundEffect::Bounce);
            crate_box.destroy(world);
        }
    } else if player.state() == PlayerState::Kicking && crate_box.kind().is_wooden() {
        crate_box.destroy(world);
        audio.play(SoundEffect::CrateBreak);
    }

    // Head-butt from underneath
    if gap < CRATE_HEADBUTT_GAP && crate_box.kind() == CrateKind::Wood {
        crate_box.destroy(world);
        audio.play(SoundEffect::CrateBreak);
    }
}

fn coin_mut(level: &mut Level, coin: CoinRef) -> Option<&mut Coin> {
    match coin {
        CoinRef::Placed(i) => level.coins.get_mut(i),
        CoinRef::Stored { crate_index, slot } => level.crates.get_mut(crate_index)?.coin_mut(slot),
    }
}

fn collect_coin(level: &mut Level, coin: CoinRef, audio: &mut dyn AudioSink) {
    if coin_mut(level, coin).is_some_and(Coin::collect) {
        level.score += 1;
        audio.play(SoundEffect::Coin);
    }
}

fn player_meets_crusher(level: &mut Level, index: usize, audio: &mut dyn AudioSink) {
    if level.player.state() == PlayerState::Dead {
        return;
    }
    let Some(crusher) = level.crushers.get(index) else {
        return;
    };

    // Player's head relative to the crusher's centre
    let dy = level.player.position(&level.world).y + PLAYER_HALF_SIZE.y - crusher.position(&level.world).y;
    if dy < -CRUSHER_HALF_SIZE.y && crusher.is_crushing() {
        level.player.set_dead(&mut level.world);
        audio.play(SoundEffect::Scream);
    } else if dy > 0.0 && level.player.state() == PlayerState::Falling {
        level.player.set_state(PlayerState::Landing);
    }
}
