//! Per-frame level update
//!
//! One call advances the level by one frame: timers, fall-out death,
//! checkpoints, input, footsteps, a single fixed physics step, collision
//! dispatch, then every entity's own update.

use super::collision::dispatch;
use super::level::Level;
use super::player::PlayerState;
use super::state::LevelOutcome;
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelInput {
    /// Move left (held)
    pub move_left: bool,
    /// Move right (held)
    pub move_right: bool,
    /// Jump (pressed this frame)
    pub jump: bool,
    /// Kick (pressed this frame)
    pub attack: bool,
    /// Pause (pressed this frame)
    pub pause: bool,
}

/// Advance the level by one frame.
///
/// Physics always takes exactly one fixed step, whatever `frame_time` is;
/// `frame_time` only feeds the game timers and movement.
pub fn tick(
    level: &mut Level,
    input: &LevelInput,
    frame_time: f32,
    audio: &mut dyn AudioSink,
) -> LevelOutcome {
    let mut outcome = LevelOutcome::Playing;

    if !level.finish_reached() {
        level.timer += frame_time;
    }
    level.footstep_timer += frame_time;

    if level.player.lives() < 1 {
        outcome = LevelOutcome::Lose;
    }

    if level.player.position(&level.world).y < KILL_PLANE_Y && level.player.state() != PlayerState::Dead {
        log::debug!("Player fell out of the level");
        level.player.set_dead(&mut level.world);
        audio.play(SoundEffect::Scream);
    }

    update_checkpoints(level, frame_time, &mut outcome);
    handle_input(level, input, frame_time, &mut outcome, audio);
    play_footsteps(level, audio);

    level.world.step();
    level.sync_transforms();
    let pairs = level.world.touching_pairs();
    dispatch(level, &pairs, audio);

    update_entities(level, frame_time);

    if !level.music_playing {
        audio.play_music();
        level.music_playing = true;
    }
    audio.set_master_volume(level.master_volume);

    level.outcome = outcome;
    outcome
}

/// Every triggered checkpoint moves the respawn point. The last one is the
/// finish: the player dances and the level is won once the end sequence
/// has run its course.
fn update_checkpoints(level: &mut Level, dt: f32, outcome: &mut LevelOutcome) {
    let last = level.checkpoints.len().saturating_sub(1);
    for (i, checkpoint) in level.checkpoints.iter().enumerate() {
        if !checkpoint.is_triggered() {
            continue;
        }
        if i == last {
            level.end_timer += dt;
            if level.end_timer > END_SEQUENCE_TIME {
                *outcome = LevelOutcome::Win;
            }
            level.player.set_state(PlayerState::Dancing);
        }
        level.respawn_position = checkpoint.position();
        level.player.set_respawn_position(checkpoint.position());
    }
}

fn handle_input(
    level: &mut Level,
    input: &LevelInput,
    dt: f32,
    outcome: &mut LevelOutcome,
    audio: &mut dyn AudioSink,
) {
    if input.pause {
        *outcome = LevelOutcome::Paused;
    }

    let player = &mut level.player;
    let world = &mut level.world;
    if matches!(player.state(), PlayerState::Dead | PlayerState::Dancing) {
        return;
    }

    if input.move_left {
        player.move_left(world, dt);
    } else if input.move_right {
        player.move_right(world, dt);
    } else if player.state() == PlayerState::Running {
        player.set_state(PlayerState::Idle);
    }

    if input.jump
        && !matches!(
            player.state(),
            PlayerState::Jumping | PlayerState::Falling | PlayerState::Kicking
        )
    {
        player.jump(world);
    }

    if input.attack && player.state() != PlayerState::Kicking {
        audio.play(SoundEffect::Kick);
        player.attack();
    }
}

fn play_footsteps(level: &mut Level, audio: &mut dyn AudioSink) {
    if level.player.state() != PlayerState::Running || level.footstep_timer <= FOOTSTEP_INTERVAL {
        return;
    }
    level.footstep_timer = 0.0;
    if level.alternate_footstep {
        audio.play(SoundEffect::Footstep2);
    } else {
        audio.play(SoundEffect::Footstep1);
    }
    level.alternate_footstep = !level.alternate_footstep;
}

fn update_entities(level: &mut Level, dt: f32) {
    let world = &mut level.world;
    level.player.update(world, dt);
    for enemy in &mut level.enemies {
        enemy.update(world, dt);
    }
    for crate_box in &mut level.crates {
        crate_box.update(world, dt);
    }
    for sawblade in &mut level.sawblades {
        sawblade.update(world, dt);
    }
    for crusher in &mut level.crushers {
        crusher.update(world, dt);
    }
    for coin in &level.coins {
        coin.update(world);
    }
}
