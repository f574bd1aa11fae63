//! Audio output seam
//!
//! The game never mixes audio itself. It fires sample triggers and toggles
//! the music through an `AudioSink`; whatever owns the speakers decides what
//! that means. `AudioQueue` is the in-process sink: it records every request
//! so the host can drain and play them (and tests can inspect them).

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Menu button pressed
    ButtonClick,
    /// Player kicks
    Kick,
    /// Player bounces off a crate or enemy
    Bounce,
    /// Wooden crate breaks
    CrateBreak,
    /// Enemy knocked out
    EnemyHit,
    /// Player dies
    Scream,
    /// Left foot
    Footstep1,
    /// Right foot
    Footstep2,
    /// Coin collected
    Coin,
    /// Crusher hits the floor
    Clang,
}

impl SoundEffect {
    /// Slot of this effect in the loaded sample bank
    pub fn sample_index(self) -> usize {
        match self {
            SoundEffect::ButtonClick => 0,
            SoundEffect::Kick => 1,
            SoundEffect::Bounce => 2,
            SoundEffect::CrateBreak => 3,
            SoundEffect::EnemyHit => 4,
            SoundEffect::Scream => 5,
            SoundEffect::Footstep1 => 6,
            SoundEffect::Footstep2 => 7,
            SoundEffect::Coin => 8,
            SoundEffect::Clang => 9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SoundEffect::ButtonClick => "button_click",
            SoundEffect::Kick => "kick",
            SoundEffect::Bounce => "bounce",
            SoundEffect::CrateBreak => "crate_break",
            SoundEffect::EnemyHit => "enemy_hit",
            SoundEffect::Scream => "scream",
            SoundEffect::Footstep1 => "footstep_1",
            SoundEffect::Footstep2 => "footstep_2",
            SoundEffect::Coin => "coin",
            SoundEffect::Clang => "clang",
        }
    }
}

/// Fire-and-forget audio output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn play_music(&mut self);
    fn stop_music(&mut self);
    /// Master volume (0.0 - 1.0)
    fn set_master_volume(&mut self, volume: f32);
}

/// One recorded audio request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEvent {
    Sample(SoundEffect),
    MusicStarted,
    MusicStopped,
}

/// Audio sink that queues requests for the host to drain
#[derive(Debug, Clone)]
pub struct AudioQueue {
    events: Vec<AudioEvent>,
    music_playing: bool,
    master_volume: f32,
}

impl Default for AudioQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            music_playing: false,
            master_volume: 0.5,
        }
    }

    pub fn events(&self) -> &[AudioEvent] {
        &self.events
    }

    /// Take every request queued since the last drain
    pub fn drain(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.events)
    }

    /// How many times `effect` is queued
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.events
            .iter()
            .filter(|e| **e == AudioEvent::Sample(effect))
            .count()
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }
}

impl AudioSink for AudioQueue {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("sample {} ({})", effect.sample_index(), effect.as_str());
        self.events.push(AudioEvent::Sample(effect));
    }

    fn play_music(&mut self) {
        self.music_playing = true;
        self.events.push(AudioEvent::MusicStarted);
    }

    fn stop_music(&mut self) {
        self.music_playing = false;
        self.events.push(AudioEvent::MusicStopped);
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_bank_order() {
        assert_eq!(SoundEffect::ButtonClick.sample_index(), 0);
        assert_eq!(SoundEffect::Scream.sample_index(), 5);
        assert_eq!(SoundEffect::Footstep2.sample_index(), 7);
        assert_eq!(SoundEffect::Clang.sample_index(), 9);
    }

    #[test]
    fn test_queue_records_and_drains() {
        let mut audio = AudioQueue::new();
        audio.play(SoundEffect::Coin);
        audio.play(SoundEffect::Coin);
        audio.play_music();
        assert_eq!(audio.count(SoundEffect::Coin), 2);
        assert!(audio.is_music_playing());

        let drained = audio.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[2], AudioEvent::MusicStarted);
        assert!(audio.events().is_empty());

        audio.stop_music();
        assert!(!audio.is_music_playing());
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = AudioQueue::new();
        audio.set_master_volume(1.5);
        assert_eq!(audio.master_volume(), 1.0);
        audio.set_master_volume(-0.1);
        assert_eq!(audio.master_volume(), 0.0);
    }
}
