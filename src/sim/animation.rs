//! Animation clip timing
//!
//! Only the clock side of skeletal playback lives here: which clip is
//! playing, how far in, and whether a one-shot clip has reached its end.
//! State machines key their transitions off the end-of-clip signal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named animation clips shared by the character models
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClipId {
    Idle,
    Run,
    Kick,
    Jump,
    Fall,
    Land,
    Dance,
    Death,
}

/// Clip durations (seconds) available to a model.
///
/// A clip missing from the library is a content gap: state changes that
/// would select it leave the current clip playing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipLibrary {
    durations: BTreeMap<ClipId, f32>,
}

impl ClipLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Clip set shipped with the player model
    pub fn player() -> Self {
        Self::empty()
            .with(ClipId::Idle, 2.0)
            .with(ClipId::Run, 0.8)
            .with(ClipId::Kick, 1.0)
            .with(ClipId::Jump, 0.6)
            .with(ClipId::Fall, 1.0)
            .with(ClipId::Land, 0.5)
            .with(ClipId::Dance, 3.0)
            .with(ClipId::Death, 1.5)
    }

    /// Clip set shipped with the enemy model
    pub fn enemy() -> Self {
        Self::empty().with(ClipId::Idle, 2.0).with(ClipId::Run, 0.8)
    }

    pub fn with(mut self, clip: ClipId, duration: f32) -> Self {
        self.durations.insert(clip, duration);
        self
    }

    pub fn without(mut self, clip: ClipId) -> Self {
        self.durations.remove(&clip);
        self
    }

    pub fn duration(&self, clip: ClipId) -> Option<f32> {
        self.durations.get(&clip).copied()
    }
}

/// Plays one clip at a time
#[derive(Debug, Clone, Default)]
pub struct ClipPlayer {
    clip: Option<ClipId>,
    duration: f32,
    time: f32,
    speed: f32,
    looping: bool,
}

impl ClipPlayer {
    /// Start `clip` from the beginning. Returns false (and keeps the current
    /// clip) when the library has no such clip.
    pub fn play(&mut self, library: &ClipLibrary, clip: ClipId, looping: bool, speed: f32) -> bool {
        let Some(duration) = library.duration(clip) else {
            log::warn!("Animation clip {:?} missing, keeping {:?}", clip, self.clip);
            return false;
        };
        self.clip = Some(clip);
        self.duration = duration;
        self.time = 0.0;
        self.speed = speed;
        self.looping = looping;
        true
    }

    /// Advance playback. Returns true when a non-looping clip has reached
    /// its end; a finished clip stays clamped at its last frame.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.clip.is_none() {
            return false;
        }
        self.time += dt * self.speed;
        if self.time > self.duration {
            if self.looping {
                self.time = if self.duration > 0.0 {
                    self.time % self.duration
                } else {
                    0.0
                };
            } else {
                self.time = self.duration;
                return true;
            }
        }
        false
    }

    pub fn clip(&self) -> Option<ClipId> {
        self.clip
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_clip_finishes() {
        let library = ClipLibrary::empty().with(ClipId::Kick, 1.0);
        let mut player = ClipPlayer::default();
        assert!(player.play(&library, ClipId::Kick, false, 3.0));

        // 1.0s clip at 3x speed ends after ~0.33s
        assert!(!player.update(0.25));
        assert!(player.update(0.25));
        assert_eq!(player.time(), 1.0);
    }

    #[test]
    fn test_looping_clip_wraps() {
        let library = ClipLibrary::player();
        let mut player = ClipPlayer::default();
        player.play(&library, ClipId::Run, true, 1.0);
        for _ in 0..10 {
            assert!(!player.update(0.3));
        }
        assert!(player.time() < 0.8);
    }

    #[test]
    fn test_missing_clip_keeps_current() {
        let library = ClipLibrary::player().without(ClipId::Dance);
        let mut player = ClipPlayer::default();
        player.play(&library, ClipId::Idle, true, 1.0);
        assert!(!player.play(&library, ClipId::Dance, true, 1.0));
        assert_eq!(player.clip(), Some(ClipId::Idle));
    }

    #[test]
    fn test_no_clip_never_finishes() {
        let mut player = ClipPlayer::default();
        assert!(!player.update(100.0));
        assert_eq!(player.clip(), None);
    }
}
