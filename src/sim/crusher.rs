//! Crusher: a heavy block that periodically drops onto the floor
//!
//! The phase is derived from two flags and the timer rather than stored:
//!
//! ```text
//! Armed --(timer >= interval - warning)--> Warning (slow creep down)
//! Warning --(timer >= interval)--> Crushing (dynamic, shoved down, timer = 0)
//! Crushing --(ground contact)--> Finished (static again)
//! Finished --(timer >= reset)--> Rising --(back at start)--> Armed
//! ```
//!
//! Only a ground contact ends a crush. A crusher that never lands stays
//! dynamic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityTag};
use super::physics::{BodyDesc, PhysicsWorld};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrusherPhase {
    Armed,
    Warning,
    Crushing,
    Finished,
    Rising,
}

#[derive(Debug, Clone)]
pub struct Crusher {
    entity: Entity,
    crushing: bool,
    finished: bool,
    timer: f32,
    interval: f32,
    warning_time: f32,
    reset_time: f32,
    start_position: Vec2,
}

impl Crusher {
    /// `delay` offsets the first drop so neighbouring crushers stagger
    pub fn new(world: &mut PhysicsWorld, index: u32, position: Vec2, delay: f32, interval: f32) -> Self {
        let desc = BodyDesc::fixed(position, CRUSHER_HALF_SIZE).fixed_rotation(true);
        Self {
            entity: Entity::spawn(world, EntityTag::Crusher(index), &desc),
            crushing: false,
            finished: false,
            timer: -delay,
            interval,
            warning_time: CRUSHER_WARNING_TIME,
            reset_time: CRUSHER_RESET_TIME,
            start_position: position,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn is_crushing(&self) -> bool {
        self.crushing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
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

    pub fn phase(&self) -> CrusherPhase {
        if self.finished {
            if self.timer >= self.reset_time {
                CrusherPhase::Rising
            } else {
                CrusherPhase::Finished
            }
        } else if self.crushing {
            CrusherPhase::Crushing
        } else if self.timer >= self.interval - self.warning_time {
            CrusherPhase::Warning
        } else {
            CrusherPhase::Armed
        }
    }

    /// Drop: become dynamic and get shoved downward
    pub fn crush(&mut self, world: &mut PhysicsWorld) {
        self.crushing = true;
        self.timer = 0.0;
        self.entity.set_dynamic(world, true);
        self.entity.apply_force(world, CRUSHER_FORCE);
    }

    /// Ground contact. Ignored unless the crusher is mid-crush.
    pub fn land(&mut self) -> bool {
        if !self.crushing {
            return false;
        }
        self.finished = true;
        true
    }

    pub fn update(&mut self, world: &mut PhysicsWorld, dt: f32) {
        self.timer += dt;

        let armed = !self.crushing && !self.finished;
        if armed && self.timer >= self.interval - self.warning_time {
            let pos = self.entity.position(world);
            self.entity
                .set_position(world, Vec2::new(pos.x, pos.y - CRUSHER_WARNING_SPEED * dt));
        }

        if armed && self.timer >= self.interval {
            self.crush(world);
        }

        if self.finished {
            self.entity.set_dynamic(world, false);
            self.crushing = false;

            if self.timer >= self.reset_time {
                let pos = self.entity.position(world);
                if pos.y < self.start_position.y {
                    let y = (pos.y + CRUSHER_RISE_SPEED * dt).min(self.start_position.y);
                    self.entity.set_position(world, Vec2::new(pos.x, y));
                } else {
                    self.rearm();
                }
            }
        }
    }

    fn rearm(&mut self) {
        self.crushing = false;
        self.finished = false;
        self.timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::BodyKind;

    fn spawn() -> (PhysicsWorld, Crusher) {
        let mut world = PhysicsWorld::new();
        let crusher = Crusher::new(&mut world, 0, Vec2::new(100.0, 20.0), 0.0, 3.0);
        (world, crusher)
    }

    #[test]
    fn test_phase_sequence() {
        let (mut world, mut crusher) = spawn();
        assert_eq!(crusher.phase(), CrusherPhase::Armed);

        // 2.25s: still armed, not moved
        for _ in 0..9 {
            crusher.update(&mut world, 0.25);
        }
        assert_eq!(crusher.phase(), CrusherPhase::Armed);
        assert_eq!(crusher.position(&world).y, 20.0);

        // 2.5s: warning creep begins
        crusher.update(&mut world, 0.25);
        assert_eq!(crusher.phase(), CrusherPhase::Warning);
        assert!(crusher.position(&world).y < 20.0);

        // 3.0s: crushing, dynamic, shoved down, timer restarted
        crusher.update(&mut world, 0.25);
        crusher.update(&mut world, 0.25);
        assert_eq!(crusher.phase(), CrusherPhase::Crushing);
        assert_eq!(crusher.timer(), 0.0);
        assert_eq!(world.body_kind(crusher.entity().body()), BodyKind::Dynamic);
        assert_eq!(world.pending_force(crusher.entity().body()), CRUSHER_FORCE);

        // No ground contact: stays crushing indefinitely
        for _ in 0..40 {
            crusher.update(&mut world, 0.25);
        }
        assert_eq!(crusher.phase(), CrusherPhase::Crushing);

        // Ground contact
        assert!(crusher.land());
        crusher.update(&mut world, 0.25);
        assert_eq!(crusher.phase(), CrusherPhase::Rising);
        assert_eq!(world.body_kind(crusher.entity().body()), BodyKind::Fixed);
    }

    #[test]
    fn test_finished_waits_then_rises_and_rearms() {
        let (mut world, mut crusher) = spawn();
        crusher.crush(&mut world);
        crusher.entity().set_position(&mut world, Vec2::new(100.0, 16.0));
        assert!(crusher.land());

        for _ in 0..7 {
            crusher.update(&mut world, 0.25);
            assert_eq!(crusher.phase(), CrusherPhase::Finished);
        }
        assert_eq!(crusher.position(&world).y, 16.0);

        // 2.0s after the crush it starts to rise
        crusher.update(&mut world, 0.25);
        assert_eq!(crusher.phase(), CrusherPhase::Rising);

        let mut frames = 0;
        while crusher.is_finished() {
            crusher.update(&mut world, 0.25);
            frames += 1;
            assert!(frames < 100);
            assert!(crusher.position(&world).y <= 20.0);
        }
        assert_eq!(crusher.phase(), CrusherPhase::Armed);
        assert_eq!(crusher.timer(), 0.0);
        assert_eq!(crusher.position(&world).y, 20.0);
    }

    #[test]
    fn test_land_requires_crushing() {
        let (_world, mut crusher) = spawn();
        assert!(!crusher.land());
        assert!(!crusher.is_finished());
    }

    #[test]
    fn test_delay_offsets_first_drop() {
        let mut world = PhysicsWorld::new();
        let mut crusher = Crusher::new(&mut world, 1, Vec2::new(104.0, 20.0), 3.0, 3.0);
        for _ in 0..22 {
            crusher.update(&mut world, 0.25);
        }
        // 5.5s in, 2.5s past the delay
        assert_eq!(crusher.phase(), CrusherPhase::Warning);
    }
}
