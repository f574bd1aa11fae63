//! Level layout: where everything is placed
//!
//! Layouts are plain serde data so they can be shipped as JSON. The
//! `Default` layout is the game's one hand-built level.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::crate_box::CrateKind;
use crate::consts::{PLAYER_START, SAWBLADE_DISTANCE, SAWBLADE_SPEED};

/// Errors raised when validating a layout
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout must contain at least one checkpoint (the last one is the finish)")]
    NoCheckpoints,
    #[error("{what} {index} has a non-finite value")]
    NonFinite { what: &'static str, index: usize },
    #[error("{what} {index} must have a positive size")]
    NonPositiveSize { what: &'static str, index: usize },
    #[error("{what} {index} has a negative distance or duration")]
    Negative { what: &'static str, index: usize },
    #[error("crate {index} cannot start destroyed")]
    StartsDestroyed { index: usize },
    #[error("invalid layout json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A static box: ground piece or wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPlacement {
    pub position: Vec2,
    pub half_size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyPlacement {
    pub position: Vec2,
    pub walk_distance: f32,
    pub idle_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CratePlacement {
    pub position: Vec2,
    pub kind: CrateKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SawbladePlacement {
    pub position: Vec2,
    pub half_size: f32,
    #[serde(default = "default_saw_speed")]
    pub vertical_speed: f32,
    #[serde(default = "default_saw_speed")]
    pub horizontal_speed: f32,
    #[serde(default = "default_saw_distance")]
    pub distance: f32,
}

fn default_saw_speed() -> f32 {
    SAWBLADE_SPEED
}

fn default_saw_distance() -> f32 {
    SAWBLADE_DISTANCE
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrusherPlacement {
    pub position: Vec2,
    /// Offset before the first drop
    pub delay: f32,
    pub interval: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub player_start: Vec2,
    pub grounds: Vec<BoxPlacement>,
    pub walls: Vec<BoxPlacement>,
    pub enemies: Vec<EnemyPlacement>,
    pub crates: Vec<CratePlacement>,
    pub coins: Vec<Vec2>,
    pub sawblades: Vec<SawbladePlacement>,
    pub crushers: Vec<CrusherPlacement>,
    /// In course order; the last one ends the level
    pub checkpoints: Vec<Vec2>,
}

fn ground(x: f32, y: f32, hx: f32, hy: f32) -> BoxPlacement {
    BoxPlacement {
        position: Vec2::new(x, y),
        half_size: Vec2::new(hx, hy),
    }
}

fn enemy(x: f32, y: f32, walk_distance: f32, idle_time: f32) -> EnemyPlacement {
    EnemyPlacement {
        position: Vec2::new(x, y),
        walk_distance,
        idle_time,
    }
}

fn crate_at(x: f32, y: f32, kind: CrateKind) -> CratePlacement {
    CratePlacement {
        position: Vec2::new(x, y),
        kind,
    }
}

fn saw(x: f32, y: f32, half_size: f32, vertical_speed: f32, horizontal_speed: f32, distance: f32) -> SawbladePlacement {
    SawbladePlacement {
        position: Vec2::new(x, y),
        half_size,
        vertical_speed,
        horizontal_speed,
        distance,
    }
}

fn crusher(x: f32, y: f32, delay: f32, interval: f32) -> CrusherPlacement {
    CrusherPlacement {
        position: Vec2::new(x, y),
        delay,
        interval,
    }
}

impl Default for LevelLayout {
    fn default() -> Self {
        use CrateKind::*;

        let grounds = vec![
            ground(0.0, 0.0, 10.0, 2.5),
            ground(35.0, 14.0, 10.0, 0.5),
            ground(57.0, 14.0, 5.0, 0.5),
            ground(72.0, 14.0, 5.0, 0.5),
            ground(103.0, 14.0, 13.0, 0.5),
            ground(124.0, 14.0, 4.0, 0.5),
            ground(151.0, 14.0, 19.0, 0.5),
            ground(202.0, 14.0, 10.0, 0.5),
            ground(227.5, 14.0, 7.5, 0.5),
            ground(255.0, 24.0, 5.0, 0.5),
        ];

        let walls = vec![ground(-20.0, 10.0, 10.0, 10.0)];

        let enemies = vec![
            enemy(36.0, 14.5, 4.0, 4.0),
            enemy(56.0, 14.5, 3.0, 4.0),
            enemy(94.0, 14.5, 2.0, 0.0),
            enemy(142.0, 14.5, 3.0, 2.0),
            enemy(158.0, 14.5, 2.0, 1.0),
            enemy(224.0, 14.5, 2.0, 1.0),
            enemy(230.0, 14.5, 2.0, 3.0),
        ];

        let crates = vec![
            // Tutorial stairs
            crate_at(0.0, 3.0, Wood),
            crate_at(5.0, 3.0, JumpWood),
            crate_at(5.0, 7.0, Wood),
            crate_at(9.5, 3.0, JumpMetal),
            crate_at(15.0, 7.0, JumpMetal),
            crate_at(20.0, 11.0, JumpMetal),
            // Crate wall
            crate_at(45.5, 14.0, Wood),
            crate_at(46.5, 14.0, Wood),
            crate_at(47.5, 14.0, Wood),
            crate_at(48.5, 14.0, Metal),
            crate_at(49.5, 14.0, Wood),
            crate_at(50.5, 14.0, Wood),
            crate_at(51.5, 14.0, Wood),
            crate_at(70.0, 15.0, Wood),
            crate_at(71.5, 16.0, Wood),
            crate_at(73.5, 19.0, Wood),
            crate_at(81.0, 14.0, Metal),
            crate_at(86.0, 14.0, Metal),
            crate_at(112.0, 15.0, Wood),
            crate_at(135.0, 15.0, JumpWood),
            crate_at(133.0, 19.0, Wood),
            crate_at(137.0, 19.0, Wood),
            crate_at(168.0, 20.0, Wood),
            // Metal climb
            crate_at(172.0, 14.0, Metal),
            crate_at(175.0, 16.0, Metal),
            crate_at(172.0, 18.0, Metal),
            crate_at(176.0, 20.0, Metal),
            crate_at(182.0, 22.0, Wood),
            crate_at(180.0, 14.0, JumpMetal),
            crate_at(181.0, 14.0, JumpMetal),
            crate_at(182.0, 14.0, JumpMetal),
            crate_at(187.0, 18.0, Metal),
            crate_at(209.0, 15.0, JumpWood),
            crate_at(205.5, 20.0, Wood),
            crate_at(200.5, 20.0, Wood),
            crate_at(216.0, 14.0, Metal),
            crate_at(240.0, 14.0, JumpMetal),
            crate_at(245.0, 19.0, JumpMetal),
            crate_at(235.0, 19.0, Wood),
            crate_at(240.0, 24.0, Wood),
        ];

        let coins = [
            (-6.0, 3.5),
            (-4.0, 3.5),
            (-2.0, 3.5),
            (9.5, 4.5),
            (9.5, 6.5),
            (9.5, 8.5),
            (15.0, 8.5),
            (15.0, 10.5),
            (15.0, 12.5),
            (20.0, 12.5),
            (20.0, 14.5),
            (20.0, 16.5),
            (81.0, 15.5),
            (86.0, 15.5),
            (120.0, 16.5),
            (124.0, 16.5),
            (128.0, 16.5),
            (135.0, 16.5),
            (135.0, 18.5),
            (135.0, 20.5),
            (148.0, 15.5),
            (151.0, 15.5),
            (154.0, 15.5),
            (172.0, 15.5),
            (175.0, 17.5),
            (172.0, 19.5),
            (176.0, 21.5),
            (187.0, 19.5),
            (209.0, 16.5),
            (209.0, 18.5),
            (209.0, 20.5),
            (240.0, 15.5),
            (240.0, 17.5),
            (240.0, 19.5),
            (245.0, 20.5),
            (245.0, 22.5),
            (245.0, 24.5),
        ]
        .into_iter()
        .map(|(x, y)| Vec2::new(x, y))
        .collect();

        let sawblades = vec![
            saw(79.0, 11.0, 1.0, 2.0, 0.0, 6.0),
            saw(83.5, 11.0, 1.0, 4.0, 0.0, 6.0),
            saw(88.0, 11.0, 1.0, 2.0, 0.0, 6.0),
            saw(124.0, 15.5, 0.5, 0.0, 2.0, 3.0),
            saw(200.5, 15.5, 1.0, 2.0, 0.0, 3.0),
            saw(205.5, 15.5, 1.0, 2.0, 0.0, 3.0),
        ];

        let crushers = vec![
            crusher(100.0, 20.0, 0.0, 3.0),
            crusher(104.0, 20.0, 3.0, 3.0),
            crusher(108.0, 20.0, 0.0, 3.0),
            crusher(148.0, 20.0, 0.0, 0.5),
            crusher(151.0, 20.0, 0.5, 0.5),
            crusher(154.0, 20.0, 1.0, 0.5),
            crusher(203.0, 20.0, 0.0, 3.0),
        ];

        let checkpoints = vec![
            Vec2::new(68.0, 15.0),
            Vec2::new(114.0, 15.0),
            Vec2::new(168.0, 15.0),
            Vec2::new(253.0, 25.0),
        ];

        Self {
            player_start: PLAYER_START,
            grounds,
            walls,
            enemies,
            crates,
            coins,
            sawblades,
            crushers,
            checkpoints,
        }
    }
}

impl LevelLayout {
    /// Parse and validate a layout
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.checkpoints.is_empty() {
            return Err(LayoutError::NoCheckpoints);
        }

        finite("player start", 0, &[self.player_start.x, self.player_start.y])?;

        for (what, boxes) in [("ground", &self.grounds), ("wall", &self.walls)] {
            for (index, b) in boxes.iter().enumerate() {
                finite(what, index, &[b.position.x, b.position.y, b.half_size.x, b.half_size.y])?;
                if b.half_size.x <= 0.0 || b.half_size.y <= 0.0 {
                    return Err(LayoutError::NonPositiveSize { what, index });
                }
            }
        }

        for (index, e) in self.enemies.iter().enumerate() {
            finite("enemy", index, &[e.position.x, e.position.y, e.walk_distance, e.idle_time])?;
            if e.walk_distance < 0.0 || e.idle_time < 0.0 {
                return Err(LayoutError::Negative { what: "enemy", index });
            }
        }

        for (index, c) in self.crates.iter().enumerate() {
            finite("crate", index, &[c.position.x, c.position.y])?;
            if c.kind == CrateKind::Destroyed {
                return Err(LayoutError::StartsDestroyed { index });
            }
        }

        for (index, c) in self.coins.iter().enumerate() {
            finite("coin", index, &[c.x, c.y])?;
        }

        for (index, s) in self.sawblades.iter().enumerate() {
            finite(
                "sawblade",
                index,
                &[s.position.x, s.position.y, s.half_size, s.vertical_speed, s.horizontal_speed, s.distance],
            )?;
            if s.half_size <= 0.0 {
                return Err(LayoutError::NonPositiveSize { what: "sawblade", index });
            }
            if s.distance < 0.0 || s.vertical_speed < 0.0 || s.horizontal_speed < 0.0 {
                return Err(LayoutError::Negative { what: "sawblade", index });
            }
        }

        for (index, c) in self.crushers.iter().enumerate() {
            finite("crusher", index, &[c.position.x, c.position.y, c.delay, c.interval])?;
            if c.delay < 0.0 || c.interval < 0.0 {
                return Err(LayoutError::Negative { what: "crusher", index });
            }
        }

        for (index, c) in self.checkpoints.iter().enumerate() {
            finite("checkpoint", index, &[c.x, c.y])?;
        }

        Ok(())
    }
}

fn finite(what: &'static str, index: usize, values: &[f32]) -> Result<(), LayoutError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(LayoutError::NonFinite { what, index })
    }
}
