//! Draw list generation
//!
//! The game never issues draw calls. Each frame it hands the renderer an
//! ordered list of (mesh, transform, material override) items plus a
//! camera, built from the transforms the simulation just synced.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{CHECKPOINT_HALF_SIZE, COIN_HALF_SIZE, CRATE_HALF_SIZE, CRUSHER_HALF_SIZE, PLANK_HALF_SIZE};
use crate::sim::{CrateKind, Level};

/// Geometry to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mesh {
    /// Axis-aligned box with the given half extents in the play plane
    Box { half_extents: Vec2 },
    /// Skinned player model
    PlayerModel,
    /// Skinned enemy model
    EnemyModel,
}

/// Material override; `None` on a draw item means the mesh's own material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    Floor,
    Wall,
    Metal,
    Wood,
    Crate,
    JumpCrate,
    MetalCrate,
    MetalJumpCrate,
    Coin,
    Checkpoint,
    Sawblade,
}

impl Material {
    /// Material for an intact crate of the given kind
    pub fn for_crate(kind: CrateKind) -> Option<Self> {
        match kind {
            CrateKind::Wood => Some(Material::Crate),
            CrateKind::Metal => Some(Material::MetalCrate),
            CrateKind::JumpWood => Some(Material::JumpCrate),
            CrateKind::JumpMetal => Some(Material::MetalJumpCrate),
            CrateKind::Destroyed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub mesh: Mesh,
    pub transform: Mat4,
    pub material: Option<Material>,
}

impl DrawItem {
    fn new(mesh: Mesh, transform: Mat4, material: Option<Material>) -> Self {
        Self {
            mesh,
            transform,
            material,
        }
    }
}

/// Camera looking down the z axis at the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Camera {
    /// Below this height the camera stops following the player down
    const FLOOR_Y: f32 = 3.0;

    pub fn follow(player: Vec2) -> Self {
        if player.y < Self::FLOOR_Y {
            Self {
                eye: Vec3::new(player.x, 5.0, 7.5),
                target: Vec3::new(player.x, 4.0, 0.0),
            }
        } else {
            Self {
                eye: Vec3::new(player.x, player.y + 2.0, 7.5),
                target: Vec3::new(player.x, player.y + 1.0, 0.0),
            }
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// 45° vertical field of view
    pub fn projection_matrix(aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(45f32.to_radians(), aspect_ratio, 0.1, 100.0)
    }
}

/// Everything to draw this frame, in draw order
pub fn draw_list(level: &Level) -> Vec<DrawItem> {
    let mut items = Vec::new();

    for (ground, half) in level.grounds.iter().zip(&level.ground_sizes) {
        items.push(DrawItem::new(
            Mesh::Box { half_extents: *half },
            ground.transform(),
            Some(Material::Floor),
        ));
    }
    for (wall, half) in level.walls.iter().zip(&level.wall_sizes) {
        items.push(DrawItem::new(
            Mesh::Box { half_extents: *half },
            wall.transform(),
            Some(Material::Wall),
        ));
    }

    items.push(DrawItem::new(
        Mesh::PlayerModel,
        level.player.model_transform(&level.world),
        None,
    ));
    for enemy in &level.enemies {
        items.push(DrawItem::new(
            Mesh::EnemyModel,
            enemy.model_transform(&level.world),
            None,
        ));
    }

    for crusher in &level.crushers {
        items.push(DrawItem::new(
            Mesh::Box {
                half_extents: CRUSHER_HALF_SIZE,
            },
            crusher.entity().transform(),
            Some(Material::Metal),
        ));
    }

    for crate_box in &level.crates {
        match Material::for_crate(crate_box.kind()) {
            Some(material) => items.push(DrawItem::new(
                Mesh::Box {
                    half_extents: CRATE_HALF_SIZE,
                },
                crate_box.entity().transform(),
                Some(material),
            )),
            None => {
                for plank in crate_box.planks() {
                    items.push(DrawItem::new(
                        Mesh::Box {
                            half_extents: PLANK_HALF_SIZE,
                        },
                        plank.transform(),
                        Some(Material::Wood),
                    ));
                }
            }
        }
    }

    let coin_mesh = Mesh::Box {
        half_extents: COIN_HALF_SIZE,
    };
    for crate_box in level.crates.iter().filter(|c| c.kind() == CrateKind::Destroyed) {
        for coin in crate_box.coins().iter().filter(|c| !c.is_collected()) {
            items.push(DrawItem::new(coin_mesh, coin.entity().transform(), Some(Material::Coin)));
        }
    }
    for coin in level.coins.iter().filter(|c| !c.is_collected()) {
        items.push(DrawItem::new(coin_mesh, coin.entity().transform(), Some(Material::Coin)));
    }

    for checkpoint in &level.checkpoints {
        items.push(DrawItem::new(
            Mesh::Box {
                half_extents: CHECKPOINT_HALF_SIZE,
            },
            checkpoint.entity().transform(),
            Some(Material::Checkpoint),
        ));
    }

    for sawblade in &level.sawblades {
        items.push(DrawItem::new(
            Mesh::Box {
                half_extents: Vec2::splat(sawblade.half_size()),
            },
            sawblade.entity().transform(),
            Some(Material::Sawblade),
        ));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLANK_COUNT;
    use crate::sim::LevelLayout;

    #[test]
    fn test_fresh_level_draw_list() {
        let level = Level::new(&LevelLayout::default()).unwrap();
        let items = draw_list(&level);
        // 10 ground + 1 wall + player + 7 enemies + 7 crushers + 40 crates
        // + 37 coins + 4 checkpoints + 6 sawblades
        assert_eq!(items.len(), 10 + 1 + 1 + 7 + 7 + 40 + 37 + 4 + 6);
        assert_eq!(items[0].material, Some(Material::Floor));
        assert_eq!(items[10].material, Some(Material::Wall));
        assert_eq!(items[11].mesh, Mesh::PlayerModel);
        assert_eq!(items.last().map(|i| i.material), Some(Some(Material::Sawblade)));
    }

    #[test]
    fn test_destroyed_crate_draws_planks_and_coins() {
        let mut level = Level::new(&LevelLayout::default()).unwrap();
        let before = draw_list(&level).len();
        // First crate is wooden with three coins
        level.crates[0].destroy(&mut level.world);
        let items = draw_list(&level);
        assert_eq!(items.len(), before - 1 + PLANK_COUNT + 3);
        assert!(items.iter().any(|i| i.material == Some(Material::Wood)));

        if let Some(coin) = level.crates[0].coin_mut(0) {
            coin.collect();
        }
        assert_eq!(draw_list(&level).len(), before - 1 + PLANK_COUNT + 2);
    }

    #[test]
    fn test_camera_holds_height_near_floor() {
        let low = Camera::follow(Vec2::new(10.0, -4.0));
        assert_eq!(low.eye, Vec3::new(10.0, 5.0, 7.5));
        let high = Camera::follow(Vec2::new(10.0, 14.0));
        assert_eq!(high.target, Vec3::new(10.0, 15.0, 0.0));
        assert!(high.view_matrix().is_finite());
    }
}
