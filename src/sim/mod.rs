//! Level simulation
//!
//! All gameplay logic lives here. It is single-threaded and free of I/O:
//! - One fixed physics step per frame
//! - Collision response through the typed dispatcher only
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod crate_box;
pub mod crusher;
pub mod enemy;
pub mod entity;
pub mod layout;
pub mod level;
pub mod physics;
pub mod player;
pub mod sawblade;
pub mod state;
pub mod tick;

pub use animation::{ClipId, ClipLibrary};
pub use collision::{CoinRef, Contact, dispatch};
pub use crate_box::{Crate, CrateKind};
pub use crusher::{Crusher, CrusherPhase};
pub use enemy::{Enemy, EnemyState};
pub use entity::{Entity, EntityKind, EntityTag};
pub use layout::{LayoutError, LevelLayout};
pub use level::Level;
pub use physics::{PhysicsWorld, TouchingPair};
pub use player::{Player, PlayerState};
pub use sawblade::Sawblade;
pub use state::{Checkpoint, Coin, Direction, Facing, Hud, LevelOutcome};
pub use tick::{LevelInput, tick};
