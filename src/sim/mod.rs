//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Integer positions, one step per tick
//! - Seeded RNG only (one stream per obstacle column)
//! - Real time enters only through the `dt` passed to `tick`
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod column;
pub mod rect;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use actor::Actor;
pub use collision::{CollisionReport, Pickup, detect};
pub use column::{BatchCleared, Gap, ObstacleColumn};
pub use rect::Rect;
pub use snapshot::{EntityView, Snapshot};
pub use state::{
    Body, Collectible, CollectibleKind, EndReason, EntityKind, GameState, LevelLocked,
    ObstacleSegment, Phase, Run, RunSummary,
};
pub use tick::{Command, GameEvent, TickInput, tick};
