//! Per-tick collision detection
//!
//! The actor's box is tested against every live obstacle segment and then
//! every collectible. Touching a segment ends the run; touching collectibles
//! picks all of them up at once.

use super::column::ObstacleColumn;
use super::rect::Rect;
use super::state::{Body, CollectibleKind};

/// A collectible picked up this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub id: u32,
    pub kind: CollectibleKind,
}

/// Result of a collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// The actor hit an obstacle segment
    pub terminal: bool,
    /// Collectibles picked up, in spawn order
    pub pickups: Vec<Pickup>,
}

impl CollisionReport {
    pub fn miss() -> Self {
        Self::default()
    }
}

/// Check the actor against the column, marking touched collectibles as collected.
///
/// A segment hit short-circuits: collectibles touched in the same tick are
/// left alone. Already-collected entities never trigger again.
pub fn detect(actor: &Rect, column: &mut ObstacleColumn) -> CollisionReport {
    if column.segments().iter().any(|s| actor.intersects(&s.bounds())) {
        return CollisionReport {
            terminal: true,
            pickups: Vec::new(),
        };
    }

    let mut report = CollisionReport::miss();
    for collectible in column.collectibles_mut() {
        if collectible.collected || !actor.intersects(&collectible.bounds()) {
            continue;
        }
        collectible.collected = true;
        report.pickups.push(Pickup {
            id: collectible.id,
            kind: collectible.kind,
        });
    }
    report
}
