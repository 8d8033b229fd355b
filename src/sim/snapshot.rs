//! Read-only view of the session for a presentation layer
//!
//! Built once per tick; copies everything a renderer needs so the session
//! itself never has to be shared.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Body, EntityKind, GameState, Phase};

/// One drawable body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub rect: Rect,
}

impl EntityView {
    fn of(body: &impl Body) -> Self {
        Self {
            kind: body.kind(),
            rect: body.bounds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    /// Level being played, or the selected level on the menu
    pub level: u32,
    pub selected_level: u32,
    pub score: u32,
    /// Ticks survived in the current run
    pub ticks: u64,
    pub coins: i32,
    pub high_score: i32,
    pub unlocked_level: i32,
    /// Whole seconds left, `None` on the menu
    pub countdown: Option<u32>,
    /// Base scroll speed of the obstacle column
    pub speed: Option<i32>,
    pub actor: Option<EntityView>,
    pub segments: Vec<EntityView>,
    pub collectibles: Vec<EntityView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let run = state.run.as_ref();
        let (segments, collectibles) = match run {
            Some(run) => (
                run.column.segments().iter().map(EntityView::of).collect(),
                run.column
                    .collectibles()
                    .iter()
                    .filter(|c| !c.collected)
                    .map(EntityView::of)
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            phase: state.phase,
            level: state.level(),
            selected_level: state.selected_level,
            score: state.score(),
            ticks: run.map(|r| r.ticks).unwrap_or(0),
            coins: state.progress.coins,
            high_score: state.progress.high_score,
            unlocked_level: state.progress.unlocked_level,
            countdown: run.map(|r| r.countdown_display()),
            speed: run.map(|r| r.column.speed()),
            actor: run.map(|r| EntityView::of(&r.actor)),
            segments,
            collectibles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BASE_SPEED;
    use crate::persistence::{MemoryStore, Progress};
    use crate::sim::state::CollectibleKind;

    fn session() -> GameState {
        let store = MemoryStore::with_progress(Progress {
            unlocked_level: 3,
            coins: 11,
            high_score: 5,
        });
        GameState::new(Box::new(store), 1)
    }

    #[test]
    fn test_menu_snapshot() {
        let snapshot = Snapshot::capture(&session());
        assert_eq!(snapshot.phase, Phase::Menu);
        assert_eq!(snapshot.level, 3);
        assert_eq!(snapshot.coins, 11);
        assert_eq!(snapshot.high_score, 5);
        assert_eq!(snapshot.countdown, None);
        assert_eq!(snapshot.speed, None);
        assert!(snapshot.actor.is_none());
        assert!(snapshot.segments.is_empty());
    }

    #[test]
    fn test_playing_snapshot() {
        let mut state = session();
        state.start_level(2).unwrap();
        let snapshot = Snapshot::capture(&state);

        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.countdown, Some(54));
        assert_eq!(snapshot.speed, Some(BASE_SPEED));
        let actor = snapshot.actor.unwrap();
        assert_eq!(actor.kind, EntityKind::Actor);
        assert_eq!(actor.rect.size.x, 48);

        // 7 gap units, an upper and a lower segment each
        assert_eq!(snapshot.segments.len(), 14);
        let capped = snapshot
            .segments
            .iter()
            .filter(|s| s.kind == EntityKind::Segment { capped: true })
            .count();
        assert_eq!(capped, 7);
        assert!(snapshot.collectibles.iter().all(|c| matches!(
            c.kind,
            EntityKind::Collectible(CollectibleKind::Coin | CollectibleKind::TimerBonus)
        )));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = session();
        state.start_level(1).unwrap();
        let json = serde_json::to_string(&Snapshot::capture(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Snapshot::capture(&state));
    }
}
