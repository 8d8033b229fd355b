//! Game state and core simulation types
//!
//! Bodies share one capability (advance one tick, report bounds) over a
//! closed set of kinds. The session (`GameState`) owns the actor and the
//! obstacle column only while a level is being played.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::column::ObstacleColumn;
use super::rect::Rect;
use crate::consts::*;
use crate::persistence::{Progress, ProgressStore};
use crate::{countdown_for_level, required_points_to_pass};

/// Every kind of body the simulation knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Actor,
    Segment { capped: bool },
    Collectible(CollectibleKind),
}

/// Something that moves once per tick and can be collided
pub trait Body {
    /// Advance by one fixed tick
    fn tick(&mut self);
    /// Current bounding box
    fn bounds(&self) -> Rect;
    fn kind(&self) -> EntityKind;
}

/// Collectible types (same shape, different effect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// +1 coin
    Coin,
    /// +8 seconds on the countdown
    TimerBonus,
}

impl CollectibleKind {
    pub fn size(&self) -> i32 {
        match self {
            CollectibleKind::Coin => COIN_SIZE,
            CollectibleKind::TimerBonus => TIMER_BONUS_SIZE,
        }
    }
}

/// One half (upper or lower) of a gap unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSegment {
    pub rect: Rect,
    /// Pixels moved left per tick
    pub speed: i32,
    /// Upper segments carry a cap decoration
    pub capped: bool,
}

impl Body for ObstacleSegment {
    fn tick(&mut self) {
        self.rect.pos.x -= self.speed;
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Segment {
            capped: self.capped,
        }
    }
}

/// A coin or timer bonus floating inside a gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub rect: Rect,
    pub speed: i32,
    pub collected: bool,
}

impl Collectible {
    pub fn new(id: u32, kind: CollectibleKind, x: i32, y: i32, speed: i32) -> Self {
        let size = kind.size();
        Self {
            id,
            kind,
            rect: Rect::new(x, y, size, size),
            speed,
            collected: false,
        }
    }
}

impl Body for Collectible {
    fn tick(&mut self) {
        self.rect.pos.x -= self.speed;
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Collectible(self.kind)
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Level select
    Menu,
    /// A level is running
    Playing,
    /// Run just finished; folded back into `Menu` within the same step
    Ended,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Collision,
    TimeUp,
}

/// Starting a level above the unlocked one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLocked {
    pub level: u32,
    pub unlocked: i32,
}

impl std::fmt::Display for LevelLocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Level {} is locked. Finish earlier levels first (unlocked: {}).",
            self.level, self.unlocked
        )
    }
}

impl std::error::Error for LevelLocked {}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub level: u32,
    pub points: u32,
    pub passed: bool,
    pub new_high_score: bool,
    pub unlocked_level: i32,
}

/// Everything that exists only while a level is played
pub struct Run {
    pub level: u32,
    pub actor: Actor,
    pub column: ObstacleColumn,
    /// Seconds left on the level clock
    pub countdown: f32,
    /// Wall-clock seconds not yet applied to the countdown
    pub unsampled: f32,
    /// Never set by gameplay; a frozen clock discards elapsed time
    pub timer_frozen: bool,
    /// Ticks survived in this run
    pub ticks: u64,
}

impl Run {
    fn new(level: u32, seed: u64) -> Self {
        Self {
            level,
            actor: Actor::centered(),
            column: ObstacleColumn::new(level, seed),
            countdown: countdown_for_level(level),
            unsampled: 0.0,
            timer_frozen: false,
            ticks: 0,
        }
    }

    /// Countdown as shown to the player: whole seconds, never negative
    pub fn countdown_display(&self) -> u32 {
        self.countdown.max(0.0) as u32
    }
}

/// The session: menu/playing state machine plus persisted progress
pub struct GameState {
    /// Current phase
    pub phase: Phase,
    /// Level the menu would start
    pub selected_level: u32,
    /// In-memory progress (written back on level end, menu return and exit)
    pub progress: Progress,
    /// Active level, present only while `Playing`
    pub run: Option<Run>,
    /// Set once the exit command was processed
    pub exited: bool,
    /// Minimum wall-clock seconds accumulated before the countdown is updated
    pub countdown_sample: f32,
    store: Box<dyn ProgressStore>,
    seeds: Pcg32,
}

impl GameState {
    /// Create a session, loading progress from `store`
    pub fn new(mut store: Box<dyn ProgressStore>, seed: u64) -> Self {
        let progress = store.load().clamped();
        Self {
            phase: Phase::Menu,
            selected_level: (progress.unlocked_level as u32).min(MAX_LEVEL),
            progress,
            run: None,
            exited: false,
            countdown_sample: COUNTDOWN_SAMPLE_SECS,
            store,
            seeds: Pcg32::seed_from_u64(seed),
        }
    }

    /// Points of the current run (0 on the menu)
    pub fn score(&self) -> u32 {
        self.run.as_ref().map(|r| r.column.points()).unwrap_or(0)
    }

    pub fn level(&self) -> u32 {
        self.run.as_ref().map(|r| r.level).unwrap_or(self.selected_level)
    }

    /// Select the level the menu would start. Locked levels may be selected.
    pub fn select_level(&mut self, level: u32) {
        self.selected_level = level.clamp(MIN_LEVEL, MAX_LEVEL);
    }

    /// Menu -> Playing. Rejected without any state change when the level is locked.
    pub fn start_level(&mut self, level: u32) -> Result<(), LevelLocked> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) || !self.progress.is_unlocked(level) {
            log::info!("Level {} rejected (unlocked: {})", level, self.progress.unlocked_level);
            return Err(LevelLocked {
                level,
                unlocked: self.progress.unlocked_level,
            });
        }

        let seed = self.seeds.next_u64();
        let run = Run::new(level, seed);
        log::info!(
            "Level {} started: {}s on the clock, {} to pass",
            level,
            run.countdown,
            required_points_to_pass(level)
        );
        self.selected_level = level;
        self.run = Some(run);
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Playing -> Ended -> Menu. Applies the unlock rule, the high score and persists.
    pub fn end_run(&mut self, reason: EndReason) -> Option<RunSummary> {
        let run = self.run.take()?;
        self.phase = Phase::Ended;

        let points = run.column.points();
        let passed = points >= required_points_to_pass(run.level);
        if passed {
            self.progress.unlock(run.level + 1);
        }
        let new_high_score = self.progress.record_score(points);

        log::info!(
            "Level {} ended ({:?}): {} points, {}",
            run.level,
            reason,
            points,
            if passed { "passed" } else { "not passed" }
        );

        self.persist();
        self.phase = Phase::Menu;

        Some(RunSummary {
            level: run.level,
            points,
            passed,
            new_high_score,
            unlocked_level: self.progress.unlocked_level,
        })
    }

    /// Playing -> Menu without counting the level as passed
    pub fn return_to_menu(&mut self) -> Option<u32> {
        let run = self.run.take()?;
        let points = run.column.points();
        self.progress.record_score(points);
        log::info!("Left level {} with {} points", run.level, points);
        self.persist();
        self.phase = Phase::Menu;
        Some(points)
    }

    /// Menu -> exit. Persists; the host terminates afterwards.
    pub fn exit(&mut self) {
        self.persist();
        self.exited = true;
        log::info!("Exit requested");
    }

    /// Best-effort write; failures keep the in-memory state
    pub fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.progress) {
            log::warn!("Error saving progress: {e:#}");
        }
    }
}
