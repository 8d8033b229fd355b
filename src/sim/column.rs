//! Procedural obstacle column
//!
//! Generates a batch of gap units ahead of the visible board, scrolls it
//! left and regenerates as soon as the last segment has left the screen.
//! One full batch clear is one point; every 5 points the scroll speed goes up.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Rect;
use super::state::{Body, Collectible, CollectibleKind, ObstacleSegment};
use crate::consts::*;
use crate::gap_size_for_level;

/// Emitted when the live segment set drains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchCleared {
    /// Points after the clear
    pub points: u32,
    /// New base speed if this clear triggered an escalation
    pub speed_up: Option<i32>,
}

/// Vertical extent of a gap opening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub x: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Gap {
    pub fn center(&self) -> i32 {
        (self.top + self.bottom) / 2
    }
}

#[derive(Debug, Clone)]
pub struct ObstacleColumn {
    level: u32,
    rng: Pcg32,
    segments: Vec<ObstacleSegment>,
    collectibles: Vec<Collectible>,
    points: u32,
    speed: i32,
    next_speed_up: u32,
    next_id: u32,
}

impl ObstacleColumn {
    /// Create a column for `level` and generate its first batch
    pub fn new(level: u32, seed: u64) -> Self {
        let mut column = Self {
            level,
            rng: Pcg32::seed_from_u64(seed),
            segments: Vec::new(),
            collectibles: Vec::new(),
            points: 0,
            speed: BASE_SPEED,
            next_speed_up: SPEED_STEP_POINTS,
            next_id: 1,
        };
        column.generate();
        column
    }

    /// Batches cleared so far
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn set_points(&mut self, points: u32) {
        self.points = points;
    }

    /// Base scroll speed (before the level bonus)
    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Pixels per tick every entity of the current batch moves
    pub fn unit_speed(&self) -> i32 {
        self.speed + (self.level / 2) as i32
    }

    pub fn segments(&self) -> &[ObstacleSegment] {
        &self.segments
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn collectibles_mut(&mut self) -> &mut [Collectible] {
        &mut self.collectibles
    }

    /// Change the base speed and re-apply it to everything alive
    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
        let unit_speed = self.unit_speed();
        for segment in &mut self.segments {
            segment.speed = unit_speed;
        }
        for collectible in &mut self.collectibles {
            collectible.speed = unit_speed;
        }
    }

    /// Scroll everything one tick. Regenerates and scores when the segments drain.
    pub fn tick(&mut self) -> Option<BatchCleared> {
        for segment in &mut self.segments {
            segment.tick();
        }
        self.segments.retain(|s| !s.bounds().is_off_screen_left());

        for collectible in &mut self.collectibles {
            collectible.tick();
        }
        self.collectibles
            .retain(|c| !c.collected && !c.bounds().is_off_screen_left());

        if !self.segments.is_empty() {
            return None;
        }

        self.points += 1;
        let mut speed_up = None;
        if self.points >= self.next_speed_up {
            self.speed += 1;
            self.next_speed_up += SPEED_STEP_POINTS;
            speed_up = Some(self.speed);
            log::info!("Speed up to {} at {} points", self.speed, self.points);
        }
        self.generate();

        Some(BatchCleared {
            points: self.points,
            speed_up,
        })
    }

    /// Drop collectibles picked up this tick
    pub fn purge_collected(&mut self) {
        self.collectibles.retain(|c| !c.collected);
    }

    /// Nearest gap whose segments are not yet fully behind `x`
    pub fn next_gap(&self, x: i32) -> Option<Gap> {
        let top = self
            .segments
            .iter()
            .filter(|s| s.capped && s.rect.right() > x)
            .min_by_key(|s| s.rect.left())?;
        let bottom = self
            .segments
            .iter()
            .find(|s| !s.capped && s.rect.left() == top.rect.left())?;
        Some(Gap {
            x: top.rect.left(),
            top: top.rect.bottom(),
            bottom: bottom.rect.top(),
        })
    }

    /// Replace the live sets with a fresh batch of `5 + level` gap units
    fn generate(&mut self) {
        self.segments.clear();
        self.collectibles.clear();

        let level = self.level as i32;
        let gap = gap_size_for_level(self.level);
        let units = 5 + level;
        let unit_speed = self.unit_speed();
        let start_x = BOARD_WIDTH + SPAWN_MARGIN;
        let ground = BOARD_HEIGHT - COLUMN_BASE_MARGIN;
        let max_gap_top = ground - gap - MIN_SEGMENT_HEIGHT;

        // One vertical offset per batch so consecutive batches differ in shape
        let offset = self.rng.random_range(0..6);

        for i in 0..units {
            let raw_top = 120 + offset * 40 + i * 30 - level * 2 + self.rng.random_range(0..40);
            let gap_top = raw_top.clamp(MIN_GAP_TOP.max(MIN_SEGMENT_HEIGHT), max_gap_top);
            let gap_bottom = gap_top + gap;
            let x = start_x + i * UNIT_SPACING;

            self.segments.push(ObstacleSegment {
                rect: Rect::new(x, 0, SEGMENT_WIDTH, gap_top),
                speed: unit_speed,
                capped: true,
            });
            self.segments.push(ObstacleSegment {
                rect: Rect::new(x, gap_bottom, SEGMENT_WIDTH, ground - gap_bottom),
                speed: unit_speed,
                capped: false,
            });

            if self.rng.random_bool(COIN_CHANCE) {
                let jitter = self.rng.random_range(0..30) - 15;
                let y = gap_top + gap / 2 - COIN_SIZE / 2 + jitter;
                self.spawn(CollectibleKind::Coin, x + (SEGMENT_WIDTH - COIN_SIZE) / 2, y, gap_top, gap_bottom);
            }
            if self.rng.random_bool(TIMER_BONUS_CHANCE) {
                let dx = self.rng.random_range(0..SEGMENT_WIDTH - TIMER_BONUS_SIZE);
                let y = gap_top + 20 + self.rng.random_range(0..(gap - 40).max(10));
                self.spawn(CollectibleKind::TimerBonus, x + dx, y, gap_top, gap_bottom);
            }
        }

        log::debug!(
            "Level {} batch: {} units, gap {}, speed {}",
            self.level,
            units,
            gap,
            unit_speed
        );
    }

    /// Add a collectible, keeping it fully inside the gap opening
    fn spawn(&mut self, kind: CollectibleKind, x: i32, y: i32, gap_top: i32, gap_bottom: i32) {
        let y = y.clamp(gap_top, gap_bottom - kind.size());
        let id = self.next_id;
        self.next_id += 1;
        self.collectibles
            .push(Collectible::new(id, kind, x, y, self.unit_speed()));
    }
}

#[cfg(test)]
impl ObstacleColumn {
    pub(crate) fn extend_collectibles(&mut self, items: impl IntoIterator<Item = Collectible>) {
        self.collectibles.extend(items);
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<ObstacleSegment> {
        &mut self.segments
    }
}
