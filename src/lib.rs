//! Gapflight - a side-scrolling gap-flying arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, obstacle generation, collisions, session)
//! - `persistence`: Progress record load/save (unlocked level, coins, high score)
//! - `settings`: Host configuration

pub mod persistence;
pub mod settings;
pub mod sim;

pub use persistence::{FileStore, MemoryStore, Progress, ProgressStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed tick period in milliseconds
    pub const TICK_MS: u64 = 15;
    /// Countdown is only advanced once this much wall-clock time has accumulated
    pub const COUNTDOWN_SAMPLE_SECS: f32 = 0.2;

    /// Board dimensions
    pub const BOARD_WIDTH: i32 = 900;
    pub const BOARD_HEIGHT: i32 = 600;
    /// Actor cannot sink below `BOARD_HEIGHT - GROUND_MARGIN`
    pub const GROUND_MARGIN: i32 = 50;
    /// Lower obstacle segments end at `BOARD_HEIGHT - COLUMN_BASE_MARGIN`
    pub const COLUMN_BASE_MARGIN: i32 = 60;

    /// Actor defaults
    pub const ACTOR_WIDTH: i32 = 48;
    pub const ACTOR_HEIGHT: i32 = 36;
    pub const ACTOR_START_VELOCITY: i32 = 2;
    pub const GRAVITY: i32 = 1;
    pub const MAX_FALL_VELOCITY: i32 = 8;
    pub const JUMP_IMPULSE: i32 = 14;

    /// Obstacle generation
    pub const SEGMENT_WIDTH: i32 = 80;
    pub const UNIT_SPACING: i32 = 280;
    pub const SPAWN_MARGIN: i32 = 50;
    pub const BASE_GAP: i32 = 140;
    pub const GAP_SHRINK_PER_LEVEL: i32 = 8;
    pub const MIN_GAP: i32 = 80;
    pub const MIN_GAP_TOP: i32 = 80;
    pub const MIN_SEGMENT_HEIGHT: i32 = 40;
    pub const BASE_SPEED: i32 = 5;
    /// Points between speed escalations
    pub const SPEED_STEP_POINTS: u32 = 5;

    /// Collectibles
    pub const COIN_SIZE: i32 = 24;
    pub const COIN_CHANCE: f64 = 0.6;
    pub const TIMER_BONUS_SIZE: i32 = 28;
    pub const TIMER_BONUS_CHANCE: f64 = 0.18;
    pub const TIMER_BONUS_SECS: f32 = 8.0;

    /// Levels
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 10;
}

/// Gap height for a level: shrinks by 8 per level, floored at 80.
#[inline]
pub fn gap_size_for_level(level: u32) -> i32 {
    use consts::*;
    (BASE_GAP - level as i32 * GAP_SHRINK_PER_LEVEL).max(MIN_GAP)
}

/// Countdown a level starts with, in seconds
#[inline]
pub fn countdown_for_level(level: u32) -> f32 {
    (60 - level as i32 * 3).max(15) as f32
}

/// Points a run must reach for the level to count as passed
#[inline]
pub fn required_points_to_pass(level: u32) -> u32 {
    3 + level
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_one_tuning() {
        assert_eq!(gap_size_for_level(1), 132);
        assert_eq!(countdown_for_level(1), 57.0);
        assert_eq!(required_points_to_pass(1), 4);
    }

    #[test]
    fn test_countdown_floor() {
        assert_eq!(countdown_for_level(10), 30.0);
        assert_eq!(countdown_for_level(20), 15.0);
    }

    proptest! {
        #[test]
        fn gap_never_below_floor(level in 1u32..=10) {
            prop_assert!(gap_size_for_level(level) >= consts::MIN_GAP);
        }

        #[test]
        fn gap_shrinks_until_floor(level in 1u32..10) {
            let here = gap_size_for_level(level);
            let next = gap_size_for_level(level + 1);
            prop_assert!(next < here || next == consts::MIN_GAP);
        }
    }
}
