//! The persisted progress record

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LEVEL, MIN_LEVEL};

/// Progress carried across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Highest level the player may start (1..=10)
    pub unlocked_level: i32,
    /// Coin wallet
    pub coins: i32,
    /// Best points reached in any run
    pub high_score: i32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            unlocked_level: MIN_LEVEL as i32,
            coins: 0,
            high_score: 0,
        }
    }
}

impl Progress {
    /// Copy with every field forced into its valid range
    pub fn clamped(&self) -> Self {
        Self {
            unlocked_level: self.unlocked_level.clamp(MIN_LEVEL as i32, MAX_LEVEL as i32),
            coins: self.coins.max(0),
            high_score: self.high_score.max(0),
        }
    }

    /// Whether `level` may be started
    pub fn is_unlocked(&self, level: u32) -> bool {
        i64::from(level) <= i64::from(self.unlocked_level)
    }

    /// Raise the unlocked level to `level` (capped at the last level). Never lowers it.
    pub fn unlock(&mut self, level: u32) {
        let level = level.min(MAX_LEVEL) as i32;
        self.unlocked_level = self.unlocked_level.max(level);
    }

    /// Keep the best of the stored high score and `points`.
    /// Returns true when the record was beaten.
    pub fn record_score(&mut self, points: u32) -> bool {
        let points = i32::try_from(points).unwrap_or(i32::MAX);
        if points > self.high_score {
            self.high_score = points;
            true
        } else {
            false
        }
    }

    pub fn add_coins(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.coins = self.coins.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let p = Progress::default();
        assert_eq!((p.unlocked_level, p.coins, p.high_score), (1, 0, 0));
        assert!(p.is_unlocked(1));
        assert!(!p.is_unlocked(2));
    }

    #[test]
    fn test_clamped() {
        let p = Progress {
            unlocked_level: 14,
            coins: -5,
            high_score: -1,
        }
        .clamped();
        assert_eq!(p.unlocked_level, 10);
        assert_eq!(p.coins, 0);
        assert_eq!(p.high_score, 0);

        let p = Progress {
            unlocked_level: 0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(p.unlocked_level, 1);
    }

    #[test]
    fn test_unlock_caps_at_last_level() {
        let mut p = Progress::default();
        p.unlock(11);
        assert_eq!(p.unlocked_level, 10);
    }

    #[test]
    fn test_record_score() {
        let mut p = Progress::default();
        assert!(p.record_score(12));
        assert!(!p.record_score(5));
        assert_eq!(p.high_score, 12);
    }

    proptest! {
        #[test]
        fn unlock_never_decreases(levels in proptest::collection::vec(0u32..20, 0..30)) {
            let mut p = Progress::default();
            let mut last = p.unlocked_level;
            for level in levels {
                p.unlock(level);
                p = p.clamped();
                prop_assert!(p.unlocked_level >= last);
                last = p.unlocked_level;
            }
        }
    }
}
