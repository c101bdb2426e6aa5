//! Combo streak and score tracking
//!
//! Score is never stored: it is derived from the cut total and best combo.

use crate::consts::*;

/// Result of recording a swipe's severs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboUpdate {
    /// Combo after the update
    pub combo: u32,
    /// Combo reached the cue threshold on this swipe
    pub combo_cue: bool,
}

/// Session counters for cuts and combos
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboTracker {
    pub total_cuts: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Timestamp (ms) of the last swipe that severed something
    pub last_cut_ms: Option<f64>,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the severs from one swipe at time `now_ms`.
    ///
    /// Returns `None` when the swipe severed nothing; the counters are left
    /// untouched in that case.
    pub fn record_cuts(&mut self, cuts: u32, now_ms: f64) -> Option<ComboUpdate> {
        if cuts == 0 {
            return None;
        }

        let in_window = self
            .last_cut_ms
            .is_some_and(|last| now_ms - last < COMBO_WINDOW_MS);
        self.combo = if in_window { self.combo + cuts } else { cuts };

        self.last_cut_ms = Some(now_ms);
        self.total_cuts += cuts;
        self.max_combo = self.max_combo.max(self.combo);

        Some(ComboUpdate {
            combo: self.combo,
            combo_cue: self.combo >= COMBO_CUE_THRESHOLD,
        })
    }

    /// A stalk reached the bottom uncut
    pub fn record_miss(&mut self) {
        self.combo = 0;
    }

    pub fn score(&self) -> u64 {
        self.total_cuts as u64 * POINTS_PER_CUT + self.max_combo as u64 * POINTS_PER_MAX_COMBO
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_cut_starts_combo() {
        let mut combo = ComboTracker::new();
        let update = combo.record_cuts(1, 10_000.0).unwrap();
        assert_eq!(update.combo, 1);
        assert!(!update.combo_cue);
        assert_eq!(combo.total_cuts, 1);
        assert_eq!(combo.score(), 10 + 50);
    }

    #[test]
    fn test_cuts_within_window_accumulate() {
        let mut combo = ComboTracker::new();
        combo.record_cuts(2, 1_000.0);
        let update = combo.record_cuts(2, 2_500.0).unwrap();
        assert_eq!(update.combo, 4);
        assert!(update.combo_cue);
        assert_eq!(combo.max_combo, 4);
        assert_eq!(combo.total_cuts, 4);
    }

    #[test]
    fn test_gap_restarts_combo() {
        let mut combo = ComboTracker::new();
        combo.record_cuts(3, 1_000.0);
        // Exactly at the window boundary is already too late
        let update = combo.record_cuts(1, 3_000.0).unwrap();
        assert_eq!(update.combo, 1);
        assert_eq!(combo.max_combo, 3);
        assert_eq!(combo.total_cuts, 4);
    }

    #[test]
    fn test_empty_swipe_is_ignored() {
        let mut combo = ComboTracker::new();
        combo.record_cuts(1, 1_000.0);
        assert_eq!(combo.record_cuts(0, 1_500.0), None);
        assert_eq!(combo.last_cut_ms, Some(1_000.0));
        assert_eq!(combo.combo, 1);
    }

    #[test]
    fn test_miss_zeroes_combo() {
        let mut combo = ComboTracker::new();
        combo.record_miss();
        assert_eq!(combo.combo, 0);

        combo.record_cuts(2, 0.0);
        combo.record_miss();
        assert_eq!(combo.combo, 0);
        // Max combo and totals survive a miss
        assert_eq!(combo.max_combo, 2);
        assert_eq!(combo.total_cuts, 2);

        // Next cut inside the window starts from zero
        let update = combo.record_cuts(1, 500.0).unwrap();
        assert_eq!(update.combo, 1);
    }

    #[test]
    fn test_combo_cue_fires_per_qualifying_swipe() {
        let mut combo = ComboTracker::new();
        assert!(!combo.record_cuts(1, 0.0).unwrap().combo_cue);
        assert!(!combo.record_cuts(1, 100.0).unwrap().combo_cue);
        assert!(combo.record_cuts(1, 200.0).unwrap().combo_cue);
        assert!(combo.record_cuts(1, 300.0).unwrap().combo_cue);
    }

    proptest! {
        #[test]
        fn prop_score_matches_formula(
            steps in proptest::collection::vec((0u32..4, 0.0f64..3000.0, any::<bool>()), 0..40)
        ) {
            let mut combo = ComboTracker::new();
            let mut now = 0.0;
            for (cuts, gap, miss) in steps {
                now += gap;
                if miss {
                    combo.record_miss();
                } else {
                    combo.record_cuts(cuts, now);
                }
                let expected = combo.total_cuts as u64 * 10 + combo.max_combo as u64 * 50;
                prop_assert_eq!(combo.score(), expected);
                prop_assert_eq!(combo.score(), combo.score());
                prop_assert!(combo.combo <= combo.max_combo);
            }
        }
    }
}
