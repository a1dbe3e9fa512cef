use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::WordId;

/// Lower bound for the ease factor after any recorded outcome.
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Upper bound for the ease factor after any recorded outcome.
pub const MAX_EASE_FACTOR: f64 = 2.5;
/// Amount the ease factor moves per recorded outcome, before clamping.
pub const EASE_STEP: f64 = 0.1;
/// Shortest possible spacing between reviews, in days.
pub const MIN_INTERVAL_DAYS: u32 = 1;

//
// ─── REVIEW RECORD ─────────────────────────────────────────────────────────────
//

/// Scheduling state for one tracked vocabulary item.
///
/// # Fields
///
/// * `item_id` - The word this record schedules
/// * `last_reviewed` - When the word was last reviewed (or registered)
/// * `interval` - Whole days until the word is due again, never below 1
/// * `ease_factor` - Growth multiplier applied to `interval` on success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub item_id: WordId,
    pub last_reviewed: DateTime<Utc>,
    pub interval: u32,
    pub ease_factor: f64,
}

impl ReviewRecord {
    /// Build a record from caller-supplied values.
    ///
    /// The ease factor is stored as given; it is brought into range by the
    /// next recorded outcome. An interval of zero is raised to one day.
    #[must_use]
    pub fn new(
        item_id: WordId,
        last_reviewed: DateTime<Utc>,
        interval: u32,
        ease_factor: f64,
    ) -> Self {
        Self {
            item_id,
            last_reviewed,
            interval: interval.max(MIN_INTERVAL_DAYS),
            ease_factor,
        }
    }

    /// `last_reviewed + interval` days.
    ///
    /// Saturates at the latest representable instant.
    #[must_use]
    pub fn next_review_at(&self) -> DateTime<Utc> {
        self.last_reviewed
            .checked_add_signed(Duration::days(i64::from(self.interval)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at() <= now
    }

    /// Apply a review verdict.
    ///
    /// Both the new interval and the new ease factor are derived from the
    /// ease factor as it was before this call.
    pub fn apply_outcome(&mut self, correct: bool, reviewed_at: DateTime<Utc>) {
        let ease = self.ease_factor;

        if correct {
            self.interval = grow_interval(self.interval, ease);
            self.ease_factor = clamp_ease(ease + EASE_STEP);
        } else {
            self.interval = MIN_INTERVAL_DAYS;
            self.ease_factor = clamp_ease(ease - EASE_STEP);
        }

        // A caller replaying an older timestamp must not move the record back.
        self.last_reviewed = self.last_reviewed.max(reviewed_at);
    }
}

/// Bring an ease factor into `[MIN_EASE_FACTOR, MAX_EASE_FACTOR]`.
#[must_use]
pub fn clamp_ease(ease_factor: f64) -> f64 {
    ease_factor.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grow_interval(interval: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(interval) * ease_factor).round();
    if grown >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (grown as u32).max(MIN_INTERVAL_DAYS)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn record(interval: u32, ease: f64) -> ReviewRecord {
        ReviewRecord::new(WordId::new(1), fixed_now(), interval, ease)
    }

    #[test]
    fn zero_interval_is_raised_to_one_day() {
        assert_eq!(record(0, 2.5).interval, 1);
    }

    #[test]
    fn ease_factor_is_not_clamped_on_creation() {
        assert_eq!(record(1, 4.0).ease_factor, 4.0);
    }

    #[test]
    fn next_review_adds_interval_days() {
        let r = record(3, 2.5);
        assert_eq!(r.next_review_at(), fixed_now() + Duration::days(3));
        assert!(!r.is_due(fixed_now() + Duration::days(2)));
        assert!(r.is_due(fixed_now() + Duration::days(3)));
    }

    #[test]
    fn correct_answer_uses_pre_update_ease() {
        let mut r = record(4, 2.0);
        r.apply_outcome(true, fixed_now());
        assert_eq!(r.interval, 8);
        assert!((r.ease_factor - 2.1).abs() < 1e-9);
    }

    #[test]
    fn correct_answer_rounds_half_away_from_zero() {
        // 1 * 2.5 = 2.5 -> 3
        let mut r = record(1, 2.5);
        r.apply_outcome(true, fixed_now());
        assert_eq!(r.interval, 3);
    }

    #[test]
    fn incorrect_answer_resets_interval_and_lowers_ease() {
        let mut r = record(40, 2.0);
        r.apply_outcome(false, fixed_now());
        assert_eq!(r.interval, 1);
        assert!((r.ease_factor - 1.9).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_ease_is_clamped_by_next_outcome() {
        let mut high = record(1, 4.0);
        high.apply_outcome(false, fixed_now());
        assert_eq!(high.ease_factor, MAX_EASE_FACTOR);

        let mut low = record(1, 0.5);
        low.apply_outcome(true, fixed_now());
        assert_eq!(low.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn ease_stays_pinned_at_bounds() {
        let mut top = record(1, MAX_EASE_FACTOR);
        top.apply_outcome(true, fixed_now());
        assert_eq!(top.ease_factor, MAX_EASE_FACTOR);

        let mut bottom = record(5, MIN_EASE_FACTOR);
        bottom.apply_outcome(false, fixed_now());
        assert_eq!(bottom.interval, 1);
        assert_eq!(bottom.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn huge_interval_saturates() {
        let mut r = record(u32::MAX, 2.5);
        r.apply_outcome(true, fixed_now());
        assert_eq!(r.interval, u32::MAX);
        assert!(r.next_review_at() > fixed_now());
    }

    #[test]
    fn last_reviewed_never_moves_backwards() {
        let mut r = record(2, 2.0);
        r.apply_outcome(true, fixed_now() - Duration::days(1));
        assert_eq!(r.last_reviewed, fixed_now());

        r.apply_outcome(true, fixed_now() + Duration::days(1));
        assert_eq!(r.last_reviewed, fixed_now() + Duration::days(1));
    }
}
