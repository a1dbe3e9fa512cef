use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, trace};

use crate::model::{ReviewRecord, WordId};
use crate::time::Clock;

//
// ─── SCHEDULER ─────────────────────────────────────────────────────────────────
//

/// In-memory spaced-repetition scheduler.
///
/// Keeps one [`ReviewRecord`] per tracked word, in registration order, and
/// applies a simplified SM-2 rule on every recorded outcome:
///
/// - correct: `interval = round(interval * ease)`, `ease = ease + 0.1`
/// - incorrect: `interval = 1`, `ease = ease - 0.1`
///
/// with `ease` clamped to `[1.3, 2.5]` afterwards.
///
/// The scheduler does no locking. Share it between threads behind a single
/// `Mutex` around the whole value.
///
/// # Examples
///
/// ```
/// # use vocab_core::{Clock, ReviewScheduler};
/// # use vocab_core::model::WordId;
/// # use vocab_core::time::fixed_now;
/// let mut scheduler = ReviewScheduler::new(Clock::fixed(fixed_now()));
/// scheduler.register(WordId::new(1), fixed_now(), 1, 2.5);
///
/// scheduler.record_outcome(WordId::new(1), true);
/// let record = scheduler.get(WordId::new(1)).unwrap();
/// assert_eq!(record.interval, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    clock: Clock,
    records: Vec<ReviewRecord>,
    index: HashMap<WordId, usize>,
}

impl ReviewScheduler {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Rebuild a scheduler from persisted records, keeping their order.
    #[must_use]
    pub fn with_records(clock: Clock, records: impl IntoIterator<Item = ReviewRecord>) -> Self {
        let mut scheduler = Self::new(clock);
        for record in records {
            scheduler.insert(record);
        }
        scheduler
    }

    /// Start tracking a word with the given initial schedule.
    ///
    /// Registering a word that is already tracked replaces its values in
    /// place; it keeps its original position in the registration order.
    pub fn register(
        &mut self,
        item_id: WordId,
        last_reviewed: DateTime<Utc>,
        interval: u32,
        ease_factor: f64,
    ) -> &ReviewRecord {
        debug!(%item_id, interval, ease_factor, "registering review record");
        self.insert(ReviewRecord::new(
            item_id,
            last_reviewed,
            interval,
            ease_factor,
        ))
    }

    fn insert(&mut self, record: ReviewRecord) -> &ReviewRecord {
        let existing = self.index.get(&record.item_id).copied();
        let slot = match existing {
            Some(slot) => {
                self.records[slot] = record;
                slot
            }
            None => {
                let slot = self.records.len();
                self.index.insert(record.item_id, slot);
                self.records.push(record);
                slot
            }
        };
        &self.records[slot]
    }

    /// Apply a review verdict to the word's record, stamped with the
    /// scheduler's clock.
    ///
    /// Unknown words are ignored; `None` is returned in that case and callers
    /// should not treat it as an error.
    pub fn record_outcome(&mut self, item_id: WordId, correct: bool) -> Option<&ReviewRecord> {
        let Some(&slot) = self.index.get(&item_id) else {
            trace!(%item_id, "outcome for untracked word ignored");
            return None;
        };

        let now = self.clock.now();
        let record = &mut self.records[slot];
        record.apply_outcome(correct, now);
        debug!(
            %item_id,
            correct,
            interval = record.interval,
            ease_factor = record.ease_factor,
            "review outcome recorded"
        );
        Some(&*record)
    }

    /// Stop tracking a word. Later records shift up one place.
    pub fn remove(&mut self, item_id: WordId) -> Option<ReviewRecord> {
        let slot = self.index.remove(&item_id)?;
        let record = self.records.remove(slot);
        for idx in self.index.values_mut() {
            if *idx > slot {
                *idx -= 1;
            }
        }
        debug!(%item_id, "review record removed");
        Some(record)
    }

    /// When the record falls due: `last_reviewed + interval` days.
    #[must_use]
    pub fn next_review_date(record: &ReviewRecord) -> DateTime<Utc> {
        record.next_review_at()
    }

    /// Records due at or before `now`, in registration order.
    #[must_use]
    pub fn due_reviews(&self, now: DateTime<Utc>) -> Vec<&ReviewRecord> {
        self.records.iter().filter(|r| r.is_due(now)).collect()
    }

    /// Records due according to the scheduler's own clock.
    #[must_use]
    pub fn due_now(&self) -> Vec<&ReviewRecord> {
        self.due_reviews(self.clock.now())
    }

    /// Any tracked record, picked uniformly at random. Not limited to due ones.
    #[must_use]
    pub fn random_record(&self) -> Option<&ReviewRecord> {
        self.random_record_with(&mut rand::rng())
    }

    /// Like [`random_record`](Self::random_record) with a caller-supplied source.
    pub fn random_record_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ReviewRecord> {
        self.records.choose(rng)
    }

    #[must_use]
    pub fn get(&self, item_id: WordId) -> Option<&ReviewRecord> {
        self.index.get(&item_id).map(|&slot| &self.records[slot])
    }

    #[must_use]
    pub fn contains(&self, item_id: WordId) -> bool {
        self.index.contains_key(&item_id)
    }

    /// All records in registration order.
    #[must_use]
    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
