use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use storage::repository::{ProgressRepository, ReviewRecordRepository};
use vocab_core::{
    PracticeSettings, ReviewScheduler,
    model::{ReviewRecord, WordId, WordProgress},
    time::Clock,
};

use crate::error::ReviewServiceError;

//
// ─── ANSWER RESULT ─────────────────────────────────────────────────────────────
//

/// Outcome of one answered card or question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub progress: WordProgress,
    /// Updated schedule, `None` when the word is not tracked.
    pub record: Option<ReviewRecord>,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Keeps the review scheduler in step with storage.
///
/// The scheduler sits behind a std lock that is never held across an
/// `.await`. Writes that must reach storage also take `write_gate`, an async
/// lock held from the in-memory update until the save returns, so stored
/// records never fall behind the scheduler.
pub struct ReviewService {
    scheduler: Mutex<ReviewScheduler>,
    write_gate: AsyncMutex<()>,
    initial_interval: u32,
    initial_ease: f64,
    records: Arc<dyn ReviewRecordRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ReviewService {
    /// Rebuild the scheduler from persisted records.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if the records cannot be loaded.
    pub async fn load(
        clock: Clock,
        settings: &PracticeSettings,
        records: Arc<dyn ReviewRecordRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Result<Self, ReviewServiceError> {
        let persisted = records.load_records().await?;
        info!(count = persisted.len(), "review records loaded");

        Ok(Self {
            scheduler: Mutex::new(ReviewScheduler::with_records(clock, persisted)),
            write_gate: AsyncMutex::new(()),
            initial_interval: settings.initial_interval_days,
            initial_ease: settings.initial_ease_factor,
            records,
            progress,
        })
    }

    fn scheduler(&self) -> MutexGuard<'_, ReviewScheduler> {
        // Every scheduler mutation completes before it can panic, so a
        // poisoned guard still holds consistent data.
        self.scheduler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current time according to the scheduler's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.scheduler().clock().now()
    }

    /// Replace the clock (usually to move a fixed test clock forward).
    pub fn set_clock(&self, clock: Clock) {
        *self.scheduler().clock_mut() = clock;
    }

    /// Start scheduling reviews for a word.
    ///
    /// Words that are already tracked keep their schedule.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if the record cannot be saved.
    pub async fn track(&self, word_id: WordId) -> Result<ReviewRecord, ReviewServiceError> {
        let _write = self.write_gate.lock().await;
        let record = {
            let scheduler = self.scheduler();
            if let Some(existing) = scheduler.get(word_id) {
                return Ok(existing.clone());
            }
            ReviewRecord::new(
                word_id,
                scheduler.clock().now(),
                self.initial_interval,
                self.initial_ease,
            )
        };

        self.records.save_record(&record).await?;
        let mut scheduler = self.scheduler();
        Ok(scheduler
            .register(
                record.item_id,
                record.last_reviewed,
                record.interval,
                record.ease_factor,
            )
            .clone())
    }

    /// Record an answer: bump the word's progress counters and reschedule it.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if the word does not exist or
    /// persistence fails.
    pub async fn answer(
        &self,
        word_id: WordId,
        correct: bool,
    ) -> Result<AnswerResult, ReviewServiceError> {
        let progress = self
            .progress
            .record_attempt(word_id, correct, self.now())
            .await?;

        let _write = self.write_gate.lock().await;
        let (previous, record) = {
            let mut scheduler = self.scheduler();
            let previous = scheduler.get(word_id).cloned();
            (previous, scheduler.record_outcome(word_id, correct).cloned())
        };
        if let (Some(record), Some(previous)) = (&record, previous) {
            if let Err(err) = self.records.save_record(record).await {
                warn!(%word_id, error = %err, "schedule not saved, keeping previous record");
                self.restore(previous);
                return Err(err.into());
            }
        }
        debug!(%word_id, correct, tracked = record.is_some(), "answer recorded");

        Ok(AnswerResult { progress, record })
    }

    fn restore(&self, record: ReviewRecord) {
        self.scheduler().register(
            record.item_id,
            record.last_reviewed,
            record.interval,
            record.ease_factor,
        );
    }

    /// Drop a word from the in-memory schedule.
    ///
    /// Only the scheduler is touched; stored records go with their word.
    pub fn forget(&self, word_id: WordId) -> Option<ReviewRecord> {
        self.scheduler().remove(word_id)
    }

    #[must_use]
    pub fn due(&self, now: DateTime<Utc>) -> Vec<ReviewRecord> {
        self.scheduler()
            .due_reviews(now)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn due_now(&self) -> Vec<ReviewRecord> {
        self.scheduler().due_now().into_iter().cloned().collect()
    }

    /// Any tracked word's record, due or not.
    #[must_use]
    pub fn random(&self) -> Option<ReviewRecord> {
        self.scheduler().random_record().cloned()
    }

    #[must_use]
    pub fn next_review_date(&self, word_id: WordId) -> Option<DateTime<Utc>> {
        self.scheduler()
            .get(word_id)
            .map(ReviewScheduler::next_review_date)
    }

    #[must_use]
    pub fn record(&self, word_id: WordId) -> Option<ReviewRecord> {
        self.scheduler().get(word_id).cloned()
    }

    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.scheduler().len()
    }
}
