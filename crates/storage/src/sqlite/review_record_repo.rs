use vocab_core::model::{ReviewRecord, WordId};

use super::{
    SqliteRepository,
    mapping::{db_err, map_record_row, word_id_to_i64},
};
use crate::repository::{ReviewRecordRepository, StorageError};

#[async_trait::async_trait]
impl ReviewRecordRepository for SqliteRepository {
    async fn save_record(&self, record: &ReviewRecord) -> Result<(), StorageError> {
        // `seq` is left alone on conflict so the registration order survives updates.
        sqlx::query(
            r"
            INSERT INTO review_records (word_id, last_reviewed, interval_days, ease_factor)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(word_id) DO UPDATE SET
                last_reviewed = excluded.last_reviewed,
                interval_days = excluded.interval_days,
                ease_factor = excluded.ease_factor
            ",
        )
        .bind(word_id_to_i64(record.item_id)?)
        .bind(record.last_reviewed)
        .bind(i64::from(record.interval))
        .bind(record.ease_factor)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn load_records(&self) -> Result<Vec<ReviewRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT word_id, last_reviewed, interval_days, ease_factor
            FROM review_records
            ORDER BY seq ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_record_row).collect()
    }

    async fn delete_record(&self, word_id: WordId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM review_records WHERE word_id = ?1")
            .bind(word_id_to_i64(word_id)?)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
