use std::sync::Arc;

use storage::repository::Storage;
use vocab_core::PracticeSettings;

use crate::Clock;
use crate::dictionary::{DictionaryClient, NoLookup, WordLookup};
use crate::error::AppServicesError;
use crate::practice::PracticeService;
use crate::review_service::ReviewService;
use crate::vocabulary_service::VocabularyService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    settings: PracticeSettings,
    reviews: Arc<ReviewService>,
    vocabulary: Arc<VocabularyService>,
    practice: Arc<PracticeService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP dictionary.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization, loading the
    /// review schedule, or building the HTTP client fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: PracticeSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let lookup: Arc<dyn WordLookup> = if settings.auto_lookup {
            Arc::new(
                DictionaryClient::from_settings(&settings).map_err(AppServicesError::Dictionary)?,
            )
        } else {
            Arc::new(NoLookup)
        };
        Self::from_storage(&storage, clock, settings, lookup).await
    }

    /// Build services over an existing storage handle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the review schedule cannot be loaded.
    pub async fn from_storage(
        storage: &Storage,
        clock: Clock,
        settings: PracticeSettings,
        lookup: Arc<dyn WordLookup>,
    ) -> Result<Self, AppServicesError> {
        let reviews = Arc::new(
            ReviewService::load(
                clock,
                &settings,
                Arc::clone(&storage.reviews),
                Arc::clone(&storage.progress),
            )
            .await?,
        );
        let vocabulary = Arc::new(VocabularyService::new(
            clock,
            Arc::clone(&storage.words),
            Arc::clone(&storage.progress),
            Arc::clone(&reviews),
            lookup,
        ));
        let practice = Arc::new(PracticeService::new(
            settings.clone(),
            Arc::clone(&storage.words),
            Arc::clone(&reviews),
        ));

        Ok(Self {
            settings,
            reviews,
            vocabulary,
            practice,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    #[must_use]
    pub fn reviews(&self) -> Arc<ReviewService> {
        Arc::clone(&self.reviews)
    }

    #[must_use]
    pub fn vocabulary(&self) -> Arc<VocabularyService> {
        Arc::clone(&self.vocabulary)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }
}
