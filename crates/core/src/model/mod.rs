mod ids;
mod progress;
mod review;
mod word;

pub use ids::{ParseIdError, WordId};
pub use progress::{ProgressSummary, WordProgress};
pub use review::{
    EASE_STEP, MAX_EASE_FACTOR, MIN_EASE_FACTOR, MIN_INTERVAL_DAYS, ReviewRecord, clamp_ease,
};
pub use word::{
    PartOfSpeech, PartOfSpeechError, ValidatedWord, Word, WordDraft, WordError, WordInfo,
};
