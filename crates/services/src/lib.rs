#![forbid(unsafe_code)]

pub mod app_services;
pub mod dictionary;
pub mod error;
pub mod exchange;
pub mod practice;
pub mod review_service;
pub mod vocabulary_service;

pub use vocab_core::Clock;

pub use app_services::AppServices;
pub use dictionary::{DictionaryClient, NoLookup, WordLookup};
pub use error::{
    AppServicesError, DictionaryError, ExchangeError, PracticeError, ReviewServiceError,
    VocabularyError,
};
pub use exchange::ExchangeFormat;
pub use practice::{FlashcardSession, PracticeService, Quiz, QuizGrade, QuizKind, answers_match};
pub use review_service::{AnswerResult, ReviewService};
pub use vocabulary_service::{ImportReport, VocabularyService, WordProgressRow};
