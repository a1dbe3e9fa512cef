#![forbid(unsafe_code)]

pub mod model;
pub mod scheduler;
pub mod settings;
pub mod time;

pub use scheduler::ReviewScheduler;
pub use settings::PracticeSettings;
pub use time::Clock;
