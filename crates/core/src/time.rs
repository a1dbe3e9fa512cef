use chrono::{DateTime, Duration, Utc};

/// Where the scheduler and services read "now" from.
///
/// The CLI runs on `System`. Tests pin a `Fixed` instant and step it forward
/// a day at a time to make cards come due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match *self {
            Self::System => Utc::now(),
            Self::Fixed(at) => at,
        }
    }

    /// Step a fixed clock forward by whole days, stopping at the largest
    /// representable instant. The system clock ignores this.
    pub fn advance_days(&mut self, days: i64) {
        if let Self::Fixed(at) = self {
            *at = Duration::try_days(days)
                .and_then(|step| at.checked_add_signed(step))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
        }
    }
}

/// 2023-11-14T22:13:20Z, the instant every test schedule starts from.
///
/// # Panics
///
/// Never in practice: the timestamp is a constant within chrono's range.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("timestamp in range")
}
