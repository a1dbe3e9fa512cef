use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a vocabulary entry, assigned by the vocabulary store.
///
/// The scheduler treats it as opaque: it only compares and hashes it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(u64);

impl WordId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordId({})", self.0)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid word id: {raw:?}")]
pub struct ParseIdError {
    raw: String,
}

impl FromStr for WordId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(WordId::new)
            .map_err(|_| ParseIdError { raw: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_bare_number() {
        assert_eq!(WordId::new(42).to_string(), "42");
        assert_eq!(format!("{:?}", WordId::new(42)), "WordId(42)");
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        let id: WordId = " 7 ".parse().unwrap();
        assert_eq!(id, WordId::new(7));
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = "abc".parse::<WordId>().unwrap_err();
        assert_eq!(err.to_string(), "invalid word id: \"abc\"");
    }
}
