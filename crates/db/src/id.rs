use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-managed document identifier (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(Uuid);

impl DocId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses a client-supplied id; anything malformed is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DocId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_display() {
        let id = DocId::new();
        assert_eq!(DocId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn malformed_ids_do_not_parse() {
        assert_eq!(DocId::parse(""), None);
        assert_eq!(DocId::parse("5a1b2c"), None);
        assert_eq!(DocId::parse("<script>"), None);
    }
}
