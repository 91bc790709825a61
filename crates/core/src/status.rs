//! Decoration status enum

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status attached to a decorated file or folder
///
/// Persisted as its ordinal (`0`, `1`, `2`); any other number is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DecorationStatus {
    /// Work on the note has not started
    NotStarted,
    /// Work on the note is underway
    InProgress,
    /// The note is complete
    Documented,
}

impl DecorationStatus {
    /// All statuses in ordinal order
    pub const ALL: [DecorationStatus; 3] = [
        DecorationStatus::NotStarted,
        DecorationStatus::InProgress,
        DecorationStatus::Documented,
    ];

    /// Ordinal used in the persisted file
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Index into per-status lookup tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            DecorationStatus::NotStarted => "not started",
            DecorationStatus::InProgress => "in progress",
            DecorationStatus::Documented => "documented",
        }
    }
}

impl TryFrom<u8> for DecorationStatus {
    type Error = StoreError;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(ordinal as usize)
            .copied()
            .ok_or(StoreError::UnknownStatus(ordinal))
    }
}

impl From<DecorationStatus> for u8 {
    fn from(status: DecorationStatus) -> Self {
        status.ordinal()
    }
}

impl fmt::Display for DecorationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_stable() {
        assert_eq!(DecorationStatus::NotStarted.ordinal(), 0);
        assert_eq!(DecorationStatus::InProgress.ordinal(), 1);
        assert_eq!(DecorationStatus::Documented.ordinal(), 2);
    }

    #[test]
    fn test_try_from_rejects_unknown_ordinal() {
        assert_eq!(DecorationStatus::try_from(2).unwrap(), DecorationStatus::Documented);
        assert!(matches!(
            DecorationStatus::try_from(3),
            Err(StoreError::UnknownStatus(3))
        ));
    }

    #[test]
    fn test_serde_uses_ordinal() {
        let json = serde_json::to_string(&DecorationStatus::InProgress).unwrap();
        assert_eq!(json, "1");

        let status: DecorationStatus = serde_json::from_str("0").unwrap();
        assert_eq!(status, DecorationStatus::NotStarted);

        assert!(serde_json::from_str::<DecorationStatus>("7").is_err());
        assert!(serde_json::from_str::<DecorationStatus>("\"red\"").is_err());
    }
}
