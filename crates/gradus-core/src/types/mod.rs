//! # Core Type Definitions
//!
//! This module contains the foundation types for the Gradus ledger:
//! - Learner identity (`LearnerId`)
//! - Time representation (`Timestamp`, day arithmetic)
//! - Error types (`GradusError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for time offsets to prevent overflow

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// LEARNER IDENTIFIER
// =============================================================================

/// Unique identifier for a learner.
///
/// Every ledger operation is scoped by an explicit `LearnerId` — there is
/// no ambient "current user". Different learners' records never share
/// mutable state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LearnerId(pub String);

impl LearnerId {
    /// Create a new learner identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LearnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// TIMESTAMP
// =============================================================================

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A point in time, stored as unix milliseconds.
///
/// All access-window math is integer arithmetic over this representation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Create a timestamp from unix milliseconds.
    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Get the raw unix-millisecond value.
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Offset this timestamp by whole days (saturating).
    #[must_use]
    pub const fn plus_days(self, days: i64) -> Self {
        Self(self.0.saturating_add(days.saturating_mul(MS_PER_DAY)))
    }

    /// Whole days from `now` until this timestamp, rounded up.
    ///
    /// Returns 0 if this timestamp is not in the future.
    #[must_use]
    pub const fn days_after(self, now: Timestamp) -> i64 {
        let delta = self.0.saturating_sub(now.0);
        if delta <= 0 {
            0
        } else {
            // Ceiling division: a partially elapsed day still counts.
            (delta + MS_PER_DAY - 1) / MS_PER_DAY
        }
    }

    /// Render as an RFC 3339 string for human-facing output.
    ///
    /// Falls back to the raw millisecond value if the timestamp is outside
    /// the representable chrono range.
    #[must_use]
    pub fn to_rfc3339(self) -> String {
        match chrono::DateTime::from_timestamp_millis(self.0) {
            Some(dt) => dt.to_rfc3339(),
            None => format!("{}ms", self.0),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Gradus ledger.
///
/// - No silent persistence failures: every store error propagates
/// - Business-rule "wrong state" cases (graduating when ineligible,
///   extending a non-graduated learner) are *outcomes*, not errors —
///   they must stay safe under retried/duplicate caller actions
#[derive(Debug, Error)]
pub enum GradusError {
    /// The underlying store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A compare-and-swap write lost to a concurrent writer.
    ///
    /// The caller should re-read the record and retry the operation.
    #[error("Write conflict for learner '{learner}': record was modified concurrently")]
    WriteConflict {
        /// The learner whose record was contended.
        learner: LearnerId,
    },

    /// An access extension was requested with a non-positive day count.
    #[error("Invalid extension: {0} days (must be >= 1)")]
    InvalidDays(i64),

    /// A stage name from a boundary (CLI/API) did not match the catalog.
    #[error("Unknown stage: '{0}'")]
    UnknownStage(String),

    /// A question-set name from a boundary did not match the bank.
    #[error("Unknown question set: '{0}'")]
    UnknownQuestionSet(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_days_is_saturating() {
        let far = Timestamp::from_millis(i64::MAX - 10);
        assert_eq!(far.plus_days(1).millis(), i64::MAX);
    }

    #[test]
    fn days_after_rounds_up() {
        let now = Timestamp::from_millis(0);
        // One millisecond into the future still counts as one day.
        assert_eq!(Timestamp::from_millis(1).days_after(now), 1);
        assert_eq!(Timestamp::from_millis(MS_PER_DAY).days_after(now), 1);
        assert_eq!(Timestamp::from_millis(MS_PER_DAY + 1).days_after(now), 2);
    }

    #[test]
    fn days_after_past_is_zero() {
        let now = Timestamp::from_millis(1000);
        assert_eq!(Timestamp::from_millis(0).days_after(now), 0);
        assert_eq!(now.days_after(now), 0);
    }

    #[test]
    fn timestamp_renders_rfc3339() {
        let ts = Timestamp::from_millis(0);
        assert!(ts.to_rfc3339().starts_with("1970-01-01T00:00:00"));
    }
}
