//! # Graduation Gate & Access Extension
//!
//! The one-way `NOT_GRADUATED → GRADUATED` transition, the 180-day
//! access window it grants, and the administrative extension of that
//! window.
//!
//! Wrong-state calls (graduating when ineligible, extending a
//! non-graduated learner) are reachable from retried or duplicate caller
//! actions, so they resolve to explicit no-op *outcomes*, never errors.
//! A repeated `graduate` must not reset `graduated_at` or
//! `access_expires_at`.

use crate::record::ProgressRecord;
use crate::{GradusError, Timestamp};
use serde::{Deserialize, Serialize};

/// Days of elevated access granted at graduation.
pub const FIXED_ACCESS_WINDOW_DAYS: i64 = 180;

// =============================================================================
// OUTCOMES
// =============================================================================

/// Result of a graduation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraduationOutcome {
    /// The transition fired; the record changed.
    Graduated,
    /// Already graduated — no-op, timestamps untouched.
    AlreadyGraduated,
    /// Stamps or capstone missing — no-op.
    NotEligible,
}

impl GraduationOutcome {
    /// Whether the record was mutated.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, GraduationOutcome::Graduated)
    }
}

/// Result of an access-extension attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionOutcome {
    /// The window was extended to the contained expiry.
    Extended(Timestamp),
    /// The learner has not graduated — no-op.
    NotGraduated,
}

impl ExtensionOutcome {
    /// Whether the record was mutated.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, ExtensionOutcome::Extended(_))
    }
}

// =============================================================================
// TRANSITIONS
// =============================================================================

impl ProgressRecord {
    /// Whether the graduation gate is open: every stamp completed, a
    /// capstone result present, and not already graduated.
    #[must_use]
    pub fn can_graduate(&self) -> bool {
        self.has_all_stamps() && self.has_capstone() && !self.graduation.is_graduated
    }

    /// Attempt the graduation transition at `now`.
    ///
    /// On success sets `is_graduated`, `graduated_at = now`, stores the
    /// review (may be empty), and grants
    /// `access_expires_at = now + FIXED_ACCESS_WINDOW_DAYS`. This is the
    /// only writer of `graduated_at` and the only initial writer of
    /// `access_expires_at`.
    pub fn graduate(&mut self, review: impl Into<String>, now: Timestamp) -> GraduationOutcome {
        if self.graduation.is_graduated {
            return GraduationOutcome::AlreadyGraduated;
        }
        if !self.can_graduate() {
            return GraduationOutcome::NotEligible;
        }

        self.graduation.is_graduated = true;
        self.graduation.graduated_at = Some(now);
        self.graduation.review = Some(review.into());
        self.graduation.access_expires_at = Some(now.plus_days(FIXED_ACCESS_WINDOW_DAYS));
        GraduationOutcome::Graduated
    }

    /// Extend the access window by `additional_days`.
    ///
    /// Base-date rule: a lapsed window extends from `now`, a live window
    /// extends from its current expiry — continuous coverage for learners
    /// who extend in time, no stacking on top of an already-past date.
    /// `access_expires_at` never moves backwards.
    pub fn extend_access(
        &mut self,
        additional_days: i64,
        now: Timestamp,
    ) -> Result<ExtensionOutcome, GradusError> {
        if additional_days < 1 {
            return Err(GradusError::InvalidDays(additional_days));
        }
        if !self.graduation.is_graduated {
            return Ok(ExtensionOutcome::NotGraduated);
        }

        let base = match self.graduation.access_expires_at {
            Some(expiry) if expiry > now => expiry,
            _ => now,
        };
        let new_expiry = base.plus_days(additional_days);
        self.graduation.access_expires_at = Some(new_expiry);
        Ok(ExtensionOutcome::Extended(new_expiry))
    }

    /// Whether elevated access is currently valid.
    #[must_use]
    pub fn is_access_valid(&self, now: Timestamp) -> bool {
        self.graduation.is_graduated
            && self
                .graduation
                .access_expires_at
                .is_some_and(|expiry| expiry > now)
    }

    /// Whole days of access remaining, rounded up; 0 if not graduated
    /// or already lapsed.
    #[must_use]
    pub fn remaining_access_days(&self, now: Timestamp) -> i64 {
        if !self.graduation.is_graduated {
            return 0;
        }
        self.graduation
            .access_expires_at
            .map_or(0, |expiry| expiry.days_after(now))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LearnerId, StageId};

    fn eligible_record(now: Timestamp) -> ProgressRecord {
        let mut r = ProgressRecord::init(LearnerId::new("l1"));
        for stage in StageId::ALL {
            r.earn_stamp(stage, now);
        }
        r.record_capstone("done", now);
        r
    }

    #[test]
    fn gate_requires_all_stamps_and_capstone() {
        let now = Timestamp::from_millis(0);
        let mut r = ProgressRecord::init(LearnerId::new("l1"));

        for stage in StageId::ALL.into_iter().take(5) {
            r.earn_stamp(stage, now);
        }
        r.record_capstone("done", now);
        assert!(!r.can_graduate());

        r.earn_stamp(StageId::Launch, now);
        assert!(r.can_graduate());
    }

    #[test]
    fn gate_requires_capstone_even_with_all_stamps() {
        let now = Timestamp::from_millis(0);
        let mut r = ProgressRecord::init(LearnerId::new("l1"));
        for stage in StageId::ALL {
            r.earn_stamp(stage, now);
        }
        assert!(!r.can_graduate());
    }

    #[test]
    fn graduation_grants_180_day_window() {
        let now = Timestamp::from_millis(1_000_000);
        let mut r = eligible_record(now);

        assert_eq!(r.graduate("thanks", now), GraduationOutcome::Graduated);
        assert!(r.graduation.is_graduated);
        assert_eq!(r.graduation.graduated_at, Some(now));
        assert_eq!(
            r.graduation.access_expires_at,
            Some(now.plus_days(FIXED_ACCESS_WINDOW_DAYS))
        );
        assert!(!r.can_graduate());
    }

    #[test]
    fn repeated_graduation_is_a_noop() {
        let first = Timestamp::from_millis(1_000);
        let later = Timestamp::from_millis(9_999_999);
        let mut r = eligible_record(first);

        r.graduate("first", first);
        let graduated_at = r.graduation.graduated_at;
        let expires_at = r.graduation.access_expires_at;

        assert_eq!(r.graduate("again", later), GraduationOutcome::AlreadyGraduated);
        assert_eq!(r.graduation.graduated_at, graduated_at);
        assert_eq!(r.graduation.access_expires_at, expires_at);
        assert_eq!(r.graduation.review.as_deref(), Some("first"));
    }

    #[test]
    fn ineligible_graduation_is_a_noop() {
        let now = Timestamp::from_millis(0);
        let mut r = ProgressRecord::init(LearnerId::new("l1"));

        assert_eq!(r.graduate("early", now), GraduationOutcome::NotEligible);
        assert!(!r.graduation.is_graduated);
        assert!(r.graduation.graduated_at.is_none());
    }

    #[test]
    fn extension_before_lapse_stacks_on_expiry() {
        let now = Timestamp::from_millis(0);
        let mut r = eligible_record(now);
        r.graduate("", now);

        let expiry = r.graduation.access_expires_at.expect("granted");
        let outcome = r.extend_access(30, now).expect("valid days");
        assert_eq!(outcome, ExtensionOutcome::Extended(expiry.plus_days(30)));
    }

    #[test]
    fn extension_after_lapse_restarts_from_now() {
        let start = Timestamp::from_millis(0);
        let mut r = eligible_record(start);
        r.graduate("", start);

        // Well past the 180-day window.
        let later = start.plus_days(400);
        let outcome = r.extend_access(30, later).expect("valid days");
        assert_eq!(outcome, ExtensionOutcome::Extended(later.plus_days(30)));
    }

    #[test]
    fn extension_requires_graduation() {
        let now = Timestamp::from_millis(0);
        let mut r = ProgressRecord::init(LearnerId::new("l1"));

        let outcome = r.extend_access(30, now).expect("valid days");
        assert_eq!(outcome, ExtensionOutcome::NotGraduated);
        assert!(r.graduation.access_expires_at.is_none());
    }

    #[test]
    fn extension_rejects_non_positive_days() {
        let now = Timestamp::from_millis(0);
        let mut r = eligible_record(now);
        r.graduate("", now);

        assert!(r.extend_access(0, now).is_err());
        assert!(r.extend_access(-5, now).is_err());
    }

    #[test]
    fn access_validity_and_remaining_days() {
        let now = Timestamp::from_millis(0);
        let mut r = eligible_record(now);
        assert!(!r.is_access_valid(now));
        assert_eq!(r.remaining_access_days(now), 0);

        r.graduate("", now);
        assert!(r.is_access_valid(now));
        assert_eq!(r.remaining_access_days(now), FIXED_ACCESS_WINDOW_DAYS);

        let lapsed = now.plus_days(FIXED_ACCESS_WINDOW_DAYS);
        assert!(!r.is_access_valid(lapsed));
        assert_eq!(r.remaining_access_days(lapsed), 0);
    }
}
