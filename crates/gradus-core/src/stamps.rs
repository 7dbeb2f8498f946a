//! # Stamp Tracker
//!
//! Pure transitions over the stamp ledger of a [`ProgressRecord`], plus
//! the capstone presence marker. Persistence and clock wiring live in
//! the [`Ledger`](crate::Ledger); the functions here only mutate an
//! in-memory record and report whether anything changed, so a caller
//! that skips the write on `false` never burns a revision on a no-op.

use crate::record::{CapstoneResult, ProgressRecord, Stamp};
use crate::{StageId, Timestamp};

impl ProgressRecord {
    /// Earn the stamp for a stage at `now`.
    ///
    /// Idempotent: if the stamp is already completed this is a no-op
    /// that preserves the original `completed_at` (repeated external
    /// completion triggers must not corrupt timestamps). Returns whether
    /// the record changed.
    pub fn earn_stamp(&mut self, stage: StageId, now: Timestamp) -> bool {
        let stamp = self.stamps.entry(stage).or_insert_with(|| Stamp::fresh(stage));
        if stamp.completed {
            return false;
        }
        stamp.completed = true;
        stamp.completed_at = Some(now);
        true
    }

    /// Whether the stamp for a stage is completed.
    #[must_use]
    pub fn has_stamp(&self, stage: StageId) -> bool {
        self.stamp(stage).completed
    }

    /// Number of completed stamps, 0..=6.
    #[must_use]
    pub fn completed_stamp_count(&self) -> usize {
        StageId::ALL
            .into_iter()
            .filter(|&stage| self.has_stamp(stage))
            .count()
    }

    /// Whether every stage's stamp is completed.
    #[must_use]
    pub fn has_all_stamps(&self) -> bool {
        StageId::ALL.into_iter().all(|stage| self.has_stamp(stage))
    }

    /// Record the external capstone completion signal at `now`.
    ///
    /// Presence, not content, is what the graduation gate checks; the
    /// summary is stored opaquely. Re-recording replaces the marker and
    /// still counts as a change.
    pub fn record_capstone(&mut self, summary: impl Into<String>, now: Timestamp) {
        self.capstone = Some(CapstoneResult {
            recorded_at: now,
            summary: summary.into(),
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LearnerId;

    fn record() -> ProgressRecord {
        ProgressRecord::init(LearnerId::new("l1"))
    }

    #[test]
    fn earn_stamp_sets_completed_at() {
        let mut r = record();
        let t = Timestamp::from_millis(42);

        assert!(r.earn_stamp(StageId::Foundations, t));
        assert!(r.has_stamp(StageId::Foundations));
        assert_eq!(r.stamp(StageId::Foundations).completed_at, Some(t));
    }

    #[test]
    fn re_earning_preserves_original_timestamp() {
        let mut r = record();
        let first = Timestamp::from_millis(42);
        let later = Timestamp::from_millis(9000);

        assert!(r.earn_stamp(StageId::Creation, first));
        assert!(!r.earn_stamp(StageId::Creation, later));
        assert_eq!(r.stamp(StageId::Creation).completed_at, Some(first));
    }

    #[test]
    fn stamp_count_tracks_distinct_stages() {
        let mut r = record();
        let t = Timestamp::from_millis(1);

        r.earn_stamp(StageId::Orientation, t);
        r.earn_stamp(StageId::Orientation, t);
        r.earn_stamp(StageId::Launch, t);

        assert_eq!(r.completed_stamp_count(), 2);
        assert!(!r.has_all_stamps());
    }

    #[test]
    fn all_stamps_after_every_stage() {
        let mut r = record();
        for stage in StageId::ALL {
            r.earn_stamp(stage, Timestamp::from_millis(1));
        }
        assert!(r.has_all_stamps());
        assert_eq!(r.completed_stamp_count(), StageId::COUNT);
    }

    #[test]
    fn capstone_presence_is_recorded() {
        let mut r = record();
        assert!(!r.has_capstone());

        r.record_capstone("market analysis attached", Timestamp::from_millis(7));
        assert!(r.has_capstone());
    }
}
