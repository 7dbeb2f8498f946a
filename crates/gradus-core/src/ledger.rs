//! # Ledger
//!
//! The high-level facade combining a storage backend with a clock.
//!
//! Every operation follows the same shape: load the learner's record
//! (or a lazy default), apply a pure transition from [`crate::stamps`],
//! [`crate::graduation`], or [`crate::aptitude`], and commit via the
//! store's revision compare-and-swap. Mutations happen on a loaded copy,
//! so a failed write leaves no half-applied in-memory state behind —
//! callers must never assume a mutation stuck unless the operation
//! returned `Ok`.
//!
//! No-op transitions skip the write entirely: a re-earned stamp or a
//! duplicate graduation does not burn a revision.

use crate::aptitude::bank::{Choice, QuestionSetId};
use crate::clock::{Clock, SystemClock};
use crate::graduation::{ExtensionOutcome, GraduationOutcome};
use crate::record::{AptitudeResult, ProgressRecord};
use crate::store::{MemoryStore, ProgressStore, RedbStore};
use crate::{GradusError, LearnerId, StageId};
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for a Ledger.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory records (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed records using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

impl StorageBackend {
    fn store(&self) -> &dyn ProgressStore {
        match self {
            StorageBackend::InMemory(s) => s,
            StorageBackend::Persistent(s) => s,
        }
    }

    fn store_mut(&mut self) -> &mut dyn ProgressStore {
        match self {
            StorageBackend::InMemory(s) => s,
            StorageBackend::Persistent(s) => s,
        }
    }
}

// =============================================================================
// LEDGER
// =============================================================================

/// The learner-progress ledger: storage backend plus injected clock.
pub struct Ledger {
    backend: StorageBackend,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an in-memory ledger with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::default(),
            clock: Box::new(SystemClock),
        }
    }

    /// Create a ledger with persistent redb storage and the system clock.
    ///
    /// Opens or creates a redb database at the given path.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, GradusError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbStore::open(path)?),
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the clock (tests, replays).
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    /// Load a learner's record, or the lazy default if none is stored.
    ///
    /// The default is *not* persisted here — only a mutating operation
    /// writes it back.
    pub fn load_or_init(&self, learner: &LearnerId) -> Result<ProgressRecord, GradusError> {
        Ok(self
            .backend
            .store()
            .get(learner)?
            .unwrap_or_else(|| ProgressRecord::init(learner.clone())))
    }

    fn commit(&mut self, record: &ProgressRecord) -> Result<(), GradusError> {
        self.backend.store_mut().put(record)
    }

    // =========================================================================
    // STAMP TRACKER
    // =========================================================================

    /// Earn the stamp for a stage. Lazily creates the record; idempotent
    /// for an already-completed stamp. Returns whether anything changed.
    pub fn earn_stamp(&mut self, learner: &LearnerId, stage: StageId) -> Result<bool, GradusError> {
        let mut record = self.load_or_init(learner)?;
        let now = self.clock.now();
        if !record.earn_stamp(stage, now) {
            return Ok(false);
        }
        self.commit(&record)?;
        Ok(true)
    }

    /// Whether the learner holds the stamp for a stage.
    pub fn has_stamp(&self, learner: &LearnerId, stage: StageId) -> Result<bool, GradusError> {
        Ok(self.load_or_init(learner)?.has_stamp(stage))
    }

    /// Number of completed stamps.
    pub fn completed_stamp_count(&self, learner: &LearnerId) -> Result<usize, GradusError> {
        Ok(self.load_or_init(learner)?.completed_stamp_count())
    }

    /// Whether every stage's stamp is completed.
    pub fn has_all_stamps(&self, learner: &LearnerId) -> Result<bool, GradusError> {
        Ok(self.load_or_init(learner)?.has_all_stamps())
    }

    /// Record the external capstone completion signal.
    pub fn record_capstone(
        &mut self,
        learner: &LearnerId,
        summary: impl Into<String>,
    ) -> Result<(), GradusError> {
        let mut record = self.load_or_init(learner)?;
        let now = self.clock.now();
        record.record_capstone(summary, now);
        self.commit(&record)
    }

    // =========================================================================
    // GRADUATION GATE
    // =========================================================================

    /// Whether the graduation gate is open for a learner.
    pub fn can_graduate(&self, learner: &LearnerId) -> Result<bool, GradusError> {
        Ok(self.load_or_init(learner)?.can_graduate())
    }

    /// Attempt the one-way graduation transition.
    pub fn graduate(
        &mut self,
        learner: &LearnerId,
        review: impl Into<String>,
    ) -> Result<GraduationOutcome, GradusError> {
        let mut record = self.load_or_init(learner)?;
        let now = self.clock.now();
        let outcome = record.graduate(review, now);
        if outcome.changed() {
            self.commit(&record)?;
        }
        Ok(outcome)
    }

    // =========================================================================
    // ACCESS EXTENSION (ADMINISTRATIVE)
    // =========================================================================

    /// Extend a graduated learner's access window.
    ///
    /// A learner with no stored record has not graduated, so this is a
    /// no-op that does not create a record.
    pub fn extend_access(
        &mut self,
        learner: &LearnerId,
        additional_days: i64,
    ) -> Result<ExtensionOutcome, GradusError> {
        if additional_days < 1 {
            return Err(GradusError::InvalidDays(additional_days));
        }
        let Some(mut record) = self.backend.store().get(learner)? else {
            return Ok(ExtensionOutcome::NotGraduated);
        };
        let now = self.clock.now();
        let outcome = record.extend_access(additional_days, now)?;
        if outcome.changed() {
            self.commit(&record)?;
        }
        Ok(outcome)
    }

    /// Whether elevated access is currently valid.
    pub fn is_access_valid(&self, learner: &LearnerId) -> Result<bool, GradusError> {
        let now = self.clock.now();
        Ok(self.load_or_init(learner)?.is_access_valid(now))
    }

    /// Whole days of access remaining (0 if not graduated or lapsed).
    pub fn remaining_access_days(&self, learner: &LearnerId) -> Result<i64, GradusError> {
        let now = self.clock.now();
        Ok(self.load_or_init(learner)?.remaining_access_days(now))
    }

    // =========================================================================
    // APTITUDE ENGINE
    // =========================================================================

    /// The question set the next run should use, per the rotation rule:
    /// never the set of the immediately prior run.
    pub fn next_question_set(
        &self,
        learner: &LearnerId,
        rng: &mut impl Rng,
    ) -> Result<QuestionSetId, GradusError> {
        let record = self.load_or_init(learner)?;
        let previous = record.aptitude.as_ref().map(|r| r.question_set);
        Ok(crate::aptitude::select_question_set(previous, rng).id)
    }

    /// Score a completed aptitude run and persist it, overwriting any
    /// previous result. `set` of `None` applies the rotation rule.
    pub fn run_aptitude(
        &mut self,
        learner: &LearnerId,
        set: Option<QuestionSetId>,
        answers: BTreeMap<String, Choice>,
        rng: &mut impl Rng,
    ) -> Result<AptitudeResult, GradusError> {
        let mut record = self.load_or_init(learner)?;

        let set_id = match set {
            Some(explicit) => explicit,
            None => {
                let previous = record.aptitude.as_ref().map(|r| r.question_set);
                crate::aptitude::select_question_set(previous, rng).id
            }
        };

        let outcome = crate::aptitude::score(&answers, set_id.questions());
        let result = AptitudeResult {
            completed_at: self.clock.now(),
            answers,
            result_type: outcome.result_type,
            scores: outcome.scores,
            question_set: set_id,
        };
        record.aptitude = Some(result.clone());
        self.commit(&record)?;
        Ok(result)
    }

    // =========================================================================
    // ADMINISTRATIVE SURFACE
    // =========================================================================

    /// Delete a learner's record entirely. Returns whether one existed.
    pub fn reset(&mut self, learner: &LearnerId) -> Result<bool, GradusError> {
        self.backend.store_mut().delete_all(learner)
    }

    /// All records, ordered by learner id.
    pub fn list_all(&self) -> Result<Vec<ProgressRecord>, GradusError> {
        self.backend.store().list_all()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;
    use crate::clock::FixedClock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ledger_at(ms: i64) -> Ledger {
        Ledger::new().with_clock(FixedClock::at(Timestamp::from_millis(ms)))
    }

    #[test]
    fn read_ops_do_not_create_records() {
        let ledger = ledger_at(0);
        let learner = LearnerId::new("l1");

        assert!(!ledger.has_stamp(&learner, StageId::Launch).expect("read"));
        assert_eq!(ledger.completed_stamp_count(&learner).expect("read"), 0);
        assert!(ledger.list_all().expect("list").is_empty());
    }

    #[test]
    fn earn_stamp_lazily_creates_and_persists() {
        let mut ledger = ledger_at(0);
        let learner = LearnerId::new("l1");

        assert!(ledger.earn_stamp(&learner, StageId::Orientation).expect("earn"));
        assert!(!ledger.earn_stamp(&learner, StageId::Orientation).expect("repeat"));
        assert_eq!(ledger.list_all().expect("list").len(), 1);

        // The repeat skipped the write, so only one revision was spent.
        let record = ledger.load_or_init(&learner).expect("load");
        assert_eq!(record.revision, 1);
    }

    #[test]
    fn extend_access_does_not_create_a_record() {
        let mut ledger = ledger_at(0);
        let learner = LearnerId::new("ghost");

        let outcome = ledger.extend_access(&learner, 30).expect("extend");
        assert_eq!(outcome, ExtensionOutcome::NotGraduated);
        assert!(ledger.list_all().expect("list").is_empty());
    }

    #[test]
    fn aptitude_run_overwrites_previous_result() {
        let mut ledger = ledger_at(0);
        let learner = LearnerId::new("l1");
        let mut rng = StdRng::seed_from_u64(3);

        let first = ledger
            .run_aptitude(&learner, Some(QuestionSetId::Set1), BTreeMap::new(), &mut rng)
            .expect("run");
        assert_eq!(first.question_set, QuestionSetId::Set1);

        let second = ledger
            .run_aptitude(&learner, None, BTreeMap::new(), &mut rng)
            .expect("rerun");
        // Rotation: the second run never reuses Set1.
        assert_ne!(second.question_set, QuestionSetId::Set1);

        let record = ledger.load_or_init(&learner).expect("load");
        assert_eq!(record.aptitude.expect("present").question_set, second.question_set);
    }

    #[test]
    fn reset_discards_the_whole_record() {
        let mut ledger = ledger_at(0);
        let learner = LearnerId::new("l1");

        ledger.earn_stamp(&learner, StageId::Creation).expect("earn");
        assert!(ledger.reset(&learner).expect("reset"));
        assert!(!ledger.has_stamp(&learner, StageId::Creation).expect("read"));
        assert!(!ledger.reset(&learner).expect("second reset"));
    }
}
