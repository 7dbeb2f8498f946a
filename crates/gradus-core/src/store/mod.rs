//! # Progress Store
//!
//! The persistence port for progress records. The ledger only ever talks
//! to the [`ProgressStore`] trait — which concrete store backs it is a
//! wiring decision, injected explicitly, never reached through a global.
//!
//! ## Write model
//!
//! Writes are compare-and-swap on the record's `revision`: a record
//! loaded at revision N may only replace a stored record still at
//! revision N (or create a record that does not exist yet, at N = 0).
//! A mismatch fails with [`GradusError::WriteConflict`] instead of
//! silently losing the other writer's update; the caller re-reads and
//! retries. The stored copy always carries `revision + 1`.

pub mod redb_store;

pub use redb_store::RedbStore;

use crate::record::ProgressRecord;
use crate::{GradusError, LearnerId};
use std::collections::BTreeMap;

/// Persistence contract for per-learner progress records.
pub trait ProgressStore {
    /// Load the record for a learner, if one exists.
    fn get(&self, learner: &LearnerId) -> Result<Option<ProgressRecord>, GradusError>;

    /// Persist a record via revision compare-and-swap.
    ///
    /// `record.revision` must equal the currently stored revision (0 if
    /// the record does not exist yet); the stored copy is written with
    /// the revision incremented.
    fn put(&mut self, record: &ProgressRecord) -> Result<(), GradusError>;

    /// Delete a learner's record entirely (administrative reset).
    /// Returns whether a record existed.
    fn delete_all(&mut self, learner: &LearnerId) -> Result<bool, GradusError>;

    /// All records, ordered by learner id (administrative bulk view).
    fn list_all(&self) -> Result<Vec<ProgressRecord>, GradusError>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Volatile `BTreeMap`-backed store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<LearnerId, ProgressRecord>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, learner: &LearnerId) -> Result<Option<ProgressRecord>, GradusError> {
        Ok(self.records.get(learner).cloned())
    }

    fn put(&mut self, record: &ProgressRecord) -> Result<(), GradusError> {
        let stored_revision = self.records.get(&record.learner).map_or(0, |r| r.revision);
        if stored_revision != record.revision {
            return Err(GradusError::WriteConflict {
                learner: record.learner.clone(),
            });
        }

        let mut committed = record.clone();
        committed.revision = record.revision.saturating_add(1);
        self.records.insert(committed.learner.clone(), committed);
        Ok(())
    }

    fn delete_all(&mut self, learner: &LearnerId) -> Result<bool, GradusError> {
        Ok(self.records.remove(learner).is_some())
    }

    fn list_all(&self) -> Result<Vec<ProgressRecord>, GradusError> {
        Ok(self.records.values().cloned().collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StageId, Timestamp};

    #[test]
    fn put_then_get_round_trips_with_bumped_revision() {
        let mut store = MemoryStore::new();
        let learner = LearnerId::new("l1");
        let record = ProgressRecord::init(learner.clone());

        store.put(&record).expect("first write");
        let loaded = store.get(&learner).expect("get").expect("present");
        assert_eq!(loaded.revision, 1);
        assert_eq!(loaded.stamps, record.stamps);
    }

    #[test]
    fn stale_revision_is_a_write_conflict() {
        let mut store = MemoryStore::new();
        let learner = LearnerId::new("l1");
        store
            .put(&ProgressRecord::init(learner.clone()))
            .expect("create");

        // Two readers load revision 1.
        let mut first = store.get(&learner).expect("get").expect("present");
        let mut second = store.get(&learner).expect("get").expect("present");

        first.earn_stamp(StageId::Orientation, Timestamp::from_millis(1));
        store.put(&first).expect("first writer wins");

        second.earn_stamp(StageId::Launch, Timestamp::from_millis(2));
        let err = store.put(&second).expect_err("second writer conflicts");
        assert!(matches!(err, GradusError::WriteConflict { .. }));

        // The first writer's update survived.
        let loaded = store.get(&learner).expect("get").expect("present");
        assert!(loaded.has_stamp(StageId::Orientation));
        assert!(!loaded.has_stamp(StageId::Launch));
    }

    #[test]
    fn creating_over_an_existing_record_conflicts() {
        let mut store = MemoryStore::new();
        let learner = LearnerId::new("l1");
        store
            .put(&ProgressRecord::init(learner.clone()))
            .expect("create");

        let err = store
            .put(&ProgressRecord::init(learner))
            .expect_err("stale create");
        assert!(matches!(err, GradusError::WriteConflict { .. }));
    }

    #[test]
    fn delete_all_removes_the_record() {
        let mut store = MemoryStore::new();
        let learner = LearnerId::new("l1");
        store
            .put(&ProgressRecord::init(learner.clone()))
            .expect("create");

        assert!(store.delete_all(&learner).expect("delete"));
        assert!(store.get(&learner).expect("get").is_none());
        assert!(!store.delete_all(&learner).expect("second delete"));
    }

    #[test]
    fn list_all_is_ordered_by_learner_id() {
        let mut store = MemoryStore::new();
        for id in ["zoe", "ada", "mei"] {
            store
                .put(&ProgressRecord::init(LearnerId::new(id)))
                .expect("create");
        }

        let ids: Vec<String> = store
            .list_all()
            .expect("list")
            .into_iter()
            .map(|r| r.learner.0)
            .collect();
        assert_eq!(ids, vec!["ada", "mei", "zoe"]);
    }
}
