//! # redb-backed Progress Store
//!
//! Disk persistence for progress records using the redb embedded
//! database: ACID transactions, crash safety (copy-on-write B-trees),
//! MVCC, zero configuration.
//!
//! Records are postcard-serialized and keyed by learner id. The
//! revision compare-and-swap happens inside a single write transaction,
//! so two external processes sharing the database file cannot silently
//! overwrite each other's updates.

use crate::record::ProgressRecord;
use crate::store::ProgressStore;
use crate::{GradusError, LearnerId};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// Table for records: learner id -> serialized ProgressRecord bytes.
const RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("progress_records");

/// A disk-backed progress store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a progress database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GradusError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| GradusError::Storage(e.to_string()))?;

        // Initialize the table if it doesn't exist.
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| GradusError::Storage(e.to_string()))?;
            let _ = write_txn
                .open_table(RECORDS)
                .map_err(|e| GradusError::Storage(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| GradusError::Storage(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), GradusError> {
        self.db
            .compact()
            .map_err(|e| GradusError::Storage(e.to_string()))?;
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<ProgressRecord, GradusError> {
        postcard::from_bytes(bytes).map_err(|e| GradusError::Serialization(e.to_string()))
    }
}

impl ProgressStore for RedbStore {
    fn get(&self, learner: &LearnerId) -> Result<Option<ProgressRecord>, GradusError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| GradusError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(RECORDS)
            .map_err(|e| GradusError::Storage(e.to_string()))?;

        table
            .get(learner.as_str())
            .map_err(|e| GradusError::Storage(e.to_string()))?
            .map(|guard| Self::decode(guard.value()))
            .transpose()
    }

    fn put(&mut self, record: &ProgressRecord) -> Result<(), GradusError> {
        let mut committed = record.clone();
        committed.revision = record.revision.saturating_add(1);
        let bytes = postcard::to_allocvec(&committed)
            .map_err(|e| GradusError::Serialization(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| GradusError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(RECORDS)
                .map_err(|e| GradusError::Storage(e.to_string()))?;

            // CAS: the stored revision must match the revision this
            // record was loaded at, inside the same write transaction.
            let stored_revision = table
                .get(record.learner.as_str())
                .map_err(|e| GradusError::Storage(e.to_string()))?
                .map(|guard| Self::decode(guard.value()))
                .transpose()?
                .map_or(0, |stored| stored.revision);
            if stored_revision != record.revision {
                return Err(GradusError::WriteConflict {
                    learner: record.learner.clone(),
                });
            }

            table
                .insert(record.learner.as_str(), bytes.as_slice())
                .map_err(|e| GradusError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| GradusError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete_all(&mut self, learner: &LearnerId) -> Result<bool, GradusError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| GradusError::Storage(e.to_string()))?;
        let existed = {
            let mut table = write_txn
                .open_table(RECORDS)
                .map_err(|e| GradusError::Storage(e.to_string()))?;
            table
                .remove(learner.as_str())
                .map_err(|e| GradusError::Storage(e.to_string()))?
                .is_some()
        };
        write_txn
            .commit()
            .map_err(|e| GradusError::Storage(e.to_string()))?;
        Ok(existed)
    }

    fn list_all(&self) -> Result<Vec<ProgressRecord>, GradusError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| GradusError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(RECORDS)
            .map_err(|e| GradusError::Storage(e.to_string()))?;

        // redb iterates keys in order, so the result is already sorted
        // by learner id.
        let mut records = Vec::new();
        for entry in table
            .iter()
            .map_err(|e| GradusError::Storage(e.to_string()))?
        {
            let (_, value) = entry.map_err(|e| GradusError::Storage(e.to_string()))?;
            records.push(Self::decode(value.value())?);
        }
        Ok(records)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StageId, Timestamp};

    fn open_temp() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbStore::open(dir.path().join("gradus.db")).expect("open");
        (store, dir)
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gradus.db");
        let learner = LearnerId::new("l1");

        {
            let mut store = RedbStore::open(&path).expect("open");
            let mut record = ProgressRecord::init(learner.clone());
            record.earn_stamp(StageId::Foundations, Timestamp::from_millis(5));
            store.put(&record).expect("put");
        }

        let store = RedbStore::open(&path).expect("reopen");
        let loaded = store.get(&learner).expect("get").expect("present");
        assert!(loaded.has_stamp(StageId::Foundations));
        assert_eq!(loaded.revision, 1);
    }

    #[test]
    fn stale_revision_conflicts_on_disk_too() {
        let (mut store, _dir) = open_temp();
        let learner = LearnerId::new("l1");
        store
            .put(&ProgressRecord::init(learner.clone()))
            .expect("create");

        let mut first = store.get(&learner).expect("get").expect("present");
        let second = store.get(&learner).expect("get").expect("present");

        first.earn_stamp(StageId::Orientation, Timestamp::from_millis(1));
        store.put(&first).expect("first writer");

        let err = store.put(&second).expect_err("stale writer");
        assert!(matches!(err, GradusError::WriteConflict { .. }));
    }

    #[test]
    fn delete_and_list() {
        let (mut store, _dir) = open_temp();
        store
            .put(&ProgressRecord::init(LearnerId::new("ada")))
            .expect("put");
        store
            .put(&ProgressRecord::init(LearnerId::new("zoe")))
            .expect("put");

        let ids: Vec<String> = store
            .list_all()
            .expect("list")
            .into_iter()
            .map(|r| r.learner.0)
            .collect();
        assert_eq!(ids, vec!["ada", "zoe"]);

        assert!(store.delete_all(&LearnerId::new("ada")).expect("delete"));
        assert_eq!(store.list_all().expect("list").len(), 1);
    }
}
