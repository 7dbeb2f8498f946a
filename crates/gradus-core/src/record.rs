//! # Progress Record
//!
//! The per-learner aggregate: one stamp per curriculum stage, the
//! graduation status, and the optional aptitude and capstone results.
//!
//! Records are created lazily on first access with every stamp
//! uncompleted and graduation unset, and are only ever deleted by an
//! explicit administrative reset.
//!
//! ## Invariants
//!
//! - Exactly one stamp per [`StageId`]; the stamp set never grows or
//!   shrinks.
//! - `graduation.is_graduated` implies every stamp was completed and a
//!   capstone result was present at transition time.
//! - `access_expires_at` is `Some` iff graduated, and is monotonically
//!   non-decreasing over the record's lifetime.
//! - `revision` increases by exactly one per successful store write.

use crate::aptitude::bank::{Choice, QuestionSetId};
use crate::{LearnerId, PersonaId, StageId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// STAMP
// =============================================================================

/// A single stage-completion marker.
///
/// Transitions `completed: false → true` exactly once; re-earning an
/// already-completed stamp must not overwrite `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    /// The stage this stamp belongs to.
    pub stage: StageId,
    /// Whether the stage has been completed.
    pub completed: bool,
    /// When the stage was completed, if it was.
    pub completed_at: Option<Timestamp>,
}

impl Stamp {
    /// A fresh, uncompleted stamp for a stage.
    #[must_use]
    pub const fn fresh(stage: StageId) -> Self {
        Self {
            stage,
            completed: false,
            completed_at: None,
        }
    }
}

// =============================================================================
// GRADUATION STATUS
// =============================================================================

/// The one-way graduation state of a learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GraduationStatus {
    /// Whether the learner has graduated. Terminal once true.
    pub is_graduated: bool,
    /// When graduation happened.
    pub graduated_at: Option<Timestamp>,
    /// Free-form review text captured at graduation (may be empty).
    pub review: Option<String>,
    /// When the elevated access tier lapses. `Some` iff graduated.
    pub access_expires_at: Option<Timestamp>,
}

// =============================================================================
// CAPSTONE RESULT
// =============================================================================

/// Marker that the external capstone artifact exists.
///
/// The content is produced by external tooling; only *presence* gates
/// graduation. The summary is stored verbatim and never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapstoneResult {
    /// When the capstone signal was recorded.
    pub recorded_at: Timestamp,
    /// Opaque summary text from the external tool.
    pub summary: String,
}

// =============================================================================
// APTITUDE RESULT
// =============================================================================

/// The outcome of the most recent aptitude run.
///
/// A new run overwrites the previous one; only `question_set` of the
/// prior run influences future behavior (set rotation on retake).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AptitudeResult {
    /// When the run completed.
    pub completed_at: Timestamp,
    /// The submitted answers, keyed by question id.
    pub answers: BTreeMap<String, Choice>,
    /// The winning persona.
    pub result_type: PersonaId,
    /// Accumulated score per persona.
    pub scores: BTreeMap<PersonaId, u32>,
    /// Which question set was used.
    pub question_set: QuestionSetId,
}

// =============================================================================
// PROGRESS RECORD
// =============================================================================

/// The full per-learner state, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// The learner this record belongs to.
    pub learner: LearnerId,
    /// One stamp per stage, keyed for deterministic iteration order.
    pub stamps: BTreeMap<StageId, Stamp>,
    /// Graduation state.
    pub graduation: GraduationStatus,
    /// Latest aptitude run, if any.
    pub aptitude: Option<AptitudeResult>,
    /// Capstone presence marker, if recorded.
    pub capstone: Option<CapstoneResult>,
    /// Optimistic-concurrency revision. Incremented by the store on each
    /// successful write; a mismatched revision at write time is a
    /// detectable conflict rather than a silent lost update.
    pub revision: u64,
}

impl ProgressRecord {
    /// Create the default record for a learner: all six stamps
    /// uncompleted, not graduated, no aptitude or capstone result.
    #[must_use]
    pub fn init(learner: LearnerId) -> Self {
        let stamps = StageId::ALL
            .into_iter()
            .map(|stage| (stage, Stamp::fresh(stage)))
            .collect();
        Self {
            learner,
            stamps,
            graduation: GraduationStatus::default(),
            aptitude: None,
            capstone: None,
            revision: 0,
        }
    }

    /// The stamp for a stage.
    ///
    /// Every record carries exactly one stamp per stage; a missing entry
    /// can only mean the record was corrupted outside this crate, so the
    /// accessor repairs to a fresh stamp view rather than panicking.
    #[must_use]
    pub fn stamp(&self, stage: StageId) -> Stamp {
        self.stamps
            .get(&stage)
            .copied()
            .unwrap_or_else(|| Stamp::fresh(stage))
    }

    /// Whether the capstone signal has been recorded.
    #[must_use]
    pub fn has_capstone(&self) -> bool {
        self.capstone.is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
