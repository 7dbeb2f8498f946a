//! # gradus-core
//!
//! The deterministic learner-progress and credentialing ledger - THE LEDGER.
//!
//! This crate implements the CORE of Gradus: the stage-stamp ledger, the
//! one-way graduation gate with its 180-day access window, the
//! administrative access extension, and the aptitude assessment
//! (question-set rotation + additive weighted scoring).
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network dependencies
//! - Deterministic: `BTreeMap` only, integer arithmetic only
//! - Injected effects: time via [`Clock`], randomness via a caller `Rng`
//! - Closed catalogs: stages and personas are compile-time enums
//! - Writes are revision compare-and-swap; lost updates surface as
//!   [`GradusError::WriteConflict`] instead of disappearing

// =============================================================================
// MODULES
// =============================================================================

pub mod aptitude;
pub mod catalog;
pub mod clock;
pub mod graduation;
pub mod ledger;
pub mod record;
pub mod stamps;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types/catalog modules)
// =============================================================================

pub use catalog::{PersonaId, StageId};
pub use types::{GradusError, LearnerId, MS_PER_DAY, Timestamp};

// =============================================================================
// RE-EXPORTS: Ledger Engine
// =============================================================================

pub use aptitude::bank::{Choice, Question, QuestionSet, QuestionSetId};
pub use aptitude::{AptitudeOutcome, parse_answers, score, select_question_set};
pub use clock::{Clock, FixedClock, SystemClock};
pub use graduation::{ExtensionOutcome, FIXED_ACCESS_WINDOW_DAYS, GraduationOutcome};
pub use ledger::{Ledger, StorageBackend};
pub use record::{AptitudeResult, CapstoneResult, GraduationStatus, ProgressRecord, Stamp};
pub use store::{MemoryStore, ProgressStore, RedbStore};
