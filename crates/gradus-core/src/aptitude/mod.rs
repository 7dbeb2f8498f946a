//! # Aptitude Engine
//!
//! Question-set selection and additive weighted scoring for the aptitude
//! assessment.
//!
//! Scoring is a pure function: no I/O, no clock, no randomness — the
//! same answers against the same set always produce the same scores and
//! the same winning persona. Selection needs randomness, which the
//! caller injects as an [`Rng`] so the engine itself stays reproducible
//! under a seeded generator.

pub mod bank;

use crate::{GradusError, PersonaId};
use bank::{Choice, QuestionSet, QuestionSetId};
use rand::Rng;
use std::collections::BTreeMap;

// =============================================================================
// QUESTION-SET SELECTION
// =============================================================================

/// Pick the question set for the next run.
///
/// First attempt (`previous` absent): uniform over all three sets.
/// Retake: uniform over the sets excluding the immediately prior one, so
/// a retake never repeats the same questions back-to-back. If exclusion
/// ever empties the pool the selection falls back to all sets.
pub fn select_question_set(
    previous: Option<QuestionSetId>,
    rng: &mut impl Rng,
) -> &'static QuestionSet {
    let candidates: Vec<QuestionSetId> = QuestionSetId::ALL
        .into_iter()
        .filter(|&set| Some(set) != previous)
        .collect();

    let pool: &[QuestionSetId] = if candidates.is_empty() {
        &QuestionSetId::ALL
    } else {
        &candidates
    };

    pool[rng.random_range(0..pool.len())].questions()
}

// =============================================================================
// SCORING
// =============================================================================

/// The result of scoring one run: winning persona plus the full score
/// vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AptitudeOutcome {
    /// Persona with the highest score, ties broken by fixed priority.
    pub result_type: PersonaId,
    /// Accumulated score for every persona (zero entries included).
    pub scores: BTreeMap<PersonaId, u32>,
}

/// Score an answer map against a question set.
///
/// Every persona starts at 0. For each answered question found in the
/// set, each persona listed on the chosen option gains +1 (a two-persona
/// option grants +1 to both — weights are additive bonuses, not splits).
/// Unknown question ids and unanswered questions are skipped silently.
///
/// The winner is the maximum score; on an exact tie the persona earlier
/// in [`PersonaId::PRIORITY`] wins, and an all-zero vector resolves to
/// the top-priority persona.
#[must_use]
pub fn score(answers: &BTreeMap<String, Choice>, set: &QuestionSet) -> AptitudeOutcome {
    let mut scores: BTreeMap<PersonaId, u32> = PersonaId::PRIORITY
        .into_iter()
        .map(|persona| (persona, 0))
        .collect();

    for (question_id, &choice) in answers {
        let Some(question) = set.question(question_id) else {
            continue;
        };
        for &persona in question.option(choice).weights {
            if let Some(entry) = scores.get_mut(&persona) {
                *entry = entry.saturating_add(1);
            }
        }
    }

    // Highest score wins; strict comparison keeps the earlier-priority
    // persona on exact ties, and the P1 default covers all-zero vectors.
    let mut result_type = PersonaId::PRIORITY[0];
    let mut best = scores.get(&result_type).copied().unwrap_or(0);
    for persona in PersonaId::PRIORITY.into_iter().skip(1) {
        let value = scores.get(&persona).copied().unwrap_or(0);
        if value > best {
            result_type = persona;
            best = value;
        }
    }

    AptitudeOutcome {
        result_type,
        scores,
    }
}

/// Parse a boundary answer map (`{"s1q1": "A", ...}`) into typed form.
///
/// Choice strings are case-insensitive; anything other than "a"/"b" is
/// rejected at the boundary so malformed submissions never reach the
/// scorer.
pub fn parse_answers(
    raw: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, Choice>, GradusError> {
    let mut answers = BTreeMap::new();
    for (question_id, choice) in raw {
        let parsed = match choice.trim().to_ascii_uppercase().as_str() {
            "A" => Choice::A,
            "B" => Choice::B,
            other => {
                return Err(GradusError::Serialization(format!(
                    "answer for '{}' must be A or B, got '{}'",
                    question_id, other
                )));
            }
        };
        answers.insert(question_id.clone(), parsed);
    }
    Ok(answers)
}

// =============================================================================
// TESTS
// =============================================================================
