//! # Property-Based Tests
//!
//! Verification of the ledger's determinism and transition invariants
//! using proptest.

use gradus_core::{
    Choice, LearnerId, PersonaId, ProgressRecord, QuestionSetId, StageId, Timestamp, score,
    select_question_set,
};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;

// =============================================================================
// STRATEGIES
// =============================================================================

fn any_stage() -> impl Strategy<Value = StageId> {
    prop::sample::select(StageId::ALL.to_vec())
}

fn any_set() -> impl Strategy<Value = QuestionSetId> {
    prop::sample::select(QuestionSetId::ALL.to_vec())
}

fn any_choice() -> impl Strategy<Value = Choice> {
    prop_oneof![Just(Choice::A), Just(Choice::B)]
}

/// Answer maps mixing valid question ids (from any set) with junk ids.
fn any_answers() -> impl Strategy<Value = BTreeMap<String, Choice>> {
    let id = prop_oneof![
        3 => prop::sample::select(
            QuestionSetId::ALL
                .into_iter()
                .flat_map(|set| set.questions().questions.iter().map(|q| q.id.to_string()))
                .collect::<Vec<_>>()
        ),
        1 => "[a-z0-9]{1,8}",
    ];
    btree_map(id, any_choice(), 0..12)
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Earning a stamp twice yields the same completed_at as earning it once.
    #[test]
    fn stamp_earning_is_idempotent(
        stage in any_stage(),
        first_ms in 0i64..1_000_000_000,
        second_ms in 0i64..1_000_000_000
    ) {
        let mut once = ProgressRecord::init(LearnerId::new("l"));
        once.earn_stamp(stage, Timestamp::from_millis(first_ms));

        let mut twice = ProgressRecord::init(LearnerId::new("l"));
        twice.earn_stamp(stage, Timestamp::from_millis(first_ms));
        twice.earn_stamp(stage, Timestamp::from_millis(second_ms));

        prop_assert_eq!(once.stamp(stage), twice.stamp(stage));
    }

    /// Scoring the same answers against the same set is deterministic.
    #[test]
    fn scoring_deterministic(set in any_set(), answers in any_answers()) {
        let questions = set.questions();
        let first = score(&answers, questions);
        let second = score(&answers, questions);
        prop_assert_eq!(first, second);
    }

    /// Every persona has a score entry, and the winner's score is maximal.
    #[test]
    fn winner_has_maximal_score(set in any_set(), answers in any_answers()) {
        let outcome = score(&answers, set.questions());

        prop_assert_eq!(outcome.scores.len(), PersonaId::PRIORITY.len());
        let max = outcome.scores.values().copied().max().unwrap_or(0);
        prop_assert_eq!(outcome.scores[&outcome.result_type], max);

        // On ties, no strictly-earlier-priority persona shares the max.
        for persona in PersonaId::PRIORITY {
            if persona == outcome.result_type {
                break;
            }
            prop_assert!(outcome.scores[&persona] < max);
        }
    }

    /// Scores sum to the total weight entries of the answered questions.
    #[test]
    fn scores_sum_to_selected_weights(set in any_set(), answers in any_answers()) {
        let questions = set.questions();
        let expected: u32 = answers
            .iter()
            .filter_map(|(id, _)| questions.question(id))
            .map(|q| {
                let choice = answers[q.id];
                q.option(choice).weights.len() as u32
            })
            .sum();

        let outcome = score(&answers, questions);
        prop_assert_eq!(outcome.scores.values().sum::<u32>(), expected);
    }

    /// Set selection never returns the immediately prior set.
    #[test]
    fn rotation_never_repeats_previous(previous in any_set(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..25 {
            let selected = select_question_set(Some(previous), &mut rng);
            prop_assert_ne!(selected.id, previous);
        }
    }

    /// Extension never moves the expiry backwards, from any state.
    #[test]
    fn extension_is_monotone(
        stamped in vec(any_stage(), 0..12),
        days in 1i64..365,
        now_ms in 0i64..1_000_000_000
    ) {
        let now = Timestamp::from_millis(now_ms);
        let mut record = ProgressRecord::init(LearnerId::new("l"));
        for stage in stamped {
            record.earn_stamp(stage, now);
        }
        record.record_capstone("done", now);
        record.graduate("", now);

        let before = record.graduation.access_expires_at;
        record.extend_access(days, now).expect("positive days");
        let after = record.graduation.access_expires_at;

        match (before, after) {
            (Some(b), Some(a)) => prop_assert!(a >= b),
            (None, None) => {} // never graduated: extension was a no-op
            other => prop_assert!(false, "expiry appeared/vanished: {:?}", other),
        }
    }
}
