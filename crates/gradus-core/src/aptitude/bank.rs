//! # Aptitude Question Bank
//!
//! Three disjoint, fixed question sets for the aptitude assessment.
//! Each question offers exactly two options (A and B); each option
//! carries a non-empty list of personas it weights toward. An option may
//! weight more than one persona — each listed persona gets +1, it is not
//! a divided weight.
//!
//! The bank is static configuration: nothing here is computed or fetched
//! at runtime.

use crate::PersonaId;
use serde::{Deserialize, Serialize};

// =============================================================================
// QUESTION SET IDENTIFIER
// =============================================================================

/// One of the three fixed question sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSetId {
    /// First rotation set.
    Set1,
    /// Second rotation set.
    Set2,
    /// Third rotation set.
    Set3,
}

impl QuestionSetId {
    /// All sets, in rotation order.
    pub const ALL: [QuestionSetId; 3] = [
        QuestionSetId::Set1,
        QuestionSetId::Set2,
        QuestionSetId::Set3,
    ];

    /// Stable lowercase identifier used on CLI/API boundaries.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            QuestionSetId::Set1 => "set1",
            QuestionSetId::Set2 => "set2",
            QuestionSetId::Set3 => "set3",
        }
    }

    /// Parse a boundary string into a set id.
    pub fn parse(s: &str) -> Result<Self, crate::GradusError> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|set| set.slug() == lowered)
            .ok_or_else(|| crate::GradusError::UnknownQuestionSet(s.to_string()))
    }

    /// The static question set this id names.
    #[must_use]
    pub const fn questions(self) -> &'static QuestionSet {
        match self {
            QuestionSetId::Set1 => &SET_1,
            QuestionSetId::Set2 => &SET_2,
            QuestionSetId::Set3 => &SET_3,
        }
    }
}

impl std::fmt::Display for QuestionSetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

// =============================================================================
// ANSWER CHOICE
// =============================================================================

/// The two possible answers to any aptitude question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    /// Option A.
    A,
    /// Option B.
    B,
}

// =============================================================================
// QUESTIONS
// =============================================================================

/// One answer option with its persona weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOption {
    /// Display text for the option.
    pub text: &'static str,
    /// Personas this option weights toward. Never empty.
    pub weights: &'static [PersonaId],
}

/// A single two-option question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    /// Stable question identifier, unique within its set.
    pub id: &'static str,
    /// Display prompt.
    pub prompt: &'static str,
    /// Option A.
    pub option_a: AnswerOption,
    /// Option B.
    pub option_b: AnswerOption,
}

impl Question {
    /// Get the option selected by a choice.
    #[must_use]
    pub const fn option(&self, choice: Choice) -> &AnswerOption {
        match choice {
            Choice::A => &self.option_a,
            Choice::B => &self.option_b,
        }
    }
}

/// A complete question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSet {
    /// The set identifier.
    pub id: QuestionSetId,
    /// The questions, in presentation order.
    pub questions: &'static [Question],
}

impl QuestionSet {
    /// Look up a question by id within this set.
    #[must_use]
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

// =============================================================================
// STATIC SETS
// =============================================================================

const fn opt(text: &'static str, weights: &'static [PersonaId]) -> AnswerOption {
    AnswerOption { text, weights }
}

/// Question set 1.
pub static SET_1: QuestionSet = QuestionSet {
    id: QuestionSetId::Set1,
    questions: &[
        Question {
            id: "s1q1",
            prompt: "A brand-new project lands on your desk. What do you do first?",
            option_a: opt("Sketch something rough and try it today", &[
                PersonaId::Pioneer,
                PersonaId::Builder,
            ]),
            option_b: opt("Map out the milestones before touching anything", &[
                PersonaId::Strategist,
            ]),
        },
        Question {
            id: "s1q2",
            prompt: "You are stuck on a hard problem. Where do you turn?",
            option_a: opt("Someone who has solved something similar", &[
                PersonaId::Connector,
            ]),
            option_b: opt("The data — I want to see the numbers myself", &[
                PersonaId::Analyst,
            ]),
        },
        Question {
            id: "s1q3",
            prompt: "Which compliment means more to you?",
            option_a: opt("\"You made that real\"", &[PersonaId::Builder]),
            option_b: opt("\"You saw that coming\"", &[
                PersonaId::Strategist,
                PersonaId::Analyst,
            ]),
        },
        Question {
            id: "s1q4",
            prompt: "An opportunity appears with a one-day deadline. You…",
            option_a: opt("Jump — figure out the details in flight", &[
                PersonaId::Pioneer,
            ]),
            option_b: opt("Call three people who would know if it's real", &[
                PersonaId::Connector,
            ]),
        },
        Question {
            id: "s1q5",
            prompt: "Your ideal week of work looks like…",
            option_a: opt("Prototypes on the bench, tools in hand", &[
                PersonaId::Builder,
                PersonaId::Pioneer,
            ]),
            option_b: opt("A dashboard that finally explains the trend", &[
                PersonaId::Analyst,
            ]),
        },
    ],
};

/// Question set 2.
pub static SET_2: QuestionSet = QuestionSet {
    id: QuestionSetId::Set2,
    questions: &[
        Question {
            id: "s2q1",
            prompt: "A plan falls apart mid-execution. Your instinct is to…",
            option_a: opt("Improvise a new route on the spot", &[PersonaId::Pioneer]),
            option_b: opt("Stop, reassess, and re-plan the remaining steps", &[
                PersonaId::Strategist,
            ]),
        },
        Question {
            id: "s2q2",
            prompt: "You get one hour with an expert. You spend it…",
            option_a: opt("Asking who else you should meet", &[PersonaId::Connector]),
            option_b: opt("Walking through your model assumption by assumption", &[
                PersonaId::Analyst,
                PersonaId::Strategist,
            ]),
        },
        Question {
            id: "s2q3",
            prompt: "A teammate proposes an untested idea. You…",
            option_a: opt("Build a quick mock-up to see it in action", &[
                PersonaId::Builder,
            ]),
            option_b: opt("List what evidence would prove it out", &[
                PersonaId::Analyst,
            ]),
        },
        Question {
            id: "s2q4",
            prompt: "What keeps a project alive when energy dips?",
            option_a: opt("The people counting on it", &[
                PersonaId::Connector,
                PersonaId::Builder,
            ]),
            option_b: opt("The unexplored territory still ahead", &[
                PersonaId::Pioneer,
            ]),
        },
        Question {
            id: "s2q5",
            prompt: "Six months out, success looks like…",
            option_a: opt("A roadmap everyone is executing against", &[
                PersonaId::Strategist,
            ]),
            option_b: opt("Something shipped that people actually use", &[
                PersonaId::Builder,
                PersonaId::Pioneer,
            ]),
        },
    ],
};

/// Question set 3.
pub static SET_3: QuestionSet = QuestionSet {
    id: QuestionSetId::Set3,
    questions: &[
        Question {
            id: "s3q1",
            prompt: "Pick the project you'd rather lead.",
            option_a: opt("First of its kind, no playbook", &[PersonaId::Pioneer]),
            option_b: opt("High stakes, needs a flawless rollout plan", &[
                PersonaId::Strategist,
            ]),
        },
        Question {
            id: "s3q2",
            prompt: "Your most useful notebook page is…",
            option_a: opt("Names, intros, and who-knows-whom arrows", &[
                PersonaId::Connector,
            ]),
            option_b: opt("A table of measurements from last week's test", &[
                PersonaId::Analyst,
                PersonaId::Builder,
            ]),
        },
        Question {
            id: "s3q3",
            prompt: "When a demo is due tomorrow, you…",
            option_a: opt("Cut scope and hand-build the one path that matters", &[
                PersonaId::Builder,
            ]),
            option_b: opt("Rehearse the story of where this is going", &[
                PersonaId::Strategist,
                PersonaId::Connector,
            ]),
        },
        Question {
            id: "s3q4",
            prompt: "The riskiest assumption in a plan should be…",
            option_a: opt("Tested in the field, this week", &[
                PersonaId::Pioneer,
                PersonaId::Builder,
            ]),
            option_b: opt("Quantified before anyone commits", &[PersonaId::Analyst]),
        },
        Question {
            id: "s3q5",
            prompt: "Which loss would sting most?",
            option_a: opt("Losing the trust of your network", &[PersonaId::Connector]),
            option_b: opt("Shipping a decision the numbers didn't support", &[
                PersonaId::Analyst,
            ]),
        },
    ],
};

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_are_disjoint_and_fixed_size() {
        let mut seen = std::collections::BTreeSet::new();
        for set_id in QuestionSetId::ALL {
            let set = set_id.questions();
            assert_eq!(set.id, set_id);
            assert_eq!(set.questions.len(), 5);
            for q in set.questions {
                assert!(seen.insert(q.id), "duplicate question id {}", q.id);
            }
        }
    }

    #[test]
    fn every_option_weights_at_least_one_persona() {
        for set_id in QuestionSetId::ALL {
            for q in set_id.questions().questions {
                assert!(!q.option_a.weights.is_empty(), "{} option A", q.id);
                assert!(!q.option_b.weights.is_empty(), "{} option B", q.id);
            }
        }
    }

    #[test]
    fn set_id_parse_round_trips() {
        for set in QuestionSetId::ALL {
            assert_eq!(QuestionSetId::parse(set.slug()).expect("parse"), set);
        }
        assert!(QuestionSetId::parse("set4").is_err());
    }

    #[test]
    fn question_lookup_by_id() {
        let set = QuestionSetId::Set2.questions();
        assert!(set.question("s2q3").is_some());
        assert!(set.question("s1q1").is_none());
    }
}
