//! # Curriculum & Persona Catalogs
//!
//! Static catalogs for the Gradus ledger:
//! - [`StageId`]: the six fixed curriculum stages, ordinals 1..6
//! - [`PersonaId`]: the five fixed aptitude personas with tie-break priority
//!
//! Both catalogs are closed enums defined at compile time. Every dispatch
//! over them is an exhaustive match, so adding a variant is a compile
//! error at each site that must handle it — there are no string-keyed
//! lookup tables that can silently miss an entry.

use serde::{Deserialize, Serialize};

// =============================================================================
// STAGE CATALOG
// =============================================================================

/// One of the six fixed curriculum stages, in learner-path order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    /// Stage 1: program orientation.
    Orientation,
    /// Stage 2: core foundations.
    Foundations,
    /// Stage 3: guided exploration.
    Exploration,
    /// Stage 4: building the project.
    Creation,
    /// Stage 5: validating the project.
    Validation,
    /// Stage 6: launch preparation.
    Launch,
}

impl StageId {
    /// All stages in display order. The stamp ledger is exactly this set.
    pub const ALL: [StageId; 6] = [
        StageId::Orientation,
        StageId::Foundations,
        StageId::Exploration,
        StageId::Creation,
        StageId::Validation,
        StageId::Launch,
    ];

    /// Number of stages in the curriculum.
    pub const COUNT: usize = Self::ALL.len();

    /// Ordinal position in the curriculum, 1-based.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            StageId::Orientation => 1,
            StageId::Foundations => 2,
            StageId::Exploration => 3,
            StageId::Creation => 4,
            StageId::Validation => 5,
            StageId::Launch => 6,
        }
    }

    /// Human-readable stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StageId::Orientation => "Orientation",
            StageId::Foundations => "Foundations",
            StageId::Exploration => "Exploration",
            StageId::Creation => "Creation",
            StageId::Validation => "Validation",
            StageId::Launch => "Launch",
        }
    }

    /// Stable lowercase identifier used on CLI/API boundaries.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            StageId::Orientation => "orientation",
            StageId::Foundations => "foundations",
            StageId::Exploration => "exploration",
            StageId::Creation => "creation",
            StageId::Validation => "validation",
            StageId::Launch => "launch",
        }
    }

    /// Parse a boundary string (slug, case-insensitive) into a stage.
    pub fn parse(s: &str) -> Result<Self, crate::GradusError> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|stage| stage.slug() == lowered)
            .ok_or_else(|| crate::GradusError::UnknownStage(s.to_string()))
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}: {}", self.ordinal(), self.name())
    }
}

// =============================================================================
// PERSONA CATALOG
// =============================================================================

/// One of the five fixed aptitude personas.
///
/// Declaration order *is* the tie-break priority: [`PersonaId::PRIORITY`]
/// lists personas highest-priority first, and an exact score tie resolves
/// to the earlier entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaId {
    /// P1: starts from scratch, comfortable with ambiguity.
    Pioneer,
    /// P2: plans the route before moving.
    Strategist,
    /// P3: makes things concrete, hands-on.
    Builder,
    /// P4: works through people and networks.
    Connector,
    /// P5: measures before deciding.
    Analyst,
}

impl PersonaId {
    /// All personas in fixed tie-break priority order (highest first).
    pub const PRIORITY: [PersonaId; 5] = [
        PersonaId::Pioneer,
        PersonaId::Strategist,
        PersonaId::Builder,
        PersonaId::Connector,
        PersonaId::Analyst,
    ];

    /// Human-readable persona name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PersonaId::Pioneer => "Pioneer",
            PersonaId::Strategist => "Strategist",
            PersonaId::Builder => "Builder",
            PersonaId::Connector => "Connector",
            PersonaId::Analyst => "Analyst",
        }
    }

    /// Priority rank, 1 = highest (wins exact ties).
    #[must_use]
    pub const fn priority_rank(self) -> u8 {
        match self {
            PersonaId::Pioneer => 1,
            PersonaId::Strategist => 2,
            PersonaId::Builder => 3,
            PersonaId::Connector => 4,
            PersonaId::Analyst => 5,
        }
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_ordinals_are_one_based_and_sequential() {
        for (i, stage) in StageId::ALL.iter().enumerate() {
            assert_eq!(stage.ordinal() as usize, i + 1);
        }
    }

    #[test]
    fn stage_parse_round_trips_slugs() {
        for stage in StageId::ALL {
            assert_eq!(StageId::parse(stage.slug()).expect("parse"), stage);
        }
        // Case-insensitive with surrounding whitespace.
        assert_eq!(
            StageId::parse("  Creation ").expect("parse"),
            StageId::Creation
        );
    }

    #[test]
    fn stage_parse_rejects_unknown() {
        assert!(StageId::parse("postgrad").is_err());
    }

    #[test]
    fn persona_priority_matches_rank() {
        for (i, persona) in PersonaId::PRIORITY.iter().enumerate() {
            assert_eq!(persona.priority_rank() as usize, i + 1);
        }
    }

    #[test]
    fn stage_display() {
        assert_eq!(format!("{}", StageId::Orientation), "S1: Orientation");
        assert_eq!(format!("{}", StageId::Launch), "S6: Launch");
    }
}
