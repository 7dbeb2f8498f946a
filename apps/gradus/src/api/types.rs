//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP admin API.
//! Timestamps are rendered as RFC 3339 strings on the way out.

use gradus_core::{
    AptitudeResult, GradusError, ProgressRecord, StageId, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upper bound a single extension request may ask for (days).
///
/// The core does not clamp extensions; the API boundary does.
pub const MAX_EXTENSION_DAYS: i64 = 365;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// PROGRESS VIEWS
// =============================================================================

/// One stamp, as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampJson {
    pub stage: String,
    pub ordinal: u8,
    pub completed: bool,
    pub completed_at: Option<String>,
}

/// Graduation state, as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraduationJson {
    pub is_graduated: bool,
    pub graduated_at: Option<String>,
    pub review: Option<String>,
    pub access_expires_at: Option<String>,
}

/// Latest aptitude run, as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeJson {
    pub completed_at: String,
    pub result_type: String,
    pub scores: BTreeMap<String, u32>,
    pub question_set: String,
}

impl AptitudeJson {
    fn from_result(result: &AptitudeResult) -> Self {
        Self {
            completed_at: result.completed_at.to_rfc3339(),
            result_type: result.result_type.name().to_string(),
            scores: result
                .scores
                .iter()
                .map(|(persona, score)| (persona.name().to_string(), *score))
                .collect(),
            question_set: result.question_set.slug().to_string(),
        }
    }
}

/// Full per-learner progress view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub learner: String,
    pub stamps: Vec<StampJson>,
    pub stamp_count: usize,
    pub graduation: GraduationJson,
    pub capstone_present: bool,
    pub aptitude: Option<AptitudeJson>,
}

impl ProgressResponse {
    /// Render a record for clients.
    #[must_use]
    pub fn from_record(record: &ProgressRecord) -> Self {
        let render_ts = |ts: Option<Timestamp>| ts.map(|t| t.to_rfc3339());
        let stamps = StageId::ALL
            .into_iter()
            .map(|stage| {
                let stamp = record.stamp(stage);
                StampJson {
                    stage: stage.slug().to_string(),
                    ordinal: stage.ordinal(),
                    completed: stamp.completed,
                    completed_at: render_ts(stamp.completed_at),
                }
            })
            .collect();

        Self {
            learner: record.learner.to_string(),
            stamps,
            stamp_count: record.completed_stamp_count(),
            graduation: GraduationJson {
                is_graduated: record.graduation.is_graduated,
                graduated_at: render_ts(record.graduation.graduated_at),
                review: record.graduation.review.clone(),
                access_expires_at: render_ts(record.graduation.access_expires_at),
            },
            capstone_present: record.has_capstone(),
            aptitude: record.aptitude.as_ref().map(AptitudeJson::from_result),
        }
    }
}

/// One row of the administrative bulk view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerSummary {
    pub learner: String,
    pub stamp_count: usize,
    pub is_graduated: bool,
    pub access_expires_at: Option<String>,
}

impl LearnerSummary {
    /// Condense a record for the bulk view.
    #[must_use]
    pub fn from_record(record: &ProgressRecord) -> Self {
        Self {
            learner: record.learner.to_string(),
            stamp_count: record.completed_stamp_count(),
            is_graduated: record.graduation.is_graduated,
            access_expires_at: record
                .graduation
                .access_expires_at
                .map(|t| t.to_rfc3339()),
        }
    }
}

/// Administrative enumeration of all learners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnersResponse {
    pub learners: Vec<LearnerSummary>,
}

// =============================================================================
// MUTATION REQUESTS/RESPONSES
// =============================================================================

/// Earn-stamp request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnStampRequest {
    /// Stage slug, e.g. "creation".
    pub stage: String,
}

/// Earn-stamp response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnStampResponse {
    pub success: bool,
    /// False when the stamp was already held (idempotent repeat).
    pub changed: bool,
    pub stamp_count: usize,
    pub error: Option<String>,
}

impl EarnStampResponse {
    pub fn done(changed: bool, stamp_count: usize) -> Self {
        Self {
            success: true,
            changed,
            stamp_count,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            changed: false,
            stamp_count: 0,
            error: Some(msg.into()),
        }
    }
}

/// Capstone-signal request. The summary is stored opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapstoneRequest {
    #[serde(default)]
    pub summary: Option<String>,
}

/// Graduation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraduateRequest {
    #[serde(default)]
    pub review: Option<String>,
}

/// Graduation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraduateResponse {
    pub success: bool,
    /// "graduated", "already_graduated", or "not_eligible".
    pub outcome: Option<String>,
    pub access_expires_at: Option<String>,
    pub error: Option<String>,
}

impl GraduateResponse {
    pub fn done(outcome: &str, access_expires_at: Option<String>) -> Self {
        Self {
            success: true,
            outcome: Some(outcome.to_string()),
            access_expires_at,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome: None,
            access_expires_at: None,
            error: Some(msg.into()),
        }
    }
}

/// Access-extension request (administrative).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendRequest {
    pub days: i64,
}

impl ExtendRequest {
    /// Boundary validation: the core accepts any positive day count,
    /// the API constrains it to 1..=365.
    pub fn validate(&self) -> Result<(), GradusError> {
        if self.days < 1 || self.days > MAX_EXTENSION_DAYS {
            return Err(GradusError::InvalidDays(self.days));
        }
        Ok(())
    }
}

/// Access-extension response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendResponse {
    pub success: bool,
    /// "extended" or "not_graduated".
    pub outcome: Option<String>,
    pub access_expires_at: Option<String>,
    pub error: Option<String>,
}

impl ExtendResponse {
    pub fn done(outcome: &str, access_expires_at: Option<String>) -> Self {
        Self {
            success: true,
            outcome: Some(outcome.to_string()),
            access_expires_at,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome: None,
            access_expires_at: None,
            error: Some(msg.into()),
        }
    }
}

/// Access-validity view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessResponse {
    pub valid: bool,
    pub remaining_days: i64,
}

/// Aptitude-run submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeRequest {
    /// Explicit set slug, or null to let the rotation rule pick.
    #[serde(default)]
    pub question_set: Option<String>,
    /// Question id -> "A" | "B".
    pub answers: BTreeMap<String, String>,
}

/// Aptitude-run response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AptitudeResponse {
    pub success: bool,
    pub result: Option<AptitudeJson>,
    pub error: Option<String>,
}

impl AptitudeResponse {
    pub fn done(result: &AptitudeResult) -> Self {
        Self {
            success: true,
            result: Some(AptitudeJson::from_result(result)),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(msg.into()),
        }
    }
}

/// Administrative reset response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
    /// Whether a record existed before the reset.
    pub existed: bool,
    pub error: Option<String>,
}

impl ResetResponse {
    pub fn done(existed: bool) -> Self {
        Self {
            success: true,
            existed,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            existed: false,
            error: Some(msg.into()),
        }
    }
}
