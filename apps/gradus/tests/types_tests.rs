//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use gradus::api::types::{
    AptitudeRequest, CapstoneRequest, EarnStampRequest, EarnStampResponse, ExtendRequest,
    ExtendResponse, GraduateRequest, GraduateResponse, HealthResponse, LearnerSummary,
    MAX_EXTENSION_DAYS, ProgressResponse, ResetResponse,
};
use gradus_core::{LearnerId, ProgressRecord, StageId, Timestamp};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.3.2".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.3.2\""));
}

// =============================================================================
// PROGRESS VIEW TESTS
// =============================================================================

#[test]
fn test_progress_response_from_fresh_record() {
    let record = ProgressRecord::init(LearnerId::new("ada"));
    let view = ProgressResponse::from_record(&record);

    assert_eq!(view.learner, "ada");
    assert_eq!(view.stamp_count, 0);
    assert_eq!(view.stamps.len(), 6);
    assert!(view.stamps.iter().all(|s| !s.completed));
    assert!(view.stamps.iter().all(|s| s.completed_at.is_none()));
    assert!(!view.graduation.is_graduated);
    assert!(!view.capstone_present);
    assert!(view.aptitude.is_none());
}

#[test]
fn test_progress_response_stamps_in_stage_order() {
    let record = ProgressRecord::init(LearnerId::new("ada"));
    let view = ProgressResponse::from_record(&record);

    let ordinals: Vec<u8> = view.stamps.iter().map(|s| s.ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(view.stamps[0].stage, "orientation");
    assert_eq!(view.stamps[5].stage, "launch");
}

#[test]
fn test_progress_response_renders_rfc3339() {
    let mut record = ProgressRecord::init(LearnerId::new("ada"));
    record.earn_stamp(StageId::Orientation, Timestamp::from_millis(0));
    let view = ProgressResponse::from_record(&record);

    let stamp = view.stamps.iter().find(|s| s.stage == "orientation").unwrap();
    assert_eq!(stamp.completed_at.as_deref(), Some("1970-01-01T00:00:00+00:00"));
}

#[test]
fn test_learner_summary_from_record() {
    let mut record = ProgressRecord::init(LearnerId::new("ada"));
    record.earn_stamp(StageId::Creation, Timestamp::from_millis(5));
    let summary = LearnerSummary::from_record(&record);

    assert_eq!(summary.learner, "ada");
    assert_eq!(summary.stamp_count, 1);
    assert!(!summary.is_graduated);
    assert!(summary.access_expires_at.is_none());
}

// =============================================================================
// REQUEST TESTS
// =============================================================================

#[test]
fn test_earn_stamp_request_deserialization() {
    let json = r#"{"stage":"creation"}"#;
    let request: EarnStampRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.stage, "creation");
}

#[test]
fn test_capstone_request_summary_defaults_to_none() {
    let request: CapstoneRequest = serde_json::from_str("{}").unwrap();
    assert!(request.summary.is_none());
}

#[test]
fn test_graduate_request_review_defaults_to_none() {
    let request: GraduateRequest = serde_json::from_str("{}").unwrap();
    assert!(request.review.is_none());
}

#[test]
fn test_aptitude_request_set_optional() {
    let json = r#"{"answers":{"s1q1":"A"}}"#;
    let request: AptitudeRequest = serde_json::from_str(json).unwrap();
    assert!(request.question_set.is_none());
    assert_eq!(request.answers.get("s1q1").map(String::as_str), Some("A"));
}

// =============================================================================
// EXTENSION VALIDATION TESTS
// =============================================================================

#[test]
fn test_extend_request_accepts_bounds() {
    assert!(ExtendRequest { days: 1 }.validate().is_ok());
    assert!(ExtendRequest { days: MAX_EXTENSION_DAYS }.validate().is_ok());
}

#[test]
fn test_extend_request_rejects_out_of_range() {
    assert!(ExtendRequest { days: 0 }.validate().is_err());
    assert!(ExtendRequest { days: -10 }.validate().is_err());
    assert!(ExtendRequest { days: MAX_EXTENSION_DAYS + 1 }.validate().is_err());
}

// =============================================================================
// RESPONSE CONSTRUCTOR TESTS
// =============================================================================

#[test]
fn test_earn_stamp_response_done() {
    let response = EarnStampResponse::done(true, 3);
    assert!(response.success);
    assert!(response.changed);
    assert_eq!(response.stamp_count, 3);
    assert!(response.error.is_none());
}

#[test]
fn test_earn_stamp_response_error() {
    let response = EarnStampResponse::error("unknown stage");
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("unknown stage"));
}

#[test]
fn test_graduate_response_serialization() {
    let response = GraduateResponse::done("graduated", Some("2026-01-01T00:00:00+00:00".into()));
    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"outcome\":\"graduated\""));
    assert!(json.contains("\"access_expires_at\":\"2026-01-01T00:00:00+00:00\""));
}

#[test]
fn test_extend_response_error() {
    let response = ExtendResponse::error("days out of range");
    assert!(!response.success);
    assert!(response.outcome.is_none());
    assert!(response.access_expires_at.is_none());
}

#[test]
fn test_reset_response_roundtrip() {
    let response = ResetResponse::done(true);
    let json = serde_json::to_string(&response).unwrap();
    let back: ResetResponse = serde_json::from_str(&json).unwrap();
    assert!(back.success);
    assert!(back.existed);
}
