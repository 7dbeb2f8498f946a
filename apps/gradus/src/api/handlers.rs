//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Reads take the shared lock; every mutation takes the write half, so
//! record revisions advance under a single writer and the store's
//! compare-and-swap never fires in normal operation.

use super::{
    AppState,
    types::{
        AccessResponse, AptitudeRequest, AptitudeResponse, CapstoneRequest, EarnStampRequest,
        EarnStampResponse, ExtendRequest, ExtendResponse, GraduateRequest, GraduateResponse,
        HealthResponse, LearnerSummary, LearnersResponse, ProgressResponse, ResetResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gradus_core::{
    ExtensionOutcome, GradusError, GraduationOutcome, LearnerId, QuestionSetId, StageId,
    parse_answers,
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// HTTP status for a core error.
fn error_status(err: &GradusError) -> StatusCode {
    match err {
        GradusError::UnknownStage(_)
        | GradusError::UnknownQuestionSet(_)
        | GradusError::InvalidDays(_)
        | GradusError::Serialization(_) => StatusCode::BAD_REQUEST,
        GradusError::WriteConflict { .. } => StatusCode::CONFLICT,
        GradusError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn graduation_slug(outcome: GraduationOutcome) -> &'static str {
    match outcome {
        GraduationOutcome::Graduated => "graduated",
        GraduationOutcome::AlreadyGraduated => "already_graduated",
        GraduationOutcome::NotEligible => "not_eligible",
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// LEARNER VIEWS
// =============================================================================

/// List every tracked learner (administrative bulk view).
pub async fn list_learners_handler(State(state): State<AppState>) -> Response {
    let ledger = state.ledger.read().await;
    match ledger.list_all() {
        Ok(records) => {
            let learners = records.iter().map(LearnerSummary::from_record).collect();
            (StatusCode::OK, Json(LearnersResponse { learners })).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Full progress record for one learner.
pub async fn status_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let ledger = state.ledger.read().await;
    let learner = LearnerId::new(id);
    match ledger.load_or_init(&learner) {
        Ok(record) => {
            (StatusCode::OK, Json(ProgressResponse::from_record(&record))).into_response()
        }
        Err(e) => (
            error_status(&e),
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Access-window validity for one learner.
pub async fn access_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let ledger = state.ledger.read().await;
    let learner = LearnerId::new(id);

    let valid = match ledger.is_access_valid(&learner) {
        Ok(v) => v,
        Err(e) => {
            return (
                error_status(&e),
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };
    let remaining = ledger.remaining_access_days(&learner).unwrap_or(0);

    (
        StatusCode::OK,
        Json(AccessResponse {
            valid,
            remaining_days: remaining,
        }),
    )
        .into_response()
}

// =============================================================================
// STAMP HANDLERS
// =============================================================================

/// Award a stage stamp.
pub async fn earn_stamp_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<EarnStampRequest>,
) -> impl IntoResponse {
    let stage = match StageId::parse(&request.stage) {
        Ok(s) => s,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(EarnStampResponse::error(e.to_string())),
            );
        }
    };

    let mut ledger = state.ledger.write().await;
    let learner = LearnerId::new(id);

    match ledger.earn_stamp(&learner, stage) {
        Ok(changed) => {
            let count = ledger.completed_stamp_count(&learner).unwrap_or(0);
            (StatusCode::OK, Json(EarnStampResponse::done(changed, count)))
        }
        Err(e) => (error_status(&e), Json(EarnStampResponse::error(e.to_string()))),
    }
}

/// Record the capstone-completion signal.
pub async fn capstone_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CapstoneRequest>,
) -> Response {
    let mut ledger = state.ledger.write().await;
    let learner = LearnerId::new(id);
    let summary = request.summary.unwrap_or_default();

    match ledger.record_capstone(&learner, summary) {
        Ok(()) => {
            let gate_open = ledger.can_graduate(&learner).unwrap_or(false);
            (
                StatusCode::OK,
                Json(serde_json::json!({ "success": true, "gate_open": gate_open })),
            )
                .into_response()
        }
        Err(e) => (
            error_status(&e),
            Json(serde_json::json!({ "success": false, "error": e.to_string() })),
        )
            .into_response(),
    }
}

// =============================================================================
// GRADUATION HANDLERS
// =============================================================================

/// Attempt the one-way graduation transition.
pub async fn graduate_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<GraduateRequest>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    let learner = LearnerId::new(id);
    let review = request.review.unwrap_or_default();

    match ledger.graduate(&learner, review) {
        Ok(outcome) => {
            let expires = ledger
                .load_or_init(&learner)
                .ok()
                .and_then(|r| r.graduation.access_expires_at)
                .map(|t| t.to_rfc3339());
            (
                StatusCode::OK,
                Json(GraduateResponse::done(graduation_slug(outcome), expires)),
            )
        }
        Err(e) => (error_status(&e), Json(GraduateResponse::error(e.to_string()))),
    }
}

/// Extend a graduate's access window.
pub async fn extend_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ExtendRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ExtendResponse::error(e.to_string())),
        );
    }

    let mut ledger = state.ledger.write().await;
    let learner = LearnerId::new(id);

    match ledger.extend_access(&learner, request.days) {
        Ok(ExtensionOutcome::Extended(at)) => (
            StatusCode::OK,
            Json(ExtendResponse::done("extended", Some(at.to_rfc3339()))),
        ),
        Ok(ExtensionOutcome::NotGraduated) => (
            StatusCode::OK,
            Json(ExtendResponse::done("not_graduated", None)),
        ),
        Err(e) => (error_status(&e), Json(ExtendResponse::error(e.to_string()))),
    }
}

// =============================================================================
// APTITUDE HANDLER
// =============================================================================

/// Score and persist an aptitude run.
pub async fn aptitude_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AptitudeRequest>,
) -> impl IntoResponse {
    let set = match request.question_set.as_deref().map(QuestionSetId::parse) {
        Some(Ok(s)) => Some(s),
        Some(Err(e)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AptitudeResponse::error(e.to_string())),
            );
        }
        None => None,
    };

    let answers = match parse_answers(&request.answers) {
        Ok(a) => a,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AptitudeResponse::error(e.to_string())),
            );
        }
    };

    let mut ledger = state.ledger.write().await;
    let learner = LearnerId::new(id);
    let mut rng = rand::rng();

    match ledger.run_aptitude(&learner, set, answers, &mut rng) {
        Ok(result) => (StatusCode::OK, Json(AptitudeResponse::done(&result))),
        Err(e) => (error_status(&e), Json(AptitudeResponse::error(e.to_string()))),
    }
}

// =============================================================================
// RESET HANDLER
// =============================================================================

/// Delete a learner's record.
pub async fn reset_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    let learner = LearnerId::new(id);

    match ledger.reset(&learner) {
        Ok(existed) => (StatusCode::OK, Json(ResetResponse::done(existed))),
        Err(e) => (error_status(&e), Json(ResetResponse::error(e.to_string()))),
    }
}
