//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::api::types::MAX_EXTENSION_DAYS;
use gradus_core::{
    ExtensionOutcome, GradusError, GraduationOutcome, Ledger, LearnerId, QuestionSetId, StageId,
    parse_answers,
};
use std::path::PathBuf;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for an aptitude answers file (1 MB).
///
/// An answers file holds at most a handful of question-id/choice pairs;
/// anything bigger is malformed input.
const MAX_ANSWERS_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &PathBuf, max_size: u64) -> Result<(), GradusError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| GradusError::Storage(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(GradusError::Serialization(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path to resolve symlinks and "..", checks existence,
/// and rejects directories.
fn validate_file_path(path: &std::path::Path) -> Result<PathBuf, GradusError> {
    let canonical = path.canonicalize().map_err(|e| {
        GradusError::Storage(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(GradusError::Storage(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP admin server.
pub async fn cmd_serve(
    db_path: &PathBuf,
    backend: &str,
    host: &str,
    port: u16,
) -> Result<(), GradusError> {
    let ledger = load_ledger(db_path, backend)?;

    println!("Gradus Learner Progress Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Backend:  {}", backend);
    println!("  Database: {:?}", db_path);
    println!();
    println!("Endpoints:");
    println!("  GET    /health                    - Health check");
    println!("  GET    /learners                  - List all learners");
    println!("  GET    /learners/{{id}}             - Full progress record");
    println!("  POST   /learners/{{id}}/stamps      - Award a stage stamp");
    println!("  POST   /learners/{{id}}/capstone    - Record capstone signal");
    println!("  POST   /learners/{{id}}/graduate    - Attempt graduation");
    println!("  GET    /learners/{{id}}/access      - Access-window validity");
    println!("  POST   /learners/{{id}}/extend      - Extend access window");
    println!("  POST   /learners/{{id}}/aptitude    - Run aptitude assessment");
    println!("  DELETE /learners/{{id}}             - Reset a learner");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, ledger).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show a learner's full progress record.
pub fn cmd_status(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    learner: &str,
) -> Result<(), GradusError> {
    let ledger = load_ledger(db_path, backend)?;
    let learner = LearnerId::new(learner);
    let record = ledger.load_or_init(&learner)?;
    let remaining = ledger.remaining_access_days(&learner)?;

    if json_mode {
        let view = api::types::ProgressResponse::from_record(&record);
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "backend": backend,
            "record": view,
            "remaining_access_days": remaining
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Gradus Progress: {}", learner);
    println!("========================");
    println!();
    println!("Stamps ({}/{}):", record.completed_stamp_count(), StageId::COUNT);
    for stage in StageId::ALL {
        let stamp = record.stamp(stage);
        let mark = if stamp.completed { "x" } else { " " };
        match stamp.completed_at {
            Some(at) => println!("  [{}] {}  ({})", mark, stage, at.to_rfc3339()),
            None => println!("  [{}] {}", mark, stage),
        }
    }
    println!();
    println!(
        "Capstone: {}",
        if record.has_capstone() {
            "recorded"
        } else {
            "not recorded"
        }
    );

    if record.graduation.is_graduated {
        println!("Graduated: yes");
        if let Some(at) = record.graduation.graduated_at {
            println!("  Graduated at:  {}", at.to_rfc3339());
        }
        if let Some(at) = record.graduation.access_expires_at {
            println!("  Access until:  {}", at.to_rfc3339());
        }
        println!("  Days left:     {}", remaining);
    } else {
        println!(
            "Graduated: no (gate {})",
            if record.can_graduate() { "open" } else { "closed" }
        );
    }

    match &record.aptitude {
        Some(result) => {
            println!();
            println!("Aptitude: {}", result.result_type.name());
            println!("  Question set: {}", result.question_set);
            println!("  Completed at: {}", result.completed_at.to_rfc3339());
            for (persona, score) in &result.scores {
                println!("  {:<12} {}", persona.name(), score);
            }
        }
        None => println!("Aptitude: not taken"),
    }

    Ok(())
}

// =============================================================================
// EARN COMMAND
// =============================================================================

/// Award a stage stamp.
pub fn cmd_earn(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    learner: &str,
    stage: &str,
) -> Result<(), GradusError> {
    let mut ledger = load_ledger(db_path, backend)?;
    let learner = LearnerId::new(learner);
    let stage = StageId::parse(stage)?;

    let changed = ledger.earn_stamp(&learner, stage)?;
    let count = ledger.completed_stamp_count(&learner)?;

    if json_mode {
        let output = serde_json::json!({
            "learner": learner.as_str(),
            "stage": stage.slug(),
            "changed": changed,
            "stamp_count": count
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if changed {
        println!("Stamp earned: {} for {}", stage, learner);
    } else {
        println!("Stamp already held: {} for {}", stage, learner);
    }
    println!("Stamps: {}/{}", count, StageId::COUNT);

    Ok(())
}

// =============================================================================
// CAPSTONE COMMAND
// =============================================================================

/// Record the capstone-completion signal.
pub fn cmd_capstone(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    learner: &str,
    summary: &str,
) -> Result<(), GradusError> {
    let mut ledger = load_ledger(db_path, backend)?;
    let learner = LearnerId::new(learner);

    ledger.record_capstone(&learner, summary)?;
    let gate_open = ledger.can_graduate(&learner)?;

    if json_mode {
        let output = serde_json::json!({
            "learner": learner.as_str(),
            "capstone_present": true,
            "gate_open": gate_open
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Capstone recorded for {}", learner);
    println!(
        "Graduation gate: {}",
        if gate_open { "open" } else { "closed" }
    );

    Ok(())
}

// =============================================================================
// GRADUATE COMMAND
// =============================================================================

/// Attempt graduation.
pub fn cmd_graduate(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    learner: &str,
    review: &str,
) -> Result<(), GradusError> {
    let mut ledger = load_ledger(db_path, backend)?;
    let learner = LearnerId::new(learner);

    let outcome = ledger.graduate(&learner, review)?;
    let record = ledger.load_or_init(&learner)?;
    let expires = record
        .graduation
        .access_expires_at
        .map(|t| t.to_rfc3339());

    if json_mode {
        let output = serde_json::json!({
            "learner": learner.as_str(),
            "outcome": graduation_outcome_slug(outcome),
            "access_expires_at": expires
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    match outcome {
        GraduationOutcome::Graduated => {
            println!("Graduated: {}", learner);
            if let Some(at) = expires {
                println!("Access until: {}", at);
            }
        }
        GraduationOutcome::AlreadyGraduated => {
            println!("{} already graduated; nothing changed", learner);
        }
        GraduationOutcome::NotEligible => {
            println!(
                "{} is not eligible: {}/{} stamps, capstone {}",
                learner,
                record.completed_stamp_count(),
                StageId::COUNT,
                if record.has_capstone() {
                    "recorded"
                } else {
                    "missing"
                }
            );
        }
    }

    Ok(())
}

// =============================================================================
// EXTEND COMMAND
// =============================================================================

/// Extend a graduate's access window.
pub fn cmd_extend(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    learner: &str,
    days: i64,
) -> Result<(), GradusError> {
    // Boundary clamp: the admin surface accepts 1..=365 per request.
    if days < 1 || days > MAX_EXTENSION_DAYS {
        return Err(GradusError::InvalidDays(days));
    }

    let mut ledger = load_ledger(db_path, backend)?;
    let learner = LearnerId::new(learner);

    let outcome = ledger.extend_access(&learner, days)?;
    let remaining = ledger.remaining_access_days(&learner)?;

    if json_mode {
        let (slug, expires) = match outcome {
            ExtensionOutcome::Extended(at) => ("extended", Some(at.to_rfc3339())),
            ExtensionOutcome::NotGraduated => ("not_graduated", None),
        };
        let output = serde_json::json!({
            "learner": learner.as_str(),
            "outcome": slug,
            "access_expires_at": expires,
            "remaining_days": remaining
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    match outcome {
        ExtensionOutcome::Extended(at) => {
            println!("Extended access for {} by {} days", learner, days);
            println!("Access until: {}", at.to_rfc3339());
            println!("Days left:    {}", remaining);
        }
        ExtensionOutcome::NotGraduated => {
            println!("{} has not graduated; nothing to extend", learner);
        }
    }

    Ok(())
}

// =============================================================================
// APTITUDE COMMAND
// =============================================================================

/// Run the aptitude assessment from an answers file.
pub fn cmd_aptitude(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    learner: &str,
    file: &PathBuf,
    set: Option<&str>,
) -> Result<(), GradusError> {
    let mut ledger = load_ledger(db_path, backend)?;
    let learner = LearnerId::new(learner);

    let set = set.map(QuestionSetId::parse).transpose()?;

    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_ANSWERS_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| GradusError::Storage(format!("Read answers file: {}", e)))?;
    let raw: std::collections::BTreeMap<String, String> = serde_json::from_slice(&contents)
        .map_err(|e| GradusError::Serialization(format!("Parse answers file: {}", e)))?;
    let answers = parse_answers(&raw)?;

    let mut rng = rand::rng();
    let result = ledger.run_aptitude(&learner, set, answers, &mut rng)?;

    if json_mode {
        let output = serde_json::json!({
            "learner": learner.as_str(),
            "result_type": result.result_type.name(),
            "question_set": result.question_set.slug(),
            "scores": result
                .scores
                .iter()
                .map(|(p, s)| (p.name().to_string(), *s))
                .collect::<std::collections::BTreeMap<String, u32>>()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Aptitude result for {}: {}", learner, result.result_type.name());
    println!("Question set: {}", result.question_set);
    println!();
    println!("Scores:");
    for (persona, score) in &result.scores {
        println!("  {:<12} {}", persona.name(), score);
    }

    Ok(())
}

// =============================================================================
// LEARNERS COMMAND
// =============================================================================

/// List all tracked learners.
pub fn cmd_learners(db_path: &PathBuf, backend: &str, json_mode: bool) -> Result<(), GradusError> {
    let ledger = load_ledger(db_path, backend)?;
    let records = ledger.list_all()?;

    if json_mode {
        let learners: Vec<api::types::LearnerSummary> = records
            .iter()
            .map(api::types::LearnerSummary::from_record)
            .collect();
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "backend": backend,
            "count": learners.len(),
            "learners": learners
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Gradus Learners");
    println!("===============");
    println!("Database: {:?}", db_path);
    println!("Backend:  {}", backend);
    println!();

    if records.is_empty() {
        println!("No learners tracked yet.");
        return Ok(());
    }

    for record in &records {
        let grad = if record.graduation.is_graduated {
            "graduated"
        } else {
            "in progress"
        };
        println!(
            "  {:<24} {}/{} stamps  {}",
            record.learner.as_str(),
            record.completed_stamp_count(),
            StageId::COUNT,
            grad
        );
    }
    println!();
    println!("Total: {}", records.len());

    Ok(())
}

// =============================================================================
// RESET COMMAND
// =============================================================================

/// Delete a learner's record.
pub fn cmd_reset(
    db_path: &PathBuf,
    backend: &str,
    json_mode: bool,
    learner: &str,
    force: bool,
) -> Result<(), GradusError> {
    if !force {
        return Err(GradusError::Storage(
            "Reset deletes the whole record. Re-run with --force to confirm.".to_string(),
        ));
    }

    let mut ledger = load_ledger(db_path, backend)?;
    let learner = LearnerId::new(learner);
    let existed = ledger.reset(&learner)?;

    if json_mode {
        let output = serde_json::json!({
            "learner": learner.as_str(),
            "existed": existed
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if existed {
        println!("Reset {}", learner);
    } else {
        println!("No record for {}", learner);
    }

    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open a ledger on the requested backend.
pub fn load_ledger(db_path: &PathBuf, backend: &str) -> Result<Ledger, GradusError> {
    match backend {
        "memory" => Ok(Ledger::new()),
        _ => Ledger::with_redb(db_path),
    }
}

/// Stable string form of a graduation outcome for JSON output.
pub fn graduation_outcome_slug(outcome: GraduationOutcome) -> &'static str {
    match outcome {
        GraduationOutcome::Graduated => "graduated",
        GraduationOutcome::AlreadyGraduated => "already_graduated",
        GraduationOutcome::NotEligible => "not_eligible",
    }
}
