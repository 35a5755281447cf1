//! Batch pipeline for the throughput series extractor.
//!
//! Opens the batch, parses every trial in order, accumulates the sessions
//! into a [`BandwidthMatrix`] and returns it with a [`BatchReport`] that
//! records what happened to each file.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use series_core::models::{BatchPlan, InterfaceRow, SessionOutcome};
use series_core::settings::ExtractorConfig;
use series_core::{Result, SeriesError};
use tracing::{debug, info, warn};

use crate::aggregator::BandwidthMatrix;
use crate::parser::{parse_log, ParsedLog};
use crate::reader::{open_batch, LogFile};

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of one trial.
#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    pub trial: usize,
    pub port: u16,
    pub file: String,
    pub outcome: SessionOutcome,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// RFC 3339 timestamp when the run finished.
    pub generated_at: String,
    pub trials: usize,
    /// Seconds covered by each output series.
    pub span: usize,
    /// Applied sessions per interface row.
    pub applied: [usize; 2],
    pub skipped_no_session: usize,
    pub skipped_unresolved: usize,
    pub malformed: usize,
    /// Wall-clock seconds spent reading and parsing.
    pub processing_time_seconds: f64,
    pub trial_reports: Vec<TrialReport>,
}

impl BatchReport {
    fn from_trials(trial_reports: Vec<TrialReport>, span: usize, elapsed: f64) -> Self {
        let mut applied = [0usize; 2];
        let mut skipped_no_session = 0;
        let mut skipped_unresolved = 0;
        let mut malformed = 0;

        for report in &trial_reports {
            match &report.outcome {
                SessionOutcome::Applied { row, .. } => applied[row.index()] += 1,
                SessionOutcome::SkippedNoSession => skipped_no_session += 1,
                SessionOutcome::SkippedUnresolvedInterface { .. } => skipped_unresolved += 1,
                SessionOutcome::MalformedField { .. } => malformed += 1,
            }
        }

        Self {
            generated_at: Utc::now().to_rfc3339(),
            trials: trial_reports.len(),
            span,
            applied,
            skipped_no_session,
            skipped_unresolved,
            malformed,
            processing_time_seconds: elapsed,
            trial_reports,
        }
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| SeriesError::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The complete output of [`run_batch`].
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub matrix: BandwidthMatrix,
    pub report: BatchReport,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the batch pipeline.
///
/// 1. Validate `config` against the plan's session duration.
/// 2. Open every log file of the batch; a missing file aborts the run.
/// 3. Parse each file in trial order and add its session into the matrix.
/// 4. Close the files and summarise the outcomes.
///
/// Per-file problems never abort the run: they are recorded in the report
/// and leave the trial's cells untouched.
pub fn run_batch(plan: &BatchPlan, config: &ExtractorConfig) -> Result<BatchResult> {
    config.validate(plan.session_seconds)?;

    let started = Instant::now();
    let mut batch = open_batch(plan)?;
    let mut matrix = BandwidthMatrix::new(plan.span(), plan.session_seconds);
    let mut trial_reports = Vec::with_capacity(batch.len());

    for file in batch.iter_mut() {
        let content = file.read_content()?;
        let outcome = process_log(&content, file.trial(), config, &mut matrix);
        log_outcome(file, &outcome);
        trial_reports.push(TrialReport {
            trial: file.trial(),
            port: file.port(),
            file: file.path().display().to_string(),
            outcome,
        });
    }
    batch.close();

    let report = BatchReport::from_trials(
        trial_reports,
        matrix.span(),
        started.elapsed().as_secs_f64(),
    );
    info!(
        "Processed {} trials: {} on {}, {} on {}, {} without session, {} unresolved, {} malformed",
        report.trials,
        report.applied[0],
        InterfaceRow::First,
        report.applied[1],
        InterfaceRow::Second,
        report.skipped_no_session,
        report.skipped_unresolved,
        report.malformed,
    );

    Ok(BatchResult { matrix, report })
}

/// Parse one log and add its session into `matrix` at column `trial`.
///
/// The matrix is only written when the whole log parsed and resolved.
pub fn process_log(
    content: &str,
    trial: usize,
    config: &ExtractorConfig,
    matrix: &mut BandwidthMatrix,
) -> SessionOutcome {
    match parse_log(content, config) {
        Ok(ParsedLog::Established(session)) => {
            let samples = matrix.apply(&session, trial);
            SessionOutcome::Applied {
                row: session.row,
                session_id: session.id,
                samples,
            }
        }
        Ok(ParsedLog::NeverEstablished) => SessionOutcome::SkippedNoSession,
        Ok(ParsedLog::UnresolvedInterface {
            session_id,
            address,
        }) => SessionOutcome::SkippedUnresolvedInterface {
            session_id,
            address,
        },
        Err(e) => SessionOutcome::MalformedField {
            detail: e.to_string(),
        },
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn log_outcome(file: &LogFile, outcome: &SessionOutcome) {
    match outcome {
        SessionOutcome::Applied {
            row,
            session_id,
            samples,
        } => debug!(
            "Trial {} ({}): session {} on {}, {} samples",
            file.trial(),
            file.path().display(),
            session_id,
            row,
            samples
        ),
        SessionOutcome::SkippedNoSession => debug!(
            "Trial {} ({}): session never established",
            file.trial(),
            file.path().display()
        ),
        SessionOutcome::SkippedUnresolvedInterface {
            session_id,
            address,
        } => warn!(
            "Other interface found for file {} (port {}): session {} address {}",
            file.path().display(),
            file.port(),
            session_id,
            address.as_deref().unwrap_or("<none>")
        ),
        SessionOutcome::MalformedField { detail } => warn!(
            "Skipping file {} (port {}): {}",
            file.path().display(),
            file.port(),
            detail
        ),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
