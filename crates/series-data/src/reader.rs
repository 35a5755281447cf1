//! Batch loading for the throughput series extractor.
//!
//! Opens one log file per trial, named by consecutive port numbers, and
//! hands them out in trial order. Every trial slot must exist: a missing
//! file aborts the batch before any parsing happens.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use series_core::models::BatchPlan;
use series_core::{Result, SeriesError};
use tracing::debug;

// ── LogFile ───────────────────────────────────────────────────────────────────

/// An open log file for one trial.
///
/// The handle is released when the value is dropped, whichever way the
/// caller leaves its processing.
#[derive(Debug)]
pub struct LogFile {
    trial: usize,
    port: u16,
    path: PathBuf,
    file: File,
}

impl LogFile {
    /// Trial position inside the batch (the series column it starts at).
    pub fn trial(&self) -> usize {
        self.trial
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file as text.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected; the
    /// fields the parser reads are plain ASCII.
    pub fn read_content(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        self.file
            .read_to_end(&mut bytes)
            .map_err(|source| SeriesError::FileRead {
                path: self.path.clone(),
                source,
            })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// ── LogBatch ──────────────────────────────────────────────────────────────────

/// All log files of a batch, indexed by trial.
#[derive(Debug)]
pub struct LogBatch {
    files: Vec<LogFile>,
}

impl LogBatch {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in ascending trial order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LogFile> {
        self.files.iter_mut()
    }

    /// Release every handle.
    pub fn close(self) {
        debug!("Closing {} log files", self.files.len());
        drop(self.files);
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Open every file of the batch described by `plan`, in trial order.
///
/// Fails with [`SeriesError::MissingBatchFile`] on the first file that
/// cannot be opened; files opened before it are closed on return. A batch
/// whose ports run past 65535 is a [`SeriesError::Config`] error and opens
/// nothing.
pub fn open_batch(plan: &BatchPlan) -> Result<LogBatch> {
    let last_port = plan.last_port()?;
    let mut files = Vec::with_capacity(plan.trials);

    for trial in 0..plan.trials {
        let (port, path) = plan
            .port_for(trial)
            .zip(plan.path_for(trial))
            .ok_or_else(|| SeriesError::Config(format!("trial {} has no port", trial)))?;
        let file = File::open(&path).map_err(|source| SeriesError::MissingBatchFile {
            port,
            path: path.clone(),
            source,
        })?;
        files.push(LogFile {
            trial,
            port,
            path,
            file,
        });
    }

    debug!(
        "Opened {} log files from {} (ports {}..={})",
        files.len(),
        plan.input_dir.display(),
        plan.start_port,
        last_port,
    );

    Ok(LogBatch { files })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
