use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{Result, SeriesError};

/// One of the two network paths a session can travel over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceRow {
    First,
    Second,
}

impl InterfaceRow {
    /// Both rows in matrix order.
    pub const ALL: [InterfaceRow; 2] = [InterfaceRow::First, InterfaceRow::Second];

    /// Row position inside the bandwidth matrix.
    pub fn index(self) -> usize {
        match self {
            InterfaceRow::First => 0,
            InterfaceRow::Second => 1,
        }
    }
}

impl fmt::Display for InterfaceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interface {}", self.index() + 1)
    }
}

/// One transfer value at a session-relative second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Seconds since the session's first data line.
    pub second: usize,
    /// Transferred amount in per-second-line units.
    pub value: f64,
}

/// The established session recovered from one trial's log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Numeric ID the measurement tool assigned to the connection.
    pub id: u32,
    /// Peer address read from the authoritative setup line.
    pub address: String,
    pub row: InterfaceRow,
    /// Samples in the order they appear in the log.
    pub samples: Vec<Sample>,
}

impl Session {
    /// Sum of all samples, including any value derived from the summary line.
    pub fn total(&self) -> f64 {
        self.samples.iter().map(|s| s.value).sum()
    }
}

/// What happened to one trial's log file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The session's samples were added into `row`.
    Applied {
        row: InterfaceRow,
        session_id: u32,
        samples: usize,
    },
    /// No header line: the session was never established.
    SkippedNoSession,
    /// The session's address matches neither known interface.
    SkippedUnresolvedInterface {
        session_id: u32,
        address: Option<String>,
    },
    /// A required field or line was malformed; the file was skipped.
    MalformedField { detail: String },
}

/// Where the batch's log files live and how they are named.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPlan {
    pub input_dir: PathBuf,
    /// Port of the first trial; each later trial uses the next port.
    pub start_port: u16,
    /// Number of trials (files) in the batch.
    pub trials: usize,
    /// Seconds each session is expected to last.
    pub session_seconds: usize,
    pub file_prefix: String,
    pub file_extension: String,
}

impl BatchPlan {
    /// Port used by the trial at `trial`, or `None` past port 65535.
    pub fn port_for(&self, trial: usize) -> Option<u16> {
        u16::try_from(trial)
            .ok()
            .and_then(|offset| self.start_port.checked_add(offset))
    }

    /// Port of the last trial.
    ///
    /// Fails when the batch is empty or its ports run past 65535.
    pub fn last_port(&self) -> Result<u16> {
        let last = self
            .trials
            .checked_sub(1)
            .ok_or_else(|| SeriesError::Config("batch has no trials".to_string()))?;
        self.port_for(last).ok_or_else(|| {
            SeriesError::Config(format!(
                "{} trials starting at port {} run past port {}",
                self.trials,
                self.start_port,
                u16::MAX
            ))
        })
    }

    /// Path of the log file for the trial at `trial`.
    ///
    /// ```
    /// use series_core::models::BatchPlan;
    /// use std::path::PathBuf;
    ///
    /// let plan = BatchPlan {
    ///     input_dir: PathBuf::from("logs"),
    ///     start_port: 5001,
    ///     trials: 60,
    ///     session_seconds: 10,
    ///     file_prefix: String::new(),
    ///     file_extension: "txt".to_string(),
    /// };
    /// assert_eq!(plan.path_for(2), Some(PathBuf::from("logs/5003.txt")));
    /// ```
    pub fn path_for(&self, trial: usize) -> Option<PathBuf> {
        let port = self.port_for(trial)?;
        let name = if self.file_extension.is_empty() {
            format!("{}{}", self.file_prefix, port)
        } else {
            format!("{}{}.{}", self.file_prefix, port, self.file_extension)
        };
        Some(self.input_dir.join(name))
    }

    /// Length of each output series: one slot per trial plus room for the
    /// last trial's session to run its full duration.
    pub fn span(&self) -> usize {
        self.trials + self.session_seconds
    }
}
