use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SeriesError};
use crate::layout::LogFormat;
use crate::models::{BatchPlan, InterfaceRow};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Rebuild per-interface throughput series from a batch of server logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "throughput-series",
    about = "Rebuild per-interface throughput series from a batch of server logs",
    version
)]
pub struct Settings {
    /// Directory holding one log file per trial
    #[arg(long, default_value = ".")]
    pub input_dir: PathBuf,

    /// Directory the two series files are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Port of the first trial; later trials use consecutive ports
    #[arg(long, default_value = "5001")]
    pub start_port: u16,

    /// Number of trials in the batch
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..))]
    pub trials: u32,

    /// Duration of each measurement session in seconds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub session_seconds: u32,

    /// Text placed before the port number in log file names
    #[arg(long, default_value = "")]
    pub file_prefix: String,

    /// Extension of log file names (empty for none)
    #[arg(long, default_value = "txt")]
    pub file_extension: String,

    /// JSON file describing interfaces and the log layout
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON report of every trial's outcome to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Parse an explicit argument list and apply the `--debug` override.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The batch described by these settings.
    pub fn batch_plan(&self) -> BatchPlan {
        BatchPlan {
            input_dir: self.input_dir.clone(),
            start_port: self.start_port,
            trials: self.trials as usize,
            session_seconds: self.session_seconds as usize,
            file_prefix: self.file_prefix.clone(),
            file_extension: self.file_extension.clone(),
        }
    }
}

// ── ExtractorConfig ────────────────────────────────────────────────────────────

/// A known interface and the file its series is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    /// Peer address as it appears on setup lines.
    pub address: String,
    /// File name of the series, relative to the output directory.
    pub output_file: String,
}

impl InterfaceConfig {
    fn new(address: &str, output_file: &str) -> Self {
        Self {
            address: address.to_string(),
            output_file: output_file.to_string(),
        }
    }
}

/// Static parameters of the extraction: the two interfaces and the log
/// layout. Persisted as JSON; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Row 0 first, then row 1.
    pub interfaces: [InterfaceConfig; 2],
    pub format: LogFormat,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            interfaces: [
                InterfaceConfig::new("10.0.0.10", "intf1-data.txt"),
                InterfaceConfig::new("10.0.0.11", "intf2-data.txt"),
            ],
            format: LogFormat::default(),
        }
    }
}

impl ExtractorConfig {
    /// Default location: `~/.throughput-series/config.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// The config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".throughput-series").join("config.json")
    }

    /// Resolve the configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default path
    /// is used when present, and the built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load_or_default(&Self::config_path()),
        }
    }

    /// Load from `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SeriesError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: ExtractorConfig = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Map a resolved peer address to its matrix row.
    pub fn resolve_row(&self, address: &str) -> Option<InterfaceRow> {
        InterfaceRow::ALL
            .into_iter()
            .find(|row| self.interfaces[row.index()].address == address)
    }

    pub fn interface(&self, row: InterfaceRow) -> &InterfaceConfig {
        &self.interfaces[row.index()]
    }

    /// Check the configuration against a session duration.
    pub fn validate(&self, session_seconds: usize) -> Result<()> {
        let [first, second] = &self.interfaces;
        if first.address.is_empty() || second.address.is_empty() {
            return Err(SeriesError::Config(
                "interface addresses must not be empty".to_string(),
            ));
        }
        if first.address == second.address {
            return Err(SeriesError::Config(format!(
                "both interfaces use address {}",
                first.address
            )));
        }
        if first.output_file.is_empty() || second.output_file.is_empty() {
            return Err(SeriesError::Config(
                "output file names must not be empty".to_string(),
            ));
        }
        if first.output_file == second.output_file {
            return Err(SeriesError::Config(format!(
                "both interfaces write to {}",
                first.output_file
            )));
        }
        for (name, marker) in self.format.markers() {
            if marker.is_empty() {
                return Err(SeriesError::Config(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }
        for (name, range) in self.format.columns.ranges() {
            if range.is_empty() {
                return Err(SeriesError::Config(format!(
                    "column range {} is empty ({}..{})",
                    name, range.start, range.end
                )));
            }
        }
        if session_seconds < self.format.max_session_seconds() {
            return Err(SeriesError::Config(format!(
                "session duration {}s is shorter than the {} seconds a session may report",
                session_seconds,
                self.format.max_session_seconds()
            )));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
