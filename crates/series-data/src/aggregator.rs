//! Per-interface accumulation of trial transfers.
//!
//! Each trial's session is added into its interface's row starting at the
//! trial's own column, so a value for session-relative second `s` of trial
//! `t` lands at absolute second `t + s`. Trials started one second apart
//! overlap, which is why every write adds instead of assigning.

use std::path::{Path, PathBuf};

use series_core::formatting::join_series;
use series_core::models::{InterfaceRow, Session};
use series_core::settings::ExtractorConfig;
use series_core::{Result, SeriesError};
use tracing::{debug, warn};

// ── TrialWindow ───────────────────────────────────────────────────────────────

/// The cells one trial may write to: a single interface row, from the
/// trial's column up to the end of its session duration.
#[derive(Debug)]
pub struct TrialWindow<'a> {
    cells: &'a mut [f64],
}

impl TrialWindow<'_> {
    /// Add `value` at session-relative `second`.
    ///
    /// Returns `false` (and writes nothing) when `second` lies outside the
    /// window.
    pub fn add(&mut self, second: usize, value: f64) -> bool {
        match self.cells.get_mut(second) {
            Some(cell) => {
                *cell += value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ── BandwidthMatrix ───────────────────────────────────────────────────────────

/// Two fixed-length series of transferred amounts, one per interface,
/// indexed by absolute second.
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthMatrix {
    rows: [Vec<f64>; 2],
    session_seconds: usize,
}

impl BandwidthMatrix {
    /// Zero-filled matrix of `span` seconds whose trials each cover
    /// `session_seconds` seconds.
    pub fn new(span: usize, session_seconds: usize) -> Self {
        Self {
            rows: [vec![0.0; span], vec![0.0; span]],
            session_seconds,
        }
    }

    /// Number of absolute seconds in each row.
    pub fn span(&self) -> usize {
        self.rows[0].len()
    }

    pub fn row(&self, row: InterfaceRow) -> &[f64] {
        &self.rows[row.index()]
    }

    /// Mutable view of the cells `trial` may write in `row`.
    ///
    /// The view is clamped to the matrix, so it may be shorter than the
    /// session duration for the last trials of an undersized matrix.
    pub fn window_mut(&mut self, row: InterfaceRow, trial: usize) -> TrialWindow<'_> {
        let cells = &mut self.rows[row.index()];
        let start = trial.min(cells.len());
        let end = trial.saturating_add(self.session_seconds).min(cells.len());
        TrialWindow {
            cells: &mut cells[start..end],
        }
    }

    /// Add every sample of `session` into its interface row at `trial`.
    ///
    /// Returns the number of samples written.
    pub fn apply(&mut self, session: &Session, trial: usize) -> usize {
        let mut window = self.window_mut(session.row, trial);
        let mut written = 0;
        for sample in &session.samples {
            if window.add(sample.second, sample.value) {
                written += 1;
            } else {
                warn!(
                    "Trial {}: second {} of session {} falls outside the {}-second window",
                    trial,
                    sample.second,
                    session.id,
                    window.len()
                );
            }
        }
        written
    }

    /// Render one row as newline-separated values.
    pub fn render(&self, row: InterfaceRow) -> String {
        join_series(self.row(row))
    }

    /// Write both rows to their configured files under `output_dir`,
    /// replacing any previous content.
    ///
    /// Returns the written paths, row 0 first.
    pub fn write_series(&self, output_dir: &Path, config: &ExtractorConfig) -> Result<Vec<PathBuf>> {
        InterfaceRow::ALL
            .into_iter()
            .map(|row| -> Result<PathBuf> {
                let path = output_dir.join(&config.interface(row).output_file);
                std::fs::write(&path, self.render(row)).map_err(|source| {
                    SeriesError::FileWrite {
                        path: path.clone(),
                        source,
                    }
                })?;
                debug!("Wrote {} series to {}", row, path.display());
                Ok(path)
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use series_core::models::Sample;
    use tempfile::TempDir;

    fn session(row: InterfaceRow, values: &[(usize, f64)]) -> Session {
        Session {
            id: 3,
            address: String::new(),
            row,
            samples: values
                .iter()
                .map(|&(second, value)| Sample { second, value })
                .collect(),
        }
    }

    // ── window_mut ────────────────────────────────────────────────────────────

    #[test]
    fn test_window_covers_session_duration() {
        let mut matrix = BandwidthMatrix::new(70, 10);
        assert_eq!(matrix.window_mut(InterfaceRow::First, 0).len(), 10);
        assert_eq!(matrix.window_mut(InterfaceRow::First, 59).len(), 10);
    }

    #[test]
    fn test_window_clamped_to_span() {
        let mut matrix = BandwidthMatrix::new(12, 10);
        assert_eq!(matrix.window_mut(InterfaceRow::Second, 5).len(), 7);
        assert!(matrix.window_mut(InterfaceRow::Second, 40).is_empty());
    }

    #[test]
    fn test_window_rejects_out_of_range_second() {
        let mut matrix = BandwidthMatrix::new(20, 10);
        let mut window = matrix.window_mut(InterfaceRow::First, 2);
        assert!(window.add(9, 1.0));
        assert!(!window.add(10, 1.0));
        assert_eq!(matrix.row(InterfaceRow::First)[11], 1.0);
        assert_eq!(matrix.row(InterfaceRow::First)[12], 0.0);
    }

    // ── apply ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_apply_offsets_by_trial() {
        let mut matrix = BandwidthMatrix::new(15, 10);
        let written = matrix.apply(&session(InterfaceRow::First, &[(0, 500.0), (2, 7.5)]), 4);

        assert_eq!(written, 2);
        let row = matrix.row(InterfaceRow::First);
        assert_eq!(row[4], 500.0);
        assert_eq!(row[6], 7.5);
        assert_eq!(row.iter().sum::<f64>(), 507.5);
        assert!(matrix.row(InterfaceRow::Second).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_overlapping_trials_are_summed() {
        let mut matrix = BandwidthMatrix::new(20, 10);
        let a: Vec<(usize, f64)> = (0..9).map(|s| (s, 100.0)).collect();
        let b: Vec<(usize, f64)> = (0..9).map(|s| (s, 10.0)).collect();
        matrix.apply(&session(InterfaceRow::First, &a), 0);
        matrix.apply(&session(InterfaceRow::First, &b), 3);

        let row = matrix.row(InterfaceRow::First);
        assert_eq!(row[0], 100.0);
        assert_eq!(row[2], 100.0);
        for second in 3..=8 {
            assert_eq!(row[second], 110.0, "second {second}");
        }
        assert_eq!(row[9], 10.0);
        assert_eq!(row[11], 10.0);
        assert_eq!(row[12], 0.0);
    }

    #[test]
    fn test_rows_are_independent() {
        let mut matrix = BandwidthMatrix::new(12, 10);
        matrix.apply(&session(InterfaceRow::First, &[(0, 1.0)]), 1);
        matrix.apply(&session(InterfaceRow::Second, &[(0, 2.0)]), 1);

        assert_eq!(matrix.row(InterfaceRow::First)[1], 1.0);
        assert_eq!(matrix.row(InterfaceRow::Second)[1], 2.0);
    }

    // ── render / write_series ─────────────────────────────────────────────────

    #[test]
    fn test_render_includes_untouched_seconds() {
        let mut matrix = BandwidthMatrix::new(4, 2);
        matrix.apply(&session(InterfaceRow::Second, &[(0, 500.0), (1, 1200.0)]), 1);

        assert_eq!(matrix.render(InterfaceRow::Second), "0\n500\n1200\n0");
        assert_eq!(matrix.render(InterfaceRow::First), "0\n0\n0\n0");
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut matrix = BandwidthMatrix::new(30, 10);
        matrix.apply(&session(InterfaceRow::First, &[(0, 0.1), (1, 0.2)]), 7);

        let first = matrix.render(InterfaceRow::First);
        let second = matrix.render(InterfaceRow::First);
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_series_overwrites() {
        let dir = TempDir::new().unwrap();
        let config = ExtractorConfig::default();
        std::fs::write(dir.path().join("intf1-data.txt"), "stale content\n".repeat(50)).unwrap();

        let mut matrix = BandwidthMatrix::new(3, 2);
        matrix.apply(&session(InterfaceRow::First, &[(0, 42.0)]), 0);
        let paths = matrix.write_series(dir.path(), &config).unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(std::fs::read_to_string(&paths[0]).unwrap(), "42\n0\n0");
        assert_eq!(std::fs::read_to_string(&paths[1]).unwrap(), "0\n0\n0");
        assert!(paths[1].ends_with("intf2-data.txt"));
    }

    #[test]
    fn test_write_series_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let matrix = BandwidthMatrix::new(3, 2);
        let err = matrix
            .write_series(&dir.path().join("absent"), &ExtractorConfig::default())
            .unwrap_err();
        assert!(matches!(err, SeriesError::FileWrite { .. }));
    }
}
