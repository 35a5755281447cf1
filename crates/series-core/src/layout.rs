//! Column-aligned layout of bandwidth-measurement server logs.
//!
//! The logs are not delimiter-separated: every field lives at a fixed
//! character range, and the summary row uses different units and widths
//! than the per-second rows. [`LogFormat`] declares those ranges per line
//! kind together with the marker strings used to classify lines.

use serde::{Deserialize, Serialize};

// ── FieldRange ────────────────────────────────────────────────────────────────

/// A half-open character range `[start, end)` within a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRange {
    pub start: usize,
    pub end: usize,
}

impl FieldRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// `true` when the range selects no characters.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Slice the field out of `line`.
    ///
    /// Offsets count characters, not bytes. A range running past the end of
    /// the line is clamped, so a short line yields a shorter (possibly empty)
    /// field instead of failing.
    ///
    /// ```
    /// use series_core::layout::FieldRange;
    ///
    /// assert_eq!(FieldRange::new(1, 4).slice("[  3] local"), "  3");
    /// assert_eq!(FieldRange::new(8, 20).slice("[  3] lo"), "");
    /// ```
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        let byte_at = |col: usize| {
            line.char_indices()
                .nth(col)
                .map(|(i, _)| i)
                .unwrap_or(line.len())
        };
        let start = byte_at(self.start);
        let end = byte_at(self.end).max(start);
        &line[start..end]
    }
}

// ── ColumnLayout ──────────────────────────────────────────────────────────────

/// Character ranges for every field the parser extracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// Session ID on setup lines and on the line after the header.
    pub session_id: FieldRange,
    /// Peer address on setup (connection) lines.
    pub interface_address: FieldRange,
    /// Transferred amount on per-second lines.
    pub transfer: FieldRange,
    /// Transferred amount on the cumulative summary line.
    pub summary_transfer: FieldRange,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            session_id: FieldRange::new(1, 4),
            interface_address: FieldRange::new(46, 56),
            transfer: FieldRange::new(19, 26),
            summary_transfer: FieldRange::new(19, 26),
        }
    }
}

impl ColumnLayout {
    /// Named view over every range, used for validation messages.
    pub fn ranges(&self) -> [(&'static str, FieldRange); 4] {
        [
            ("session_id", self.session_id),
            ("interface_address", self.interface_address),
            ("transfer", self.transfer),
            ("summary_transfer", self.summary_transfer),
        ]
    }
}

// ── BlockLine ─────────────────────────────────────────────────────────────────

/// Classification of a line inside a session's data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLine {
    /// Whitespace only; ends the data block.
    Blank,
    /// Out-of-order datagram notice; ignored.
    OutOfOrder,
    /// Whole-session total in the coarse unit.
    Summary,
    /// One second's transfer.
    Data,
}

// ── LogFormat ─────────────────────────────────────────────────────────────────

/// Markers, offsets and units of the log format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFormat {
    /// Lines at the top of every file that carry no session data.
    pub preamble_lines: usize,
    /// Prefix of the line that opens the real session's data block.
    pub header_marker: String,
    /// Substring identifying the cumulative summary line.
    pub summary_marker: String,
    /// Substring identifying out-of-order datagram notices.
    pub out_of_order_marker: String,
    /// Lines examined after the first data line.
    pub follow_lines: usize,
    /// Fine units per coarse unit (summary line vs. per-second lines).
    pub summary_scale: f64,
    pub columns: ColumnLayout,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            preamble_lines: 5,
            header_marker: "[ ID]".to_string(),
            summary_marker: "0.0-".to_string(),
            out_of_order_marker: "datagrams received out-of-order".to_string(),
            follow_lines: 8,
            summary_scale: 1000.0,
            columns: ColumnLayout::default(),
        }
    }
}

impl LogFormat {
    /// `true` when `line` opens the session's data block.
    pub fn is_header(&self, line: &str) -> bool {
        line.starts_with(&self.header_marker)
    }

    /// Classify a line following the first data line.
    ///
    /// Checks run in a fixed order: blank, out-of-order, summary, data.
    pub fn classify(&self, line: &str) -> BlockLine {
        if line.trim().is_empty() {
            BlockLine::Blank
        } else if line.contains(&self.out_of_order_marker) {
            BlockLine::OutOfOrder
        } else if line.contains(&self.summary_marker) {
            BlockLine::Summary
        } else {
            BlockLine::Data
        }
    }

    /// Named view over every marker, used for validation messages.
    pub fn markers(&self) -> [(&'static str, &str); 3] {
        [
            ("header_marker", self.header_marker.as_str()),
            ("summary_marker", self.summary_marker.as_str()),
            ("out_of_order_marker", self.out_of_order_marker.as_str()),
        ]
    }

    /// Most seconds a single session can occupy (first data line included).
    pub fn max_session_seconds(&self) -> usize {
        self.follow_lines + 1
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
