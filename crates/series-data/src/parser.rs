//! Session recovery from one trial's server log.
//!
//! A log may record several connection attempts before the one that
//! actually carries data. The parser finds the header that opens the real
//! session's data block, reads the session ID from the line after it,
//! cross-references that ID against the setup lines above the header to
//! recover the peer address, and collects the per-second transfers.
//!
//! Parsing is pure: it produces a [`Session`] and never touches the
//! bandwidth matrix, so a log that fails half-way contributes nothing.

use series_core::layout::{BlockLine, FieldRange, LogFormat};
use series_core::models::{Sample, Session};
use series_core::settings::ExtractorConfig;
use series_core::{Result, SeriesError};
use tracing::debug;

// ── ParsedLog ─────────────────────────────────────────────────────────────────

/// Result of parsing one log's content.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLog {
    /// A session was found and mapped to a known interface.
    Established(Session),
    /// No header line exists after the preamble.
    NeverEstablished,
    /// The session's peer address is not one of the known interfaces.
    /// `address` is `None` when no setup line carried the session's ID.
    UnresolvedInterface {
        session_id: u32,
        address: Option<String>,
    },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse the text of one log file.
///
/// Malformed numeric fields and a missing ID line are returned as errors;
/// the two routine skip cases are [`ParsedLog`] variants.
pub fn parse_log(content: &str, config: &ExtractorConfig) -> Result<ParsedLog> {
    let format = &config.format;
    let lines: Vec<&str> = content.split('\n').skip(format.preamble_lines).collect();
    // 1-based line number in the file, for diagnostics.
    let line_no = |idx: usize| idx + format.preamble_lines + 1;

    let Some(header) = find_header(&lines, format) else {
        debug!("No header line after {} preamble lines", format.preamble_lines);
        return Ok(ParsedLog::NeverEstablished);
    };

    // The line after the header both names the session and is its first
    // second of data.
    let first = header + 1;
    let first_line = lines
        .get(first)
        .ok_or(SeriesError::MissingLine {
            line: line_no(first),
        })?;
    let session_id = parse_session_id(first_line, format.columns.session_id, line_no(first))?;

    let address = resolve_address(&lines[..header], session_id, format, line_no)?;
    let Some(row) = address.as_deref().and_then(|a| config.resolve_row(a)) else {
        return Ok(ParsedLog::UnresolvedInterface {
            session_id,
            address,
        });
    };

    let samples = read_samples(&lines[first..], format, |idx| line_no(first + idx))?;
    let session = Session {
        id: session_id,
        address: address.unwrap_or_default(),
        row,
        samples,
    };
    debug!(
        "Session {} on {} with {} samples totalling {}",
        session.id,
        session.row,
        session.samples.len(),
        session.total()
    );

    Ok(ParsedLog::Established(session))
}

/// Index of the first header line in `lines`, if any.
pub fn find_header(lines: &[&str], format: &LogFormat) -> Option<usize> {
    lines.iter().position(|line| format.is_header(line))
}

/// Parse the session ID field of `line`.
pub fn parse_session_id(line: &str, range: FieldRange, line_no: usize) -> Result<u32> {
    let text = range.slice(line);
    text.trim()
        .parse::<u32>()
        .map_err(|e| SeriesError::MalformedField {
            line: line_no,
            field: "session id",
            text: text.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a transfer amount from `line`.
pub fn parse_transfer(
    line: &str,
    range: FieldRange,
    field: &'static str,
    line_no: usize,
) -> Result<f64> {
    let text = range.slice(line);
    text.trim()
        .parse::<f64>()
        .map_err(|e| SeriesError::MalformedField {
            line: line_no,
            field,
            text: text.to_string(),
            reason: e.to_string(),
        })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Find the peer address of `session_id` among the setup lines.
///
/// Every setup line is checked; the last one carrying the session's ID is
/// authoritative, since a client may reuse an ID across attempts.
fn resolve_address(
    setup: &[&str],
    session_id: u32,
    format: &LogFormat,
    line_no: impl Fn(usize) -> usize,
) -> Result<Option<String>> {
    let mut address = None;
    for (idx, line) in setup.iter().enumerate() {
        if parse_session_id(line, format.columns.session_id, line_no(idx))? == session_id {
            address = Some(format.columns.interface_address.slice(line).trim().to_string());
        }
    }
    Ok(address)
}

/// Collect the samples of a data block starting at its first data line.
fn read_samples(
    block: &[&str],
    format: &LogFormat,
    line_no: impl Fn(usize) -> usize,
) -> Result<Vec<Sample>> {
    let cols = &format.columns;
    let mut samples = Vec::with_capacity(format.max_session_seconds());

    // `block` is never empty: the caller checked the first data line exists.
    let first = parse_transfer(block[0], cols.transfer, "transfer", line_no(0))?;
    samples.push(Sample {
        second: 0,
        value: first,
    });
    let mut total = first;

    for second in 1..=format.follow_lines {
        // Running out of lines ends the block like a blank line does.
        let Some(line) = block.get(second) else {
            break;
        };
        match format.classify(line) {
            BlockLine::Blank => break,
            BlockLine::OutOfOrder => continue,
            BlockLine::Summary => {
                let reported =
                    parse_transfer(line, cols.summary_transfer, "summary transfer", line_no(second))?;
                samples.push(Sample {
                    second,
                    value: reported * format.summary_scale - total,
                });
                break;
            }
            BlockLine::Data => {
                let value = parse_transfer(line, cols.transfer, "transfer", line_no(second))?;
                samples.push(Sample { second, value });
                total += value;
            }
        }
    }

    Ok(samples)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
