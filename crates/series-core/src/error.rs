use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the throughput series extractor.
#[derive(Error, Debug)]
pub enum SeriesError {
    /// A log file expected by the batch does not exist or cannot be opened.
    #[error("Missing batch file for port {port} at {path}: {source}")]
    MissingBatchFile {
        port: u16,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An opened batch file could not be read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A fixed-width field did not parse as its numeric type.
    #[error("Malformed {field} field on line {line}: {text:?} ({reason})")]
    MalformedField {
        line: usize,
        field: &'static str,
        text: String,
        reason: String,
    },

    /// A line required by the log layout is absent.
    #[error("Log ends before required line {line}")]
    MissingLine { line: usize },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the series crates.
pub type Result<T> = std::result::Result<T, SeriesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_batch_file() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SeriesError::MissingBatchFile {
            port: 5003,
            path: PathBuf::from("/logs/5003.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("port 5003"));
        assert!(msg.contains("/logs/5003.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_file_write() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SeriesError::FileWrite {
            path: PathBuf::from("/out/intf1-data.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to write file"));
        assert!(msg.contains("/out/intf1-data.txt"));
    }

    #[test]
    fn test_error_display_malformed_field() {
        let err = SeriesError::MalformedField {
            line: 7,
            field: "transfer",
            text: "  abc  ".to_string(),
            reason: "invalid float literal".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed transfer field on line 7: \"  abc  \" (invalid float literal)"
        );
    }

    #[test]
    fn test_error_display_missing_line() {
        let err = SeriesError::MissingLine { line: 12 };
        assert_eq!(err.to_string(), "Log ends before required line 12");
    }

    #[test]
    fn test_error_display_config() {
        let err = SeriesError::Config("duplicate interface address".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: duplicate interface address"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SeriesError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: SeriesError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
