use std::path::PathBuf;
use thiserror::Error;

use crate::models::MerchantId;

/// All errors produced by the sales analyst crates.
#[derive(Error, Debug)]
pub enum SalesError {
    /// A statistic was requested over an empty sequence.
    #[error("Cannot compute a statistic over an empty sequence")]
    EmptyInput,

    /// A dispersion statistic needs more observations than were supplied.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A per-merchant query referenced an id absent from the merchant repository.
    #[error("Merchant not found: {0}")]
    MerchantNotFound(MerchantId),

    /// A data file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed below the row level (encoding, framing).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV row was well framed but one of its fields could not be mapped.
    #[error("Invalid record in {path} at line {line}: {reason}")]
    InvalidRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// Two records of the same kind share an id.
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: u64 },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the sales crates.
pub type Result<T> = std::result::Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_input() {
        let err = SalesError::EmptyInput;
        assert_eq!(
            err.to_string(),
            "Cannot compute a statistic over an empty sequence"
        );
    }

    #[test]
    fn test_error_display_insufficient_data() {
        let err = SalesError::InsufficientData {
            required: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: need at least 2 observations, got 1"
        );
    }

    #[test]
    fn test_error_display_merchant_not_found() {
        let err = SalesError::MerchantNotFound(MerchantId(12334112));
        assert_eq!(err.to_string(), "Merchant not found: 12334112");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SalesError::FileRead {
            path: PathBuf::from("/data/items.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/items.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_invalid_record() {
        let err = SalesError::InvalidRecord {
            path: PathBuf::from("items.csv"),
            line: 4,
            reason: "invalid unit_price \"abc\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid record in items.csv at line 4: invalid unit_price \"abc\""
        );
    }

    #[test]
    fn test_error_display_duplicate_id() {
        let err = SalesError::DuplicateId {
            kind: "merchant",
            id: 7,
        };
        assert_eq!(err.to_string(), "Duplicate merchant id: 7");
    }

    #[test]
    fn test_error_display_config() {
        let err = SalesError::Config("missing data dir".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing data dir");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SalesError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: SalesError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
