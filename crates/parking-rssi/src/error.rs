//! Error types for the parking-rssi crate.
//!
//! Every module that produces an error imports its error type from here
//! rather than defining it inline.
//!
//! ## Hierarchy
//!
//! ```text
//! ParkingError (top-level)
//! ├── StorageError  (record store I/O / serialization / key conflicts)
//! ├── ConfigError   (config validation / file loading)
//! └── ScanError     (scan source failures)
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::bssid::BssidId;

// ---------------------------------------------------------------------------
// ParkingResult
// ---------------------------------------------------------------------------

/// Convenient `Result` alias used by registry, store and classifier calls.
pub type ParkingResult<T> = Result<T, ParkingError>;

// ---------------------------------------------------------------------------
// ParkingError
// ---------------------------------------------------------------------------

/// Top-level error type for fingerprint training and prediction.
#[derive(Debug, Error)]
pub enum ParkingError {
    /// An access point with this identifier is already registered.
    #[error("access point {bssid} is already registered")]
    DuplicateIdentifier {
        /// The conflicting identifier.
        bssid: BssidId,
    },

    /// No access point with this identifier is registered.
    #[error("access point {bssid} is not registered")]
    UnknownIdentifier {
        /// The identifier that was looked up.
        bssid: BssidId,
    },

    /// A fingerprint's length differs from the declared input size.
    #[error("fingerprint dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Declared input size.
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },

    /// A sample position is outside the training set.
    #[error("sample index {index} is out of range for training set of length {len}")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of stored samples.
        len: usize,
    },

    /// `predict` was called with no stored samples.
    #[error("training set is empty; record at least one sample before predicting")]
    EmptyTrainingSet,

    /// A persisted matrix / label field does not follow the record grammar.
    #[error("malformed training record `{field}`: {reason}")]
    MalformedEncoding {
        /// Which field failed to decode.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// MAC address text or integer could not be converted.
    #[error("invalid hardware address `{input}`: expected aa:bb:cc:dd:ee:ff or a 48-bit integer")]
    InvalidBssid {
        /// The rejected input.
        input: String,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ParkingError {
    /// Construct a [`ParkingError::MalformedEncoding`].
    pub fn malformed<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ParkingError::MalformedEncoding { field, reason: reason.into() }
    }

    /// Construct a [`ParkingError::DimensionMismatch`].
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        ParkingError::DimensionMismatch { expected, actual }
    }

    /// Construct a [`ParkingError::InvalidBssid`].
    pub fn invalid_bssid<S: Into<String>>(input: S) -> Self {
        ParkingError::InvalidBssid { input: input.into() }
    }
}

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors raised by [`ParkingStorage`](crate::storage::ParkingStorage) backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record with the same primary key already exists.
    #[error("duplicate primary key {key}")]
    DuplicateKey {
        /// The conflicting key, as a 48-bit integer.
        key: u64,
    },

    /// A low-level I/O error while reading or writing a record file.
    #[error("I/O error on `{path}`: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A record file could not be (de)serialized.
    #[error("cannot (de)serialize `{path}`: {source}")]
    Serialization {
        /// File being accessed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct a [`StorageError::Io`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io { path: path.into(), source }
    }

    /// Construct a [`StorageError::Serialization`].
    pub fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StorageError::Serialization { path: path.into(), source }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors produced when loading or validating a [`ParkingConfig`].
///
/// [`ParkingConfig`]: crate::config::ParkingConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration file could not be read from or written to disk.
    #[error("Cannot access config file `{path}`: {source}")]
    FileRead {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file contains malformed JSON.
    #[error("Cannot parse config file `{path}`: {source}")]
    ParseError {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Construct a [`ConfigError::InvalidValue`].
    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        ConfigError::InvalidValue { field, reason: reason.into() }
    }
}

// ---------------------------------------------------------------------------
// ScanError
// ---------------------------------------------------------------------------

/// Errors reported by a [`ScanSource`](crate::port::ScanSource).
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan backend reported failure and delivered no entries.
    #[error("WiFi scan failed: {reason}")]
    ScanFailed {
        /// Human-readable description of what went wrong.
        reason: String,
    },

    /// A scan file could not be read.
    #[error("cannot read scan file `{path}`: {source}")]
    FileRead {
        /// Path of the scan file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Scan output could not be parsed.
    #[error("scan output parse error: {0}")]
    Parse(String),
}

impl ScanError {
    /// Construct a [`ScanError::ScanFailed`].
    pub fn failed<S: Into<String>>(reason: S) -> Self {
        ScanError::ScanFailed { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = ParkingError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "sample index 4 is out of range for training set of length 2"
        );

        let err = ParkingError::DuplicateIdentifier { bssid: BssidId([0, 1, 2, 3, 4, 5]) };
        assert!(err.to_string().contains("00:01:02:03:04:05"));
    }

    #[test]
    fn storage_error_converts_into_parking_error() {
        let err: ParkingError = StorageError::DuplicateKey { key: 7 }.into();
        assert!(matches!(err, ParkingError::Storage(StorageError::DuplicateKey { key: 7 })));
    }
}
