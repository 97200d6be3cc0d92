//! Persisted form of the training set.
//!
//! The training set is stored as one singleton record whose matrix and
//! label columns are delimited text. Grammar (version 1):
//!
//! ```text
//! levels  := "" | row ("\n" row)*
//! row     := "" | value ("," value)*
//! value   := f32 in Rust `Display` form (shortest exact round-trip)
//! labels  := "" | label ("," label)*
//! label   := decimal u32
//! ```
//!
//! Values are numeric, so no delimiter can occur inside a token and no
//! escaping is needed. A matrix with no rows and a matrix with a single
//! zero-length row both encode to `""`; the decoder resolves this from the
//! label column, which is never ambiguous.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::sample::{FeatureVector, TrainingSet};
use crate::error::{ParkingError, ParkingResult};

const ROW_SEP: char = '\n';
const VALUE_SEP: char = ',';

/// Singleton training record as stored by a [`ParkingStorage`] backend.
///
/// [`ParkingStorage`]: crate::storage::ParkingStorage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Grammar version of `levels` / `labels`.
    pub version: u32,
    /// Declared fingerprint dimensionality.
    pub input_size: usize,
    /// Encoded fingerprint matrix.
    pub levels: String,
    /// Encoded label column.
    pub labels: String,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl TrainingRecord {
    /// Current grammar version.
    pub const VERSION: u32 = 1;

    /// Encode a training set.
    pub fn encode(set: &TrainingSet) -> Self {
        Self {
            version: Self::VERSION,
            input_size: set.input_size(),
            levels: encode_levels(set.matrix()),
            labels: encode_labels(&set.labels()),
            updated_at: Utc::now(),
        }
    }

    /// Decode into a training set, validating the grammar and every
    /// invariant of [`TrainingSet`].
    ///
    /// # Errors
    ///
    /// [`ParkingError::MalformedEncoding`] on an unknown version, a bad token
    /// or a row/label count mismatch; [`ParkingError::DimensionMismatch`] if a
    /// row's length differs from `input_size`.
    pub fn decode(&self) -> ParkingResult<TrainingSet> {
        if self.version != Self::VERSION {
            return Err(ParkingError::malformed(
                "version",
                format!("unsupported record version {}", self.version),
            ));
        }
        let labels = decode_labels(&self.labels)?;
        let matrix = decode_levels(&self.levels, labels.len())?;
        TrainingSet::from_columns(matrix, labels, self.input_size)
    }
}

/// Encode fingerprint rows.
pub fn encode_levels<'a>(rows: impl IntoIterator<Item = &'a [f32]>) -> String {
    rows.into_iter()
        .map(|row| {
            row.iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Encode the label column.
pub fn encode_labels(labels: &[u32]) -> String {
    labels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode fingerprint rows. `expected_rows` disambiguates `""`.
pub fn decode_levels(text: &str, expected_rows: usize) -> ParkingResult<Vec<FeatureVector>> {
    if text.is_empty() {
        return Ok(if expected_rows == 1 { vec![Vec::new()] } else { Vec::new() });
    }
    text.split(ROW_SEP).map(decode_row).collect()
}

fn decode_row(row: &str) -> ParkingResult<FeatureVector> {
    if row.is_empty() {
        return Ok(Vec::new());
    }
    row.split(VALUE_SEP)
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|_| ParkingError::malformed("levels", format!("bad value `{token}`")))
        })
        .collect()
}

/// Decode the label column.
pub fn decode_labels(text: &str) -> ParkingResult<Vec<u32>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(VALUE_SEP)
        .map(|token| {
            token
                .parse::<u32>()
                .map_err(|_| ParkingError::malformed("labels", format!("bad label `{token}`")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::LabeledSample;

    fn set(rows: &[(&[f32], u32)], input_size: usize) -> TrainingSet {
        let samples = rows
            .iter()
            .map(|(v, l)| LabeledSample::new(v.to_vec(), *l))
            .collect();
        TrainingSet::from_samples(samples, input_size).unwrap()
    }

    #[test]
    fn encodes_legacy_layout() {
        let t = set(&[(&[-50.0, -60.5], 0), (&[0.0, -80.0], 3)], 2);
        let rec = TrainingRecord::encode(&t);
        assert_eq!(rec.levels, "-50,-60.5\n0,-80");
        assert_eq!(rec.labels, "0,3");
        assert_eq!(rec.input_size, 2);
        assert_eq!(rec.decode().unwrap(), t);
    }

    #[test]
    fn empty_strings_decode_to_empty_sequences() {
        assert!(decode_labels("").unwrap().is_empty());
        assert!(decode_levels("", 0).unwrap().is_empty());

        let empty = TrainingSet::new(6);
        let rec = TrainingRecord::encode(&empty);
        assert_eq!(rec.levels, "");
        assert_eq!(rec.labels, "");
        assert_eq!(rec.decode().unwrap(), empty);
    }

    #[test]
    fn zero_width_rows_round_trip() {
        let one = set(&[(&[], 4)], 0);
        assert_eq!(TrainingRecord::encode(&one).decode().unwrap(), one);

        let two = set(&[(&[], 4), (&[], 5)], 0);
        let rec = TrainingRecord::encode(&two);
        assert_eq!(rec.levels, "\n");
        assert_eq!(rec.decode().unwrap(), two);
    }

    #[test]
    fn bad_tokens_are_malformed() {
        assert!(matches!(
            decode_labels("1,,2"),
            Err(ParkingError::MalformedEncoding { field: "labels", .. })
        ));
        assert!(matches!(
            decode_labels("-1"),
            Err(ParkingError::MalformedEncoding { .. })
        ));
        assert!(matches!(
            decode_levels("-50,abc", 1),
            Err(ParkingError::MalformedEncoding { field: "levels", .. })
        ));
    }

    #[test]
    fn row_label_count_mismatch_is_malformed() {
        let rec = TrainingRecord {
            version: TrainingRecord::VERSION,
            input_size: 1,
            levels: "-1\n-2".into(),
            labels: "0".into(),
            updated_at: Utc::now(),
        };
        assert!(matches!(rec.decode(), Err(ParkingError::MalformedEncoding { .. })));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut rec = TrainingRecord::encode(&TrainingSet::new(2));
        rec.version = 99;
        assert!(matches!(
            rec.decode(),
            Err(ParkingError::MalformedEncoding { field: "version", .. })
        ));
    }

    #[test]
    fn row_width_must_match_input_size() {
        let rec = TrainingRecord {
            version: TrainingRecord::VERSION,
            input_size: 3,
            levels: "-1,-2".into(),
            labels: "0".into(),
            updated_at: Utc::now(),
        };
        assert!(matches!(
            rec.decode(),
            Err(ParkingError::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }
}
