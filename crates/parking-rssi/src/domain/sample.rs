//! Fingerprints, labeled samples and the training set aggregate.
//!
//! A [`TrainingSet`] owns an ordered list of `(fingerprint, label)` pairs
//! and the declared fingerprint dimensionality. Because each sample carries
//! its own label, the matrix and label columns cannot drift apart: every
//! insertion and removal moves both in lock-step.

use crate::error::{ParkingError, ParkingResult};

/// Dense RSSI fingerprint in dBm, one slot per grid cell.
///
/// A slot with no reading holds `0.0`, which is a sentinel rather than a
/// physical measurement.
pub type FeatureVector = Vec<f32>;

/// One training example.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    /// The recorded fingerprint.
    pub vector: FeatureVector,
    /// Ground-truth occupancy count at recording time.
    pub label: u32,
}

impl LabeledSample {
    /// Create a labeled sample.
    pub fn new(vector: FeatureVector, label: u32) -> Self {
        Self { vector, label }
    }
}

/// Ordered training samples plus the declared input size.
///
/// Invariant: `sample.vector.len() == input_size` for every stored sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingSet {
    samples: Vec<LabeledSample>,
    input_size: usize,
}

impl TrainingSet {
    /// An empty set with the given dimensionality.
    pub fn new(input_size: usize) -> Self {
        Self { samples: Vec::new(), input_size }
    }

    /// Build a set from parallel matrix / label columns.
    ///
    /// # Errors
    ///
    /// [`ParkingError::MalformedEncoding`] if the columns have different
    /// lengths, [`ParkingError::DimensionMismatch`] if any row has the wrong
    /// length.
    pub fn from_columns(
        matrix: Vec<FeatureVector>,
        labels: Vec<u32>,
        input_size: usize,
    ) -> ParkingResult<Self> {
        if matrix.len() != labels.len() {
            return Err(ParkingError::malformed(
                "levels",
                format!("{} rows but {} labels", matrix.len(), labels.len()),
            ));
        }
        let samples = matrix
            .into_iter()
            .zip(labels)
            .map(|(vector, label)| LabeledSample::new(vector, label))
            .collect();
        Self::from_samples(samples, input_size)
    }

    /// Build a set from samples, checking every dimension.
    pub fn from_samples(samples: Vec<LabeledSample>, input_size: usize) -> ParkingResult<Self> {
        if let Some(bad) = samples.iter().find(|s| s.vector.len() != input_size) {
            return Err(ParkingError::dimension_mismatch(input_size, bad.vector.len()));
        }
        Ok(Self { samples, input_size })
    }

    /// Declared fingerprint dimensionality.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the set holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in insertion order.
    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    /// Sample at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&LabeledSample> {
        self.samples.get(index)
    }

    /// Iterate over the fingerprint rows.
    pub fn matrix(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.samples.iter().map(|s| s.vector.as_slice())
    }

    /// The label column.
    pub fn labels(&self) -> Vec<u32> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Append a sample.
    ///
    /// # Errors
    ///
    /// [`ParkingError::DimensionMismatch`] if the fingerprint length differs
    /// from [`Self::input_size`]; the set is left unchanged.
    pub fn push(&mut self, sample: LabeledSample) -> ParkingResult<()> {
        if sample.vector.len() != self.input_size {
            return Err(ParkingError::dimension_mismatch(self.input_size, sample.vector.len()));
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Remove the sample at `index`, preserving the order of the rest.
    ///
    /// # Errors
    ///
    /// [`ParkingError::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> ParkingResult<LabeledSample> {
        if index >= self.samples.len() {
            return Err(ParkingError::IndexOutOfRange { index, len: self.samples.len() });
        }
        Ok(self.samples.remove(index))
    }

    /// Drop every sample and adopt a new dimensionality.
    pub fn reset(&mut self, input_size: usize) {
        self.samples.clear();
        self.input_size = input_size;
    }

    /// Consume the set, returning its samples.
    pub fn into_samples(self) -> Vec<LabeledSample> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(n: usize) -> TrainingSet {
        let mut set = TrainingSet::new(2);
        for i in 0..n {
            set.push(LabeledSample::new(vec![-(i as f32), -50.0], i as u32)).unwrap();
        }
        set
    }

    #[test]
    fn push_rejects_wrong_dimension() {
        let mut set = set_of(1);
        let err = set.push(LabeledSample::new(vec![-1.0], 9)).unwrap_err();
        assert!(matches!(err, ParkingError::DimensionMismatch { expected: 2, actual: 1 }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_at_keeps_columns_in_step() {
        let mut set = set_of(4);
        let removed = set.remove_at(1).unwrap();
        assert_eq!(removed.label, 1);
        assert_eq!(set.labels(), vec![0, 2, 3]);
        assert_eq!(set.matrix().count(), 3);
        assert_eq!(set.get(1).unwrap().vector, vec![-2.0, -50.0]);
    }

    #[test]
    fn remove_at_out_of_range() {
        let mut set = set_of(2);
        assert!(matches!(
            set.remove_at(2),
            Err(ParkingError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn from_columns_rejects_length_mismatch() {
        let err = TrainingSet::from_columns(vec![vec![1.0]], vec![1, 2], 1).unwrap_err();
        assert!(matches!(err, ParkingError::MalformedEncoding { .. }));
    }

    #[test]
    fn reset_changes_dimension() {
        let mut set = set_of(3);
        set.reset(6);
        assert!(set.is_empty());
        assert_eq!(set.input_size(), 6);
    }
}
