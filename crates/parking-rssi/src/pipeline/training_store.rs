//! Persistence of the training set.
//!
//! The store owns the singleton training record. Every operation loads the
//! record, applies the change to a [`TrainingSet`] (which enforces the
//! dimension and row/label invariants) and writes the whole record back, so
//! a rejected change never reaches storage.

use std::sync::Arc;

use crate::domain::sample::{LabeledSample, TrainingSet};
use crate::error::ParkingResult;
use crate::storage::{ParkingStorage, TrainingRecord};

/// Load/save front end for the persisted training set.
#[derive(Clone)]
pub struct TrainingStore {
    storage: Arc<dyn ParkingStorage>,
}

impl TrainingStore {
    /// Create a store over `storage`.
    pub fn new(storage: Arc<dyn ParkingStorage>) -> Self {
        Self { storage }
    }

    /// Read the training set. On first use this is an empty set with
    /// `input_size == 0`.
    ///
    /// # Errors
    ///
    /// Storage errors, and [`ParkingError::MalformedEncoding`] /
    /// [`ParkingError::DimensionMismatch`] for a corrupt record.
    ///
    /// [`ParkingError::MalformedEncoding`]: crate::error::ParkingError::MalformedEncoding
    /// [`ParkingError::DimensionMismatch`]: crate::error::ParkingError::DimensionMismatch
    pub fn load(&self) -> ParkingResult<TrainingSet> {
        match self.storage.training_record()? {
            Some(record) => record.decode(),
            None => Ok(TrainingSet::new(0)),
        }
    }

    /// Overwrite the record with `samples` at `input_size`.
    ///
    /// # Errors
    ///
    /// [`ParkingError::DimensionMismatch`] if any sample has the wrong
    /// length; nothing is written in that case.
    ///
    /// [`ParkingError::DimensionMismatch`]: crate::error::ParkingError::DimensionMismatch
    pub fn save(&self, samples: Vec<LabeledSample>, input_size: usize) -> ParkingResult<()> {
        let set = TrainingSet::from_samples(samples, input_size)?;
        self.save_set(&set)
    }

    /// Overwrite the record with an already validated set.
    pub fn save_set(&self, set: &TrainingSet) -> ParkingResult<()> {
        self.storage.put_training_record(&TrainingRecord::encode(set))?;
        tracing::debug!(samples = set.len(), input_size = set.input_size(), "saved training set");
        Ok(())
    }

    /// Append one sample. Returns the new sample count.
    pub fn append(&self, sample: LabeledSample) -> ParkingResult<usize> {
        let mut set = self.load()?;
        set.push(sample)?;
        self.save_set(&set)?;
        Ok(set.len())
    }

    /// Replace every sample, keeping the current input size.
    pub fn replace(&self, samples: Vec<LabeledSample>) -> ParkingResult<()> {
        let input_size = self.load()?.input_size();
        self.save(samples, input_size)
    }

    /// Remove the sample at `position` from both columns.
    ///
    /// # Errors
    ///
    /// [`ParkingError::IndexOutOfRange`] for an invalid position.
    ///
    /// [`ParkingError::IndexOutOfRange`]: crate::error::ParkingError::IndexOutOfRange
    pub fn remove_at(&self, position: usize) -> ParkingResult<LabeledSample> {
        let mut set = self.load()?;
        let removed = set.remove_at(position)?;
        self.save_set(&set)?;
        tracing::info!(position, remaining = set.len(), "removed training sample");
        Ok(removed)
    }

    /// Drop every sample and declare a new input size.
    pub fn reset(&self, input_size: usize) -> ParkingResult<()> {
        self.save_set(&TrainingSet::new(input_size))?;
        tracing::info!(input_size, "reset training set");
        Ok(())
    }
}

impl std::fmt::Debug for TrainingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainingStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParkingError;
    use crate::storage::InMemoryStorage;

    fn store() -> TrainingStore {
        TrainingStore::new(Arc::new(InMemoryStorage::new()))
    }

    #[test]
    fn first_load_is_empty_with_zero_input_size() {
        let set = store().load().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.input_size(), 0);
    }

    #[test]
    fn append_then_load() {
        let store = store();
        store.reset(2).unwrap();
        assert_eq!(store.append(LabeledSample::new(vec![-50.0, -60.0], 1)).unwrap(), 1);
        assert_eq!(store.append(LabeledSample::new(vec![-55.0, 0.0], 2)).unwrap(), 2);
        let set = store.load().unwrap();
        assert_eq!(set.labels(), vec![1, 2]);
    }

    #[test]
    fn save_rejects_wrong_dimension_without_writing() {
        let store = store();
        store.save(vec![LabeledSample::new(vec![-1.0], 0)], 1).unwrap();
        let err = store
            .save(vec![LabeledSample::new(vec![-1.0, -2.0], 0)], 3)
            .unwrap_err();
        assert!(matches!(err, ParkingError::DimensionMismatch { expected: 3, actual: 2 }));
        assert_eq!(store.load().unwrap().input_size(), 1);
    }

    #[test]
    fn remove_at_out_of_range() {
        let store = store();
        store.reset(1).unwrap();
        assert!(matches!(
            store.remove_at(0),
            Err(ParkingError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn replace_keeps_input_size() {
        let store = store();
        store.reset(2).unwrap();
        store.append(LabeledSample::new(vec![-1.0, -2.0], 0)).unwrap();
        store
            .replace(vec![
                LabeledSample::new(vec![-3.0, -4.0], 5),
                LabeledSample::new(vec![-5.0, -6.0], 6),
            ])
            .unwrap();
        let set = store.load().unwrap();
        assert_eq!(set.input_size(), 2);
        assert_eq!(set.labels(), vec![5, 6]);
    }
}
