//! In-memory storage for tests and embedding.
//!
//! Uses `parking_lot::RwLock` for concurrent access. Nothing is persisted;
//! data is lost on drop.

use parking_lot::RwLock;

use super::{ParkingStorage, TrainingRecord};
use crate::domain::access_point::AccessPoint;
use crate::error::StorageError;

/// Thread-safe, non-persistent [`ParkingStorage`].
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    access_points: RwLock<Vec<AccessPoint>>,
    training: RwLock<Option<TrainingRecord>>,
}

impl InMemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParkingStorage for InMemoryStorage {
    fn insert_access_point(&self, access_point: &AccessPoint) -> Result<(), StorageError> {
        let mut aps = self.access_points.write();
        if aps.iter().any(|ap| ap.bssid == access_point.bssid) {
            return Err(StorageError::DuplicateKey { key: access_point.bssid.to_u64() });
        }
        aps.push(access_point.clone());
        Ok(())
    }

    fn access_points(&self) -> Result<Vec<AccessPoint>, StorageError> {
        Ok(self.access_points.read().clone())
    }

    fn clear_access_points(&self) -> Result<(), StorageError> {
        self.access_points.write().clear();
        Ok(())
    }

    fn training_record(&self) -> Result<Option<TrainingRecord>, StorageError> {
        Ok(self.training.read().clone())
    }

    fn put_training_record(&self, record: &TrainingRecord) -> Result<(), StorageError> {
        *self.training.write() = Some(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bssid::BssidId;
    use crate::domain::sample::TrainingSet;

    #[test]
    fn duplicate_keys_are_rejected() {
        let storage = InMemoryStorage::new();
        let ap = AccessPoint::new(BssidId([1; 6]), "a", 0, 0);
        storage.insert_access_point(&ap).unwrap();
        let err = storage.insert_access_point(&ap).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { .. }));
        assert_eq!(storage.access_points().unwrap().len(), 1);
    }

    #[test]
    fn training_record_starts_absent() {
        let storage = InMemoryStorage::new();
        assert!(storage.training_record().unwrap().is_none());
        let rec = TrainingRecord::encode(&TrainingSet::new(4));
        storage.put_training_record(&rec).unwrap();
        assert_eq!(storage.training_record().unwrap(), Some(rec));
    }
}
