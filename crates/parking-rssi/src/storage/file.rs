//! File-based storage.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/
//!   access_points.json   array of access points, insertion order
//!   training.json        singleton training record
//! ```
//!
//! Every write goes to a sibling `*.tmp` file which is flushed, synced and
//! then renamed over the target, so a reader sees either the old or the new
//! contents and never a partial file. The root directory is synced after
//! the rename so the new entry is durable when the call returns.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ParkingStorage, TrainingRecord};
use crate::domain::access_point::AccessPoint;
use crate::error::StorageError;

const ACCESS_POINTS_FILE: &str = "access_points.json";
const TRAINING_FILE: &str = "training.json";

/// JSON-file backed [`ParkingStorage`].
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
    /// Serializes read-modify-write cycles on the access-point file.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (creating if necessary) a storage directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;
        tracing::debug!(root = %root.display(), "opened file storage");
        Ok(Self { root, write_lock: Mutex::new(()) })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError> {
        let path = self.path(name);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&path, e)),
        };
        serde_json::from_reader(BufReader::new(file))
            .map(Some)
            .map_err(|e| StorageError::serialization(&path, e))
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.path(name);
        let tmp = self.path(&format!("{name}.tmp"));
        let bytes =
            serde_json::to_vec_pretty(value).map_err(|e| StorageError::serialization(&path, e))?;

        let mut file = File::create(&tmp).map_err(|e| StorageError::io(&tmp, e))?;
        file.write_all(&bytes).map_err(|e| StorageError::io(&tmp, e))?;
        file.sync_all().map_err(|e| StorageError::io(&tmp, e))?;
        drop(file);

        fs::rename(&tmp, &path).map_err(|e| StorageError::io(&path, e))?;
        self.sync_root()
    }

    /// Flush the directory entry so a completed rename survives power loss.
    #[cfg(unix)]
    fn sync_root(&self) -> Result<(), StorageError> {
        File::open(&self.root)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| StorageError::io(&self.root, e))
    }

    /// Directories cannot be opened for syncing on this platform; the
    /// rename is flushed by the file system.
    #[cfg(not(unix))]
    fn sync_root(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl ParkingStorage for FileStorage {
    fn insert_access_point(&self, access_point: &AccessPoint) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut aps: Vec<AccessPoint> = self.read_json(ACCESS_POINTS_FILE)?.unwrap_or_default();
        if aps.iter().any(|ap| ap.bssid == access_point.bssid) {
            return Err(StorageError::DuplicateKey { key: access_point.bssid.to_u64() });
        }
        aps.push(access_point.clone());
        self.write_json(ACCESS_POINTS_FILE, &aps)
    }

    fn access_points(&self) -> Result<Vec<AccessPoint>, StorageError> {
        Ok(self.read_json(ACCESS_POINTS_FILE)?.unwrap_or_default())
    }

    fn clear_access_points(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        self.write_json::<[AccessPoint]>(ACCESS_POINTS_FILE, &[])
    }

    fn training_record(&self) -> Result<Option<TrainingRecord>, StorageError> {
        self.read_json(TRAINING_FILE)
    }

    fn put_training_record(&self, record: &TrainingRecord) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        self.write_json(TRAINING_FILE, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bssid::BssidId;
    use crate::domain::sample::{LabeledSample, TrainingSet};
    use tempfile::tempdir;

    #[test]
    fn access_points_persist_across_instances() {
        let dir = tempdir().unwrap();
        {
            let storage = FileStorage::new(dir.path()).unwrap();
            storage
                .insert_access_point(&AccessPoint::new(BssidId([0, 0, 1, 2, 3, 4]), "a", 0, 1))
                .unwrap();
            storage
                .insert_access_point(&AccessPoint::new(BssidId([9; 6]), "b", 1, 0))
                .unwrap();
        }
        let storage = FileStorage::new(dir.path()).unwrap();
        let aps = storage.access_points().unwrap();
        assert_eq!(aps.len(), 2);
        assert_eq!(aps[0].bssid, BssidId([0, 0, 1, 2, 3, 4]));
        assert_eq!(aps[1].name, "b");
    }

    #[test]
    fn duplicate_insert_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let ap = AccessPoint::new(BssidId([7; 6]), "a", 0, 0);
        storage.insert_access_point(&ap).unwrap();
        assert!(matches!(
            storage.insert_access_point(&ap),
            Err(StorageError::DuplicateKey { .. })
        ));
        assert_eq!(storage.access_points().unwrap().len(), 1);
    }

    #[test]
    fn training_record_round_trips_without_temp_leftovers() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert!(storage.training_record().unwrap().is_none());

        let mut set = TrainingSet::new(2);
        set.push(LabeledSample::new(vec![-40.25, 0.0], 2)).unwrap();
        let rec = TrainingRecord::encode(&set);
        storage.put_training_record(&rec).unwrap();

        assert_eq!(storage.training_record().unwrap(), Some(rec));
        assert!(!dir.path().join("training.json.tmp").exists());
    }

    #[test]
    fn clear_syncs_directory_entry() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.clear_access_points().unwrap();
        storage.sync_root().unwrap();
        assert!(dir.path().join(ACCESS_POINTS_FILE).exists());
    }

    #[test]
    #[cfg(unix)]
    fn syncing_a_vanished_root_is_an_io_error() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("gone");
        let storage = FileStorage::new(&root).unwrap();
        fs::remove_dir(&root).unwrap();
        match storage.sync_root() {
            Err(StorageError::Io { path, .. }) => assert_eq!(path, root),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(TRAINING_FILE), b"{not json").unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert!(matches!(
            storage.training_record(),
            Err(StorageError::Serialization { .. })
        ));
    }
}
