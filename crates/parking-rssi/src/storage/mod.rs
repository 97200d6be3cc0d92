//! # Storage Layer
//!
//! Record storage for the access-point table and the singleton training
//! record. The rest of the crate sees storage only through
//! [`ParkingStorage`]; the storage engine itself is opaque.
//!
//! ## Backends
//!
//! | Backend | Use Case | Features |
//! |---------|----------|----------|
//! | [`InMemoryStorage`] | Testing, embedding | Thread-safe, no persistence |
//! | [`FileStorage`] | Devices, CLI | JSON files, atomic replace on every write |

mod file;
mod memory;
pub mod record;

pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use record::TrainingRecord;

use crate::domain::access_point::AccessPoint;
use crate::error::StorageError;

/// Backend for access points and the training record.
///
/// Every mutating call is durable when it returns. Implementations must be
/// thread-safe so a host can run persistence off its event thread.
pub trait ParkingStorage: Send + Sync {
    /// Insert an access point.
    ///
    /// # Errors
    ///
    /// [`StorageError::DuplicateKey`] if the hardware address is already
    /// present.
    fn insert_access_point(&self, access_point: &AccessPoint) -> Result<(), StorageError>;

    /// All access points in insertion order.
    fn access_points(&self) -> Result<Vec<AccessPoint>, StorageError>;

    /// Delete every access point.
    fn clear_access_points(&self) -> Result<(), StorageError>;

    /// The singleton training record, or `None` on first use.
    fn training_record(&self) -> Result<Option<TrainingRecord>, StorageError>;

    /// Replace the singleton training record.
    fn put_training_record(&self, record: &TrainingRecord) -> Result<(), StorageError>;
}
