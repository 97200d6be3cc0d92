//! # parking-rssi
//!
//! Parking-lot occupancy estimation from WiFi signal strength.
//!
//! Access points are bound to the cells of a rows × cols grid. Each scan is
//! turned into a fingerprint with one RSSI reading per cell, and a
//! k-nearest-neighbour classifier trained on labelled fingerprints predicts
//! how many slots are occupied.
//!
//! - **Domain types**: [`BssidId`], [`AccessPoint`], [`GridShape`],
//!   [`TrainingSet`], [`OccupancyEstimate`]
//! - **Pipeline**: [`RouterRegistry`], [`FeatureVectorBuilder`],
//!   [`KnnClassifier`], [`TrainingStore`], [`ScanSession`]
//! - **Port**: [`ScanSource`] -- trait abstracting the radio scan
//! - **Adapters**: [`JsonScanFile`], [`StaticScanSource`]
//! - **Storage**: [`ParkingStorage`] with [`InMemoryStorage`] and
//!   [`FileStorage`] backends
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_rssi::{
//!     BssidId, InMemoryStorage, ParkingConfig, ScanEntry, ScanSession, SessionEvent,
//!     StaticScanSource,
//! };
//!
//! let mut session = ScanSession::open(Arc::new(InMemoryStorage::new()), ParkingConfig::default())?;
//! let ap = BssidId::parse("a4:2b:b0:01:02:03")?;
//! session.bind_access_point(ap, "Lot-A", 0, 0)?;
//!
//! let empty_lot = StaticScanSource::new(vec![ScanEntry::new(ap, "Lot-A", -48.0)]);
//! session.train_with(&empty_lot, 0)?;
//!
//! match session.predict_with(&empty_lot)? {
//!     SessionEvent::Predicted { estimate, .. } => assert_eq!(estimate.occupied, 0),
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), parking_rssi::ParkingError>(())
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod port;
pub mod storage;

// Re-export key types at the crate root for convenience.
pub use adapter::{parse_scan_json, JsonScanFile, StaticScanSource};
pub use config::ParkingConfig;
pub use domain::{
    readings_from_scan, AccessPoint, BssidId, FeatureVector, GridShape, LabeledSample,
    OccupancyEstimate, Readings, ScanEntry, TrainingSet,
};
pub use error::{ConfigError, ParkingError, ParkingResult, ScanError, StorageError};
pub use pipeline::{
    FeatureVectorBuilder, KnnClassifier, Neighbor, RouterRegistry, ScanSession, SessionEvent,
    SessionState, SlotMap, TrainingStore, VotePolicy, SENTINEL_DBM,
};
pub use port::ScanSource;
pub use storage::{FileStorage, InMemoryStorage, ParkingStorage, TrainingRecord};
