//! Domain types for fingerprint training and occupancy prediction.

pub mod access_point;
pub mod bssid;
pub mod grid;
pub mod occupancy;
pub mod sample;
pub mod scan;

pub use access_point::AccessPoint;
pub use bssid::BssidId;
pub use grid::GridShape;
pub use occupancy::OccupancyEstimate;
pub use sample::{FeatureVector, LabeledSample, TrainingSet};
pub use scan::{readings_from_scan, Readings, ScanEntry};
