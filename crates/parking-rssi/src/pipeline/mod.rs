//! Fingerprint pipeline.
//!
//! Turns a radio scan into a fixed-length fingerprint and feeds it to the
//! classifier, either as a new training sample or as a query.
//!
//! ## Stages
//!
//! 1. [`registry`] -- which access point sits in which grid cell
//! 2. [`feature`] -- scan readings to fingerprint
//! 3. [`classifier`] -- k-nearest-neighbour occupancy classifier
//! 4. [`training_store`] -- persisted training set
//! 5. [`session`] -- scan request state machine tying the stages together

pub mod classifier;
pub mod feature;
pub mod registry;
pub mod session;
pub mod training_store;

pub use classifier::{KnnClassifier, Neighbor, VotePolicy};
pub use feature::{FeatureVectorBuilder, SENTINEL_DBM};
pub use registry::{RouterRegistry, SlotMap};
pub use session::{ScanSession, SessionEvent, SessionState};
pub use training_store::TrainingStore;
