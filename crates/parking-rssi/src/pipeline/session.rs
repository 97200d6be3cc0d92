//! Scan session controller.
//!
//! Drives one scan → fingerprint → train-or-predict cycle. The session is an
//! explicit state machine:
//!
//! ```text
//!            begin_training(label)              scan completed
//!   Idle ─────────────────────────► AwaitingScanForTrain ─────────► Idle
//!     │      begin_prediction()                   scan completed
//!     └───────────────────────────► AwaitingScanForPredict ───────► Idle
//! ```
//!
//! Only a completed scan moves an awaiting session back to `Idle`, even
//! when classifying or persisting its fingerprint fails. A failed scan is
//! reported and leaves the state as it was, so a retry completes the
//! pending request. A scan that arrives while `Idle` is ignored.

use std::sync::Arc;

use crate::config::ParkingConfig;
use crate::domain::access_point::AccessPoint;
use crate::domain::bssid::BssidId;
use crate::domain::occupancy::OccupancyEstimate;
use crate::domain::sample::{FeatureVector, LabeledSample, TrainingSet};
use crate::domain::scan::{readings_from_scan, ScanEntry};
use crate::error::{ParkingResult, ScanError};
use crate::pipeline::classifier::KnnClassifier;
use crate::pipeline::feature::FeatureVectorBuilder;
use crate::pipeline::registry::{RouterRegistry, SlotMap};
use crate::pipeline::training_store::TrainingStore;
use crate::port::ScanSource;
use crate::storage::ParkingStorage;

/// What the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No request in flight.
    Idle,
    /// The next scan is recorded as a sample with `label`.
    AwaitingScanForTrain {
        /// Ground-truth occupancy for the recorded fingerprint.
        label: u32,
    },
    /// The next scan is classified.
    AwaitingScanForPredict,
}

/// Result of feeding a scan into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A sample was recorded and persisted.
    Trained {
        /// Label of the new sample.
        label: u32,
        /// Number of stored samples afterwards.
        samples: usize,
        /// The recorded fingerprint.
        fingerprint: FeatureVector,
    },
    /// The fingerprint did not match the training set's input size and was
    /// not recorded.
    TrainingRejected {
        /// Label that was requested.
        label: u32,
        /// Training set input size.
        expected: usize,
        /// Fingerprint length.
        actual: usize,
    },
    /// The fingerprint was classified.
    Predicted {
        /// Occupancy derived from the predicted label.
        estimate: OccupancyEstimate,
        /// The classified fingerprint.
        fingerprint: FeatureVector,
    },
    /// The scan failed; the session still awaits a scan.
    ScanFailed {
        /// Reason reported by the scan source.
        reason: String,
    },
    /// A scan arrived while idle and was dropped.
    Ignored,
}

/// One user session over a registry, a training store and a classifier.
#[derive(Debug)]
pub struct ScanSession {
    config: ParkingConfig,
    registry: RouterRegistry,
    store: TrainingStore,
    classifier: KnnClassifier,
    state: SessionState,
    slots: SlotMap,
    last_fingerprint: Option<FeatureVector>,
}

impl ScanSession {
    /// Open a session, loading the persisted training set.
    ///
    /// An empty training set whose input size differs from the configured
    /// grid (first use) is re-declared at `rows * cols` and saved.
    pub fn open(storage: Arc<dyn ParkingStorage>, config: ParkingConfig) -> ParkingResult<Self> {
        config.validate()?;
        let registry = RouterRegistry::new(Arc::clone(&storage));
        let store = TrainingStore::new(storage);

        let mut training = store.load()?;
        if training.input_size() != config.input_size() {
            if training.is_empty() {
                store.reset(config.input_size())?;
                training = TrainingSet::new(config.input_size());
            } else {
                tracing::warn!(
                    stored = training.input_size(),
                    grid = config.input_size(),
                    samples = training.len(),
                    "training set was recorded for a different grid"
                );
            }
        }

        let classifier = KnnClassifier::new(config.k)
            .with_vote_policy(config.vote)
            .with_training_set(training);

        Ok(Self {
            config,
            registry,
            store,
            classifier,
            state: SessionState::Idle,
            slots: SlotMap::new(),
            last_fingerprint: None,
        })
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &ParkingConfig {
        &self.config
    }

    /// Router registry.
    pub fn registry(&self) -> &RouterRegistry {
        &self.registry
    }

    /// Training store.
    pub fn store(&self) -> &TrainingStore {
        &self.store
    }

    /// Classifier with the session's working copy of the training set.
    pub fn classifier(&self) -> &KnnClassifier {
        &self.classifier
    }

    /// Fingerprint built from the most recent completed scan.
    pub fn last_fingerprint(&self) -> Option<&[f32]> {
        self.last_fingerprint.as_deref()
    }

    /// Await a scan to record with `label`.
    pub fn begin_training(&mut self, label: u32) -> ParkingResult<()> {
        self.slots = self.registry.slot_map(self.config.cols)?;
        self.state = SessionState::AwaitingScanForTrain { label };
        tracing::debug!(label, access_points = self.slots.len(), "awaiting scan for training");
        Ok(())
    }

    /// Await a scan to classify.
    pub fn begin_prediction(&mut self) -> ParkingResult<()> {
        self.slots = self.registry.slot_map(self.config.cols)?;
        self.state = SessionState::AwaitingScanForPredict;
        tracing::debug!(access_points = self.slots.len(), "awaiting scan for prediction");
        Ok(())
    }

    /// Drop any pending request.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Feed the outcome of a scan into the session.
    ///
    /// # Errors
    ///
    /// Classification or persistence failures. The session is `Idle`
    /// afterwards, so the request has to be started again. A failed scan is
    /// not an error; it yields [`SessionEvent::ScanFailed`] and keeps the
    /// request pending.
    pub fn on_scan_completed(
        &mut self,
        outcome: Result<Vec<ScanEntry>, ScanError>,
    ) -> ParkingResult<SessionEvent> {
        let entries = match outcome {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, state = ?self.state, "scan failed");
                return Ok(SessionEvent::ScanFailed { reason: e.to_string() });
            }
        };

        let fingerprint = FeatureVectorBuilder::build(
            &readings_from_scan(&entries),
            &self.slots,
            self.classifier.input_size(),
        );

        let label = match self.state {
            SessionState::Idle => {
                tracing::debug!(entries = entries.len(), "scan arrived while idle");
                return Ok(SessionEvent::Ignored);
            }
            SessionState::AwaitingScanForTrain { label } => Some(label),
            SessionState::AwaitingScanForPredict => None,
        };

        // The scan was consumed either way; a failed request is not retried.
        self.state = SessionState::Idle;
        let event = match label {
            Some(label) => self.record(fingerprint.clone(), label),
            None => self.classify(&fingerprint),
        };
        if let Err(e) = &event {
            tracing::warn!(error = %e, "scan request failed; session is idle");
        }
        self.last_fingerprint = Some(fingerprint);
        event
    }

    fn classify(&self, fingerprint: &[f32]) -> ParkingResult<SessionEvent> {
        let label = self.classifier.predict(fingerprint)?;
        let estimate = OccupancyEstimate::from_prediction(label, self.config.capacity);
        tracing::info!(
            occupied = estimate.occupied,
            unoccupied = estimate.unoccupied,
            capacity = estimate.capacity,
            "predicted occupancy"
        );
        Ok(SessionEvent::Predicted { estimate, fingerprint: fingerprint.to_vec() })
    }

    fn record(&mut self, fingerprint: FeatureVector, label: u32) -> ParkingResult<SessionEvent> {
        let before = self.classifier.training_set().clone();
        let actual = fingerprint.len();
        if !self.classifier.add_point(fingerprint.clone(), label) {
            return Ok(SessionEvent::TrainingRejected {
                label,
                expected: self.classifier.input_size(),
                actual,
            });
        }
        if let Err(e) = self.store.save_set(self.classifier.training_set()) {
            self.classifier.load(before);
            return Err(e);
        }
        let samples = self.classifier.num_samples();
        tracing::info!(label, samples, "recorded training sample");
        Ok(SessionEvent::Trained { label, samples, fingerprint })
    }

    /// Scan `source` and record the result with `label`.
    pub fn train_with(&mut self, source: &dyn ScanSource, label: u32) -> ParkingResult<SessionEvent> {
        self.begin_training(label)?;
        self.on_scan_completed(source.scan())
    }

    /// Scan `source` and classify the result.
    pub fn predict_with(&mut self, source: &dyn ScanSource) -> ParkingResult<SessionEvent> {
        self.begin_prediction()?;
        self.on_scan_completed(source.scan())
    }

    /// Bind an access point to a cell of the current grid.
    ///
    /// Samples recorded before the binding keep the sentinel in the new
    /// slot; they stay valid but carry no reading for this access point.
    pub fn bind_access_point(
        &self,
        bssid: BssidId,
        name: impl Into<String>,
        row: u32,
        col: u32,
    ) -> ParkingResult<AccessPoint> {
        if !self.config.grid().contains(row as usize, col as usize) {
            tracing::warn!(%bssid, row, col, "binding lies outside the grid and will be skipped");
        }
        let ap = self.registry.add_access_point(bssid, name, row, col)?;
        let samples = self.classifier.num_samples();
        if samples > 0 {
            tracing::info!(%bssid, samples, "access point bound after training; existing samples lack its reading");
        }
        Ok(ap)
    }

    /// Remove a stored sample and refresh the classifier.
    pub fn remove_sample(&mut self, position: usize) -> ParkingResult<LabeledSample> {
        let removed = self.store.remove_at(position)?;
        self.classifier.load(self.store.load()?);
        Ok(removed)
    }

    /// Change the grid shape.
    ///
    /// A new shape invalidates every binding and every recorded fingerprint:
    /// the registry is cleared and the training set is reset to
    /// `rows * cols`. Returns `false` if the shape is unchanged.
    pub fn configure_grid(&mut self, rows: usize, cols: usize) -> ParkingResult<bool> {
        if rows == self.config.rows && cols == self.config.cols {
            return Ok(false);
        }
        let next = ParkingConfig { rows, cols, ..self.config.clone() };
        next.validate()?;

        self.registry.remove_all()?;
        self.store.reset(next.input_size())?;
        self.classifier.load(TrainingSet::new(next.input_size()));
        self.config = next;
        self.state = SessionState::Idle;
        self.slots.clear();
        self.last_fingerprint = None;
        tracing::info!(rows, cols, "grid resized; bindings and samples cleared");
        Ok(true)
    }

    /// Change the lot capacity used for occupancy read-outs.
    pub fn set_capacity(&mut self, capacity: u32) {
        self.config.capacity = capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::adapter::StaticScanSource;
    use crate::error::{ParkingError, StorageError};
    use crate::storage::{InMemoryStorage, TrainingRecord};

    fn session() -> ScanSession {
        let storage: Arc<dyn ParkingStorage> = Arc::new(InMemoryStorage::new());
        let session = ScanSession::open(storage, ParkingConfig::default()).unwrap();
        session.bind_access_point(BssidId([1; 6]), "a", 0, 0).unwrap();
        session.bind_access_point(BssidId([2; 6]), "b", 2, 1).unwrap();
        session
    }

    fn scan(a: f32, b: f32) -> Vec<ScanEntry> {
        vec![
            ScanEntry::new(BssidId([1; 6]), "a", a),
            ScanEntry::new(BssidId([2; 6]), "b", b),
            ScanEntry::new(BssidId([9; 6]), "neighbour", -40.0),
        ]
    }

    #[test]
    fn first_open_declares_grid_input_size() {
        let s = session();
        assert_eq!(s.classifier().input_size(), 6);
        assert_eq!(s.store().load().unwrap().input_size(), 6);
    }

    #[test]
    fn training_records_and_persists() {
        let mut s = session();
        let event = s.train_with(&StaticScanSource::new(scan(-50.0, -70.0)), 2).unwrap();
        match event {
            SessionEvent::Trained { label, samples, fingerprint } => {
                assert_eq!(label, 2);
                assert_eq!(samples, 1);
                assert_eq!(fingerprint, vec![-50.0, 0.0, 0.0, 0.0, 0.0, -70.0]);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.store().load().unwrap().labels(), vec![2]);
    }

    #[test]
    fn prediction_reports_occupancy() {
        let mut s = session();
        s.train_with(&StaticScanSource::new(scan(-50.0, -60.0)), 0).unwrap();
        s.train_with(&StaticScanSource::new(scan(-80.0, -90.0)), 4).unwrap();
        let event = s.predict_with(&StaticScanSource::new(scan(-78.0, -91.0))).unwrap();
        match event {
            SessionEvent::Predicted { estimate, .. } => {
                assert_eq!(estimate, OccupancyEstimate::from_prediction(4, 10));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn failed_scan_keeps_request_pending() {
        let mut s = session();
        s.begin_training(1).unwrap();
        let event = s.on_scan_completed(Err(ScanError::failed("radio off"))).unwrap();
        assert!(matches!(event, SessionEvent::ScanFailed { .. }));
        assert_eq!(s.state(), SessionState::AwaitingScanForTrain { label: 1 });

        let event = s.on_scan_completed(Ok(scan(-50.0, -50.0))).unwrap();
        assert!(matches!(event, SessionEvent::Trained { .. }));
    }

    #[test]
    fn idle_scans_are_ignored() {
        let mut s = session();
        assert_eq!(s.on_scan_completed(Ok(scan(-1.0, -1.0))).unwrap(), SessionEvent::Ignored);
        assert_eq!(s.classifier().num_samples(), 0);
    }

    #[test]
    fn predicting_without_samples_is_an_error() {
        let mut s = session();
        assert!(matches!(
            s.predict_with(&StaticScanSource::new(scan(-1.0, -1.0))),
            Err(ParkingError::EmptyTrainingSet)
        ));
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.on_scan_completed(Ok(scan(-1.0, -1.0))).unwrap(), SessionEvent::Ignored);
    }

    /// Storage whose training writes can be switched off.
    #[derive(Debug, Default)]
    struct FlakyStorage {
        inner: InMemoryStorage,
        fail_writes: AtomicBool,
    }

    impl ParkingStorage for FlakyStorage {
        fn insert_access_point(&self, ap: &AccessPoint) -> Result<(), StorageError> {
            self.inner.insert_access_point(ap)
        }
        fn access_points(&self) -> Result<Vec<AccessPoint>, StorageError> {
            self.inner.access_points()
        }
        fn clear_access_points(&self) -> Result<(), StorageError> {
            self.inner.clear_access_points()
        }
        fn training_record(&self) -> Result<Option<TrainingRecord>, StorageError> {
            self.inner.training_record()
        }
        fn put_training_record(&self, record: &TrainingRecord) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                let source = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
                return Err(StorageError::io("training.json", source));
            }
            self.inner.put_training_record(record)
        }
    }

    #[test]
    fn failed_save_rolls_back_and_goes_idle() {
        let storage = Arc::new(FlakyStorage::default());
        let mut s = ScanSession::open(storage.clone(), ParkingConfig::default()).unwrap();
        s.bind_access_point(BssidId([1; 6]), "a", 0, 0).unwrap();

        storage.fail_writes.store(true, Ordering::SeqCst);
        let result = s.train_with(&StaticScanSource::new(scan(-50.0, -60.0)), 3);
        assert!(matches!(result, Err(ParkingError::Storage(_))));
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.classifier().num_samples(), 0);

        storage.fail_writes.store(false, Ordering::SeqCst);
        let event = s.train_with(&StaticScanSource::new(scan(-50.0, -60.0)), 3).unwrap();
        assert!(matches!(event, SessionEvent::Trained { samples: 1, .. }));
    }

    #[test]
    fn grid_resize_clears_bindings_and_samples() {
        let mut s = session();
        s.train_with(&StaticScanSource::new(scan(-50.0, -60.0)), 0).unwrap();
        assert!(s.configure_grid(4, 4).unwrap());
        assert!(s.registry().is_empty().unwrap());
        let set = s.store().load().unwrap();
        assert!(set.is_empty());
        assert_eq!(set.input_size(), 16);
        assert_eq!(s.classifier().input_size(), 16);
        assert!(!s.configure_grid(4, 4).unwrap());
    }
}
