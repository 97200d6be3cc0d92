//! k-nearest-neighbour occupancy classifier.
//!
//! Fingerprints are compared with the squared Euclidean distance; no
//! normalisation or distance weighting is applied. How the `k` nearest
//! neighbours are turned into one label is selected by [`VotePolicy`]:
//!
//! - [`VotePolicy::Nearest`] counts one vote per neighbour *rank* instead of
//!   per label, so every rank ties and the result is always the label of the
//!   single closest sample. This is the behaviour existing deployments were
//!   trained against and is the default.
//! - [`VotePolicy::Majority`] counts votes per label. Ties between labels go
//!   to the label whose best-ranked neighbour is closest.

use serde::{Deserialize, Serialize};

use crate::domain::sample::{FeatureVector, LabeledSample, TrainingSet};
use crate::error::{ParkingError, ParkingResult};

/// How neighbour labels are combined into a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotePolicy {
    /// Label of the closest sample; `k` does not change the result.
    #[default]
    Nearest,
    /// Majority vote by label among the `k` closest samples.
    Majority,
}

/// One ranked neighbour of a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the sample in the training set.
    pub index: usize,
    /// Squared Euclidean distance to the query.
    pub distance: f32,
    /// Label of the sample.
    pub label: u32,
}

/// In-memory nearest-neighbour classifier.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    training: TrainingSet,
    k: usize,
    vote: VotePolicy,
}

impl Default for KnnClassifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_K)
    }
}

impl KnnClassifier {
    /// Default neighbour count.
    pub const DEFAULT_K: usize = 3;

    /// Returned by [`Self::distance`] when the vectors differ in length.
    pub const DIMENSION_MISMATCH_DISTANCE: f32 = -1.0;

    /// An untrained classifier with `input_size == 0`. `k` is clamped to at
    /// least 1.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self { training: TrainingSet::new(0), k: k.max(1), vote: VotePolicy::default() }
    }

    /// Select the vote policy.
    #[must_use]
    pub fn with_vote_policy(mut self, vote: VotePolicy) -> Self {
        self.vote = vote;
        self
    }

    /// Start from an existing training set.
    #[must_use]
    pub fn with_training_set(mut self, training: TrainingSet) -> Self {
        self.training = training;
        self
    }

    /// Replace the in-memory training set, e.g. after loading from a
    /// [`TrainingStore`](crate::pipeline::TrainingStore).
    pub fn load(&mut self, training: TrainingSet) {
        tracing::debug!(
            samples = training.len(),
            input_size = training.input_size(),
            "loaded training set into classifier"
        );
        self.training = training;
    }

    /// The in-memory training set, for persisting.
    pub fn training_set(&self) -> &TrainingSet {
        &self.training
    }

    /// Declared fingerprint length.
    pub fn input_size(&self) -> usize {
        self.training.input_size()
    }

    /// Neighbour count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Active vote policy.
    pub fn vote_policy(&self) -> VotePolicy {
        self.vote
    }

    /// Number of stored samples.
    pub fn num_samples(&self) -> usize {
        self.training.len()
    }

    /// Add a training point. Returns `false`, leaving the set untouched,
    /// when the vector length differs from [`Self::input_size`].
    ///
    /// The classifier never persists on its own.
    pub fn add_point(&mut self, vector: FeatureVector, label: u32) -> bool {
        match self.training.push(LabeledSample::new(vector, label)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, label, "ignoring training point");
                false
            }
        }
    }

    /// Squared Euclidean distance, `Σ (a_i - b_i)^2`.
    ///
    /// Vectors of different length are a caller bug; instead of failing
    /// this returns [`Self::DIMENSION_MISMATCH_DISTANCE`].
    pub fn distance(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return Self::DIMENSION_MISMATCH_DISTANCE;
        }
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
    }

    /// Every stored sample ranked by distance to `query`, closest first.
    /// Equal distances keep training-set order.
    ///
    /// # Errors
    ///
    /// [`ParkingError::DimensionMismatch`] if `query` has the wrong length.
    pub fn neighbors(&self, query: &[f32]) -> ParkingResult<Vec<Neighbor>> {
        if query.len() != self.input_size() {
            return Err(ParkingError::dimension_mismatch(self.input_size(), query.len()));
        }
        let mut ranked: Vec<Neighbor> = self
            .training
            .samples()
            .iter()
            .enumerate()
            .map(|(index, s)| Neighbor {
                index,
                distance: Self::distance(query, &s.vector),
                label: s.label,
            })
            .collect();
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(ranked)
    }

    /// Predict the label of `query`.
    ///
    /// # Errors
    ///
    /// [`ParkingError::EmptyTrainingSet`] when nothing has been recorded,
    /// [`ParkingError::DimensionMismatch`] if `query` has the wrong length.
    pub fn predict(&self, query: &[f32]) -> ParkingResult<u32> {
        if self.training.is_empty() {
            return Err(ParkingError::EmptyTrainingSet);
        }
        let ranked = self.neighbors(query)?;
        let top = &ranked[..self.k.min(ranked.len())];
        let label = match self.vote {
            VotePolicy::Nearest => top[0].label,
            VotePolicy::Majority => majority_label(top),
        };
        tracing::debug!(label, k = self.k, nearest = top[0].distance, "predicted");
        Ok(label)
    }
}

/// Most frequent label in `ranked` (non-empty, closest first). Ties go to
/// the label that appears first.
fn majority_label(ranked: &[Neighbor]) -> u32 {
    // (label, votes) in order of first appearance.
    let mut tally: Vec<(u32, usize)> = Vec::new();
    for n in ranked {
        match tally.iter_mut().find(|(label, _)| *label == n.label) {
            Some((_, votes)) => *votes += 1,
            None => tally.push((n.label, 1)),
        }
    }
    let mut best = tally[0];
    for &(label, votes) in &tally[1..] {
        if votes > best.1 {
            best = (label, votes);
        }
    }
    best.0
}
