//! Multi-class username classification.
//!
//! [`UsernameClassifier`] is a bagged ensemble of decision trees: each tree
//! is fitted on a seeded bootstrap resample of the training rows and the
//! ensemble predicts by majority vote. With a fixed seed and fixed input
//! the fitted ensemble reproduces identical predictions across runs.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rmp_serde::{decode::from_read, encode::write_named};
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// Default number of trees in the ensemble.
pub const DEFAULT_TREES: usize = 100;
/// Default seed for bootstrap sampling (and the pipeline's split).
pub const DEFAULT_SEED: u64 = 42;

/// Hyperparameters for fitting a [`UsernameClassifier`].
#[derive(Debug, Clone)]
pub struct UsernameClassifierParams {
    trees: usize,
    seed: u64,
    max_depth: Option<usize>,
}

impl Default for UsernameClassifierParams {
    fn default() -> Self {
        Self::new()
    }
}

impl UsernameClassifierParams {
    /// Parameters with the documented defaults (100 trees, seed 42,
    /// unbounded depth).
    pub fn new() -> Self {
        Self {
            trees: DEFAULT_TREES,
            seed: DEFAULT_SEED,
            max_depth: None,
        }
    }

    /// Set the number of trees in the ensemble.
    pub fn with_trees(mut self, trees: usize) -> Self {
        self.trees = trees;
        self
    }

    /// Set the bootstrap sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Bound the depth of each tree.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Fit the ensemble on a feature matrix and its per-row username labels.
    ///
    /// Labels length must equal the number of feature rows. Class ids are
    /// assigned to usernames in sorted order.
    pub fn fit(&self, features: &Array2<f64>, labels: &[String]) -> Result<UsernameClassifier> {
        if labels.len() != features.nrows() {
            return Err(PredictorError::invalid_input(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(PredictorError::invalid_input(
                "cannot fit a classifier on an empty training set",
            ));
        }
        if self.trees == 0 {
            return Err(PredictorError::invalid_input(
                "ensemble needs at least one tree",
            ));
        }

        let names: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let class_ids: BTreeMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.as_str(), id))
            .collect();
        let targets: Array1<usize> = labels.iter().map(|l| class_ids[l.as_str()]).collect();

        let rows = features.nrows();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.trees);
        for _ in 0..self.trees {
            let indices: Vec<usize> = (0..rows).map(|_| rng.gen_range(0..rows)).collect();
            let sample = Dataset::new(
                features.select(Axis(0), &indices),
                targets.select(Axis(0), &indices),
            );
            let tree = DecisionTree::params()
                .max_depth(self.max_depth)
                .fit(&sample)
                .map_err(|e| PredictorError::training(e.to_string()))?;
            trees.push(tree);
        }

        Ok(UsernameClassifier {
            trees,
            labels: names,
            n_features: features.ncols(),
            vocabulary_fingerprint: String::new(),
        })
    }
}

/// A trained ensemble of decision trees voting on username labels.
#[derive(Debug, Serialize, Deserialize)]
pub struct UsernameClassifier {
    trees: Vec<DecisionTree<f64, usize>>,
    /// Sorted usernames; position is the class id the trees predict.
    labels: Vec<String>,
    n_features: usize,
    /// Fingerprint of the vocabulary this ensemble was trained against.
    vocabulary_fingerprint: String,
}

impl UsernameClassifier {
    /// Record the fingerprint of the vectorizer this model was trained with.
    pub fn with_vocabulary_fingerprint<S: Into<String>>(mut self, fingerprint: S) -> Self {
        self.vocabulary_fingerprint = fingerprint.into();
        self
    }

    /// Predict one username per feature row by majority vote.
    ///
    /// Vote ties break toward the lexicographically first username; callers
    /// must not rely on any particular tie outcome.
    pub fn predict(&self, features: &Array2<f64>) -> Result<Vec<String>> {
        if features.ncols() != self.n_features {
            return Err(PredictorError::invalid_input(format!(
                "expected {} feature columns, got {}",
                self.n_features,
                features.ncols()
            )));
        }
        if self.trees.is_empty() || self.labels.is_empty() {
            return Err(PredictorError::prediction(
                "classifier has no fitted trees",
            ));
        }

        let mut votes = vec![vec![0usize; self.labels.len()]; features.nrows()];
        for tree in &self.trees {
            let predicted: Array1<usize> = tree.predict(features);
            for (row, &class) in predicted.iter().enumerate() {
                votes[row][class] += 1;
            }
        }

        Ok(votes
            .iter()
            .map(|tally| {
                let mut winner = 0;
                for (class, &count) in tally.iter().enumerate() {
                    if count > tally[winner] {
                        winner = class;
                    }
                }
                self.labels[winner].clone()
            })
            .collect())
    }

    /// Predict the username for a single feature vector.
    pub fn predict_one(&self, features: &Array1<f64>) -> Result<String> {
        let matrix = features.clone().insert_axis(Axis(0));
        let mut predicted = self.predict(&matrix)?;
        predicted
            .pop()
            .ok_or_else(|| PredictorError::prediction("ensemble produced no prediction"))
    }

    /// The usernames observed during fitting, in class-id order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of trees in the ensemble.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Width of the feature vectors this ensemble was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Fingerprint of the vocabulary this ensemble was trained against.
    pub fn vocabulary_fingerprint(&self) -> &str {
        &self.vocabulary_fingerprint
    }

    /// Save the ensemble to a binary MessagePack file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_named(&mut writer, self).map_err(|e| {
            PredictorError::serialization(format!("cannot write {}: {e}", path.display()))
        })
    }

    /// Load an ensemble from a binary MessagePack file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            PredictorError::artifact_load(format!("cannot open {}: {e}", path.display()))
        })?;
        let reader = BufReader::new(file);
        from_read(reader).map_err(|e| {
            PredictorError::artifact_load(format!("cannot decode {}: {e}", path.display()))
        })
    }
}
