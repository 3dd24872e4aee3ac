//! The offline training pipeline.
//!
//! One strictly sequential run: load corpus, validate schema, normalize
//! every row, fit the vectorizer, split train/test, fit the classifier,
//! persist both artifacts, evaluate the held-out split, and smoke-test the
//! in-memory model. There is no branching back and no retry; fatal steps
//! surface their error to the caller.

use std::fs;
use std::path::PathBuf;

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::classifier::{DEFAULT_SEED, DEFAULT_TREES, UsernameClassifierParams};
use crate::corpus::{self, LabeledExample};
use crate::error::{PredictorError, Result};
use crate::inference::{CLASSIFIER_FILE, InferencePipeline, VECTORIZER_FILE};
use crate::metrics::{self, EvaluationReport};
use crate::normalize::TextNormalizer;
use crate::vectorize::CountVectorizer;

/// Default proportion of the corpus held out for evaluation.
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Sample messages run through the freshly trained model as a wiring check.
const SMOKE_MESSAGE: &str = "Hey look at this message, I wonder who it's from!";
const SMOKE_BLANK: &str = " ";

/// Configuration for one training run.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub dataset: PathBuf,
    pub model_dir: PathBuf,
    pub test_ratio: f64,
    pub seed: u64,
    pub trees: usize,
}

impl TrainingConfig {
    /// Configuration with the documented defaults (20% held out, seed 42,
    /// 100 trees).
    pub fn new(dataset: impl Into<PathBuf>, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            model_dir: model_dir.into(),
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SEED,
            trees: DEFAULT_TREES,
        }
    }

    /// Set the held-out proportion.
    pub fn with_test_ratio(mut self, test_ratio: f64) -> Self {
        self.test_ratio = test_ratio;
        self
    }

    /// Set the split and bootstrap seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the ensemble size.
    pub fn with_trees(mut self, trees: usize) -> Self {
        self.trees = trees;
        self
    }
}

/// Outcome of normalizing one corpus row.
///
/// A failed row is substituted with an empty document rather than aborting
/// the batch; the substitution is tallied into the batch summary.
pub enum RowNormalization {
    Normalized(String),
    Substituted { row: usize, reason: String },
}

/// Normalized documents plus the batch summary.
pub struct NormalizedBatch {
    pub documents: Vec<String>,
    pub substituted: usize,
}

/// Summary of one completed training run, for reporting by the caller.
#[derive(Debug)]
pub struct TrainingOutcome {
    /// First rows of the corpus, for a quick visual check of the source.
    pub head: Vec<LabeledExample>,
    pub columns: Vec<String>,
    pub rows: usize,
    pub skipped_unlabeled: usize,
    pub substituted_rows: usize,
    pub vocabulary_size: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub evaluation: EvaluationReport,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
    /// Smoke-test predictions; `None` records a logged, non-fatal failure.
    pub smoke_prediction: Option<String>,
    pub smoke_blank_prediction: Option<String>,
}

/// Run the full training pipeline.
pub fn run(config: &TrainingConfig) -> Result<TrainingOutcome> {
    if !(0.0..1.0).contains(&config.test_ratio) {
        return Err(PredictorError::configuration(format!(
            "test ratio {} must be in [0, 1)",
            config.test_ratio
        )));
    }

    log::info!("loading corpus from {}", config.dataset.display());
    let corpus = corpus::load_corpus(&config.dataset)?;
    if corpus.examples.is_empty() {
        return Err(PredictorError::invalid_input(
            "corpus contains no usable rows",
        ));
    }
    log::info!(
        "loaded {} rows ({} skipped without a username)",
        corpus.examples.len(),
        corpus.skipped_unlabeled
    );

    let normalizer = TextNormalizer::new();
    let batch = normalize_all(&normalizer, &corpus.examples);
    log::info!(
        "normalized {} documents, {} substituted",
        batch.documents.len() - batch.substituted,
        batch.substituted
    );

    let mut vectorizer = CountVectorizer::new();
    let features = vectorizer.fit(&batch.documents)?;
    log::info!("fitted vocabulary of {} tokens", vectorizer.vocabulary_size());

    let labels: Vec<String> = corpus
        .examples
        .iter()
        .map(|example| example.username.clone())
        .collect();
    let (train_x, train_y, test_x, test_y) =
        split_train_test(&features, &labels, config.test_ratio, config.seed);
    log::info!(
        "split corpus into {} train rows and {} test rows",
        train_y.len(),
        test_y.len()
    );

    let classifier = UsernameClassifierParams::new()
        .with_trees(config.trees)
        .with_seed(config.seed)
        .fit(&train_x, &train_y)?
        .with_vocabulary_fingerprint(vectorizer.fingerprint());
    log::info!("fitted {} trees", classifier.n_trees());

    fs::create_dir_all(&config.model_dir)?;
    let vectorizer_path = config.model_dir.join(VECTORIZER_FILE);
    let classifier_path = config.model_dir.join(CLASSIFIER_FILE);
    vectorizer.save_to_file(&vectorizer_path)?;
    classifier.save_to_file(&classifier_path)?;
    log::info!("artifacts saved under {}", config.model_dir.display());

    let predictions = classifier.predict(&test_x)?;
    let evaluation = metrics::evaluate(&test_y, &predictions);

    let head: Vec<LabeledExample> = corpus.examples.iter().take(5).cloned().collect();
    let rows = corpus.examples.len();
    let train_rows = train_y.len();
    let test_rows = test_y.len();
    let vocabulary_size = vectorizer.vocabulary_size();

    let pipeline = InferencePipeline::from_parts(normalizer, vectorizer, classifier)?;
    let smoke_prediction = smoke_predict(&pipeline, SMOKE_MESSAGE);
    let smoke_blank_prediction = smoke_predict(&pipeline, SMOKE_BLANK);

    Ok(TrainingOutcome {
        head,
        columns: corpus.columns,
        rows,
        skipped_unlabeled: corpus.skipped_unlabeled,
        substituted_rows: batch.substituted,
        vocabulary_size,
        train_rows,
        test_rows,
        evaluation,
        vectorizer_path,
        classifier_path,
        smoke_prediction,
        smoke_blank_prediction,
    })
}

/// Normalize every corpus row, substituting an empty document for rows
/// that fail.
fn normalize_all(normalizer: &TextNormalizer, examples: &[LabeledExample]) -> NormalizedBatch {
    let mut documents = Vec::with_capacity(examples.len());
    let mut substituted = 0;

    for (row, example) in examples.iter().enumerate() {
        let outcome = match normalizer.normalize(&example.text) {
            Ok(document) => RowNormalization::Normalized(document),
            Err(e) => RowNormalization::Substituted {
                row,
                reason: e.to_string(),
            },
        };
        match outcome {
            RowNormalization::Normalized(document) => documents.push(document),
            RowNormalization::Substituted { row, reason } => {
                log::warn!(
                    "{}",
                    PredictorError::RowProcessing { row, reason }
                );
                documents.push(String::new());
                substituted += 1;
            }
        }
    }

    NormalizedBatch {
        documents,
        substituted,
    }
}

/// Deterministically partition features and labels, holding out
/// `test_ratio` of the rows (rounded).
fn split_train_test(
    features: &Array2<f64>,
    labels: &[String],
    test_ratio: f64,
    seed: u64,
) -> (Array2<f64>, Vec<String>, Array2<f64>, Vec<String>) {
    let rows = features.nrows();
    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = ((rows as f64) * test_ratio).round() as usize;
    let (test_indices, train_indices) = indices.split_at(test_size);

    (
        features.select(Axis(0), train_indices),
        train_indices.iter().map(|&i| labels[i].clone()).collect(),
        features.select(Axis(0), test_indices),
        test_indices.iter().map(|&i| labels[i].clone()).collect(),
    )
}

fn smoke_predict(pipeline: &InferencePipeline, message: &str) -> Option<String> {
    match pipeline.predict_one(message) {
        Ok(label) => {
            log::info!("smoke test: {message:?} -> {label}");
            Some(label)
        }
        Err(e) => {
            log::error!(
                "smoke test failed for {message:?}: {}",
                PredictorError::prediction(e.to_string())
            );
            None
        }
    }
}
