//! # msg2user
//!
//! Predict which known user authored a short text message.
//!
//! Messages are normalized (Unicode word tokenization, English stopword
//! removal, noun-form lemmatization), counted against a vocabulary frozen
//! at training time, and classified by majority vote over an ensemble of
//! bootstrap-trained [`linfa_trees`] decision trees. Both pipelines share
//! one [`TextNormalizer`], so the preprocessing the classifier sees is
//! byte-identical at training and inference time.
//!
//! ## Features
//! - UAX #29 word-boundary tokenization, stopword removal, lemmatization
//! - Deterministic vocabulary indexing and seeded train/test split
//! - Bagged decision-tree ensemble with majority-vote prediction
//! - Model persistence with `rmp-serde` (MessagePack), guarded by a
//!   SHA-256 vocabulary fingerprint
//! - Held-out evaluation with per-user precision/recall/F1 and a
//!   confusion matrix
//! - Benchmarkable with [Criterion](https://crates.io/crates/criterion)
//!
//! ## Example
//! ```no_run
//! use std::path::Path;
//! use msg2user::InferencePipeline;
//!
//! # fn main() -> msg2user::Result<()> {
//! let pipeline = InferencePipeline::load(Path::new("models"))?;
//! let username = pipeline.predict_one("hey, are we still meeting at noon?")?;
//! println!("{username}");
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod corpus;
pub mod error;
pub mod inference;
pub mod lemma;
pub mod metrics;
pub mod normalize;
pub mod training;
pub mod vectorize;

pub use classifier::{UsernameClassifier, UsernameClassifierParams};
pub use corpus::{Corpus, LabeledExample};
pub use error::{PredictorError, Result};
pub use inference::{CLASSIFIER_FILE, InferencePipeline, VECTORIZER_FILE};
pub use metrics::EvaluationReport;
pub use normalize::TextNormalizer;
pub use training::{TrainingConfig, TrainingOutcome};
pub use vectorize::CountVectorizer;
