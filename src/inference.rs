//! The online inference pipeline.
//!
//! Loads the persisted vectorizer and classifier once, then predicts the
//! author of raw messages through the same normalization the training
//! pipeline used. The pair of artifacts is validated on load: a classifier
//! is only accepted next to the vocabulary it was trained against.

use std::path::Path;

use crate::classifier::UsernameClassifier;
use crate::error::{PredictorError, Result};
use crate::normalize::TextNormalizer;
use crate::vectorize::CountVectorizer;

/// File name of the persisted vectorizer artifact.
pub const VECTORIZER_FILE: &str = "vectorizer.msgpack";
/// File name of the persisted classifier artifact.
pub const CLASSIFIER_FILE: &str = "username_classifier.msgpack";

/// A loaded model pair ready to score messages.
///
/// Load once, predict many times; every prediction reuses the frozen
/// vocabulary and ensemble.
#[derive(Debug)]
pub struct InferencePipeline {
    normalizer: TextNormalizer,
    vectorizer: CountVectorizer,
    classifier: UsernameClassifier,
}

impl InferencePipeline {
    /// Load both artifacts from `model_dir`.
    ///
    /// Missing or corrupt files, and artifact pairs that did not originate
    /// from the same training run, fail with an artifact load error. There
    /// is no fallback prediction.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let vectorizer = CountVectorizer::load_from_file(&model_dir.join(VECTORIZER_FILE))?;
        let classifier = UsernameClassifier::load_from_file(&model_dir.join(CLASSIFIER_FILE))?;
        Self::from_parts(TextNormalizer::new(), vectorizer, classifier)
    }

    /// Assemble a pipeline from already-fitted components, applying the
    /// same compatibility checks as [`InferencePipeline::load`].
    pub fn from_parts(
        normalizer: TextNormalizer,
        vectorizer: CountVectorizer,
        classifier: UsernameClassifier,
    ) -> Result<Self> {
        if classifier.n_features() != vectorizer.vocabulary_size() {
            return Err(PredictorError::artifact_load(format!(
                "classifier expects {} feature columns but the vectorizer produces {}",
                classifier.n_features(),
                vectorizer.vocabulary_size()
            )));
        }
        if classifier.vocabulary_fingerprint() != vectorizer.fingerprint() {
            return Err(PredictorError::artifact_load(
                "vectorizer and classifier do not come from the same training run",
            ));
        }

        Ok(Self {
            normalizer,
            vectorizer,
            classifier,
        })
    }

    /// Predict the most likely author of one raw message.
    pub fn predict_one(&self, raw_message: &str) -> Result<String> {
        let document = self.normalizer.normalize(raw_message)?;
        let features = self.vectorizer.transform(&document)?;
        self.classifier.predict_one(&features)
    }

    /// The usernames this pipeline can predict.
    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::UsernameClassifierParams;

    fn fitted_pair(texts: &[(&str, &str)]) -> (CountVectorizer, UsernameClassifier) {
        let normalizer = TextNormalizer::new();
        let documents: Vec<String> = texts
            .iter()
            .map(|(text, _)| normalizer.normalize(text).unwrap())
            .collect();
        let labels: Vec<String> = texts.iter().map(|(_, user)| user.to_string()).collect();

        let mut vectorizer = CountVectorizer::new();
        let features = vectorizer.fit(&documents).unwrap();
        let classifier = UsernameClassifierParams::new()
            .with_trees(10)
            .fit(&features, &labels)
            .unwrap()
            .with_vocabulary_fingerprint(vectorizer.fingerprint());
        (vectorizer, classifier)
    }

    #[test]
    fn test_from_parts_accepts_a_matched_pair() {
        let (vectorizer, classifier) =
            fitted_pair(&[("hey alice", "alice"), ("meeting noon", "bob")]);
        let pipeline =
            InferencePipeline::from_parts(TextNormalizer::new(), vectorizer, classifier).unwrap();
        assert_eq!(pipeline.labels(), &["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_mismatched_artifacts_are_rejected() {
        let (_, classifier) = fitted_pair(&[("hey alice", "alice"), ("meeting noon", "bob")]);
        let (other_vectorizer, _) = fitted_pair(&[
            ("completely different words entirely", "alice"),
            ("meeting noon", "bob"),
        ]);

        let err =
            InferencePipeline::from_parts(TextNormalizer::new(), other_vectorizer, classifier)
                .unwrap_err();
        assert!(matches!(err, PredictorError::ArtifactLoad(_)));
    }

    #[test]
    fn test_load_from_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = InferencePipeline::load(&dir.path().join("no-models")).unwrap_err();
        assert!(matches!(err, PredictorError::ArtifactLoad(_)));
    }
}
