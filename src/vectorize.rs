//! Bag-of-words count vectorization.
//!
//! [`CountVectorizer`] maps each distinct token of the normalized training
//! corpus to a fixed column index and turns documents into count vectors of
//! that width. The index is built once during `fit` and is immutable
//! afterwards; tokens unseen at fit time contribute nothing at transform
//! time.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array1, Array2};
use rmp_serde::{decode::from_read, encode::write_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{PredictorError, Result};

/// A fitted mapping from vocabulary token to column index, convertible into
/// fixed-width count vectors for any normalized document.
///
/// Column indices are assigned in sorted token order, so the mapping is
/// deterministic for a given corpus.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CountVectorizer {
    /// Vocabulary: token -> column index.
    vocabulary: BTreeMap<String, usize>,
    /// Number of documents seen during `fit`; zero means unfitted.
    n_documents: usize,
}

impl CountVectorizer {
    /// Create a new, unfitted vectorizer.
    pub fn new() -> Self {
        Self {
            vocabulary: BTreeMap::new(),
            n_documents: 0,
        }
    }

    /// Build the vocabulary over all documents and return the count matrix,
    /// one row per document.
    ///
    /// Documents are expected to be normalized already; tokens are split on
    /// whitespace only.
    pub fn fit(&mut self, documents: &[String]) -> Result<Array2<f64>> {
        if documents.is_empty() {
            return Err(PredictorError::invalid_input(
                "cannot fit a vectorizer on an empty document set",
            ));
        }

        let tokens: BTreeSet<String> = documents
            .iter()
            .flat_map(|doc| doc.split_whitespace().map(str::to_string))
            .collect();

        self.vocabulary = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| (token, index))
            .collect();
        self.n_documents = documents.len();

        self.transform_batch(documents)
    }

    /// Transform one document into a count vector of vocabulary width.
    ///
    /// Out-of-vocabulary tokens are dropped silently. Fails with a
    /// configuration error when called before `fit` (or before loading a
    /// persisted index).
    pub fn transform(&self, document: &str) -> Result<Array1<f64>> {
        self.ensure_fitted()?;
        Ok(Array1::from_vec(self.count_row(document)))
    }

    /// Transform a batch of documents into a count matrix.
    pub fn transform_batch(&self, documents: &[String]) -> Result<Array2<f64>> {
        self.ensure_fitted()?;

        let width = self.vocabulary.len();
        let rows: Vec<Vec<f64>> = documents.iter().map(|doc| self.count_row(doc)).collect();
        Array2::from_shape_vec((documents.len(), width), rows.concat())
            .map_err(|e| PredictorError::invalid_input(e.to_string()))
    }

    fn count_row(&self, document: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];
        for token in document.split_whitespace() {
            if let Some(&index) = self.vocabulary.get(token) {
                row[index] += 1.0;
            }
        }
        row
    }

    fn ensure_fitted(&self) -> Result<()> {
        if self.n_documents == 0 {
            return Err(PredictorError::configuration(
                "vectorizer has not been fitted; call fit or load a persisted index first",
            ));
        }
        Ok(())
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// SHA-256 over the sorted token/index pairs, hex-encoded.
    ///
    /// Stored in the classifier artifact and compared on load, so a
    /// classifier can only ever be paired with the vocabulary it was
    /// trained against.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (token, index) in &self.vocabulary {
            hasher.update(token.as_bytes());
            hasher.update(b"\t");
            hasher.update(index.to_le_bytes());
            hasher.update(b"\n");
        }
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect()
    }

    /// Save the fitted index to a binary MessagePack file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_named(&mut writer, self).map_err(|e| {
            PredictorError::serialization(format!("cannot write {}: {e}", path.display()))
        })
    }

    /// Load a fitted index from a binary MessagePack file.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_fit_builds_sorted_vocabulary() {
        let mut vectorizer = CountVectorizer::new();
        let matrix = vectorizer
            .fit(&docs(&["hey alice", "meeting noon noon"]))
            .unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 4);
        assert_eq!(matrix.shape(), &[2, 4]);
        // Sorted order: alice, hey, meeting, noon.
        assert_eq!(matrix.row(0).to_vec(), vec![1.0, 1.0, 0.0, 0.0]);
        assert_eq!(matrix.row(1).to_vec(), vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_transform_drops_unknown_tokens() {
        let mut vectorizer = CountVectorizer::new();
        vectorizer.fit(&docs(&["hey alice", "meeting noon"])).unwrap();

        let vector = vectorizer.transform("hey hey submarine").unwrap();
        // Width never grows past the fitted vocabulary, and the unseen
        // token contributes nothing.
        assert_eq!(vector.len(), vectorizer.vocabulary_size());
        assert_eq!(vector.sum(), 2.0);
    }

    #[test]
    fn test_empty_document_is_zero_vector() {
        let mut vectorizer = CountVectorizer::new();
        vectorizer.fit(&docs(&["hey alice"])).unwrap();

        let vector = vectorizer.transform("").unwrap();
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.sum(), 0.0);
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let vectorizer = CountVectorizer::new();
        let err = vectorizer.transform("hey").unwrap_err();
        assert!(matches!(err, PredictorError::Configuration(_)));
    }

    #[test]
    fn test_fingerprint_tracks_vocabulary() {
        let mut a = CountVectorizer::new();
        a.fit(&docs(&["hey alice"])).unwrap();
        let mut b = CountVectorizer::new();
        b.fit(&docs(&["hey alice"])).unwrap();
        let mut c = CountVectorizer::new();
        c.fit(&docs(&["meeting noon"])).unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectorizer.msgpack");

        let mut vectorizer = CountVectorizer::new();
        vectorizer.fit(&docs(&["hey alice", "meeting noon"])).unwrap();
        vectorizer.save_to_file(&path).unwrap();

        let reloaded = CountVectorizer::load_from_file(&path).unwrap();
        assert_eq!(reloaded.vocabulary_size(), vectorizer.vocabulary_size());
        assert_eq!(reloaded.fingerprint(), vectorizer.fingerprint());
        assert_eq!(
            reloaded.transform("hey noon").unwrap(),
            vectorizer.transform("hey noon").unwrap()
        );
    }

    #[test]
    fn test_load_missing_file_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CountVectorizer::load_from_file(&dir.path().join("nope.msgpack")).unwrap_err();
        assert!(matches!(err, PredictorError::ArtifactLoad(_)));
    }
}
