//! Training corpus loading and schema validation.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// Name of the required message-text column.
pub const TEXT_COLUMN: &str = "text";
/// Name of the required author column.
pub const USERNAME_COLUMN: &str = "username";

/// One labeled corpus row.
///
/// `text` defaults to the empty string when the CSV cell is missing; extra
/// columns in the source are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledExample {
    #[serde(default)]
    pub text: String,
    pub username: String,
}

/// The loaded training corpus.
#[derive(Debug)]
pub struct Corpus {
    /// Column names as they appear in the source, in order.
    pub columns: Vec<String>,
    pub examples: Vec<LabeledExample>,
    /// Rows dropped because their username cell was empty.
    pub skipped_unlabeled: usize,
}

/// Read all rows of a CSV corpus.
///
/// The header is validated before any row is parsed; a missing `text` or
/// `username` column fails with a configuration error naming the missing
/// column(s). Rows with an empty username are skipped with a warning rather
/// than trained on.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let missing: Vec<&str> = [TEXT_COLUMN, USERNAME_COLUMN]
        .into_iter()
        .filter(|required| !columns.iter().any(|column| column == required))
        .collect();
    if !missing.is_empty() {
        return Err(PredictorError::configuration(format!(
            "corpus {} is missing required column(s): {}",
            path.display(),
            missing.join(", ")
        )));
    }

    let mut examples = Vec::new();
    let mut skipped_unlabeled = 0;
    for (row, record) in reader.deserialize::<LabeledExample>().enumerate() {
        let example = record?;
        if example.username.is_empty() {
            log::warn!("row {row} has an empty username, skipping");
            skipped_unlabeled += 1;
            continue;
        }
        examples.push(example);
    }

    Ok(Corpus {
        columns,
        examples,
        skipped_unlabeled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_loads_rows_in_order() {
        let (_dir, path) = write_csv("text,username\nhey there,alice\nmeeting at noon,bob\n");
        let corpus = load_corpus(&path).unwrap();

        assert_eq!(corpus.columns, vec!["text", "username"]);
        assert_eq!(corpus.examples.len(), 2);
        assert_eq!(corpus.examples[0].text, "hey there");
        assert_eq!(corpus.examples[1].username, "bob");
        assert_eq!(corpus.skipped_unlabeled, 0);
    }

    #[test]
    fn test_missing_username_column_is_rejected() {
        let (_dir, path) = write_csv("text,user\nhey there,alice\n");
        let err = load_corpus(&path).unwrap_err();

        match err {
            PredictorError::Configuration(msg) => assert!(msg.contains("username")),
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_cell_defaults_to_empty_string() {
        let (_dir, path) = write_csv("text,username\n,alice\nhello,bob\n");
        let corpus = load_corpus(&path).unwrap();

        assert_eq!(corpus.examples[0].text, "");
        assert_eq!(corpus.examples[0].username, "alice");
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let (_dir, path) =
            write_csv("channel,text,username\ngeneral,hey there,alice\nrandom,sup,bob\n");
        let corpus = load_corpus(&path).unwrap();

        assert_eq!(corpus.examples.len(), 2);
        assert_eq!(corpus.examples[0].text, "hey there");
    }

    #[test]
    fn test_unlabeled_rows_are_skipped_and_counted() {
        let (_dir, path) = write_csv("text,username\nhey there,alice\norphan message,\n");
        let corpus = load_corpus(&path).unwrap();

        assert_eq!(corpus.examples.len(), 1);
        assert_eq!(corpus.skipped_unlabeled, 1);
    }

    #[test]
    fn test_unreadable_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_corpus(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, PredictorError::Io(_)));
    }
}
