//! Training entry point: build the model from a labeled CSV corpus and
//! persist the artifacts.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use msg2user::classifier::{DEFAULT_SEED, DEFAULT_TREES};
use msg2user::training::{self, DEFAULT_TEST_RATIO, TrainingConfig};

/// Train the username prediction model from a labeled CSV corpus.
#[derive(Parser, Debug)]
#[command(name = "msg2user-train", version, about)]
struct Args {
    /// Path to the corpus CSV; must contain `text` and `username` columns.
    #[arg(long, env = "DATASET")]
    dataset: PathBuf,

    /// Directory where the model artifacts are written.
    #[arg(long, env = "MODEL_DIR", default_value = "models")]
    model_dir: PathBuf,

    /// Number of trees in the ensemble.
    #[arg(long, default_value_t = DEFAULT_TREES)]
    trees: usize,

    /// Seed for the train/test split and bootstrap sampling.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Proportion of the corpus held out for evaluation.
    #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
    test_ratio: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = TrainingConfig::new(args.dataset, args.model_dir)
        .with_trees(args.trees)
        .with_seed(args.seed)
        .with_test_ratio(args.test_ratio);
    let outcome = training::run(&config)?;

    println!("First rows of the corpus:");
    for example in &outcome.head {
        println!("  {:<16} {}", example.username, example.text);
    }
    println!("Columns: {}", outcome.columns.join(", "));
    println!(
        "Rows: {} ({} skipped without a username, {} substituted with empty documents)",
        outcome.rows, outcome.skipped_unlabeled, outcome.substituted_rows
    );
    println!(
        "Vocabulary: {} tokens; split: {} train / {} test",
        outcome.vocabulary_size, outcome.train_rows, outcome.test_rows
    );
    println!();
    println!("Accuracy: {:.4}", outcome.evaluation.accuracy);
    println!("{}", outcome.evaluation);
    println!(
        "Model and vectorizer saved to {} and {}.",
        outcome.classifier_path.display(),
        outcome.vectorizer_path.display()
    );
    println!();
    println!("Smoke test:");
    println!(
        "  sample message -> {}",
        outcome.smoke_prediction.as_deref().unwrap_or("(failed)")
    );
    println!(
        "  blank message  -> {}",
        outcome
            .smoke_blank_prediction
            .as_deref()
            .unwrap_or("(failed)")
    );

    Ok(())
}
