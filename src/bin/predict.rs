//! Inference entry point: print the predicted username for one message.
//!
//! The label is the sole line written to stdout, so external callers can
//! consume it directly; diagnostics go to the logger on stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use msg2user::InferencePipeline;

/// Predict which known user wrote a message.
#[derive(Parser, Debug)]
#[command(name = "msg2user-predict", version, about)]
struct Args {
    /// The raw message text to classify.
    message: String,

    /// Directory holding the persisted model artifacts.
    #[arg(long, env = "MODEL_DIR", default_value = "models")]
    model_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let pipeline = InferencePipeline::load(&args.model_dir)?;
    let username = pipeline.predict_one(&args.message)?;
    println!("{username}");

    Ok(())
}
