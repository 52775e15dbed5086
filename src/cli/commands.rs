// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and their flags:
//
//   ingest    raw CSVs → data/processed/cleaned_data.csv
//   train     cleaned data → tracked run + models/{history,latest}
//   evaluate  model dir + cleaned data → metrics JSON
//   serve     model dir → HTTP prediction service
//
// Ingest and train take their paths from the project layout;
// only the tracking store location is configurable.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::evaluate_use_case::EvaluateConfig;
use crate::application::serve_use_case::{DEFAULT_HOST, DEFAULT_PORT};
use crate::data::splitter::SplitRecipe;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge and clean the raw Reddit and Twitter exports
    Ingest,

    /// Train the TF-IDF + logistic regression model and publish it
    Train(TrainArgs),

    /// Score a saved model on the held-out partition
    Evaluate(EvaluateArgs),

    /// Serve predictions over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Run tracking store: a `file://` URI or a plain directory.
    /// Defaults to `<root>/mlruns`.
    #[arg(long, env = "MLFLOW_TRACKING_URI")]
    pub tracking_uri: Option<String>,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory holding a saved model (e.g. models/latest)
    #[arg(long)]
    pub model_dir: PathBuf,

    /// Cleaned dataset CSV
    #[arg(long)]
    pub data: PathBuf,

    /// Where to write the metrics report
    #[arg(long, default_value = "metrics.json")]
    pub out: PathBuf,
}

/// The split recipe is not a flag: evaluation has to reuse the one
/// training used.
impl From<EvaluateArgs> for EvaluateConfig {
    fn from(a: EvaluateArgs) -> Self {
        EvaluateConfig {
            model_dir: a.model_dir,
            data_path: a.data,
            out_path:  a.out,
            split:     SplitRecipe::default(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Model to serve; defaults to `<root>/models/latest`
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}
