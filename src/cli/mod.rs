// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, resolves the project layout, and hands off to Layer 2.
// Completion lines are printed here and nowhere else.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::infra::layout::ProjectLayout;
use commands::{Commands, EvaluateArgs, ServeArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "sentiment-pipeline",
    version,
    about = "Ingest, train, evaluate and serve a TF-IDF + logistic regression sentiment model."
)]
pub struct Cli {
    /// Project root; detected from the working directory when absent
    #[arg(long, global = true, env = "SENTIMENT_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let layout = self.layout()?;
        match self.command {
            Commands::Ingest         => run_ingest(&layout),
            Commands::Train(args)    => run_train(&layout, args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Serve(args)    => run_serve(&layout, args),
        }
    }

    fn layout(&self) -> Result<ProjectLayout> {
        match &self.root {
            Some(root) => Ok(ProjectLayout::new(root.clone())),
            None => {
                let cwd = std::env::current_dir().context("cannot read working directory")?;
                Ok(ProjectLayout::detect(&cwd))
            }
        }
    }
}

fn run_ingest(layout: &ProjectLayout) -> Result<()> {
    use crate::application::ingest_use_case::{IngestConfig, IngestUseCase};

    let report = IngestUseCase::new(IngestConfig::for_layout(layout)).execute()?;

    println!("Combined rows:      {}", report.combined);
    println!("After dropping NA:  {}", report.after_missing);
    println!("After dedupe:       {}", report.after_dedupe);
    println!("Saved cleaned data -> {}", report.output.display());
    Ok(())
}

fn run_train(layout: &ProjectLayout, args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::infra::tracking::resolve_tracking_uri;

    let mut config = TrainConfig::for_layout(layout);
    if let Some(uri) = &args.tracking_uri {
        config.tracking_dir = resolve_tracking_uri(uri, layout.root())?;
    }

    let outcome = TrainUseCase::new(config).execute()?;

    println!("Training complete.");
    println!("  run:      {}", outcome.run_id);
    println!("  metrics:  {}", outcome.metrics);
    println!("  history:  {}", outcome.paths.history.display());
    println!("  latest:   {}", outcome.paths.latest.display());
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let out    = args.out.clone();
    let report = EvaluateUseCase::new(args.into()).execute()?;

    println!("{report}");
    println!("Saved metrics -> {}", out.display());
    Ok(())
}

fn run_serve(layout: &ProjectLayout, args: ServeArgs) -> Result<()> {
    use crate::application::serve_use_case::{ServeConfig, ServeUseCase};

    let config = ServeConfig {
        model_dir: args.model_dir.unwrap_or_else(|| layout.latest_model_dir()),
        host:      args.host,
        port:      args.port,
    };
    ServeUseCase::new(config).execute()
}
