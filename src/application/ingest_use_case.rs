// ============================================================
// Layer 2 — IngestUseCase
// ============================================================
// Orchestrates ingestion in order:
//
//   Step 1: Load every source, in configured order   (Layer 4 - data)
//   Step 2: Concatenate, source A fully before B
//   Step 3: Drop incomplete rows, then duplicates    (Layer 4 - data)
//   Step 4: Write the cleaned dataset                (Layer 4 - data)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::CleanedDataset,
    loader::{CsvSource, SourceSpec},
    preprocessor::Cleaner,
};
use crate::domain::traits::RecordSource;
use crate::infra::layout::ProjectLayout;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub sources: Vec<SourceSpec>,
    pub output:  PathBuf,
}

impl IngestConfig {
    /// The two raw exports under `data/raw`, written to
    /// `data/processed/cleaned_data.csv`.
    pub fn for_layout(layout: &ProjectLayout) -> Self {
        let raw = layout.raw_dir();
        Self {
            sources: vec![
                SourceSpec::new(raw.join("Reddit_Data.csv"), "clean_comment", "category"),
                SourceSpec::new(raw.join("Twitter_Data.csv"), "clean_text", "category"),
            ],
            output: layout.cleaned_data(),
        }
    }
}

/// Row counts after each stage, and where the result went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub combined:      usize,
    pub after_missing: usize,
    pub after_dedupe:  usize,
    pub output:        PathBuf,
}

pub struct IngestUseCase {
    config: IngestConfig,
}

impl IngestUseCase {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<IngestReport> {
        let cfg = &self.config;

        // ── Step 1-2: Load and concatenate ───────────────────────────────────
        let mut combined = Vec::new();
        for spec in &cfg.sources {
            let source = CsvSource::new(spec.clone());
            let rows   = source
                .load_all()
                .with_context(|| format!("Cannot ingest source '{}'", source.name()))?;
            tracing::info!("Loaded {} rows from {}", rows.len(), source.name());
            combined.extend(rows);
        }

        // ── Step 3: Clean ────────────────────────────────────────────────────
        let outcome = Cleaner::new().clean(combined);

        // ── Step 4: Write ────────────────────────────────────────────────────
        CleanedDataset::new(outcome.records).write(&cfg.output)?;
        tracing::info!("Cleaned data written to '{}'", cfg.output.display());

        Ok(IngestReport {
            combined:      outcome.combined,
            after_missing: outcome.after_missing,
            after_dedupe:  outcome.after_dedupe,
            output:        cfg.output.clone(),
        })
    }
}
