// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Scores an already-trained artifact, independently of the run
// that produced it:
//
//   Step 1: Reload the cleaned dataset              (Layer 4 - data)
//   Step 2: Re-apply the training split recipe     (Layer 4 - data)
//   Step 3: Load the artifact read-only             (Layer 5 - ml)
//   Step 4: Predict + score the test partition      (Layer 6 - infra)
//   Step 5: Write the metrics report
//
// Step 2 must reproduce training's test partition exactly, so the
// recipe defaults to the one TrainConfig uses.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::CleanedDataset,
    splitter::{stratified_split, SplitRecipe},
};
use crate::domain::traits::Predictor;
use crate::infra::metrics::MetricsReport;
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateConfig {
    pub model_dir: PathBuf,
    pub data_path: PathBuf,
    pub out_path:  PathBuf,
    pub split:     SplitRecipe,
}

pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<MetricsReport> {
        let cfg = &self.config;

        // ── Step 1-2: Same data, same split ──────────────────────────────────
        let dataset = CleanedDataset::read(&cfg.data_path)?;
        let split   = stratified_split(&dataset.labels(), &cfg.split)?;
        let (test_texts, test_labels) = dataset.select(&split.test);

        // ── Step 3: Load model ───────────────────────────────────────────────
        let inferencer = Inferencer::from_artifact(&cfg.model_dir)?;

        // ── Step 4: Score ────────────────────────────────────────────────────
        let predicted = inferencer.predict(&test_texts)?;
        let report    = MetricsReport::score(&test_labels, &predicted)?;

        // ── Step 5: Persist ──────────────────────────────────────────────────
        report.write_json(&cfg.out_path)?;
        tracing::info!("Wrote metrics -> '{}': {}", cfg.out_path.display(), report);

        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{
        tests::ten_row_project, TrainConfig, TrainUseCase, EXPERIMENT,
    };
    use crate::domain::error::PipelineError;
    use crate::infra::tracking::TrackingStore;
    use std::fs;

    #[test]
    fn test_evaluate_fresh_model_has_two_test_rows() {
        let (dir, layout) = ten_row_project();
        TrainUseCase::new(TrainConfig::for_layout(&layout)).execute().unwrap();

        let out = dir.path().join("reports").join("metrics.json");
        let report = EvaluateUseCase::new(EvaluateConfig {
            model_dir: layout.latest_model_dir(),
            data_path: layout.cleaned_data(),
            out_path:  out.clone(),
            split:     SplitRecipe::default(),
        })
        .execute()
        .unwrap();

        assert_eq!(report.n_test, 2);
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert!((0.0..=1.0).contains(&report.f1_macro));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["n_test"], 2);
        assert!(written.get("accuracy").is_some());
        assert!(written.get("f1_macro").is_some());
    }

    #[test]
    fn test_evaluation_reproduces_training_scores() {
        // Same model + same test partition ⇒ the same metrics the
        // training run recorded.
        let (dir, layout) = ten_row_project();
        let trained = TrainUseCase::new(TrainConfig::for_layout(&layout)).execute().unwrap();

        let report = EvaluateUseCase::new(EvaluateConfig {
            model_dir: trained.paths.history.clone(),
            data_path: layout.cleaned_data(),
            out_path:  dir.path().join("metrics.json"),
            split:     SplitRecipe::default(),
        })
        .execute()
        .unwrap();

        let run = TrackingStore::new(layout.tracking_dir())
            .load_run(EXPERIMENT, &trained.run_id)
            .unwrap();
        assert_eq!(report.n_test, trained.metrics.n_test);
        assert!((report.accuracy - run.metrics["accuracy"]).abs() < 1e-12);
        assert!((report.f1_macro - run.metrics["f1_macro"]).abs() < 1e-12);
    }

    #[test]
    fn test_missing_model_is_artifact_not_found() {
        let (dir, layout) = ten_row_project();
        let out = dir.path().join("metrics.json");

        let err = EvaluateUseCase::new(EvaluateConfig {
            model_dir: layout.latest_model_dir(),
            data_path: layout.cleaned_data(),
            out_path:  out.clone(),
            split:     SplitRecipe::default(),
        })
        .execute()
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ArtifactNotFound(_))
        ));
        assert!(!out.exists());
    }
}
