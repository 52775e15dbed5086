// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run in order:
//
//   Step 1: Load the cleaned dataset          (Layer 4 - data)
//   Step 2: Stratified 80/20 split            (Layer 4 - data)
//   Step 3: Open a tracked run, log params    (Layer 6 - infra)
//   Step 4: Fit TF-IDF + logistic regression  (Layer 5 - ml)
//   Step 5: Score the test partition          (Layer 6 - infra)
//   Step 6: Publish history + latest artifact (Layer 6 - infra)
//
// A failure after Step 3 marks the run FAILED and is returned
// unchanged; a split failure happens before any run exists.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::CleanedDataset,
    splitter::{stratified_split, SplitRecipe},
};
use crate::infra::{
    artifact::{ArtifactStore, ModelArtifact, PublishedPaths},
    layout::ProjectLayout,
    metrics::MetricsReport,
    tracking::{ActiveRun, TrackingStore},
};
use crate::ml::trainer::{fit_pipeline, ClassifierParams};

pub const EXPERIMENT: &str = "sentiment_analysis";

/// Texts stored with the artifact as its runnable example.
const INPUT_EXAMPLE_LEN: usize = 3;

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:    PathBuf,
    pub models_dir:   PathBuf,
    pub tracking_dir: PathBuf,
    pub experiment:   String,
    pub split:        SplitRecipe,
    pub classifier:   ClassifierParams,
}

impl TrainConfig {
    /// Fixed paths under the project root, fixed hyperparameters.
    pub fn for_layout(layout: &ProjectLayout) -> Self {
        Self {
            data_path:    layout.cleaned_data(),
            models_dir:   layout.models_dir(),
            tracking_dir: layout.tracking_dir(),
            experiment:   EXPERIMENT.to_string(),
            split:        SplitRecipe::default(),
            classifier:   ClassifierParams::default(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub run_id:  String,
    pub metrics: MetricsReport,
    pub paths:   PublishedPaths,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainOutcome> {
        let cfg = &self.config;

        // ── Step 1: Load ─────────────────────────────────────────────────────
        let dataset = CleanedDataset::read(&cfg.data_path)?;

        // ── Step 2: Split ────────────────────────────────────────────────────
        let split = stratified_split(&dataset.labels(), &cfg.split)?;
        tracing::info!("Split: {} train, {} test", split.train.len(), split.test.len());

        // ── Step 3: Tracked run ──────────────────────────────────────────────
        let tracker = TrackingStore::new(&cfg.tracking_dir);
        let mut run = tracker.start_run(&cfg.experiment)?;

        match self.run(&mut run, &dataset, &split.train, &split.test) {
            Ok(outcome) => {
                run.finish()?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(record_err) = run.fail(&err) {
                    tracing::warn!("Could not record run failure: {record_err:#}");
                }
                Err(err)
            }
        }
    }

    fn run(
        &self,
        run:     &mut ActiveRun,
        dataset: &CleanedDataset,
        train:   &[usize],
        test:    &[usize],
    ) -> Result<TrainOutcome> {
        let cfg    = &self.config;
        let params = &cfg.classifier;

        run.log_param("vectorizer", params.vectorizer_tag())?;
        run.log_param("model", "LogisticRegression")?;
        run.log_param("C", params.c)?;
        run.log_param("max_iter", params.max_iter)?;
        run.log_param("test_size", cfg.split.test_fraction)?;
        run.log_param("random_state", cfg.split.seed)?;

        // ── Step 4: Fit on the train partition only ──────────────────────────
        let (train_texts, train_labels) = dataset.select(train);
        let pipeline = fit_pipeline(&train_texts, &train_labels, params)?;

        // ── Step 5: Score on the test partition ──────────────────────────────
        let (test_texts, test_labels) = dataset.select(test);
        let predicted = pipeline.predict_texts(&test_texts);
        let metrics   = MetricsReport::score(&test_labels, &predicted)?;

        run.log_metric("accuracy", metrics.accuracy)?;
        run.log_metric("f1_macro", metrics.f1_macro)?;
        run.log_metric("n_test", metrics.n_test as f64)?;

        // ── Step 6: Publish ──────────────────────────────────────────────────
        let example: Vec<String> = train_texts.iter().take(INPUT_EXAMPLE_LEN).cloned().collect();
        let artifact = ModelArtifact::new(run.run_id(), pipeline, params.clone(), example);
        let paths    = ArtifactStore::new(&cfg.models_dir).publish(&artifact)?;
        run.set_artifact_dir(&paths.history)?;

        tracing::info!(
            "[run={}] accuracy={:.4}, f1_macro={:.4}",
            run.run_id(),
            metrics.accuracy,
            metrics.f1_macro
        );

        Ok(TrainOutcome {
            run_id: run.run_id().to_string(),
            metrics,
            paths,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::error::PipelineError;
    use crate::domain::record::CleanRecord;
    use crate::infra::artifact::MANIFEST_FILE;
    use crate::infra::tracking::RunStatus;

    pub(crate) const TEXTS: [&str; 10] = [
        "good film", "bad film", "average", "excellent", "awful",
        "great acting", "poor script", "loved it", "hated it", "meh",
    ];
    pub(crate) const LABELS: [i64; 10] = [1, 0, 1, 1, 0, 1, 0, 1, 0, 1];

    /// A project root holding the ten-row cleaned dataset.
    pub(crate) fn ten_row_project() -> (tempfile::TempDir, ProjectLayout) {
        let dir    = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let records = TEXTS
            .iter()
            .zip(LABELS)
            .map(|(t, l)| CleanRecord::new(*t, l))
            .collect();
        CleanedDataset::new(records).write(&layout.cleaned_data()).unwrap();
        (dir, layout)
    }

    #[test]
    fn test_train_writes_models_latest() {
        let (_dir, layout) = ten_row_project();

        let outcome = TrainUseCase::new(TrainConfig::for_layout(&layout)).execute().unwrap();

        let latest = layout.latest_model_dir();
        assert!(latest.is_dir(), "models/latest directory not created");
        assert!(latest.join(MANIFEST_FILE).is_file(), "manifest missing in models/latest");
        assert_eq!(outcome.paths.latest, latest);
        assert!(outcome.paths.history.join(MANIFEST_FILE).is_file());

        assert!((0.0..=1.0).contains(&outcome.metrics.accuracy));
        assert!((0.0..=1.0).contains(&outcome.metrics.f1_macro));
        assert_eq!(outcome.metrics.n_test, 2);
    }

    #[test]
    fn test_run_is_tracked_with_params_and_metrics() {
        let (_dir, layout) = ten_row_project();
        let outcome = TrainUseCase::new(TrainConfig::for_layout(&layout)).execute().unwrap();

        let record = TrackingStore::new(layout.tracking_dir())
            .load_run(EXPERIMENT, &outcome.run_id)
            .unwrap();
        assert_eq!(record.status, RunStatus::Finished);
        assert_eq!(record.params["vectorizer"], "tfidf-5000");
        assert_eq!(record.params["model"], "LogisticRegression");
        assert_eq!(record.params["C"], 1.0);
        assert_eq!(record.params["max_iter"], 100);
        assert!((record.metrics["accuracy"] - outcome.metrics.accuracy).abs() < 1e-12);
        assert!((record.metrics["f1_macro"] - outcome.metrics.f1_macro).abs() < 1e-12);
        assert_eq!(record.artifact_dir.as_deref(), Some(outcome.paths.history.as_path()));
    }

    #[test]
    fn test_rerun_replaces_latest() {
        let (_dir, layout) = ten_row_project();
        let use_case = TrainUseCase::new(TrainConfig::for_layout(&layout));

        let first  = use_case.execute().unwrap();
        let second = use_case.execute().unwrap();
        assert_ne!(first.run_id, second.run_id);

        let latest = ModelArtifact::load(&layout.latest_model_dir()).unwrap();
        assert_eq!(latest.manifest.run_id, second.run_id);
        assert!(first.paths.history.is_dir());
    }

    #[test]
    fn test_singleton_class_fails_without_artifacts() {
        let dir    = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let records = vec![
            CleanRecord::new("good", 1),
            CleanRecord::new("nice", 1),
            CleanRecord::new("great", 1),
            CleanRecord::new("fine", 1),
            CleanRecord::new("bad", 0),
        ];
        CleanedDataset::new(records).write(&layout.cleaned_data()).unwrap();

        let err = TrainUseCase::new(TrainConfig::for_layout(&layout)).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InsufficientData(_))
        ));
        assert!(!layout.latest_model_dir().exists());
    }

    #[test]
    fn test_missing_dataset_fails() {
        let dir    = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());
        let err = TrainUseCase::new(TrainConfig::for_layout(&layout)).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::SourceNotFound(_))
        ));
    }
}
