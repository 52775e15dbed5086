// ============================================================
// Layer 6 — Model Artifact Store
// ============================================================
// A model artifact is a directory:
//
//   manifest.json       ← flavor, signature, run id, params
//   model.json          ← serialized SentimentPipeline
//   input_example.json  ← a few raw texts the model is known to run on
//
// Two copies are written per training run:
//
//   models/
//     history/<run_id>/   ← immutable, never overwritten
//     latest/             ← replaced wholesale on every run
//
// `latest` is never updated in place: the new copy is written to
// a staging directory beside it, the old `latest` is removed, and
// the staging directory is renamed into place.
//
// Loading checks the manifest signature before touching the model
// file. Only the fused raw-text pipeline is accepted; an artifact
// that expects pre-vectorized input fails here, at load time.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::error::PipelineError;
use crate::ml::model::SentimentPipeline;
use crate::ml::trainer::ClassifierParams;

pub const MANIFEST_FILE:      &str = "manifest.json";
pub const MODEL_FILE:         &str = "model.json";
pub const INPUT_EXAMPLE_FILE: &str = "input_example.json";

/// The only flavor this crate writes and serves.
pub const PIPELINE_FLAVOR: &str = "sentiment-pipeline";
pub const FORMAT_VERSION:  u32  = 1;

/// One named, typed column of a model signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ColumnSpec {
    fn new(name: &str, kind: &str) -> Self {
        Self { name: name.to_string(), kind: kind.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub inputs:  Vec<ColumnSpec>,
    pub outputs: Vec<ColumnSpec>,
}

impl Signature {
    /// Raw text in, integer category out.
    pub fn text_to_category() -> Self {
        Self {
            inputs:  vec![ColumnSpec::new("text", "string")],
            outputs: vec![ColumnSpec::new("category", "long")],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format_version:     u32,
    pub flavor:             String,
    pub run_id:             String,
    pub created_at:         DateTime<Utc>,
    pub signature:          Signature,
    pub model_file:         String,
    pub input_example_file: String,
    pub classes:            Vec<i64>,
    pub vocabulary_size:    usize,
    pub params:             ClassifierParams,
}

/// A fitted pipeline together with everything needed to reload it.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub manifest:      ArtifactManifest,
    pub pipeline:      SentimentPipeline,
    pub input_example: Vec<String>,
}

impl ModelArtifact {
    pub fn new(
        run_id:        impl Into<String>,
        pipeline:      SentimentPipeline,
        params:        ClassifierParams,
        input_example: Vec<String>,
    ) -> Self {
        let manifest = ArtifactManifest {
            format_version:     FORMAT_VERSION,
            flavor:             PIPELINE_FLAVOR.to_string(),
            run_id:             run_id.into(),
            created_at:         Utc::now(),
            signature:          Signature::text_to_category(),
            model_file:         MODEL_FILE.to_string(),
            input_example_file: INPUT_EXAMPLE_FILE.to_string(),
            classes:            pipeline.classes().to_vec(),
            vocabulary_size:    pipeline.vectorizer().vocabulary_size(),
            params,
        };
        Self { manifest, pipeline, input_example }
    }

    /// Write the artifact into `dir`, creating it as needed.
    /// The input example is run through the pipeline first so a
    /// saved artifact is always invocable.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let predicted = self.pipeline.predict_texts(&self.input_example);
        if predicted.len() != self.input_example.len() {
            anyhow::bail!(
                "input example produced {} predictions for {} texts",
                predicted.len(),
                self.input_example.len()
            );
        }

        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create artifact dir '{}'", dir.display()))?;

        write_json(&dir.join(MANIFEST_FILE), &self.manifest)?;
        write_json(&dir.join(&self.manifest.model_file), &self.pipeline)?;
        write_json(&dir.join(&self.manifest.input_example_file), &self.input_example)?;

        tracing::debug!("Wrote artifact for run {} to '{}'", self.manifest.run_id, dir.display());
        Ok(())
    }

    /// Load an artifact directory, rejecting anything that is not a
    /// raw-text pipeline before the model file is read.
    pub fn load(dir: &Path) -> Result<Self> {
        let manifest_path = dir.join(MANIFEST_FILE);
        if !dir.is_dir() || !manifest_path.is_file() {
            return Err(PipelineError::ArtifactNotFound(dir.to_path_buf()).into());
        }

        let raw: serde_json::Value = read_json(&manifest_path)?;
        check_signature(&raw)?;
        let manifest: ArtifactManifest = serde_json::from_value(raw)
            .with_context(|| format!("Malformed manifest '{}'", manifest_path.display()))?;

        let model_path = dir.join(&manifest.model_file);
        if !model_path.is_file() {
            return Err(PipelineError::ArtifactNotFound(model_path).into());
        }
        let pipeline: SentimentPipeline = read_json(&model_path)?;

        let example_path  = dir.join(&manifest.input_example_file);
        let input_example = if example_path.is_file() {
            read_json(&example_path)?
        } else {
            Vec::new()
        };

        tracing::info!(
            "Loaded model artifact (run {}, {} classes) from '{}'",
            manifest.run_id,
            manifest.classes.len(),
            dir.display()
        );
        Ok(Self { manifest, pipeline, input_example })
    }
}

/// Fail fast on artifacts whose input is not a single raw-text column.
fn check_signature(manifest: &serde_json::Value) -> Result<(), PipelineError> {
    let flavor = manifest.get("flavor").and_then(|f| f.as_str()).unwrap_or("<none>");
    if flavor != PIPELINE_FLAVOR {
        return Err(PipelineError::ShapeMismatch(format!(
            "artifact flavor '{flavor}' does not accept raw text; expected '{PIPELINE_FLAVOR}'"
        )));
    }

    let inputs: Option<Vec<ColumnSpec>> = manifest
        .get("signature")
        .and_then(|s| s.get("inputs"))
        .and_then(|i| serde_json::from_value(i.clone()).ok());

    match inputs.as_deref() {
        Some([column]) if column.kind == "string" => Ok(()),
        Some(other) => Err(PipelineError::ShapeMismatch(format!(
            "artifact expects inputs {:?}; expected one string column",
            other.iter().map(|c| format!("{}:{}", c.name, c.kind)).collect::<Vec<_>>()
        ))),
        None => Err(PipelineError::ShapeMismatch(
            "artifact manifest declares no input signature".to_string(),
        )),
    }
}

/// Where a published artifact landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPaths {
    pub history: PathBuf,
    pub latest:  PathBuf,
}

/// Owns the `models/` directory.
pub struct ArtifactStore {
    models_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self { models_dir: models_dir.into() }
    }

    pub fn history_dir(&self, run_id: &str) -> PathBuf {
        self.models_dir.join("history").join(run_id)
    }

    pub fn latest_dir(&self) -> PathBuf {
        self.models_dir.join("latest")
    }

    /// Write the immutable history entry, then replace `latest`.
    pub fn publish(&self, artifact: &ModelArtifact) -> Result<PublishedPaths> {
        let run_id  = artifact.manifest.run_id.as_str();
        let history = self.history_dir(run_id);
        if history.exists() {
            anyhow::bail!("history entry '{}' already exists", history.display());
        }
        artifact.write_to(&history)?;

        let latest  = self.latest_dir();
        let staging = self.models_dir.join(format!(".latest-staging-{run_id}"));
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .with_context(|| format!("Cannot clear '{}'", staging.display()))?;
        }
        artifact.write_to(&staging)?;

        if latest.exists() {
            fs::remove_dir_all(&latest)
                .with_context(|| format!("Cannot remove old '{}'", latest.display()))?;
        }
        fs::rename(&staging, &latest).with_context(|| {
            format!("Cannot move '{}' to '{}'", staging.display(), latest.display())
        })?;

        tracing::info!(
            "Saved model: history='{}', latest='{}'",
            history.display(),
            latest.display()
        );
        Ok(PublishedPaths { history, latest })
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Cannot parse '{}'", path.display()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::trainer::fit_pipeline;

    fn tiny_artifact(run_id: &str) -> ModelArtifact {
        let texts: Vec<String> = ["good film", "great film", "bad film", "awful film"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let params   = ClassifierParams::default();
        let pipeline = fit_pipeline(&texts, &[1, 1, 0, 0], &params).unwrap();
        ModelArtifact::new(run_id, pipeline, params, texts[..2].to_vec())
    }

    fn load_err(dir: &Path) -> PipelineError {
        let err = ModelArtifact::load(dir).unwrap_err();
        match err.downcast::<PipelineError>() {
            Ok(e) => e,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_write_then_load_predicts_the_same() {
        let dir      = tempfile::tempdir().unwrap();
        let artifact = tiny_artifact("run-a");
        artifact.write_to(dir.path()).unwrap();

        assert!(dir.path().join(MANIFEST_FILE).is_file());
        assert!(dir.path().join(MODEL_FILE).is_file());
        assert!(dir.path().join(INPUT_EXAMPLE_FILE).is_file());

        let loaded = ModelArtifact::load(dir.path()).unwrap();
        assert_eq!(loaded.manifest.run_id, "run-a");
        assert_eq!(loaded.manifest.signature, Signature::text_to_category());
        assert_eq!(loaded.input_example, artifact.input_example);

        let probe: Vec<String> = vec!["good".into(), "awful".into(), "film".into()];
        assert_eq!(
            loaded.pipeline.predict_texts(&probe),
            artifact.pipeline.predict_texts(&probe)
        );
    }

    #[test]
    fn test_publish_replaces_latest_and_keeps_history() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let first  = store.publish(&tiny_artifact("run-1")).unwrap();
        let second = store.publish(&tiny_artifact("run-2")).unwrap();

        assert_eq!(first.latest, second.latest);
        assert!(first.history.is_dir());
        assert!(second.history.is_dir());

        let latest = ModelArtifact::load(&second.latest).unwrap();
        assert_eq!(latest.manifest.run_id, "run-2");

        // No staging directories left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".latest-staging"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_history_entry_is_never_overwritten() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.publish(&tiny_artifact("same")).unwrap();
        assert!(store.publish(&tiny_artifact("same")).is_err());
    }

    #[test]
    fn test_missing_dir_is_artifact_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_err(&dir.path().join("nope")),
            PipelineError::ArtifactNotFound(_)
        ));
    }

    #[test]
    fn test_classifier_only_artifact_is_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = serde_json::json!({
            "flavor": "sklearn",
            "signature": { "inputs": [{ "name": "features", "type": "tensor" }] }
        });
        fs::write(dir.path().join(MANIFEST_FILE), manifest.to_string()).unwrap();

        assert!(matches!(load_err(dir.path()), PipelineError::ShapeMismatch(_)));
    }

    #[test]
    fn test_vector_input_signature_is_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = serde_json::json!({
            "flavor": PIPELINE_FLAVOR,
            "signature": { "inputs": [{ "name": "features", "type": "double" }, { "name": "more", "type": "double" }] }
        });
        fs::write(dir.path().join(MANIFEST_FILE), manifest.to_string()).unwrap();

        assert!(matches!(load_err(dir.path()), PipelineError::ShapeMismatch(_)));
    }
}
