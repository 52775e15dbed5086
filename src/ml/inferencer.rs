// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Read-only handle over a persisted pipeline. Built once (at
// evaluation start or server startup) and never mutated.

use anyhow::Result;
use std::path::Path;

use crate::domain::traits::Predictor;
use crate::infra::artifact::{ArtifactManifest, ModelArtifact};
use crate::ml::model::SentimentPipeline;

pub struct Inferencer {
    pipeline: SentimentPipeline,
    manifest: ArtifactManifest,
}

impl Inferencer {
    /// Load and signature-check the artifact in `dir`.
    pub fn from_artifact(dir: &Path) -> Result<Self> {
        let artifact = ModelArtifact::load(dir)?;
        Ok(Self {
            pipeline: artifact.pipeline,
            manifest: artifact.manifest,
        })
    }

    pub fn manifest(&self) -> &ArtifactManifest {
        &self.manifest
    }
}

impl Predictor for Inferencer {
    fn predict(&self, texts: &[String]) -> Result<Vec<i64>> {
        let predictions = self.pipeline.predict_texts(texts);
        tracing::debug!("Predicted {} texts", predictions.len());
        Ok(predictions)
    }
}
