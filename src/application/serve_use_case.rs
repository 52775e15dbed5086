// ============================================================
// Layer 2 — ServeUseCase
// ============================================================
// Startup order matters here:
//
//   Step 1: Load + signature-check the artifact   (Layer 5 - ml)
//   Step 2: Start the async runtime
//   Step 3: Bind the listener                     (Layer 1 - api)
//   Step 4: Serve until Ctrl-C
//
// A model that fails to load aborts before anything is bound, so
// the service never answers requests without a model behind it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{self, AppState};
use crate::ml::inferencer::Inferencer;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    pub model_dir: PathBuf,
    pub host:      String,
    pub port:      u16,
}

pub struct ServeUseCase {
    config: ServeConfig,
}

impl ServeUseCase {
    pub fn new(config: ServeConfig) -> Self {
        Self { config }
    }

    /// Blocks until the server shuts down.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Model first ──────────────────────────────────────────────
        let inferencer = Inferencer::from_artifact(&cfg.model_dir)
            .with_context(|| format!("cannot load model from '{}'", cfg.model_dir.display()))?;
        tracing::info!(
            "Loaded model run {} ({} terms, classes {:?})",
            inferencer.manifest().run_id,
            inferencer.manifest().vocabulary_size,
            inferencer.manifest().classes,
        );
        let state = AppState::new(Arc::new(inferencer));

        // ── Step 2-4: Runtime, bind, serve ───────────────────────────────────
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("cannot start async runtime")?;

        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind((cfg.host.as_str(), cfg.port))
                .await
                .with_context(|| format!("cannot bind {}:{}", cfg.host, cfg.port))?;
            api::serve(listener, state).await
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;

    #[test]
    fn test_missing_model_fails_before_binding() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServeUseCase::new(ServeConfig {
            model_dir: dir.path().join("models").join("latest"),
            host:      "127.0.0.1".to_string(),
            port:      0,
        })
        .execute()
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ArtifactNotFound(_))
        ));
    }
}
