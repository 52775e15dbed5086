// ============================================================
// Layer 6 — Run Tracking
// ============================================================
// Records each training run so runs can be compared later.
//
// Store layout (one JSON document per run, rewritten on every
// change so a crashed run still leaves its params behind):
//
//   <store>/
//     sentiment_analysis/          ← experiment
//       <run_id>/run.json          ← params, metrics, status, times
//
// The store location comes from a tracking URI: `file://<path>`
// or a plain path. Remote schemes are not supported.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use crate::domain::error::PipelineError;

pub const RUN_FILE: &str = "run.json";

/// Resolve a tracking URI to a local directory.
/// Relative paths are resolved against `base`.
pub fn resolve_tracking_uri(uri: &str, base: &Path) -> Result<PathBuf, PipelineError> {
    let path = match uri.strip_prefix("file://") {
        Some(rest) => rest,
        None if uri.contains("://") => {
            return Err(PipelineError::UnsupportedTrackingUri(uri.to_string()));
        }
        None => uri,
    };
    if path.is_empty() {
        return Err(PipelineError::UnsupportedTrackingUri(uri.to_string()));
    }

    let path = PathBuf::from(path);
    Ok(if path.is_absolute() { path } else { base.join(path) })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id:       String,
    pub experiment:   String,
    pub status:       RunStatus,
    pub start_time:   DateTime<Utc>,
    pub end_time:     Option<DateTime<Utc>>,
    pub params:       BTreeMap<String, Value>,
    pub metrics:      BTreeMap<String, f64>,
    pub artifact_dir: Option<PathBuf>,
    pub error:        Option<String>,
}

pub struct TrackingStore {
    root: PathBuf,
}

impl TrackingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a new run with a fresh UUID under `experiment`.
    pub fn start_run(&self, experiment: &str) -> Result<ActiveRun> {
        let run_id = Uuid::new_v4().simple().to_string();
        let dir    = self.root.join(experiment).join(&run_id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create run dir '{}'", dir.display()))?;

        let run = ActiveRun {
            dir,
            record: RunRecord {
                run_id,
                experiment:   experiment.to_string(),
                status:       RunStatus::Running,
                start_time:   Utc::now(),
                end_time:     None,
                params:       BTreeMap::new(),
                metrics:      BTreeMap::new(),
                artifact_dir: None,
                error:        None,
            },
        };
        run.flush()?;

        tracing::info!("Started run {} in experiment '{}'", run.run_id(), experiment);
        Ok(run)
    }

    /// Read back a recorded run.
    pub fn load_run(&self, experiment: &str, run_id: &str) -> Result<RunRecord> {
        let path = self.root.join(experiment).join(run_id).join(RUN_FILE);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read run '{}'", path.display()))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// A run in progress. Ends with `finish` or `fail`.
pub struct ActiveRun {
    dir:    PathBuf,
    record: RunRecord,
}

impl ActiveRun {
    pub fn run_id(&self) -> &str {
        &self.record.run_id
    }

    pub fn log_param(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.record.params.insert(key.to_string(), value.into());
        self.flush()
    }

    pub fn log_metric(&mut self, key: &str, value: f64) -> Result<()> {
        self.record.metrics.insert(key.to_string(), value);
        self.flush()
    }

    pub fn set_artifact_dir(&mut self, dir: &Path) -> Result<()> {
        self.record.artifact_dir = Some(dir.to_path_buf());
        self.flush()
    }

    pub fn finish(mut self) -> Result<RunRecord> {
        self.close(RunStatus::Finished, None)?;
        Ok(self.record)
    }

    pub fn fail(mut self, error: &anyhow::Error) -> Result<RunRecord> {
        self.close(RunStatus::Failed, Some(format!("{error:#}")))?;
        tracing::warn!("Run {} failed: {:#}", self.record.run_id, error);
        Ok(self.record)
    }

    fn close(&mut self, status: RunStatus, error: Option<String>) -> Result<()> {
        self.record.status   = status;
        self.record.end_time = Some(Utc::now());
        self.record.error    = error;
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let path = self.dir.join(RUN_FILE);
        fs::write(&path, serde_json::to_string_pretty(&self.record)?)
            .with_context(|| format!("Cannot write run record '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_file_uri_and_plain_path() {
        let base = Path::new("/project");
        assert_eq!(
            resolve_tracking_uri("file:///tmp/mlruns", base).unwrap(),
            PathBuf::from("/tmp/mlruns")
        );
        assert_eq!(
            resolve_tracking_uri("mlruns", base).unwrap(),
            PathBuf::from("/project/mlruns")
        );
    }

    #[test]
    fn test_remote_uri_rejected() {
        let err = resolve_tracking_uri("http://localhost:5000", Path::new("/")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedTrackingUri(_)));
    }

    #[test]
    fn test_run_lifecycle_is_recorded() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TrackingStore::new(dir.path());

        let mut run = store.start_run("sentiment_analysis").unwrap();
        let run_id  = run.run_id().to_string();
        run.log_param("C", 1.0).unwrap();
        run.log_param("model", "LogisticRegression").unwrap();
        run.log_metric("accuracy", 0.75).unwrap();

        let during = store.load_run("sentiment_analysis", &run_id).unwrap();
        assert_eq!(during.status, RunStatus::Running);

        let done = run.finish().unwrap();
        assert_eq!(done.status, RunStatus::Finished);

        let back = store.load_run("sentiment_analysis", &run_id).unwrap();
        assert_eq!(back.status, RunStatus::Finished);
        assert_eq!(back.params["model"], "LogisticRegression");
        assert_eq!(back.metrics["accuracy"], 0.75);
        assert!(back.end_time.is_some());
    }

    #[test]
    fn test_failed_run_keeps_error() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TrackingStore::new(dir.path());
        let run   = store.start_run("exp").unwrap();
        let id    = run.run_id().to_string();

        run.fail(&anyhow::anyhow!("boom")).unwrap();

        let back = store.load_run("exp", &id).unwrap();
        assert_eq!(back.status, RunStatus::Failed);
        assert_eq!(back.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_run_ids_are_unique() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TrackingStore::new(dir.path());
        let a = store.start_run("exp").unwrap();
        let b = store.start_run("exp").unwrap();
        assert_ne!(a.run_id(), b.run_id());
    }
}
