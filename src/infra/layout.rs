// ============================================================
// Layer 6 — Project Layout
// ============================================================
// Every command that takes no path arguments resolves its files
// relative to the project root:
//
//   <root>/
//     data/raw/Reddit_Data.csv
//     data/raw/Twitter_Data.csv
//     data/processed/cleaned_data.csv
//     models/history/<run_id>/
//     models/latest/
//     mlruns/

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The nearest ancestor of `start` (inclusive) holding a `data/`
    /// directory or a `Cargo.toml`; `start` itself otherwise.
    pub fn detect(start: &Path) -> Self {
        let root = start
            .ancestors()
            .find(|dir| dir.join("data").is_dir() || dir.join("Cargo.toml").is_file())
            .unwrap_or(start);
        tracing::debug!("Project root: '{}'", root.display());
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("data").join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("data").join("processed")
    }

    pub fn cleaned_data(&self) -> PathBuf {
        self.processed_dir().join("cleaned_data.csv")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    pub fn latest_model_dir(&self) -> PathBuf {
        self.models_dir().join("latest")
    }

    pub fn tracking_dir(&self) -> PathBuf {
        self.root.join("mlruns")
    }
}
