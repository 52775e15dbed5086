// ============================================================
// Layer 3 — Pipeline Error Taxonomy
// ============================================================
// Four families of failure, all hard stops:
//
//   input errors         : SourceNotFound, MissingColumn, InvalidLabel
//   data sufficiency     : InsufficientData
//   artifact errors      : ArtifactNotFound, ShapeMismatch
//   configuration        : UnsupportedTrackingUri
//
// Application code wraps these in anyhow::Error with context;
// callers that need the kind use `downcast_ref::<PipelineError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("column '{column}' missing from {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid label '{value}' at row {row} of {}", .path.display())]
    InvalidLabel { path: PathBuf, row: usize, value: String },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("model artifact not found at {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("artifact shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("unsupported tracking URI '{0}' (expected a file:// URI or a local path)")]
    UnsupportedTrackingUri(String),
}
