// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several use cases:
//
//   layout.rs   : Project root detection and the fixed file
//                 locations under it (raw data, cleaned data,
//                 models, tracking store)
//
//   artifact.rs : Saving and loading model artifacts: manifest,
//                 serialized pipeline, input example. Writes the
//                 immutable history entry and replaces `latest`.
//
//   metrics.rs  : Accuracy / macro-F1 scoring and the metrics
//                 JSON report
//
//   tracking.rs : Run tracking: one directory per run holding
//                 params, metrics, status and artifact location

/// Project root and fixed paths
pub mod layout;

/// Model artifact persistence
pub mod artifact;

/// Scoring and metrics report
pub mod metrics;

/// Experiment run tracking
pub mod tracking;
