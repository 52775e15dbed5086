// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, not the
// concrete CSV loader or the linfa-backed model:
//   - CsvSource implements RecordSource
//   - Inferencer and SentimentPipeline implement Predictor
//
// The HTTP layer holds an `Arc<dyn Predictor>`, which is also what
// lets its tests swap in a counting stub.

use anyhow::Result;
use crate::domain::record::RawRecord;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can produce raw records from one source table.
pub trait RecordSource {
    /// Human-readable name for logging (usually the file name).
    fn name(&self) -> String;

    /// Load every row of the source in file order.
    fn load_all(&self) -> Result<Vec<RawRecord>>;
}

// ─── Predictor ────────────────────────────────────────────────────────────────
/// Any component that maps raw texts to integer categories.
///
/// The output has the same length and order as the input.
pub trait Predictor: Send + Sync {
    fn predict(&self, texts: &[String]) -> Result<Vec<i64>>;
}
