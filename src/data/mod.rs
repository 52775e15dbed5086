// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw CSV files and the (texts, labels)
// partitions the model layer consumes.
//
//   Reddit_Data.csv   Twitter_Data.csv
//          │                 │
//          ▼                 ▼
//   CsvSource         → maps per-source columns to RawRecord
//          │
//          ▼
//   Cleaner           → drops incomplete rows, then duplicates
//          │
//          ▼
//   CleanedDataset    → cleaned_data.csv (clean_comment,category)
//          │
//          ▼
//   stratified_split  → seeded 80/20 train/test indices
//
// Each module is responsible for exactly one step.

/// Loads one raw source table and renames its columns
pub mod loader;

/// Filters incomplete and duplicate rows
pub mod preprocessor;

/// Reads and writes the cleaned dataset file
pub mod dataset;

/// Deterministic stratified train/test splitting
pub mod splitter;
