// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case orchestrates the lower layers to accomplish one
// command. Rules for this layer:
//   - No featurization or solver code here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Data flows one way between use cases, through files:
//
//   ingest ──► cleaned_data.csv ──► train ──► models/latest ──► evaluate / serve

// Raw sources → cleaned dataset
pub mod ingest_use_case;

// Cleaned dataset → tracked run + model artifacts
pub mod train_use_case;

// Model artifact + cleaned dataset → metrics report
pub mod evaluate_use_case;

// Model artifact → HTTP prediction service
pub mod serve_use_case;
