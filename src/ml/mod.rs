// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All linfa / ndarray code lives here. No other layer touches
// feature matrices directly.
//
//   vectorizer.rs : TF-IDF featurizer (fit on train texts only)
//
//   model.rs      : SentimentPipeline: the fitted vectorizer and
//                   the multinomial logistic regression fused
//                   into one object that accepts raw text
//
//   trainer.rs    : fits a SentimentPipeline from texts + labels
//
//   inferencer.rs : loads a persisted pipeline for prediction

/// TF-IDF term weighting
pub mod vectorizer;

/// Fused vectorizer + classifier
pub mod model;

/// Fitting the fused pipeline
pub mod trainer;

/// Loading a persisted pipeline for prediction
pub mod inferencer;
