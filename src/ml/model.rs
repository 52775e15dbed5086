// ============================================================
// Layer 5 — Sentiment Pipeline Model
// ============================================================
// One object that owns featurization AND classification, so the
// persisted artifact always accepts raw text:
//
//   texts ──► TfidfVectorizer ──► MultiFittedLogisticRegression ──► categories
//
// The classifier works on usize class ids; categories are the
// non-negative i64 labels of the cleaned dataset.

use anyhow::Result;
use linfa::traits::Predict;
use linfa_logistic::MultiFittedLogisticRegression;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::domain::traits::Predictor;
use crate::ml::vectorizer::TfidfVectorizer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentPipeline {
    vectorizer: TfidfVectorizer,
    classifier: MultiFittedLogisticRegression<f64, usize>,
    /// Categories seen during fitting, ascending
    classes:    Vec<i64>,
}

impl SentimentPipeline {
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifier: MultiFittedLogisticRegression<f64, usize>,
        classes:    Vec<i64>,
    ) -> Self {
        Self { vectorizer, classifier, classes }
    }

    /// One category per text, in input order.
    pub fn predict_texts(&self, texts: &[String]) -> Vec<i64> {
        if texts.is_empty() {
            return Vec::new();
        }
        let features = self.vectorizer.transform(texts);
        let predicted: Array1<usize> = self.classifier.predict(&features);
        predicted.iter().map(|&c| c as i64).collect()
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }
}

impl Predictor for SentimentPipeline {
    fn predict(&self, texts: &[String]) -> Result<Vec<i64>> {
        Ok(self.predict_texts(texts))
    }
}
