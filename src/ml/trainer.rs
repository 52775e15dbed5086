// ============================================================
// Layer 5 — Trainer
// ============================================================
// Fits the fused pipeline on the TRAIN partition only:
//
//   1. Fit TF-IDF on train texts (vocabulary capped)
//   2. Featurize train texts
//   3. Fit multinomial logistic regression (L-BFGS)
//
// Regularisation follows the inverse-strength convention:
// the L2 penalty is alpha = 1 / C.

use anyhow::{Context, Result};
use linfa::prelude::*;
use linfa_logistic::MultiLogisticRegression;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;
use crate::ml::model::SentimentPipeline;
use crate::ml::vectorizer::TfidfVectorizer;

/// Fixed hyperparameters of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    /// Vocabulary cap of the TF-IDF featurizer
    pub max_features: usize,
    /// Inverse regularisation strength
    pub c:            f64,
    /// Iteration cap of the solver
    pub max_iter:     u64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            max_features: 5000,
            c:            1.0,
            max_iter:     100,
        }
    }
}

impl ClassifierParams {
    /// Short label logged as the `vectorizer` run parameter.
    pub fn vectorizer_tag(&self) -> String {
        format!("tfidf-{}", self.max_features)
    }
}

pub fn fit_pipeline(
    texts:  &[String],
    labels: &[i64],
    params: &ClassifierParams,
) -> Result<SentimentPipeline> {
    if texts.len() != labels.len() {
        anyhow::bail!(
            "texts and labels differ in length ({} vs {})",
            texts.len(),
            labels.len()
        );
    }

    let mut classes: Vec<i64> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();
    if classes.len() < 2 {
        return Err(PipelineError::InsufficientData(format!(
            "training partition has {} class(es); at least 2 are required",
            classes.len()
        ))
        .into());
    }

    let targets = labels
        .iter()
        .map(|&l| usize::try_from(l).with_context(|| format!("category {l} cannot be a class id")))
        .collect::<Result<Array1<usize>>>()?;

    // ── Step 1-2: Featurize ──────────────────────────────────────────────────
    let vectorizer = TfidfVectorizer::fit(texts, params.max_features)?;
    let records    = vectorizer.transform(texts);
    tracing::info!(
        "Featurized {} training texts into {} TF-IDF columns",
        records.nrows(),
        records.ncols()
    );

    // ── Step 3: Fit classifier ───────────────────────────────────────────────
    let dataset    = Dataset::new(records, targets);
    let classifier = MultiLogisticRegression::default()
        .alpha(1.0 / params.c)
        .max_iterations(params.max_iter)
        .fit(&dataset)
        .context("Logistic regression failed to fit")?;

    tracing::info!(
        "Fitted logistic regression (C={}, max_iter={}) on {} classes",
        params.c,
        params.max_iter,
        classes.len()
    );

    Ok(SentimentPipeline::new(vectorizer, classifier, classes))
}
