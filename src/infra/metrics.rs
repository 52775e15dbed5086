// ============================================================
// Layer 6 — Metrics Report
// ============================================================
// Scores predictions against the held-out partition and writes
// the small JSON report evaluation produces:
//
//   {
//     "accuracy": 0.5,
//     "f1_macro": 0.3333333333333333,
//     "n_test": 2
//   }
//
// Macro F1 is the unweighted mean of per-class F1 over every
// label that appears in either the truth or the predictions.
// A class with no predicted or no true members scores 0.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub accuracy: f64,
    pub f1_macro: f64,
    pub n_test:   usize,
}

impl MetricsReport {
    /// Score `predicted` against `truth`.
    pub fn score(truth: &[i64], predicted: &[i64]) -> Result<Self> {
        if truth.len() != predicted.len() {
            anyhow::bail!(
                "truth and predictions differ in length ({} vs {})",
                truth.len(),
                predicted.len()
            );
        }
        Ok(Self {
            accuracy: accuracy(truth, predicted),
            f1_macro: f1_macro(truth, predicted),
            n_test:   truth.len(),
        })
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write metrics to '{}'", path.display()))?;
        tracing::debug!("Wrote metrics to '{}'", path.display());
        Ok(())
    }
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "accuracy={:.4} f1_macro={:.4} n_test={}",
            self.accuracy, self.f1_macro, self.n_test
        )
    }
}

pub fn accuracy(truth: &[i64], predicted: &[i64]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    correct as f64 / truth.len() as f64
}

pub fn f1_macro(truth: &[i64], predicted: &[i64]) -> f64 {
    let labels: BTreeSet<i64> = truth.iter().chain(predicted).copied().collect();
    if labels.is_empty() {
        return 0.0;
    }

    let total: f64 = labels
        .iter()
        .map(|&label| {
            let mut tp = 0usize;
            let mut fp = 0usize;
            let mut fn_count = 0usize;
            for (&t, &p) in truth.iter().zip(predicted) {
                match (t == label, p == label) {
                    (true, true)  => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_count += 1,
                    _ => {}
                }
            }
            // F1 = 2TP / (2TP + FP + FN); zero when the class is never hit
            let denom = 2 * tp + fp + fn_count;
            if tp == 0 || denom == 0 {
                0.0
            } else {
                (2 * tp) as f64 / denom as f64
            }
        })
        .sum();

    total / labels.len() as f64
}
