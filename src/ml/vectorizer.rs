// ============================================================
// Layer 5 — TF-IDF Vectorizer
// ============================================================
// Bag-of-terms weighting:
//
//   tokens  = lowercase(text) matched by \b\w\w+\b
//   tf(t,d) = raw count of t in d
//   idf(t)  = ln((1 + n_docs) / (1 + df(t))) + 1
//   row     = tf * idf, then L2-normalised
//
// The vocabulary keeps the `max_features` terms with the highest
// total count over the fitted corpus (ties broken by term), and
// columns are numbered in lexical term order. Terms not in the
// vocabulary are ignored at transform time.

use anyhow::Result;
use ndarray::Array2;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use crate::domain::error::PipelineError;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"))
}

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_pattern()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    /// term → column index
    vocabulary:   BTreeMap<String, usize>,
    /// idf weight per column
    idf:          Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from `texts`.
    pub fn fit(texts: &[String], max_features: usize) -> Result<Self> {
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq:    HashMap<String, usize> = HashMap::new();

        for text in texts {
            let tokens = tokenize(text);
            let mut in_doc: Vec<&String> = Vec::with_capacity(tokens.len());
            for token in &tokens {
                *term_counts.entry(token.clone()).or_insert(0) += 1;
                in_doc.push(token);
            }
            in_doc.sort_unstable();
            in_doc.dedup();
            for token in in_doc {
                *doc_freq.entry(token.clone()).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(PipelineError::InsufficientData(
                "empty vocabulary; the training texts contain no terms".to_string(),
            )
            .into());
        }

        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort();

        let n_docs = texts.len() as f64;
        let idf = kept
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, i))
            .collect();

        let vectorizer = Self { max_features, vocabulary, idf };
        tracing::debug!(
            "Fitted TF-IDF on {} texts: {} terms (cap {})",
            texts.len(),
            vectorizer.vocabulary_size(),
            max_features,
        );
        Ok(vectorizer)
    }

    /// Dense (n_texts × vocabulary_size) feature matrix.
    pub fn transform(&self, texts: &[String]) -> Array2<f64> {
        let mut features = Array2::<f64>::zeros((texts.len(), self.vocabulary_size()));

        for (row, text) in texts.iter().enumerate() {
            for token in tokenize(text) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    features[[row, col]] += 1.0;
                }
            }

            let mut r = features.row_mut(row);
            for (col, value) in r.iter_mut().enumerate() {
                *value *= self.idf[col];
            }
            let norm = r.dot(&r).sqrt();
            if norm > 0.0 {
                r /= norm;
            }
        }

        features
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_single_chars_and_lowercases() {
        assert_eq!(tokenize("A Good, GOOD film!"), vec!["good", "good", "film"]);
    }

    #[test]
    fn test_vocabulary_is_lexical() {
        let v = TfidfVectorizer::fit(&docs(&["zeta alpha", "mid alpha"]), 100).unwrap();
        assert_eq!(v.vocabulary.get("alpha"), Some(&0));
        assert_eq!(v.vocabulary.get("mid"), Some(&1));
        assert_eq!(v.vocabulary.get("zeta"), Some(&2));
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let v = TfidfVectorizer::fit(&docs(&["aa aa aa bb bb cc"]), 2).unwrap();
        assert_eq!(v.vocabulary_size(), 2);
        assert!(v.vocabulary.contains_key("aa"));
        assert!(v.vocabulary.contains_key("bb"));
        assert!(!v.vocabulary.contains_key("cc"));
    }

    #[test]
    fn test_rows_are_unit_length() {
        let v = TfidfVectorizer::fit(&docs(&["good film", "bad film", "good acting"]), 10).unwrap();
        let x = v.transform(&docs(&["good film", "good good acting"]));
        for row in x.rows() {
            assert!((row.dot(&row).sqrt() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rarer_term_weighs_more() {
        // "film" is in every doc, "good" in one → good has higher idf
        let v = TfidfVectorizer::fit(&docs(&["good film", "bad film", "okay film"]), 10).unwrap();
        let x = v.transform(&docs(&["good film"]));
        let good = v.vocabulary["good"];
        let film = v.vocabulary["film"];
        assert!(x[[0, good]] > x[[0, film]]);
    }

    #[test]
    fn test_unknown_terms_give_zero_row() {
        let v = TfidfVectorizer::fit(&docs(&["good film"]), 10).unwrap();
        let x = v.transform(&docs(&["completely unseen"]));
        assert!(x.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        assert!(TfidfVectorizer::fit(&docs(&["a b c", "!"]), 10).is_err());
    }
}
