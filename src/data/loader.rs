// ============================================================
// Layer 4 — Raw Source Loader
// ============================================================
// Reads one raw CSV table whose text and label columns have
// source-specific names, and yields RawRecords in file order.
//
// Missing values follow the pandas defaults the raw exports were
// produced with: an empty field, or one of the NA markers below,
// is treated as missing. A missing label becomes MISSING_LABEL.
// Labels written as integral floats ("1.0") are accepted.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::error::PipelineError;
use crate::domain::record::{RawRecord, MISSING_LABEL};
use crate::domain::traits::RecordSource;

/// Field values read as "missing".
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// Where a source lives and which of its columns hold the text and label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub path:      PathBuf,
    pub text_col:  String,
    pub label_col: String,
}

impl SourceSpec {
    pub fn new(
        path:      impl Into<PathBuf>,
        text_col:  impl Into<String>,
        label_col: impl Into<String>,
    ) -> Self {
        Self {
            path:      path.into(),
            text_col:  text_col.into(),
            label_col: label_col.into(),
        }
    }
}

/// A raw CSV table. Implements RecordSource.
pub struct CsvSource {
    spec: SourceSpec,
}

impl CsvSource {
    pub fn new(spec: SourceSpec) -> Self {
        Self { spec }
    }
}

impl RecordSource for CsvSource {
    fn name(&self) -> String {
        self.spec
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    fn load_all(&self) -> Result<Vec<RawRecord>> {
        let path = self.spec.path.as_path();
        if !path.is_file() {
            return Err(PipelineError::SourceNotFound(path.to_path_buf()).into());
        }

        // Short rows are padded with missing values rather than rejected
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header of '{}'", path.display()))?
            .clone();
        let text_idx  = column_index(&headers, &self.spec.text_col, path)?;
        let label_idx = column_index(&headers, &self.spec.label_col, path)?;

        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            let row = row.with_context(|| {
                format!("Malformed CSV row {} in '{}'", i + 1, path.display())
            })?;

            let text = row
                .get(text_idx)
                .filter(|v| !is_missing(v))
                .map(str::to_string);

            let raw_label = row.get(label_idx).unwrap_or("");
            let label = parse_label(raw_label).ok_or_else(|| PipelineError::InvalidLabel {
                path:  path.to_path_buf(),
                row:   i + 1,
                value: raw_label.to_string(),
            })?;

            records.push(RawRecord::new(text, label));
        }

        tracing::debug!("Loaded {} rows from '{}'", records.len(), path.display());
        Ok(records)
    }
}

fn column_index(headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| {
            PipelineError::MissingColumn {
                path:   path.to_path_buf(),
                column: column.to_string(),
            }
            .into()
        })
}

fn is_missing(value: &str) -> bool {
    NA_MARKERS.contains(&value)
}

/// Coerce a raw label field to an integer.
/// `None` means the field is present but not an integer.
fn parse_label(value: &str) -> Option<i64> {
    if is_missing(value) {
        return Some(MISSING_LABEL);
    }
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Some(v as i64),
        _ => None,
    }
}
