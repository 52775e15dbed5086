// ============================================================
// Layer 4 — Cleaned Dataset
// ============================================================
// The flat `clean_comment,category` file that ingestion writes
// and training/evaluation read. Rows keep insertion order.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::error::PipelineError;
use crate::domain::record::CleanRecord;

const HEADER: [&str; 2] = ["clean_comment", "category"];

#[derive(Debug, Clone, Default)]
pub struct CleanedDataset {
    records: Vec<CleanRecord>,
}

impl CleanedDataset {
    pub fn new(records: Vec<CleanRecord>) -> Self {
        Self { records }
    }

    /// Read a cleaned dataset file.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(PipelineError::SourceNotFound(path.to_path_buf()).into());
        }

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Cannot open dataset '{}'", path.display()))?;

        let headers = reader.headers()?.clone();
        for column in HEADER {
            if !headers.iter().any(|h| h == column) {
                return Err(PipelineError::MissingColumn {
                    path:   path.to_path_buf(),
                    column: column.to_string(),
                }
                .into());
            }
        }

        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<CleanRecord>().enumerate() {
            let record = row.with_context(|| {
                format!("Malformed row {} in '{}'", i + 1, path.display())
            })?;
            if record.category < 0 {
                return Err(PipelineError::InvalidLabel {
                    path:  path.to_path_buf(),
                    row:   i + 1,
                    value: record.category.to_string(),
                }
                .into());
            }
            records.push(record);
        }

        tracing::info!("Read {} rows from '{}'", records.len(), path.display());
        Ok(Self { records })
    }

    /// Write the dataset, replacing any existing file and creating
    /// parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Cannot write dataset '{}'", path.display()))?;
        // An empty dataset still gets its header
        if self.records.is_empty() {
            writer.write_record(HEADER)?;
        }
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CleanRecord] {
        &self.records
    }

    pub fn labels(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.category).collect()
    }

    /// Texts and labels of the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> (Vec<String>, Vec<i64>) {
        indices
            .iter()
            .map(|&i| {
                let r = &self.records[i];
                (r.clean_comment.clone(), r.category)
            })
            .unzip()
    }
}
