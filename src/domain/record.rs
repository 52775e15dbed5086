// ============================================================
// Layer 3 — Record Domain Types
// ============================================================
// Two shapes of the same logical row:
//
//   RawRecord   : one row of a source table after its columns
//                 have been mapped to (text, label). Text may
//                 be missing; a missing label is the sentinel -1.
//
//   CleanRecord : one row of the cleaned dataset. Text is
//                 always present and the category is >= 0.
//
// The CleanRecord field names are the cleaned CSV header
// (`clean_comment,category`), so serde reads and writes the
// file directly from this struct.

use serde::{Deserialize, Serialize};

/// Label value used when a source row has no label.
pub const MISSING_LABEL: i64 = -1;

/// A row from a raw source table, normalised to the two logical fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Free-text comment; `None` when the source field was empty
    pub text: Option<String>,

    /// Integer-coded sentiment label, `MISSING_LABEL` when absent
    pub label: i64,
}

impl RawRecord {
    pub fn new(text: Option<String>, label: i64) -> Self {
        Self { text, label }
    }

    /// A row survives the missing-value filter only if it has text
    /// and a non-negative label.
    pub fn is_complete(&self) -> bool {
        self.text.is_some() && self.label >= 0
    }
}

/// A row of the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub clean_comment: String,
    pub category:      i64,
}

impl CleanRecord {
    pub fn new(clean_comment: impl Into<String>, category: i64) -> Self {
        Self {
            clean_comment: clean_comment.into(),
            category,
        }
    }
}

impl TryFrom<RawRecord> for CleanRecord {
    type Error = RawRecord;

    /// Returns the raw record back when it is incomplete.
    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        match raw {
            RawRecord { text: Some(text), label } if label >= 0 => Ok(Self::new(text, label)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_label_is_incomplete() {
        let r = RawRecord::new(Some("fine".into()), MISSING_LABEL);
        assert!(!r.is_complete());
        assert!(CleanRecord::try_from(r).is_err());
    }

    #[test]
    fn test_missing_text_is_incomplete() {
        let r = RawRecord::new(None, 1);
        assert!(!r.is_complete());
    }

    #[test]
    fn test_complete_record_converts() {
        let r     = RawRecord::new(Some("great".into()), 2);
        let clean = CleanRecord::try_from(r).unwrap();
        assert_eq!(clean, CleanRecord::new("great", 2));
    }
}
