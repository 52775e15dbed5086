// ============================================================
// Layer 4 — Record Cleaner
// ============================================================
// Turns the concatenation of every source's RawRecords into
// CleanRecords.
//
// Cleaning steps (applied in order):
//   1. Drop rows with a missing comment or a negative category
//      (the missing-label sentinel included)
//   2. Drop rows whose comment was already seen earlier in the
//      sequence; the first occurrence wins
//
// Relative order of surviving rows is preserved.

use std::collections::HashSet;

use crate::domain::record::{CleanRecord, RawRecord};

/// Surviving records plus the row count after each stage.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub records:       Vec<CleanRecord>,
    pub combined:      usize,
    pub after_missing: usize,
    pub after_dedupe:  usize,
}

pub struct Cleaner;

impl Cleaner {
    pub fn new() -> Self {
        Self
    }

    pub fn clean(&self, raw: Vec<RawRecord>) -> CleanOutcome {
        let combined = raw.len();
        tracing::info!("Combined rows before cleaning: {}", combined);

        // ── Step 1: Drop incomplete rows ──────────────────────────────────────
        let complete: Vec<CleanRecord> = raw
            .into_iter()
            .filter_map(|r| CleanRecord::try_from(r).ok())
            .collect();
        let after_missing = complete.len();
        tracing::info!("After dropping missing: {}", after_missing);

        // ── Step 2: Drop duplicate comments ───────────────────────────────────
        let mut seen: HashSet<String> = HashSet::with_capacity(complete.len());
        let records: Vec<CleanRecord> = complete
            .into_iter()
            .filter(|r| seen.insert(r.clean_comment.clone()))
            .collect();
        let after_dedupe = records.len();
        tracing::info!("After dedupe: {}", after_dedupe);

        CleanOutcome { records, combined, after_missing, after_dedupe }
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
