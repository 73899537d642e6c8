//! One working session over a loaded dataset.
//!
//! The session owns the record store, the rule set and the most recent
//! validation report. Loading replaces the dataset and drops the report.
//! Corrections mark rows stale but leave the report as it was: only an
//! explicit [`Session::validate`] refreshes it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::correction::{self, CorrectionRequest};
use crate::error::EngineError;
use crate::ledger::ErrorLedger;
use crate::row::{RecordStore, Row};
use crate::rules::RuleSet;
use crate::validate::{self, ValidationReport};

#[derive(Debug)]
pub struct Session {
    store: RecordStore,
    rules: RuleSet,
    report: ValidationReport,
    validated: bool,
    loaded: bool,
    stale_rows: BTreeSet<usize>,
}

/// One invalid field as the review surface shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewField {
    pub field: String,
    /// Value recorded by the last validation run.
    pub invalid_value: String,
    /// Value currently in the store. Differs once a correction was applied.
    pub current_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub row_index: usize,
    pub fields: Vec<ReviewField>,
    /// Row was corrected after the last validation run.
    pub stale: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(RuleSet::standard())
    }
}

impl Session {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            store: RecordStore::default(),
            rules,
            report: ValidationReport::default(),
            validated: false,
            loaded: false,
            stale_rows: BTreeSet::new(),
        }
    }

    /// Replace the dataset. Any previous report and staleness are discarded.
    pub fn load(&mut self, rows: Vec<Row>) {
        if self.loaded {
            log::info!(
                "replacing dataset ({} rows) with {} rows",
                self.store.len(),
                rows.len()
            );
        }
        self.store = RecordStore::new(rows);
        self.report = ValidationReport::default();
        self.validated = false;
        self.loaded = true;
        self.stale_rows.clear();
    }

    /// Whether anything was loaded. An empty load still counts.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run the rule set over the whole store and replace the report.
    pub fn validate(&mut self) -> &ValidationReport {
        self.report = validate::validate(&self.store, &self.rules);
        self.validated = true;
        self.stale_rows.clear();
        &self.report
    }

    /// Report from the most recent run, if one ran since the last load.
    pub fn report(&self) -> Option<&ValidationReport> {
        self.validated.then_some(&self.report)
    }

    /// Ledger of the most recent run. Empty before the first run.
    pub fn ledger(&self) -> &ErrorLedger {
        &self.report.ledger
    }

    /// Apply a correction to the store. The ledger is not updated.
    pub fn apply_correction(&mut self, request: &CorrectionRequest) -> Result<&Row, EngineError> {
        let row = correction::apply_correction(&mut self.store, request)?;
        if self.validated {
            self.stale_rows.insert(request.row_index);
        }
        Ok(row)
    }

    /// True once a correction landed after the last validation run.
    pub fn is_stale(&self) -> bool {
        !self.stale_rows.is_empty()
    }

    pub fn stale_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.stale_rows.iter().copied()
    }

    /// Fields the last run flagged on `row_index` (empty when none).
    pub fn flagged_fields(&self, row_index: usize) -> Vec<&str> {
        self.ledger()
            .get(row_index)
            .map(|entry| entry.field_names().collect())
            .unwrap_or_default()
    }

    /// Ledger entries joined with the current store values, in row order.
    pub fn review(&self) -> Vec<ReviewItem> {
        self.ledger()
            .entries()
            .map(|entry| {
                let row = self.store.get(entry.row_index);
                let fields = entry
                    .fields
                    .iter()
                    .map(|f| ReviewField {
                        field: f.field.clone(),
                        invalid_value: f.value.clone(),
                        current_value: row
                            .and_then(|r| r.get(&f.field))
                            .unwrap_or("")
                            .to_string(),
                    })
                    .collect();
                ReviewItem {
                    row_index: entry.row_index,
                    fields,
                    stale: self.stale_rows.contains(&entry.row_index),
                }
            })
            .collect()
    }
}
