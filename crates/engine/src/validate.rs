//! Validation runs.
//!
//! A run reads every row of the store in index order, applies the rule set,
//! and produces a fresh [`ValidationReport`]. Nothing is carried over from
//! earlier runs and the store is never written.

use serde::Serialize;

use crate::ledger::{ErrorLedger, LedgerEntry};
use crate::row::RecordStore;
use crate::rules::{Issue, RuleSet};

/// Informational line shown when no row has an issue.
pub const ALL_PASSED: &str = "All data passed validation.";

/// Issues found on one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssues {
    pub row_index: usize,
    pub issues: Vec<Issue>,
}

impl RowIssues {
    /// `Row <1-based index>: <descriptions, ", "-joined>`
    pub fn log_line(&self) -> String {
        let descriptions: Vec<String> = self.issues.iter().map(Issue::description).collect();
        format!("Row {}: {}", self.row_index + 1, descriptions.join(", "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub rows_checked: usize,
    pub rows: Vec<RowIssues>,
    pub log: Vec<String>,
    pub ledger: ErrorLedger,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.log.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.rows.iter().map(|r| r.issues.len()).sum()
    }

    /// Lines for display: the log, or the single all-passed line.
    pub fn display_lines(&self) -> Vec<String> {
        if self.log.is_empty() {
            vec![ALL_PASSED.to_string()]
        } else {
            self.log.clone()
        }
    }
}

/// Validate every row of `store` against `rules`.
pub fn validate(store: &RecordStore, rules: &RuleSet) -> ValidationReport {
    let mut report = ValidationReport {
        rows_checked: store.len(),
        ..ValidationReport::default()
    };

    for (row_index, row) in store.iter() {
        let issues = rules.check(row);
        if issues.is_empty() {
            continue;
        }

        let mut entry = LedgerEntry::new(row_index);
        for issue in &issues {
            entry.record(&issue.field, &issue.value);
        }

        let row_issues = RowIssues { row_index, issues };
        report.log.push(row_issues.log_line());
        report.ledger.insert(entry);
        report.rows.push(row_issues);
    }

    log::debug!(
        "validated {} rows: {} with issues ({} issues)",
        report.rows_checked,
        report.ledger.len(),
        report.issue_count()
    );

    report
}
