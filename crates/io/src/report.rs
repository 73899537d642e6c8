// JSON export of a validation report

use std::path::Path;

use rowcheck_engine::{ErrorLedger, RowIssues, ValidationReport};
use serde::Serialize;

/// Report as written to disk / stdout.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub log: Vec<String>,
    pub rows: &'a [RowIssues],
    pub ledger: &'a ErrorLedger,
}

#[derive(Debug, Serialize)]
pub struct ReportMeta {
    pub source: Option<String>,
    pub engine_version: String,
    pub generated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub rows_checked: usize,
    pub rows_with_issues: usize,
    pub issues: usize,
    pub clean: bool,
}

impl<'a> ReportDocument<'a> {
    pub fn new(report: &'a ValidationReport, source: Option<&Path>) -> Self {
        Self {
            meta: ReportMeta {
                source: source.map(|p| p.display().to_string()),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
            },
            summary: ReportSummary {
                rows_checked: report.rows_checked,
                rows_with_issues: report.ledger.len(),
                issues: report.issue_count(),
                clean: report.is_clean(),
            },
            log: report.display_lines(),
            rows: &report.rows,
            ledger: &report.ledger,
        }
    }
}

pub fn to_json(report: &ValidationReport, source: Option<&Path>) -> Result<String, String> {
    serde_json::to_string_pretty(&ReportDocument::new(report, source)).map_err(|e| e.to_string())
}

pub fn export(report: &ValidationReport, source: Option<&Path>, path: &Path) -> Result<(), String> {
    let json = to_json(report, source)?;
    std::fs::write(path, json).map_err(|e| format!("{}: {e}", path.display()))
}
