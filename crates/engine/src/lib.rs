//! `rowcheck-engine`: row validation and correction engine.
//!
//! Pure engine crate: receives loaded rows, returns reports, applies
//! corrections. No CLI or file IO dependencies.

pub mod config;
pub mod correction;
pub mod error;
pub mod ledger;
pub mod row;
pub mod rules;
pub mod session;
pub mod validate;

pub use config::RulesConfig;
pub use correction::{apply_correction, CorrectionRequest};
pub use error::EngineError;
pub use ledger::{ErrorLedger, InvalidField, LedgerEntry};
pub use row::{FieldSpec, RecordStore, Row};
pub use rules::{EmailRule, Issue, IssueKind, NonNegativeNumberRule, Rule, RuleSet};
pub use session::{ReviewField, ReviewItem, Session};
pub use validate::{validate, RowIssues, ValidationReport, ALL_PASSED};
