//! Correction applier.
//!
//! Writes caller-supplied values into one row. Corrections and validation are
//! separate operations: applying a correction never re-runs a rule and never
//! touches a report or ledger.

use crate::error::EngineError;
use crate::row::{RecordStore, Row};

/// Edits for one row. `field_edits` are applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionRequest {
    pub row_index: usize,
    pub field_edits: Vec<(String, String)>,
}

impl CorrectionRequest {
    pub fn new(row_index: usize) -> Self {
        Self { row_index, field_edits: Vec::new() }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.field_edits.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.field_edits.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.field_edits.iter().map(|(f, _)| f.as_str())
    }
}

/// Overwrite the requested fields of `store[request.row_index]`.
///
/// Any field name is written, including ones the row doesn't have yet.
/// An out-of-range index fails before anything is written.
pub fn apply_correction<'a>(
    store: &'a mut RecordStore,
    request: &CorrectionRequest,
) -> Result<&'a Row, EngineError> {
    let len = store.len();
    let row = store
        .get_mut(request.row_index)
        .ok_or(EngineError::IndexOutOfRange { index: request.row_index, len })?;

    for (field, value) in &request.field_edits {
        row.set(field, value.as_str());
    }

    log::debug!(
        "corrected row {} ({} field(s))",
        request.row_index,
        request.field_edits.len()
    );

    Ok(row)
}
