//! Error ledger: which fields of which rows failed the last validation run.

use std::collections::BTreeMap;

use serde::Serialize;

/// Invalid fields of one row, in the order the rules reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub row_index: usize,
    pub fields: Vec<InvalidField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidField {
    pub field: String,
    pub value: String,
}

impl LedgerEntry {
    pub fn new(row_index: usize) -> Self {
        Self { row_index, fields: Vec::new() }
    }

    /// Record a failed field. A second failure on the same field replaces the
    /// stored value but keeps the field's original position.
    pub fn record(&mut self, field: &str, value: &str) {
        match self.fields.iter_mut().find(|f| f.field == field) {
            Some(slot) => slot.value = value.to_string(),
            None => self.fields.push(InvalidField {
                field: field.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.value.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.value(field).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.as_str())
    }
}

/// Row index → invalid fields. Iterates in ascending row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLedger {
    entries: BTreeMap<usize, LedgerEntry>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, entry: LedgerEntry) {
        self.entries.insert(entry.row_index, entry);
    }

    pub fn get(&self, row_index: usize) -> Option<&LedgerEntry> {
        self.entries.get(&row_index)
    }

    pub fn contains_row(&self, row_index: usize) -> bool {
        self.entries.contains_key(&row_index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    pub fn row_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }
}

impl Serialize for ErrorLedger {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}
