//! Rows and the record store.
//!
//! A row is an ordered list of `(field, raw value)` pairs, exactly as the
//! loader produced them. Field order is preserved so previews and exports show
//! columns the way the source file had them.

use serde::ser::{Serialize, SerializeMap, Serializer};

// ---------------------------------------------------------------------------
// Field declaration
// ---------------------------------------------------------------------------

/// A field a rule reads, plus the value used when the row doesn't carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub default: &'static str,
}

impl FieldSpec {
    /// Text field: absent resolves to "".
    pub fn text(name: impl Into<String>) -> Self {
        Self { name: name.into(), default: "" }
    }

    /// Numeric field: absent resolves to "0".
    pub fn numeric(name: impl Into<String>) -> Self {
        Self { name: name.into(), default: "0" }
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a declared field, falling back to the field's default.
    pub fn resolve<'a>(&'a self, spec: &FieldSpec) -> &'a str {
        self.get(&spec.name).unwrap_or(spec.default)
    }

    /// Overwrite a field in place. Unknown fields are appended.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field.to_string(), value)),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(&k.into(), v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

/// The loaded dataset. Row index is the row's identity until the next load,
/// so rows are never inserted, removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    rows: Vec<Row>,
}

impl RecordStore {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate()
    }

    /// Header names taken from the first row.
    pub fn headers(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.field_names().collect())
            .unwrap_or_default()
    }
}
