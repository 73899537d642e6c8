//! Field rules.
//!
//! A rule reads one declared field of a row and reports zero or more issues.
//! Rules are pure: no shared state, no errors. Malformed input is exactly what
//! they exist to report.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::row::{FieldSpec, Row};

/// One-or-more non-`@`, `@`, one-or-more non-`@`, `.`, one-or-more non-`@`.
/// Anchored at the start only: trailing text after a match is accepted.
pub const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    InvalidNumber,
    NegativeValue,
    InvalidEmailFormat,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber => write!(f, "invalid_number"),
            Self::NegativeValue => write!(f, "negative_value"),
            Self::InvalidEmailFormat => write!(f, "invalid_email_format"),
        }
    }
}

/// A single rule failure on one field of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub field: String,
    pub kind: IssueKind,
    /// The raw value that failed, as stored in the row ("" when absent).
    pub value: String,
}

impl Issue {
    /// Short human-readable description, e.g. "Negative sales".
    pub fn description(&self) -> String {
        match self.kind {
            IssueKind::InvalidNumber => format!("Invalid {}", self.field),
            IssueKind::NegativeValue => format!("Negative {}", self.field),
            IssueKind::InvalidEmailFormat => format!("Invalid {} format", self.field),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule trait + built-ins
// ---------------------------------------------------------------------------

pub trait Rule: fmt::Debug {
    /// The field this rule inspects.
    fn field(&self) -> &FieldSpec;

    /// Check one row. Issues are returned in the order the rule found them.
    fn check(&self, row: &Row) -> Vec<Issue>;
}

/// Decimal number that must not be negative. Absent counts as "0".
///
/// A value that doesn't parse is reported as `InvalidNumber` only; the
/// negativity check never runs on it.
#[derive(Debug, Clone)]
pub struct NonNegativeNumberRule {
    field: FieldSpec,
}

impl NonNegativeNumberRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: FieldSpec::numeric(field) }
    }
}

impl Rule for NonNegativeNumberRule {
    fn field(&self) -> &FieldSpec {
        &self.field
    }

    fn check(&self, row: &Row) -> Vec<Issue> {
        let raw = row.resolve(&self.field);
        let kind = match parse_decimal(raw) {
            None => IssueKind::InvalidNumber,
            Some(n) if n < 0.0 => IssueKind::NegativeValue,
            Some(_) => return Vec::new(),
        };
        vec![Issue {
            field: self.field.name.clone(),
            kind,
            value: row.get(&self.field.name).unwrap_or("").to_string(),
        }]
    }
}

/// Parse a decimal the way a lenient float parser would: surrounding
/// whitespace ignored, sign/exponent/inf/nan accepted. NaN is not negative.
///
/// Unicode decimal digits count as their ASCII value, and a single `_` is
/// allowed between two digits (`1_000`).
fn parse_decimal(raw: &str) -> Option<f64> {
    normalize_decimal(raw)?.parse::<f64>().ok()
}

fn normalize_decimal(raw: &str) -> Option<String> {
    let chars: Vec<char> = raw.trim().chars().map(ascii_digit).collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let after_digit = i > 0 && chars[i - 1].is_ascii_digit();
        let before_digit = chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if !(after_digit && before_digit) {
            return None;
        }
    }
    Some(out)
}

/// Code points of the zero digit of every Unicode decimal digit (Nd) run.
/// Each run holds ten consecutive digits.
const DIGIT_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0, 0x112F0,
    0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50, 0x11DA0,
    0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140,
    0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// Map a non-ASCII decimal digit to its ASCII counterpart. Anything else,
/// including numeric characters that are not decimal digits, is unchanged.
fn ascii_digit(c: char) -> char {
    if c.is_ascii() || !c.is_numeric() {
        return c;
    }
    let code = c as u32;
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .and_then(|&zero| char::from_digit(code - zero, 10))
        .unwrap_or(c)
}

/// Loose email shape check, see [`EMAIL_PATTERN`]. Absent counts as "".
#[derive(Debug, Clone)]
pub struct EmailRule {
    field: FieldSpec,
}

impl EmailRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: FieldSpec::text(field) }
    }
}

impl Rule for EmailRule {
    fn field(&self) -> &FieldSpec {
        &self.field
    }

    fn check(&self, row: &Row) -> Vec<Issue> {
        let raw = row.resolve(&self.field);
        if EMAIL_RE.is_match(raw) {
            return Vec::new();
        }
        vec![Issue {
            field: self.field.name.clone(),
            kind: IssueKind::InvalidEmailFormat,
            value: raw.to_string(),
        }]
    }
}

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// Ordered collection of rules. Order determines issue order in log lines.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `sales` must be a non-negative number, `email` must look like an email.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(NonNegativeNumberRule::new("sales"))
            .with_rule(EmailRule::new("email"))
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fields the rules inspect, in rule order (duplicates kept).
    pub fn fields(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.field().name.as_str()).collect()
    }

    /// Run every rule against `row`, in rule order.
    pub fn check(&self, row: &Row) -> Vec<Issue> {
        self.rules.iter().flat_map(|rule| rule.check(row)).collect()
    }
}
