// Parsing correction edits from the command line / shell

use rowcheck_engine::{CorrectionRequest, Session};

/// Parse `field=value`. Splits at the first `=`; the value may be empty or
/// contain further `=` characters.
pub fn parse_edit(arg: &str) -> Result<(String, String), String> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got {arg:?}"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("empty field name in {arg:?}"));
    }
    Ok((field.to_string(), value.to_string()))
}

/// Convert a 1-based row number, as shown in the validation log, to an index.
pub fn row_index(display_row: usize) -> Result<usize, String> {
    display_row
        .checked_sub(1)
        .ok_or_else(|| "rows are numbered from 1".to_string())
}

/// Build a correction request from a 1-based row number and `field=value` args.
pub fn build_request(display_row: usize, edits: &[String]) -> Result<CorrectionRequest, String> {
    if edits.is_empty() {
        return Err("no edits given (use field=value)".into());
    }
    let mut request = CorrectionRequest::new(row_index(display_row)?);
    for edit in edits {
        let (field, value) = parse_edit(edit)?;
        request = request.set(field, value);
    }
    Ok(request)
}

/// Reject edits to fields the last validation run did not flag on that row.
pub fn check_flagged(request: &CorrectionRequest, session: &Session) -> Result<(), String> {
    let flagged = session.flagged_fields(request.row_index);
    let extra: Vec<&str> = request.fields().filter(|f| !flagged.contains(f)).collect();
    if extra.is_empty() {
        return Ok(());
    }
    Err(format!(
        "row {}: field(s) not flagged by the last validation: {}",
        request.row_index + 1,
        extra.join(", ")
    ))
}
