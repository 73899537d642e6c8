// Read-only preview of the first rows of a dataset

use rowcheck_engine::RecordStore;

/// Width of the dashed line between header and data.
pub const DIVIDER_WIDTH: usize = 100;

pub const NO_DATA: &str = "No data loaded.";

/// Tab-separated header line, a divider, then up to `limit` data lines.
///
/// Headers come from the first row; each data line lists that row's own
/// values in its own field order.
pub fn render_preview(store: &RecordStore, limit: usize) -> String {
    if store.is_empty() {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    out.push_str(&store.headers().join("\t"));
    out.push('\n');
    out.push_str(&"-".repeat(DIVIDER_WIDTH));
    out.push('\n');

    for row in store.rows().iter().take(limit) {
        out.push_str(&row.values().collect::<Vec<_>>().join("\t"));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcheck_engine::Row;

    fn store(n: usize) -> RecordStore {
        RecordStore::new(
            (0..n)
                .map(|i| {
                    [("sales", i.to_string()), ("email", format!("u{i}@x.com"))]
                        .into_iter()
                        .collect::<Row>()
                })
                .collect(),
        )
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(render_preview(&RecordStore::default(), 10), NO_DATA);
    }

    #[test]
    fn test_header_divider_and_rows() {
        let out = render_preview(&store(2), 10);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "sales\temail");
        assert_eq!(lines[1], "-".repeat(100));
        assert_eq!(lines[2], "0\tu0@x.com");
        assert_eq!(lines[3], "1\tu1@x.com");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_limit_caps_data_lines() {
        let out = render_preview(&store(25), 10);
        assert_eq!(out.lines().count(), 2 + 10);
        assert!(out.lines().last().unwrap().starts_with("9\t"));
    }
}
