// CSV/TSV loading into engine rows

use std::io::Read;
use std::path::Path;

use rowcheck_engine::Row;

use crate::error::LoadError;

/// Load a delimited file with a header row. The delimiter is sniffed when
/// `delimiter` is `None`.
pub fn load(path: &Path, delimiter: Option<u8>) -> Result<Vec<Row>, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    let rows = load_from_str(&content, delimiter)?;
    log::debug!(
        "loaded {} rows from {} (delimiter {:?})",
        rows.len(),
        path.display(),
        delimiter as char
    );
    Ok(rows)
}

/// Parse delimited text into rows keyed by the header line.
///
/// Short records leave the missing fields absent; values beyond the header
/// width are dropped. A repeated header keeps its first position and takes the
/// later value.
pub fn load_from_str(content: &str, delimiter: u8) -> Result<Vec<Row>, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(LoadError::from)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record.map_err(LoadError::from)?;
        if record.len() > headers.len() {
            dropped += record.len() - headers.len();
        }
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        rows.push(row);
    }

    if dropped > 0 {
        log::warn!("ignored {dropped} value(s) beyond the {} header columns", headers.len());
    }

    Ok(rows)
}

/// Records sampled when sniffing.
const SNIFF_RECORDS: usize = 10;

/// Detect the most likely field delimiter from the first few records.
///
/// Each candidate (tab, semicolon, comma, pipe) parses the sample as CSV, so a
/// quoted value spanning several lines counts as one record and blank lines
/// are skipped. Candidates splitting the header into fewer than two fields are
/// ignored; the rest score records matching the header width, weighted by that
/// width.
pub fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];

    let mut best = b',';
    let mut best_score = 0usize;

    for delim in CANDIDATES {
        let widths: Vec<usize> = csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes())
            .records()
            .take(SNIFF_RECORDS)
            .map_while(Result::ok)
            .map(|r| r.len())
            .collect();

        let Some(&header_width) = widths.first() else {
            continue;
        };
        if header_width <= 1 {
            continue;
        }

        let consistent = widths.iter().filter(|&&w| w == header_width).count();
        let score = consistent * header_width;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Excel exports are commonly Windows-1252
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            log::debug!("{} is not UTF-8, decoded as Windows-1252", path.display());
            Ok(decoded.into_owned())
        }
    }
}
