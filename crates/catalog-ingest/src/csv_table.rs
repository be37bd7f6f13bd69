use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::IngestError;

/// A spreadsheet export as read: trimmed headers and cells, no interpretation.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Cell at `row`/`col`, or `""` for short rows.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

pub fn read_raw_table(path: &Path) -> Result<RawTable, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
    let table = parse_raw_table(&bytes).map_err(|message| IngestError::Csv {
        path: path.to_path_buf(),
        message,
    })?;
    if table.headers.is_empty() {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "raw table read"
    );
    Ok(table)
}

/// Parses CSV bytes. Rows with no non-empty cell are skipped.
pub fn parse_raw_table(bytes: &[u8]) -> Result<RawTable, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(normalize_header)
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_bom_and_whitespace() {
        let table = parse_raw_table("\u{feff} סימול ,רמת  תיאור\n X-1 ,תיק\n,\n".as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["סימול", "רמת תיאור"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, 0), "X-1");
        assert_eq!(table.cell(0, 5), "");
    }

    #[test]
    fn keeps_quoted_delimiters() {
        let table = parse_raw_table(b"UNITID,UNITITLE\nX,\"Letters, 1950\"\n").unwrap();
        assert_eq!(table.cell(0, 1), "Letters, 1950");
    }
}
