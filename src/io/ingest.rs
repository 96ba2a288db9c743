//! CSV ingest for concentration/response pairs.
//!
//! Accepts a headered CSV with one concentration column and one response
//! column. Header names are matched case-insensitively against a small alias
//! list. Rows that fail to parse are skipped and reported, so a single bad
//! line in a plate-reader export does not abort the whole run.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::AppError;

const X_ALIASES: [&str; 3] = ["x", "concentration", "conc"];
const Y_ALIASES: [&str; 4] = ["y", "signal", "response", "intensity"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw paired values + row errors.
///
/// Structural validation (lengths, minimum count) happens later in the fit
/// session; this layer only turns text into numbers.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load `(x, y)` pairs from a CSV file.
pub fn load_dataset_csv(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_dataset_csv(file)
}

/// Load `(x, y)` pairs from any CSV reader.
pub fn read_dataset_csv<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_idx = find_column(&header_map, &X_ALIASES)
        .ok_or_else(|| AppError::new(2, "Missing concentration column (`x`, `concentration`, or `conc`)."))?;
    let y_idx = find_column(&header_map, &Y_ALIASES).ok_or_else(|| {
        AppError::new(
            2,
            "Missing response column (`y`, `signal`, `response`, or `intensity`).",
        )
    })?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match (parse_cell(&record, x_idx, "x"), parse_cell(&record, y_idx, "y")) {
            (Ok(xv), Ok(yv)) => {
                x.push(xv);
                y.push(yv);
            }
            (Err(message), _) | (_, Err(message)) => row_errors.push(RowError { line, message }),
        }
    }

    if x.is_empty() {
        return Err(AppError::new(2, "No valid rows in CSV."));
    }

    Ok(IngestedData {
        x,
        y,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|name| header_map.get(*name).copied())
}

fn parse_cell(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing `{name}` value."))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{raw}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite `{name}` value '{raw}'."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_aliased_headers_with_bom() {
        let text = "\u{feff}Concentration,Signal\n0,0\n1,0.21\n10,0.81\n";
        let data = read_dataset_csv(text.as_bytes()).unwrap();
        assert_eq!(data.x, vec![0.0, 1.0, 10.0]);
        assert_eq!(data.y, vec![0.0, 0.21, 0.81]);
        assert_eq!(data.rows_read, 3);
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn skips_and_reports_bad_rows() {
        let text = "x,y,note\n1,0.2,a\n2,oops,b\n,0.5,c\n5,0.6,d\n";
        let data = read_dataset_csv(text.as_bytes()).unwrap();
        assert_eq!(data.x, vec![1.0, 5.0]);
        assert_eq!(data.row_errors.len(), 2);
        assert_eq!(data.row_errors[0].line, 3);
        assert!(data.row_errors[0].message.contains("oops"));
        assert_eq!(data.row_errors[1].line, 4);
    }

    #[test]
    fn missing_response_column_is_an_error() {
        let err = read_dataset_csv("x,z\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
