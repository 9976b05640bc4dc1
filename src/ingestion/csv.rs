//! CSV reading.

use std::path::Path;

use crate::error::ProcessingResult;
use crate::types::{DataSet, Schema, Value};

use super::{dedupe_headers, unnamed_header};

/// Load a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have a header row; blank headers become `Unnamed: {column index}`.
/// - Every non-empty cell is kept as text; empty cells are nulls.
/// - Rows with no non-empty cell (within the header width) are skipped.
pub fn read_csv_from_path(path: impl AsRef<Path>) -> ProcessingResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> ProcessingResult<DataSet> {
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if h.trim().is_empty() {
                unnamed_header(idx)
            } else {
                h.to_string()
            }
        })
        .collect();
    let width = headers.len();
    let schema = Schema::from_names(dedupe_headers(headers));

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<Value> = record
            .iter()
            .take(width)
            .map(|raw| {
                if raw.trim().is_empty() {
                    Value::Null
                } else {
                    Value::Utf8(raw.to_string())
                }
            })
            .collect();
        row.resize(width, Value::Null);
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows).filter_rows(|row| !row.iter().all(Value::is_null)))
}
