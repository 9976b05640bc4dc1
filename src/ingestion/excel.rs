use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{DataSet, Schema, Value};

use super::{dedupe_headers, unnamed_header};

/// Load one sheet of a workbook (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Blank header cells are named `Unnamed: {column index}`
/// - Cell types are kept (numbers stay numbers); empty cells and empty strings become nulls
/// - Rows with no non-empty cell are skipped
pub fn read_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
) -> ProcessingResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;
    read_workbook_sheet(&mut workbook, sheet_name)
}

/// Same as [`read_excel_from_path`], for a workbook already held in memory (e.g. an upload).
pub fn read_excel_from_bytes(bytes: &[u8], sheet_name: Option<&str>) -> ProcessingResult<DataSet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_workbook_sheet(&mut workbook, sheet_name)
}

fn read_workbook_sheet<RS>(
    workbook: &mut Sheets<RS>,
    sheet_name: Option<&str>,
) -> ProcessingResult<DataSet>
where
    RS: Read + Seek,
{
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ProcessingError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    read_sheet_range(&range).map_err(|e| wrap_schema_err_with_sheet(&sheet, e))
}

fn read_sheet_range(range: &calamine::Range<Data>) -> ProcessingResult<DataSet> {
    let mut rows_iter = range.rows().skip_while(|row| row.iter().all(is_blank));

    let header_row = rows_iter.next().ok_or_else(|| ProcessingError::SchemaMismatch {
        message: "sheet has no non-empty rows (no header row found)".to_string(),
    })?;
    // The range starts at the first used cell; column indices count from column A.
    let first_col = range.start().map_or(0, |(_, col)| col as usize);
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let name = cell_to_header_string(c);
            if name.trim().is_empty() {
                unnamed_header(first_col + idx)
            } else {
                name
            }
        })
        .collect();
    let width = headers.len();
    let schema = Schema::from_names(dedupe_headers(headers));

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row in rows_iter {
        if row.iter().all(is_blank) {
            continue;
        }
        let mut out_row: Vec<Value> = row.iter().take(width).map(convert_cell).collect();
        out_row.resize(width, Value::Null);
        rows.push(out_row);
    }

    Ok(DataSet::new(schema, rows))
}

fn wrap_schema_err_with_sheet(sheet: &str, err: ProcessingError) -> ProcessingError {
    match err {
        ProcessingError::SchemaMismatch { message } => ProcessingError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn is_blank(c: &Data) -> bool {
    match c {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) if s.is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    }
}
