//! Workbook encoding with `rust_xlsxwriter`.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::ProcessingResult;
use crate::types::{DataSet, Value};

/// Sheet name used for exported stop tables.
pub const SHEET_NAME: &str = "Sheet1";

/// Encode `table` as a single-sheet workbook and save it to `path`.
pub fn write_xlsx_to_path(table: &DataSet, path: impl AsRef<Path>) -> ProcessingResult<()> {
    let mut workbook = build_workbook(table)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

/// Encode `table` as a single-sheet workbook held in memory.
pub fn write_xlsx_to_buffer(table: &DataSet) -> ProcessingResult<Vec<u8>> {
    let mut workbook = build_workbook(table)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(table: &DataSet) -> ProcessingResult<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, name) in table.schema.field_names().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            write_value(worksheet, row_num, col as u16, value)?;
        }
    }

    Ok(workbook)
}

fn write_value(ws: &mut Worksheet, row: u32, col: u16, value: &Value) -> ProcessingResult<()> {
    match value {
        Value::Null => {}
        Value::Int64(v) => {
            ws.write_number(row, col, *v as f64)?;
        }
        Value::Float64(v) => {
            ws.write_number(row, col, *v)?;
        }
        Value::Bool(v) => {
            ws.write_boolean(row, col, *v)?;
        }
        Value::Utf8(s) => {
            ws.write_string(row, col, s)?;
        }
    }
    Ok(())
}
