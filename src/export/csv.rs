//! CSV encoding.

use std::io::Write;
use std::path::Path;

use crate::error::ProcessingResult;
use crate::types::DataSet;

/// Write `table` as CSV to `path`, header row first.
pub fn write_csv_to_path(table: &DataSet, path: impl AsRef<Path>) -> ProcessingResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_csv(table, &mut wtr)
}

/// Write `table` as CSV into an existing writer. Null cells are written as empty fields.
pub fn write_csv<W: Write>(table: &DataSet, wtr: &mut csv::Writer<W>) -> ProcessingResult<()> {
    wtr.write_record(table.schema.field_names())?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}
