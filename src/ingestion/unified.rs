//! Unified table reading.
//!
//! - If [`ReadOptions::format`] is `None`, the format is inferred from the file extension.
//! - Workbooks read the first sheet unless [`ReadOptions::sheet`] names one.

use std::path::Path;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::DataSet;

use super::{csv, excel};

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats.
    Excel,
}

impl InputFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> ProcessingResult<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ProcessingError::UnsupportedFormat {
                message: format!("cannot infer format: path has no extension ({})", path.display()),
            })?;

        Self::from_extension(ext).ok_or_else(|| ProcessingError::UnsupportedFormat {
            message: format!(
                "cannot infer format from extension '{ext}' for path ({})",
                path.display()
            ),
        })
    }
}

/// Which worksheet of a workbook to read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// The first sheet (default).
    #[default]
    First,
    /// A single named sheet.
    Named(String),
}

/// Options controlling table reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// If `None`, detect format from file extension.
    pub format: Option<InputFormat>,
    /// Workbook sheet to read; ignored for CSV.
    pub sheet: SheetSelection,
}

/// Read a route table from `path`.
///
/// ```no_run
/// use route_stop_grouper::ingestion::{read_table, ReadOptions, SheetSelection};
///
/// # fn main() -> Result<(), route_stop_grouper::ProcessingError> {
/// let opts = ReadOptions {
///     sheet: SheetSelection::Named("Rota".to_string()),
///     ..Default::default()
/// };
/// let table = read_table("rota.xlsx", &opts)?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn read_table(path: impl AsRef<Path>, options: &ReadOptions) -> ProcessingResult<DataSet> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => InputFormat::from_path(path)?,
    };

    match (format, &options.sheet) {
        (InputFormat::Csv, _) => csv::read_csv_from_path(path),
        (InputFormat::Excel, SheetSelection::First) => excel::read_excel_from_path(path, None),
        (InputFormat::Excel, SheetSelection::Named(name)) => {
            excel::read_excel_from_path(path, Some(name))
        }
    }
}
