//! Writing stop tables to disk.
//!
//! [`write_table`] picks the encoder from the output extension (or an explicit
//! [`OutputFormat`]): `.xlsx` through [`xlsx`], `.csv` through [`csv`].

pub mod csv;
pub mod xlsx;

use std::path::Path;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::DataSet;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Excel 2007+ workbook.
    Xlsx,
    /// Comma-separated values.
    Csv,
}

impl OutputFormat {
    /// Infer the output format of `path` from its extension.
    pub fn from_path(path: &Path) -> ProcessingResult<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(ProcessingError::UnsupportedFormat {
                message: format!(
                    "cannot write '{}': expected a .xlsx or .csv path",
                    path.display()
                ),
            }),
        }
    }
}

/// Write `table` to `path`, inferring the format when `format` is `None`.
pub fn write_table(
    table: &DataSet,
    path: impl AsRef<Path>,
    format: Option<OutputFormat>,
) -> ProcessingResult<()> {
    let path = path.as_ref();
    let format = match format {
        Some(f) => f,
        None => OutputFormat::from_path(path)?,
    };
    match format {
        OutputFormat::Xlsx => xlsx::write_xlsx_to_path(table, path),
        OutputFormat::Csv => csv::write_csv_to_path(table, path),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::OutputFormat;

    #[test]
    fn output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.XLSX")).unwrap(), OutputFormat::Xlsx);
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")).unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::from_path(Path::new("out.ods")).is_err());
        assert!(OutputFormat::from_path(Path::new("out")).is_err());
    }
}
