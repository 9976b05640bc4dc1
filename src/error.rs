use thiserror::Error;

use crate::processing::columns::SemanticField;

/// Convenience result type for reading, processing and exporting route tables.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Error type returned by every stage of the pipeline.
///
/// A single enum shared across ingestion, column resolution, grouping and export. Any variant
/// aborts the whole run: there is no partial output.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook could not be opened or a sheet could not be read.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Workbook could not be encoded or saved.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid configuration file or option value.
    #[error("config error: {message}")]
    Config { message: String },

    /// The file format could not be inferred or is not a spreadsheet-like table.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },

    /// The table is structurally unusable (no header row, ragged derived column, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A required semantic field could not be resolved from the header set.
    #[error(
        "missing required column for {field} (searched: {}). headers={headers:?}",
        .candidates.join(", ")
    )]
    MissingColumn {
        field: SemanticField,
        candidates: Vec<String>,
        headers: Vec<String>,
    },

    /// A sequence or stop value could not be read as an integer.
    #[error("failed to convert value at row {row} column '{column}': {message} (raw='{raw}')")]
    TypeConversion {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

impl From<toml::de::Error> for ProcessingError {
    fn from(e: toml::de::Error) -> Self {
        ProcessingError::Config {
            message: e.to_string(),
        }
    }
}
