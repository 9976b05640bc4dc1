//! Route table processing.
//!
//! [`process`] is the single entrypoint: it takes a route table as exported by the logistics
//! platform and returns the stop table consumed by the route planner.
//!
//! The pass is:
//!
//! - [`columns`]: clean the headers and locate the address, sequence, stop, city,
//!   neighborhood and postal code columns
//! - [`address`]: split each address into street and house number and derive the grouping key
//! - [`grouping`]: merge rows sharing a key, keeping the first row's scalar values
//! - [`output`]: render one row per stop (lowest stop number, ordering note, package count)
//!
//! Any error aborts the whole table.
//!
//! ## Example
//!
//! ```rust
//! use route_stop_grouper::processing::{process, ProcessOptions};
//! use route_stop_grouper::types::{DataSet, Schema, Value};
//!
//! let row = |seq: i64, address: &str| {
//!     vec![
//!         Value::Int64(seq),
//!         Value::Int64(1),
//!         Value::text(address),
//!         Value::text("Centro"),
//!         Value::text("Campinas"),
//!         Value::text("13010-000"),
//!     ]
//! };
//! let table = DataSet::new(
//!     Schema::from_names(["Sequence", "Stop", "Destination Address", "Bairro", "City", "Zip"]),
//!     vec![row(2, "Rua A, 10"), row(1, "rua a, 10")],
//! );
//!
//! let out = process(&table, &ProcessOptions::default()).unwrap();
//! assert_eq!(out.row_count(), 1);
//! assert_eq!(out.rows[0][0], Value::text("Parada 1"));
//! assert_eq!(out.rows[0][6], Value::text("Orders for this stop: 1 and 2"));
//! ```

pub mod address;
pub mod columns;
pub mod grouping;
pub mod output;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::{clean_header, DataSet, Value};

pub use address::{normalize_text, GroupKey, ParsedAddress};
pub use columns::{ColumnProfile, ColumnRules, ResolvedColumns, SemanticField, SynonymOverrides};
pub use grouping::{group_rows, GroupOrder, InputRow, Locale, StopGroup};
pub use output::{OutputLayout, OutputRow, DEFAULT_STATE};

/// Options controlling column resolution and output rendering.
///
/// Use [`Default`] for the standard export format.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOptions {
    /// Rules used to locate semantic columns.
    pub columns: ColumnRules,
    /// Wording of annotations and annotation headers.
    pub locale: Locale,
    /// Column order of the annotation pair.
    pub layout: OutputLayout,
    /// Fixed State column value.
    pub state: String,
    /// Order of output rows.
    pub order: GroupOrder,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            columns: ColumnRules::default(),
            locale: Locale::default(),
            layout: OutputLayout::default(),
            state: DEFAULT_STATE.to_string(),
            order: GroupOrder::default(),
        }
    }
}

/// Groups produced from a table, plus the rendered output table.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub groups: Vec<StopGroup>,
    pub table: DataSet,
    pub input_rows: usize,
}

impl Processed {
    /// Number of groups where discarded rows disagreed with the kept representative values.
    pub fn divergent_groups(&self) -> usize {
        self.groups.iter().filter(|g| g.has_divergent_values()).count()
    }
}

/// Convert a route table into a stop table.
pub fn process(table: &DataSet, options: &ProcessOptions) -> ProcessingResult<DataSet> {
    process_detailed(table, options).map(|p| p.table)
}

/// Like [`process`], but also returns the intermediate groups.
pub fn process_detailed(table: &DataSet, options: &ProcessOptions) -> ProcessingResult<Processed> {
    let table = table.clone().rename_columns(clean_header);
    let cols = options.columns.resolve(&table.schema)?;
    // Addresses are parsed as text; a numeric cell keeps its displayed form.
    let table = table.map_column(&cols.address, |v| v.as_text().into())?;
    let rows = extract_rows(&table, &cols)?;
    let input_rows = rows.len();

    let groups = group_rows(rows, options.order);
    tracing::debug!(input_rows, groups = groups.len(), "grouped route rows");
    for g in groups.iter().filter(|g| g.has_divergent_values()) {
        tracing::debug!(
            key = ?g.key,
            first_row = g.first_row(),
            "rows in group disagree on representative values; keeping first"
        );
    }

    let out_rows = groups
        .iter()
        .map(|g| OutputRow::from_group(g, options.locale, &options.state))
        .collect();
    let table = output::to_dataset(out_rows, options.locale, options.layout)?;

    Ok(Processed {
        groups,
        table,
        input_rows,
    })
}

fn extract_rows(table: &DataSet, cols: &ResolvedColumns) -> ProcessingResult<Vec<InputRow>> {
    let idx = |field: SemanticField| {
        let name = cols.get(field);
        table.schema.index_of(name).ok_or_else(|| ProcessingError::SchemaMismatch {
            message: format!("resolved column '{name}' is not in the table"),
        })
    };
    let addresses = table
        .column(&cols.address)
        .ok_or_else(|| ProcessingError::SchemaMismatch {
            message: format!("resolved column '{}' is not in the table", cols.address),
        })?;
    let sequence = idx(SemanticField::Sequence)?;
    let stop = idx(SemanticField::Stop)?;
    let city = idx(SemanticField::City)?;
    let neighborhood = idx(SemanticField::Neighborhood)?;
    let postal_code = idx(SemanticField::PostalCode)?;

    let mut out = Vec::with_capacity(table.row_count());
    for ((idx0, row), address) in table.rows.iter().enumerate().zip(addresses) {
        // 1-based spreadsheet row, header is row 1.
        let user_row = idx0 + 2;
        let cell = |i: usize| row.get(i).cloned().unwrap_or(Value::Null);

        let raw_address = match address {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        };
        out.push(InputRow {
            address: ParsedAddress::parse(raw_address),
            sequence: to_integer(user_row, &cols.sequence, &cell(sequence))?,
            stop: to_integer(user_row, &cols.stop, &cell(stop))?,
            city: cell(city),
            neighborhood: cell(neighborhood),
            postal_code: cell(postal_code),
        });
    }
    Ok(out)
}

fn to_integer(row: usize, column: &str, value: &Value) -> ProcessingResult<i64> {
    let err = |message: &str| ProcessingError::TypeConversion {
        row,
        column: column.to_string(),
        raw: value.to_string(),
        message: message.to_string(),
    };

    match value {
        Value::Int64(v) => Ok(*v),
        // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
        Value::Float64(f) if !(i64::MIN as f64..i64::MAX as f64).contains(f) => {
            Err(err("integer out of range"))
        }
        Value::Float64(f) if f.fract() == 0.0 => Ok(*f as i64),
        Value::Float64(_) => Err(err("expected integer (got non-integer float)")),
        Value::Utf8(s) => s.trim().parse::<i64>().map_err(|e| err(&e.to_string())),
        Value::Null => Err(err("expected integer (cell is empty)")),
        Value::Bool(_) => Err(err("expected integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::{process, process_detailed, to_integer, ColumnRules, ProcessOptions};
    use crate::error::ProcessingError;
    use crate::processing::columns::{ColumnProfile, SemanticField};
    use crate::types::{DataSet, Schema, Value};

    fn headers() -> Schema {
        Schema::from_names([
            "Sequence",
            " Stop",
            "Destination\nAddress ",
            "Bairro",
            "City",
            "Zipcode/Postal code",
        ])
    }

    fn route_row(seq: i64, stop: i64, address: Option<&str>, bairro: &str) -> Vec<Value> {
        vec![
            Value::Int64(seq),
            Value::Int64(stop),
            address.map(Value::text).unwrap_or(Value::Null),
            Value::text(bairro),
            Value::text("Campinas"),
            Value::text("13010-000"),
        ]
    }

    #[test]
    fn process_groups_and_renders() {
        let table = DataSet::new(
            headers(),
            vec![
                route_row(3, 2, Some("Rua A, 10"), "Centro"),
                route_row(1, 1, Some("Rua B, 5"), "Cambuí"),
                route_row(2, 3, Some("RUA A,10"), "Outro"),
                route_row(4, 4, None, "Sem endereço"),
            ],
        );

        let p = process_detailed(&table, &ProcessOptions::default()).unwrap();
        assert_eq!(p.input_rows, 4);
        assert_eq!(p.groups.len(), 3);
        assert_eq!(p.divergent_groups(), 1);

        let out = &p.table;
        assert_eq!(out.row_count(), 3);
        assert_eq!(
            out.rows[0],
            vec![
                Value::text("Parada 2"),
                Value::text("Rua A, 10"),
                Value::text("Centro"),
                Value::text("Campinas"),
                Value::text("São Paulo"),
                Value::text("13010-000"),
                Value::text("Orders for this stop: 2 and 3"),
                Value::text("2 packages"),
            ]
        );
        assert_eq!(out.rows[1][6], Value::text("Order 1"));
        assert_eq!(out.rows[2][0], Value::text("Parada 4"));
        assert_eq!(out.rows[2][1], Value::Null);
    }

    #[test]
    fn string_and_float_integers_are_accepted() {
        let mut table = DataSet::new(headers(), vec![route_row(1, 1, Some("Rua A, 1"), "C")]);
        table.rows[0][0] = Value::text(" 7 ");
        table.rows[0][1] = Value::Float64(3.0);
        let out = process(&table, &ProcessOptions::default()).unwrap();
        assert_eq!(out.rows[0][0], Value::text("Parada 3"));
        assert_eq!(out.rows[0][6], Value::text("Order 7"));
    }

    #[test]
    fn non_numeric_sequence_aborts_the_table() {
        let mut table = DataSet::new(
            headers(),
            vec![route_row(1, 1, Some("Rua A, 1"), "C"), route_row(2, 1, Some("Rua A, 1"), "C")],
        );
        table.rows[1][0] = Value::text("dois");
        let err = process(&table, &ProcessOptions::default()).unwrap_err();
        match err {
            ProcessingError::TypeConversion { row, column, raw, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Sequence");
                assert_eq!(raw, "dois");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn numeric_address_cells_are_parsed_as_text() {
        let mut table = DataSet::new(
            headers(),
            vec![route_row(1, 1, Some("x"), "C"), route_row(2, 3, Some("x"), "C")],
        );
        table.rows[0][2] = Value::Float64(42.0);
        table.rows[1][2] = Value::text("42");
        let p = process_detailed(&table, &ProcessOptions::default()).unwrap();
        assert_eq!(p.groups.len(), 1);
        assert_eq!(p.groups[0].key.street, "42");
        assert_eq!(p.table.rows[0][1], Value::Null);
    }

    #[test]
    fn empty_stop_cell_is_a_conversion_error() {
        let mut table = DataSet::new(headers(), vec![route_row(1, 1, Some("Rua A, 1"), "C")]);
        table.rows[0][1] = Value::Null;
        let err = process(&table, &ProcessOptions::default()).unwrap_err();
        assert!(err.to_string().contains("column 'Stop'"));
    }

    #[test]
    fn missing_column_aborts_before_any_row_is_read() {
        let table = DataSet::new(
            Schema::from_names(["Sequence", "Stop", "Destination Address", "Bairro", "City"]),
            vec![vec![Value::text("x"); 5]],
        );
        let err = process(&table, &ProcessOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::MissingColumn { field: SemanticField::PostalCode, .. }
        ));
    }

    #[test]
    fn legacy_profile_processes_original_headers() {
        let opts = ProcessOptions {
            columns: ColumnRules::for_profile(ColumnProfile::Legacy),
            ..Default::default()
        };
        let table = DataSet::new(headers(), vec![route_row(1, 1, Some("Rua A, 1"), "C")]);
        assert_eq!(process(&table, &opts).unwrap().row_count(), 1);
    }

    #[test]
    fn to_integer_rejects_fractions() {
        assert_eq!(to_integer(2, "Stop", &Value::Float64(4.0)).unwrap(), 4);
        assert!(to_integer(2, "Stop", &Value::Float64(4.5)).is_err());
        assert!(to_integer(2, "Stop", &Value::Bool(true)).is_err());
    }

    #[test]
    fn out_of_range_float_stop_aborts_the_table() {
        let mut table = DataSet::new(headers(), vec![route_row(1, 1, Some("Rua A, 1"), "C")]);
        table.rows[0][1] = Value::Float64(1e20);
        let err = process(&table, &ProcessOptions::default()).unwrap_err();
        match err {
            ProcessingError::TypeConversion { row, column, message, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Stop");
                assert_eq!(message, "integer out of range");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(to_integer(2, "Stop", &Value::Float64(-1e20)).is_err());
        assert!(to_integer(2, "Stop", &Value::Float64(f64::NAN)).is_err());
        assert!(to_integer(2, "Stop", &Value::Float64(f64::INFINITY)).is_err());
        assert_eq!(to_integer(2, "Stop", &Value::Float64(-9e15)).unwrap(), -9_000_000_000_000_000);
    }
}
