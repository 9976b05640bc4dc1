//! Core tabular types.
//!
//! Spreadsheets are loaded into an in-memory [`DataSet`]: an ordered [`Schema`] of column
//! headers plus row-major [`Value`] storage. Cell types coming from a workbook are preserved.

use std::fmt;

use crate::error::{ProcessingError, ProcessingResult};

/// A single named column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column header.
    pub name: String,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered list of column headers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Build a schema from header names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Field::new).collect())
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single cell value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty cell.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Build a `Utf8` value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Utf8(s.into())
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form of the cell, `None` for nulls.
    ///
    /// Whole floats render without a fractional part, so a numeric `1234.0` becomes `"1234"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the cells of column `name`, or `None` if there is no such column.
    ///
    /// Rows shorter than the schema yield [`Value::Null`] for the missing cell.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        static NULL: Value = Value::Null;

        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| row.get(idx).unwrap_or(&NULL)))
    }

    /// Create a new dataset containing only rows for which `predicate` returns `true`.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Replace every cell of column `name` with `mapper(cell)`.
    pub fn map_column<F>(mut self, name: &str, mut mapper: F) -> ProcessingResult<Self>
    where
        F: FnMut(&Value) -> Value,
    {
        let idx = self.schema.index_of(name).ok_or_else(|| ProcessingError::SchemaMismatch {
            message: format!("cannot map unknown column '{name}'"),
        })?;
        for row in &mut self.rows {
            if row.len() <= idx {
                row.resize(idx + 1, Value::Null);
            }
            row[idx] = mapper(&row[idx]);
        }
        Ok(self)
    }

    /// Rename every column header through `rename`.
    pub fn rename_columns<F>(mut self, mut rename: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        for field in &mut self.schema.fields {
            field.name = rename(&field.name);
        }
        self
    }

    /// Append (or replace) a derived column.
    ///
    /// `values` must contain exactly one cell per row.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> ProcessingResult<Self> {
        let name = name.into();
        if values.len() != self.rows.len() {
            return Err(ProcessingError::SchemaMismatch {
                message: format!(
                    "derived column '{name}' has {} values for {} rows",
                    values.len(),
                    self.rows.len()
                ),
            });
        }

        let width = self.schema.fields.len();
        let idx = match self.schema.index_of(&name) {
            Some(idx) => idx,
            None => {
                self.schema.fields.push(Field::new(name));
                width
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            if row.len() <= idx {
                row.resize(idx + 1, Value::Null);
            }
            row[idx] = value;
        }
        Ok(self)
    }
}

/// Normalize a raw header: trim surrounding whitespace, then turn line breaks into spaces.
pub fn clean_header(raw: &str) -> String {
    raw.trim().replace(['\n', '\r'], " ")
}
