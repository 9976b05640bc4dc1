//! Output rows for route-planning imports.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::ProcessingResult;
use crate::types::{DataSet, Schema, Value};

use super::grouping::{Locale, StopGroup};

/// Default value of the State column.
pub const DEFAULT_STATE: &str = "São Paulo";

/// Position of the two annotation columns at the end of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLayout {
    /// `..., Zip Code, Observations, Total Packages`
    #[default]
    ObservationsFirst,
    /// `..., Zip Code, Total Packages, Observations`
    PackagesFirst,
}

impl FromStr for OutputLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "observations-first" => Ok(Self::ObservationsFirst),
            "packages-first" => Ok(Self::PackagesFirst),
            other => Err(format!(
                "unknown output layout '{other}' (expected observations-first/packages-first)"
            )),
        }
    }
}

/// One exported stop.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub stop_name: String,
    pub address_line: Option<String>,
    pub secondary_address_line: Value,
    pub city: Value,
    pub state: String,
    pub zip_code: Value,
    pub observations: String,
    pub total_packages: String,
}

impl OutputRow {
    pub fn from_group(group: &StopGroup, locale: Locale, state: &str) -> Self {
        Self {
            stop_name: format!("Parada {}", group.final_stop()),
            address_line: group.address.address_line(),
            secondary_address_line: group.neighborhood.clone(),
            city: group.city.clone(),
            state: state.to_string(),
            zip_code: group.postal_code.clone(),
            observations: locale.ordering_annotation(&group.sorted_sequences()),
            total_packages: locale.package_annotation(group.package_count()),
        }
    }
}

/// Assemble output rows into a table with the fixed column order of `layout`.
pub fn to_dataset(
    rows: Vec<OutputRow>,
    locale: Locale,
    layout: OutputLayout,
) -> ProcessingResult<DataSet> {
    let mut columns: [Vec<Value>; 8] = Default::default();
    for row in rows {
        columns[0].push(Value::Utf8(row.stop_name));
        columns[1].push(row.address_line.into());
        columns[2].push(row.secondary_address_line);
        columns[3].push(row.city);
        columns[4].push(Value::Utf8(row.state));
        columns[5].push(row.zip_code);
        columns[6].push(Value::Utf8(row.observations));
        columns[7].push(Value::Utf8(row.total_packages));
    }
    let [stop, address, secondary, city, state, zip, observations, packages] = columns;

    let annotations = match layout {
        OutputLayout::ObservationsFirst => [
            (locale.observations_header(), observations),
            (locale.packages_header(), packages),
        ],
        OutputLayout::PackagesFirst => [
            (locale.packages_header(), packages),
            (locale.observations_header(), observations),
        ],
    };

    let row_count = stop.len();
    let mut out = DataSet::new(Schema::default(), vec![Vec::with_capacity(8); row_count]);
    for (name, values) in [
        ("Stop Name", stop),
        ("Address Line", address),
        ("Secondary Address Line", secondary),
        ("City", city),
        ("State", state),
        ("Zip Code", zip),
    ]
    .into_iter()
    .chain(annotations)
    {
        out = out.with_column(name, values)?;
    }
    Ok(out)
}
