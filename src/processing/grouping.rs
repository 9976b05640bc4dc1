//! Grouping and aggregation of route rows into stops.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::Deserialize;

use crate::types::Value;

use super::address::{GroupKey, ParsedAddress};

/// One record of the source route table, reduced to the fields the grouping needs.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub address: ParsedAddress,
    pub sequence: i64,
    pub stop: i64,
    pub city: Value,
    pub neighborhood: Value,
    pub postal_code: Value,
}

/// All rows sharing one [`GroupKey`], collapsed into a single stop.
///
/// Scalar fields keep the first-seen row's values.
#[derive(Debug, Clone, PartialEq)]
pub struct StopGroup {
    pub key: GroupKey,
    pub address: ParsedAddress,
    pub city: Value,
    pub neighborhood: Value,
    pub postal_code: Value,
    sequences: Vec<i64>,
    stops: Vec<i64>,
    first_row: usize,
    divergent: bool,
}

impl StopGroup {
    fn new(first_row: usize, row: InputRow) -> Self {
        Self {
            key: row.address.key.clone(),
            address: row.address,
            city: row.city,
            neighborhood: row.neighborhood,
            postal_code: row.postal_code,
            sequences: vec![row.sequence],
            stops: vec![row.stop],
            first_row,
            divergent: false,
        }
    }

    fn absorb(&mut self, row: InputRow) {
        self.divergent |= row.address.street != self.address.street
            || row.city != self.city
            || row.neighborhood != self.neighborhood
            || row.postal_code != self.postal_code;
        self.sequences.push(row.sequence);
        self.stops.push(row.stop);
    }

    /// Sequence numbers in input order, duplicates kept.
    pub fn sequences(&self) -> &[i64] {
        &self.sequences
    }

    /// Stop numbers in input order.
    pub fn stops(&self) -> &[i64] {
        &self.stops
    }

    /// Lowest stop number contributed to the group.
    pub fn final_stop(&self) -> i64 {
        self.stops.iter().copied().fold(self.stops[0], i64::min)
    }

    /// Number of packages, i.e. contributing rows.
    pub fn package_count(&self) -> usize {
        self.sequences.len()
    }

    /// Sequence numbers sorted ascending.
    pub fn sorted_sequences(&self) -> Vec<i64> {
        let mut sorted = self.sequences.clone();
        sorted.sort_unstable();
        sorted
    }

    /// Index of the first input row that landed in this group.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// `true` when a later row disagreed with a representative value that was kept.
    pub fn has_divergent_values(&self) -> bool {
        self.divergent
    }
}

/// Order in which groups are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupOrder {
    /// By first appearance in the input.
    #[default]
    FirstSeen,
    /// By grouping key (normalized street, then number text).
    Key,
    /// By final stop number, ties by first appearance.
    Stop,
}

impl FromStr for GroupOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-seen" | "first_seen" => Ok(Self::FirstSeen),
            "key" => Ok(Self::Key),
            "stop" => Ok(Self::Stop),
            other => Err(format!("unknown group order '{other}' (expected first-seen/key/stop)")),
        }
    }
}

/// Partition `rows` by grouping key, keeping input order inside each group.
pub fn group_rows<I>(rows: I, order: GroupOrder) -> Vec<StopGroup>
where
    I: IntoIterator<Item = InputRow>,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<StopGroup> = Vec::new();

    for (row_idx, row) in rows.into_iter().enumerate() {
        match index.get(&row.address.key) {
            Some(&g) => groups[g].absorb(row),
            None => {
                index.insert(row.address.key.clone(), groups.len());
                groups.push(StopGroup::new(row_idx, row));
            }
        }
    }

    match order {
        GroupOrder::FirstSeen => {}
        GroupOrder::Key => groups.sort_by(|a, b| a.key.cmp(&b.key)),
        GroupOrder::Stop => groups.sort_by_key(StopGroup::final_stop),
    }
    groups
}

/// Wording for the generated annotations and headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "pt")]
    Portuguese,
}

impl Locale {
    /// Header of the ordering annotation column.
    pub fn observations_header(self) -> &'static str {
        match self {
            Locale::English => "Observations",
            Locale::Portuguese => "Observações",
        }
    }

    /// Header of the package count column.
    pub fn packages_header(self) -> &'static str {
        match self {
            Locale::English => "Total Packages",
            Locale::Portuguese => "Total de Pacotes",
        }
    }

    /// Render sequence numbers as an ordering note. `sequences` must be sorted.
    pub fn ordering_annotation(self, sequences: &[i64]) -> String {
        let (single, many, and) = match self {
            Locale::English => ("Order", "Orders for this stop:", "and"),
            Locale::Portuguese => ("Ordem", "Ordens para esta parada:", "e"),
        };
        match sequences {
            [] => String::new(),
            [only] => format!("{single} {only}"),
            [head @ .., last] => {
                let mut out = String::from(many);
                for (i, v) in head.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    let _ = write!(out, "{sep}{v}");
                }
                let _ = write!(out, " {and} {last}");
                out
            }
        }
    }

    /// Render a package count.
    pub fn package_annotation(self, count: usize) -> String {
        match self {
            Locale::English => format!("{count} packages"),
            Locale::Portuguese => format!("{count} pacotes"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "pt" | "pt-br" | "portuguese" => Ok(Self::Portuguese),
            other => Err(format!("unknown locale '{other}' (expected en/pt)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{group_rows, GroupOrder, InputRow, Locale};
    use crate::processing::address::ParsedAddress;
    use crate::types::Value;

    fn row(address: Option<&str>, sequence: i64, stop: i64, city: &str) -> InputRow {
        InputRow {
            address: ParsedAddress::parse(address),
            sequence,
            stop,
            city: Value::text(city),
            neighborhood: Value::text("Centro"),
            postal_code: Value::text("13000-000"),
        }
    }

    #[test]
    fn merges_rows_with_equal_keys_and_keeps_first_values() {
        let groups = group_rows(
            vec![
                row(Some("Rua A, 10"), 5, 3, "Campinas"),
                row(Some("Rua B, 1"), 1, 1, "Campinas"),
                row(Some("rua á, 10"), 2, 2, "Sumaré"),
            ],
            GroupOrder::FirstSeen,
        );

        assert_eq!(groups.len(), 2);
        let a = &groups[0];
        assert_eq!(a.address.street.as_deref(), Some("Rua A"));
        assert_eq!(a.city, Value::text("Campinas"));
        assert_eq!(a.sequences(), &[5, 2]);
        assert_eq!(a.stops(), &[3, 2]);
        assert_eq!(a.final_stop(), 2);
        assert_eq!(a.package_count(), 2);
        assert!(a.has_divergent_values());
        assert!(!groups[1].has_divergent_values());
    }

    #[test]
    fn duplicate_sequences_are_counted() {
        let groups = group_rows(
            vec![
                row(Some("Rua A, 10"), 4, 7, "X"),
                row(Some("Rua A, 10"), 4, 9, "X"),
                row(Some("Rua A, 10"), 1, 8, "X"),
            ],
            GroupOrder::FirstSeen,
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].package_count(), 3);
        assert_eq!(groups[0].sorted_sequences(), vec![1, 4, 4]);
        assert_eq!(groups[0].final_stop(), 7);
    }

    #[test]
    fn addressless_rows_collapse_into_one_group() {
        let mut first = row(None, 3, 4, "Primeira");
        first.neighborhood = Value::Null;
        let groups = group_rows(
            vec![first, row(Some("Rua A, 1"), 1, 1, "X"), row(None, 2, 5, "Segunda")],
            GroupOrder::FirstSeen,
        );
        assert_eq!(groups.len(), 2);
        let empty = &groups[0];
        assert_eq!(empty.address.street, None);
        assert_eq!(empty.city, Value::text("Primeira"));
        assert_eq!(empty.neighborhood, Value::Null);
        assert_eq!(empty.package_count(), 2);
        assert_eq!(empty.final_stop(), 4);
    }

    #[test]
    fn group_order_variants() {
        let rows = || {
            vec![
                row(Some("Rua C, 1"), 1, 9, "X"),
                row(Some("Rua A, 1"), 2, 5, "X"),
                row(Some("Rua B, 1"), 3, 7, "X"),
            ]
        };
        let streets = |order| {
            group_rows(rows(), order)
                .into_iter()
                .map(|g| g.key.street)
                .collect::<Vec<_>>()
        };
        assert_eq!(streets(GroupOrder::FirstSeen), vec!["rua c", "rua a", "rua b"]);
        assert_eq!(streets(GroupOrder::Key), vec!["rua a", "rua b", "rua c"]);
        assert_eq!(streets(GroupOrder::Stop), vec!["rua a", "rua b", "rua c"]);
    }

    #[test]
    fn ordering_annotation_english() {
        assert_eq!(Locale::English.ordering_annotation(&[7]), "Order 7");
        assert_eq!(Locale::English.ordering_annotation(&[1, 2]), "Orders for this stop: 1 and 2");
        assert_eq!(
            Locale::English.ordering_annotation(&[1, 2, 3]),
            "Orders for this stop: 1, 2 and 3"
        );
        assert_eq!(
            Locale::English.ordering_annotation(&[2, 2, 10]),
            "Orders for this stop: 2, 2 and 10"
        );
    }

    #[test]
    fn ordering_annotation_portuguese() {
        assert_eq!(Locale::Portuguese.ordering_annotation(&[7]), "Ordem 7");
        assert_eq!(
            Locale::Portuguese.ordering_annotation(&[1, 2, 3]),
            "Ordens para esta parada: 1, 2 e 3"
        );
        assert_eq!(Locale::Portuguese.package_annotation(3), "3 pacotes");
    }

    #[test]
    fn sorted_sequences_feed_the_annotation() {
        let groups = group_rows(
            vec![
                row(Some("Rua A, 1"), 3, 1, "X"),
                row(Some("Rua A, 1"), 1, 1, "X"),
                row(Some("Rua A, 1"), 2, 1, "X"),
            ],
            GroupOrder::FirstSeen,
        );
        let sorted = groups[0].sorted_sequences();
        assert_eq!(
            Locale::English.ordering_annotation(&sorted),
            "Orders for this stop: 1, 2 and 3"
        );
        assert_eq!(Locale::English.package_annotation(groups[0].package_count()), "3 packages");
    }

    #[test]
    fn locale_parses_from_str() {
        assert_eq!("pt-BR".parse::<Locale>(), Ok(Locale::Portuguese));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::English));
        assert!("fr".parse::<Locale>().is_err());
    }
}
