//! Address parsing and grouping-key normalization.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// First comma followed by optional whitespace and a digit run.
static STREET_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*(\d+)").expect("street/number pattern is valid"));

/// Key two rows must share to be merged into one stop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupKey {
    /// Normalized street name.
    pub street: String,
    /// House number exactly as parsed; empty when absent.
    pub number: String,
}

/// Street and house number split out of a raw address cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub street: Option<String>,
    pub number: Option<String>,
    pub key: GroupKey,
}

impl ParsedAddress {
    /// Parse a raw address; `None` (an empty cell) yields an addressless entry.
    ///
    /// The house number is the first digit run following a comma and the street is the text
    /// before that comma. Without a comma-number pair the whole input is the street.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self {
                street: None,
                number: None,
                key: GroupKey::default(),
            };
        };

        let (street, number) = match STREET_NUMBER.captures(raw) {
            Some(caps) => {
                let comma = caps.get(0).map_or(0, |m| m.start());
                let number = caps.get(1).map(|m| m.as_str().to_string());
                (raw[..comma].trim().to_string(), number)
            }
            None => (raw.to_string(), None),
        };

        let key = GroupKey {
            street: normalize_text(&street),
            number: number.clone().unwrap_or_default(),
        };
        Self {
            street: Some(street),
            number,
            key,
        }
    }

    /// `"street, number"`. Empty unless both parts are present, so an address with no house
    /// number leaves the Address Line blank.
    pub fn address_line(&self) -> Option<String> {
        match (&self.street, &self.number) {
            (Some(street), Some(number)) => Some(format!("{street}, {number}")),
            _ => None,
        }
    }
}

/// Fold text for comparison: strip accents, drop remaining non-ASCII, lowercase, trim and
/// collapse whitespace runs to one space.
pub fn normalize_text(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let lower = ascii.to_lowercase();

    let mut normalized = String::with_capacity(lower.len());
    for segment in lower.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
