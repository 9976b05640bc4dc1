//! Column resolution.
//!
//! Upstream exports do not agree on header names, so each semantic field is located by a
//! [`FieldRule`]: a list of header matchers tried against every (cleaned) header in column
//! order. The first header satisfying any matcher wins.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ProcessingError, ProcessingResult};
use crate::types::Schema;

/// Header used by the upstream export for its unlabeled fifth column.
pub const DEFAULT_ADDRESS_FALLBACK: &str = "Unnamed: 4";

/// A field the grouping engine needs from the input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticField {
    Address,
    Sequence,
    Stop,
    City,
    Neighborhood,
    PostalCode,
}

impl SemanticField {
    /// All fields, in resolution order.
    pub const ALL: [SemanticField; 6] = [
        SemanticField::Address,
        SemanticField::Sequence,
        SemanticField::Stop,
        SemanticField::City,
        SemanticField::Neighborhood,
        SemanticField::PostalCode,
    ];
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SemanticField::Address => "address",
            SemanticField::Sequence => "sequence",
            SemanticField::Stop => "stop",
            SemanticField::City => "city",
            SemanticField::Neighborhood => "neighborhood",
            SemanticField::PostalCode => "postal code",
        })
    }
}

/// Predicate over a single cleaned header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMatcher {
    /// Case-insensitive: header contains every listed term.
    ContainsAll(Vec<String>),
    /// Exact header text (after cleanup).
    Exact(String),
}

impl HeaderMatcher {
    /// Header contains `term`, ignoring case.
    pub fn contains(term: &str) -> Self {
        HeaderMatcher::ContainsAll(vec![term.to_lowercase()])
    }

    fn matches(&self, header: &str) -> bool {
        match self {
            HeaderMatcher::ContainsAll(terms) => {
                let lower = header.to_lowercase();
                terms.iter().all(|t| lower.contains(t.as_str()))
            }
            HeaderMatcher::Exact(name) => header == name,
        }
    }

    fn describe(&self) -> String {
        match self {
            HeaderMatcher::ContainsAll(terms) => terms.join("+"),
            HeaderMatcher::Exact(name) => format!("'{name}'"),
        }
    }
}

/// How one semantic field is located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: SemanticField,
    pub matchers: Vec<HeaderMatcher>,
    /// Exact header to use when no matcher hits.
    pub fallback: Option<String>,
}

impl FieldRule {
    /// Rule matching any header that contains one of `terms`.
    pub fn any_of(field: SemanticField, terms: &[&str]) -> Self {
        Self {
            field,
            matchers: terms.iter().map(|t| HeaderMatcher::contains(t)).collect(),
            fallback: None,
        }
    }

    /// Rule matching one exact header name.
    pub fn exact(field: SemanticField, name: &str) -> Self {
        Self {
            field,
            matchers: vec![HeaderMatcher::Exact(name.to_string())],
            fallback: None,
        }
    }

    fn address(fallback: &str) -> Self {
        Self {
            field: SemanticField::Address,
            matchers: vec![HeaderMatcher::ContainsAll(vec![
                "destination".to_string(),
                "address".to_string(),
            ])],
            fallback: Some(fallback.to_string()),
        }
    }

    fn resolve<'s>(&self, schema: &'s Schema) -> Option<&'s str> {
        schema
            .field_names()
            .find(|h| self.matchers.iter().any(|m| m.matches(h)))
            .or_else(|| {
                let fallback = self.fallback.as_deref()?;
                schema.field_names().find(|h| *h == fallback)
            })
    }

    fn candidates(&self) -> Vec<String> {
        self.matchers
            .iter()
            .map(HeaderMatcher::describe)
            .chain(self.fallback.iter().map(|f| format!("'{f}'")))
            .collect()
    }
}

/// Named synonym tables for the supported upstream export variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnProfile {
    /// Case-insensitive keyword search per field.
    #[default]
    Keyword,
    /// Exact header names of the original export layout.
    Legacy,
}

impl FromStr for ColumnProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(Self::Keyword),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown column profile '{other}' (expected keyword/legacy)")),
        }
    }
}

/// Per-field synonym overrides, typically loaded from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynonymOverrides {
    pub address_fallback: Option<String>,
    pub sequence: Option<Vec<String>>,
    pub stop: Option<Vec<String>>,
    pub city: Option<Vec<String>>,
    pub neighborhood: Option<Vec<String>>,
    pub postal_code: Option<Vec<String>>,
}

/// The full rule set used to resolve a table's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRules {
    rules: Vec<FieldRule>,
}

impl ColumnRules {
    /// Rule set for a named profile.
    pub fn for_profile(profile: ColumnProfile) -> Self {
        use SemanticField::*;

        let rules = match profile {
            ColumnProfile::Keyword => vec![
                FieldRule::address(DEFAULT_ADDRESS_FALLBACK),
                FieldRule::any_of(Sequence, &["sequence"]),
                FieldRule::any_of(Stop, &["stop"]),
                FieldRule::any_of(City, &["city"]),
                FieldRule::any_of(Neighborhood, &["bairro", "neighborhood"]),
                FieldRule::any_of(PostalCode, &["zip", "postal"]),
            ],
            ColumnProfile::Legacy => vec![
                FieldRule::address(DEFAULT_ADDRESS_FALLBACK),
                FieldRule::exact(Sequence, "Sequence"),
                FieldRule::exact(Stop, "Stop"),
                FieldRule::exact(City, "City"),
                FieldRule::exact(Neighborhood, "Bairro"),
                FieldRule::exact(PostalCode, "Zipcode/Postal code"),
            ],
        };
        Self { rules }
    }

    /// Replace rules with user-supplied keyword lists where present.
    pub fn with_overrides(mut self, overrides: &SynonymOverrides) -> Self {
        for rule in &mut self.rules {
            let terms = match rule.field {
                SemanticField::Address => {
                    if let Some(fallback) = &overrides.address_fallback {
                        rule.fallback = Some(fallback.clone());
                    }
                    continue;
                }
                SemanticField::Sequence => &overrides.sequence,
                SemanticField::Stop => &overrides.stop,
                SemanticField::City => &overrides.city,
                SemanticField::Neighborhood => &overrides.neighborhood,
                SemanticField::PostalCode => &overrides.postal_code,
            };
            if let Some(terms) = terms {
                rule.matchers = terms.iter().map(|t| HeaderMatcher::contains(t)).collect();
            }
        }
        self
    }

    /// Rule for `field`.
    pub fn rule(&self, field: SemanticField) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Resolve every semantic field against `schema`.
    ///
    /// Fails on the first field (in [`SemanticField::ALL`] order) that no header satisfies.
    pub fn resolve(&self, schema: &Schema) -> ProcessingResult<ResolvedColumns> {
        let mut resolved = ResolvedColumns::default();
        for field in SemanticField::ALL {
            let rule = self.rule(field).ok_or_else(|| ProcessingError::Config {
                message: format!("no column rule configured for {field}"),
            })?;
            let header = rule.resolve(schema).ok_or_else(|| ProcessingError::MissingColumn {
                field,
                candidates: rule.candidates(),
                headers: schema.field_names().map(str::to_string).collect(),
            })?;
            tracing::debug!(%field, header, "resolved column");
            resolved.set(field, header.to_string());
        }
        Ok(resolved)
    }
}

impl Default for ColumnRules {
    fn default() -> Self {
        Self::for_profile(ColumnProfile::default())
    }
}

/// Actual header name for each semantic field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub address: String,
    pub sequence: String,
    pub stop: String,
    pub city: String,
    pub neighborhood: String,
    pub postal_code: String,
}

impl ResolvedColumns {
    /// Header resolved for `field`.
    pub fn get(&self, field: SemanticField) -> &str {
        match field {
            SemanticField::Address => &self.address,
            SemanticField::Sequence => &self.sequence,
            SemanticField::Stop => &self.stop,
            SemanticField::City => &self.city,
            SemanticField::Neighborhood => &self.neighborhood,
            SemanticField::PostalCode => &self.postal_code,
        }
    }

    fn set(&mut self, field: SemanticField, header: String) {
        let slot = match field {
            SemanticField::Address => &mut self.address,
            SemanticField::Sequence => &mut self.sequence,
            SemanticField::Stop => &mut self.stop,
            SemanticField::City => &mut self.city,
            SemanticField::Neighborhood => &mut self.neighborhood,
            SemanticField::PostalCode => &mut self.postal_code,
        };
        *slot = header;
    }
}
