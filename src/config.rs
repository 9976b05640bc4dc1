//! File-based configuration.
//!
//! Every key is optional; missing keys keep the [`ProcessOptions`] defaults.
//!
//! ```toml
//! profile = "keyword"        # or "legacy"
//! locale = "pt"              # or "en"
//! layout = "packages-first"  # or "observations-first"
//! order = "first-seen"       # or "key" / "stop"
//! state = "São Paulo"
//! sheet = "Rota"
//!
//! [columns]
//! address_fallback = "Unnamed: 4"
//! postal_code = ["zip", "postal", "cep"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{ProcessingError, ProcessingResult};
use crate::ingestion::SheetSelection;
use crate::processing::{
    ColumnProfile, ColumnRules, GroupOrder, Locale, OutputLayout, ProcessOptions, SynonymOverrides,
};

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub profile: Option<ColumnProfile>,
    pub locale: Option<Locale>,
    pub layout: Option<OutputLayout>,
    pub order: Option<GroupOrder>,
    pub state: Option<String>,
    pub sheet: Option<String>,
    pub columns: SynonymOverrides,
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ProcessingResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ProcessingResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ProcessingError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    /// Build processing options, falling back to defaults for unset keys.
    pub fn process_options(&self) -> ProcessingResult<ProcessOptions> {
        let defaults = ProcessOptions::default();
        let state = self.state.clone().unwrap_or(defaults.state);
        if state.trim().is_empty() {
            return Err(ProcessingError::Config {
                message: "state must not be empty".to_string(),
            });
        }

        Ok(ProcessOptions {
            columns: ColumnRules::for_profile(self.profile.unwrap_or_default())
                .with_overrides(&self.columns),
            locale: self.locale.unwrap_or(defaults.locale),
            layout: self.layout.unwrap_or(defaults.layout),
            state,
            order: self.order.unwrap_or(defaults.order),
        })
    }

    /// Sheet selection for workbook inputs.
    pub fn sheet_selection(&self) -> SheetSelection {
        match &self.sheet {
            Some(name) => SheetSelection::Named(name.clone()),
            None => SheetSelection::First,
        }
    }
}
