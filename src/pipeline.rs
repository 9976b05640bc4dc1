//! File-to-file runs.
//!
//! A [`RunRequest`] reads a route table, processes it, and writes the stop table. The output
//! file is only created once processing has succeeded.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ProcessingResult;
use crate::export::{self, OutputFormat};
use crate::ingestion::{self, ReadOptions};
use crate::observability::{RunContext, RunObserver, RunSeverity, RunStats};
use crate::processing::{self, ProcessOptions};

/// File name used when no output path is given.
pub const DEFAULT_OUTPUT_NAME: &str = "saida_circuit.xlsx";

/// Default output location: [`DEFAULT_OUTPUT_NAME`] next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(DEFAULT_OUTPUT_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_NAME))
}

/// An owned description of one conversion.
#[derive(Clone)]
pub struct RunRequest {
    /// Route table to read.
    pub input: PathBuf,
    /// Stop table to write.
    pub output: PathBuf,
    /// Options controlling reading.
    pub read: ReadOptions,
    /// Options controlling processing.
    pub options: ProcessOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn RunObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: RunSeverity,
}

impl fmt::Debug for RunRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunRequest")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("read", &self.read)
            .field("options", &self.options)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl RunRequest {
    /// Request with default options and no observer.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            read: ReadOptions::default(),
            options: ProcessOptions::default(),
            observer: None,
            alert_at_or_above: RunSeverity::Critical,
        }
    }

    /// Attach an observer for run outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Execute the request.
    ///
    /// When an observer is configured, this reports:
    ///
    /// - `on_success` on success, with row/stop counts
    /// - `on_failure` on failure, with a computed severity
    /// - `on_alert` on failure when the severity is >= `alert_at_or_above`
    pub fn run(&self) -> ProcessingResult<RunStats> {
        let ctx = RunContext {
            input: self.input.clone(),
            output: self.output.clone(),
        };

        let result = self.run_inner();

        if let Some(obs) = self.observer.as_ref() {
            match &result {
                Ok(stats) => obs.on_success(&ctx, *stats),
                Err(e) => {
                    let sev = RunSeverity::for_error(e);
                    obs.on_failure(&ctx, sev, e);
                    if sev >= self.alert_at_or_above {
                        obs.on_alert(&ctx, sev, e);
                    }
                }
            }
        }

        result
    }

    fn run_inner(&self) -> ProcessingResult<RunStats> {
        // Resolve the output format before any work so a bad path fails fast.
        let out_format = OutputFormat::from_path(&self.output)?;

        let table = ingestion::read_table(&self.input, &self.read)?;
        tracing::debug!(
            input = %self.input.display(),
            rows = table.row_count(),
            headers = ?table.schema.field_names().collect::<Vec<_>>(),
            "route table loaded"
        );

        let processed = processing::process_detailed(&table, &self.options)?;
        export::write_table(&processed.table, &self.output, Some(out_format))?;

        Ok(RunStats {
            input_rows: processed.input_rows,
            groups: processed.groups.len(),
            divergent_groups: processed.divergent_groups(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::default_output_path;

    #[test]
    fn default_output_sits_next_to_input() {
        assert_eq!(
            default_output_path(Path::new("/data/rota.xlsx")),
            PathBuf::from("/data/saida_circuit.xlsx")
        );
        assert_eq!(
            default_output_path(Path::new("rota.xlsx")),
            PathBuf::from("saida_circuit.xlsx")
        );
    }
}
