//! Run outcome reporting.
//!
//! A [`RunObserver`] is told how each [`crate::pipeline::RunRequest`] ended. The default sink,
//! [`TracingObserver`], forwards outcomes to `tracing`.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ProcessingError;

/// Severity of a failed run, used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunSeverity {
    /// Error-level event (the run failed on its input).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

impl RunSeverity {
    /// Classify a failed run.
    pub fn for_error(e: &ProcessingError) -> Self {
        match e {
            ProcessingError::Io(_) => RunSeverity::Critical,
            ProcessingError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => RunSeverity::Critical,
                _ => RunSeverity::Error,
            },
            // Workbook errors often wrap I/O without a dedicated variant.
            ProcessingError::Excel(err) if error_chain_contains_io(err) => RunSeverity::Critical,
            ProcessingError::Xlsx(err) if error_chain_contains_io(err) => RunSeverity::Critical,
            ProcessingError::Excel(_)
            | ProcessingError::Xlsx(_)
            | ProcessingError::Config { .. }
            | ProcessingError::UnsupportedFormat { .. }
            | ProcessingError::SchemaMismatch { .. }
            | ProcessingError::MissingColumn { .. }
            | ProcessingError::TypeConversion { .. } => RunSeverity::Error,
        }
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Context about a run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Route table that was read.
    pub input: PathBuf,
    /// Stop table destination.
    pub output: PathBuf,
}

/// Stats reported on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Number of route rows read.
    pub input_rows: usize,
    /// Number of stops written.
    pub groups: usize,
    /// Stops whose merged rows disagreed on neighborhood/city/postal code/street text.
    pub divergent_groups: usize,
}

/// Observer interface for run outcomes.
pub trait RunObserver: Send + Sync {
    /// Called when a run succeeds.
    fn on_success(&self, _ctx: &RunContext, _stats: RunStats) {}

    /// Called when a run fails.
    fn on_failure(&self, _ctx: &RunContext, _severity: RunSeverity, _error: &ProcessingError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &RunContext, severity: RunSeverity, error: &ProcessingError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn RunObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn RunObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl RunObserver for CompositeObserver {
    fn on_success(&self, ctx: &RunContext, stats: RunStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &RunContext, severity: RunSeverity, error: &ProcessingError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &RunContext, severity: RunSeverity, error: &ProcessingError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs run outcomes through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_success(&self, ctx: &RunContext, stats: RunStats) {
        tracing::info!(
            input = %ctx.input.display(),
            output = %ctx.output.display(),
            rows = stats.input_rows,
            stops = stats.groups,
            "stop table written"
        );
        if stats.divergent_groups > 0 {
            tracing::warn!(
                groups = stats.divergent_groups,
                "merged rows disagree on neighborhood/city/postal code; first row kept"
            );
        }
    }

    // The caller prints the error itself; failures are debug-level context only.
    fn on_failure(&self, ctx: &RunContext, severity: RunSeverity, error: &ProcessingError) {
        tracing::debug!(
            ?severity,
            input = %ctx.input.display(),
            err = %error,
            "run failed"
        );
    }

    fn on_alert(&self, ctx: &RunContext, severity: RunSeverity, error: &ProcessingError) {
        tracing::debug!(
            alert = true,
            ?severity,
            input = %ctx.input.display(),
            err = %error,
            "run failed"
        );
    }
}
