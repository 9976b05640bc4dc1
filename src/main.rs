use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use route_stop_grouper::config::Config;
use route_stop_grouper::ingestion::{ReadOptions, SheetSelection};
use route_stop_grouper::logging;
use route_stop_grouper::observability::TracingObserver;
use route_stop_grouper::pipeline::{default_output_path, RunRequest};
use route_stop_grouper::processing::{ColumnProfile, GroupOrder, Locale, OutputLayout};
use route_stop_grouper::ProcessingResult;

#[derive(Debug, Parser)]
#[command(name = "route-stop-grouper")]
#[command(about = "Group route spreadsheet rows by address into a stop list")]
struct Cli {
    /// Route spreadsheet (.xlsx, .xls, .ods, .csv)
    input: PathBuf,

    /// Output file (.xlsx or .csv); defaults to saida_circuit.xlsx next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worksheet to read (defaults to the first one)
    #[arg(long)]
    sheet: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column naming profile: keyword or legacy
    #[arg(long)]
    profile: Option<ColumnProfile>,

    /// Annotation language: en or pt
    #[arg(long)]
    locale: Option<Locale>,

    /// Annotation column order: observations-first or packages-first
    #[arg(long)]
    layout: Option<OutputLayout>,

    /// Value of the State column
    #[arg(long)]
    state: Option<String>,

    /// Output row order: first-seen, key or stop
    #[arg(long)]
    order: Option<GroupOrder>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_request(self) -> ProcessingResult<RunRequest> {
        let mut config = match &self.config {
            Some(path) => Config::from_path(path)?,
            None => Config::default(),
        };
        // Flags override the file.
        config.profile = self.profile.or(config.profile);
        config.locale = self.locale.or(config.locale);
        config.layout = self.layout.or(config.layout);
        config.order = self.order.or(config.order);
        config.state = self.state.or(config.state);
        config.sheet = self.sheet.or(config.sheet);

        let options = config.process_options()?;
        let output = self.output.unwrap_or_else(|| default_output_path(&self.input));
        let read = ReadOptions {
            sheet: config.sheet_selection(),
            ..Default::default()
        };
        if let SheetSelection::Named(name) = &read.sheet {
            tracing::debug!(sheet = %name, "reading named sheet");
        }

        Ok(RunRequest {
            read,
            options,
            ..RunRequest::new(self.input, output)
        }
        .with_observer(Arc::new(TracingObserver)))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let request = match cli.into_request() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?request, "starting run");

    match request.run() {
        Ok(stats) => {
            println!(
                "{} rows grouped into {} stops -> {}",
                stats.input_rows,
                stats.groups,
                request.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
