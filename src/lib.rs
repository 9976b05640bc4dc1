//! `route-stop-grouper` turns a delivery-route spreadsheet exported by a logistics platform into
//! a stop list for a route-planning tool.
//!
//! Rows that point at the same physical address (same street, ignoring case, accents and extra
//! spaces, and the same house number) are merged into one stop. Each stop carries the lowest
//! stop number of its rows, a note listing the package sequence numbers in ascending order,
//! and a package count.
//!
//! The primary entrypoint is [`processing::process`], a pure function from an in-memory
//! [`types::DataSet`] to the output [`types::DataSet`]. [`pipeline::RunRequest`] wraps it with
//! file reading ([`ingestion`]) and writing ([`export`]).
//!
//! ## Quick example: file to file
//!
//! ```no_run
//! use route_stop_grouper::pipeline::RunRequest;
//!
//! # fn main() -> Result<(), route_stop_grouper::ProcessingError> {
//! let stats = RunRequest::new("rota.xlsx", "saida_circuit.xlsx").run()?;
//! println!("rows={} stops={}", stats.input_rows, stats.groups);
//! # Ok(())
//! # }
//! ```
//!
//! ## Output columns
//!
//! `Stop Name`, `Address Line`, `Secondary Address Line`, `City`, `State`, `Zip Code`, then the
//! ordering note and the package count (order selectable with
//! [`processing::OutputLayout`]).
//!
//! ## Modules
//!
//! - [`types`]: in-memory table types
//! - [`ingestion`]: workbook/CSV reading
//! - [`processing`]: column resolution, address parsing, grouping and rendering
//! - [`export`]: workbook/CSV writing
//! - [`config`]: TOML configuration
//! - [`pipeline`] and [`observability`]: file-to-file runs and outcome reporting
//! - [`error`]: error type shared by every stage

pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
#[cfg(feature = "cli")]
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{ProcessingError, ProcessingResult};
