//! Reading route tables from disk.
//!
//! Most callers should use [`read_table`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`ReadOptions`])
//! - loads the first sheet (or a named one) into an in-memory [`crate::types::DataSet`]
//!
//! Headers are taken verbatim; cleanup and column resolution happen in
//! [`crate::processing`].

pub mod csv;
pub mod excel;
pub mod unified;

pub use unified::{read_table, InputFormat, ReadOptions, SheetSelection};

/// Name given to a blank header cell at column `idx` (0-based).
pub(crate) fn unnamed_header(idx: usize) -> String {
    format!("Unnamed: {idx}")
}

/// Make header names unique by suffixing repeats with `.1`, `.2`, ...
pub(crate) fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for h in headers {
        let mut candidate = h.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{h}.{n}");
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}
