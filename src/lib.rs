//! Locates records in very large pretty-printed JSON array exports (the merged
//! business register file) by exact registry code or case-insensitive
//! substring, without parsing the whole file.
//!
//! Every strategy follows the same pipeline: find a candidate, expand it to
//! the enclosing top-level element, decode that element and re-apply the
//! query to the decoded record, then report it.

pub mod boundary;
pub mod constants;
pub mod error;
pub mod options;
pub mod query;
pub mod record;
pub mod report;
pub mod scan;
pub mod verify;

use std::io::Write;
use std::path::Path;

pub use crate::boundary::{BoundaryResolver, Span};
pub use crate::error::Error;
pub use crate::options::{RecordLayout, SearchOptions, Strategy};
pub use crate::query::{Query, QueryKind};
pub use crate::record::Record;
pub use crate::report::{summary_line, Reporter};
pub use crate::scan::{CancelFlag, ScanReport, ScanStats, ScanStatus};
pub use crate::verify::{verify, Verdict};

pub type Result<T> = std::result::Result<T, Error>;

pub fn search<P: AsRef<Path>, W: Write>(path: P, term: &str, writer: W) -> Result<ScanReport> {
    search_with_options(
        path,
        term,
        writer,
        &SearchOptions::default(),
        &CancelFlag::new(),
    )
}

pub fn search_with_options<P: AsRef<Path>, W: Write>(
    path: P,
    term: &str,
    writer: W,
    options: &SearchOptions,
    cancel: &CancelFlag,
) -> Result<ScanReport> {
    let query = Query::parse(term, &options.layout)?;
    search_query(path, &query, writer, options, cancel)
}

pub fn search_query<P: AsRef<Path>, W: Write>(
    path: P,
    query: &Query,
    writer: W,
    options: &SearchOptions,
    cancel: &CancelFlag,
) -> Result<ScanReport> {
    scan::run(path.as_ref(), query, writer, options, cancel)
}
