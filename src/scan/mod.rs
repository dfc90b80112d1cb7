//! Scan loop shared by the three strategies: locate a candidate, resolve it,
//! verify it, report it.

pub(crate) mod mapped;
pub(crate) mod sequential;
pub(crate) mod structural;

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::options::{RecordLayout, SearchOptions, Strategy};
use crate::query::Query;
use crate::report::{is_disconnect, Reporter};
use crate::verify::{verify, Verdict};
use crate::{Error, Result};

/// Interrupt request shared with a signal handler; polled at the top of
/// every scan iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// File exhausted, or the single match of an identifier query found.
    Completed,
    Interrupted,
    /// The output consumer went away.
    Disconnected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub raw_hits: usize,
    pub candidates: usize,
    pub prefiltered: usize,
    pub unresolved: usize,
    pub undecodable: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub status: ScanStatus,
    pub matches: usize,
    pub stats: ScanStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Halt {
    FirstMatch,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Stop(Halt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Checked {
    Confirmed,
    Rejected,
    Undecodable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub checked: Checked,
    pub flow: Flow,
}

impl From<Halt> for ScanStatus {
    fn from(halt: Halt) -> Self {
        match halt {
            Halt::FirstMatch => ScanStatus::Completed,
            Halt::Disconnected => ScanStatus::Disconnected,
        }
    }
}

/// Per-invocation state: the query, the reporter, counters and the cancel
/// flag. Nothing here outlives one scan.
pub(crate) struct Session<'a, W: Write> {
    query: &'a Query,
    layout: &'a RecordLayout,
    reporter: Reporter<W>,
    cancel: &'a CancelFlag,
    pub stats: ScanStats,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(
        query: &'a Query,
        layout: &'a RecordLayout,
        writer: W,
        cancel: &'a CancelFlag,
    ) -> Self {
        Self {
            query,
            layout,
            reporter: Reporter::new(writer),
            cancel,
            stats: ScanStats::default(),
        }
    }

    pub fn query(&self) -> &'a Query {
        self.query
    }

    pub fn cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Raw pre-check, then decode and verify. Used by the streaming
    /// strategies, which see whole elements rather than raw hits.
    pub fn screen(&mut self, element: &[u8]) -> Result<Flow> {
        if !self.query.prefilter(element) {
            self.stats.prefiltered += 1;
            return Ok(Flow::Continue);
        }
        self.stats.raw_hits += 1;
        self.check(element).map(|step| step.flow)
    }

    pub fn check(&mut self, span: &[u8]) -> Result<Step> {
        self.stats.candidates += 1;
        let record = match verify(span, self.query, self.layout) {
            Verdict::Confirmed(record) => record,
            Verdict::Rejected => {
                self.stats.rejected += 1;
                return Ok(Step {
                    checked: Checked::Rejected,
                    flow: Flow::Continue,
                });
            }
            Verdict::Undecodable => {
                self.stats.undecodable += 1;
                trace!(len = span.len(), "candidate span did not decode");
                return Ok(Step {
                    checked: Checked::Undecodable,
                    flow: Flow::Continue,
                });
            }
        };

        trace!(
            code = record.code(),
            name = record.name().unwrap_or_default(),
            "confirmed"
        );
        if let Err(err) = self.reporter.emit(&record) {
            if is_disconnect(&err) {
                return Ok(Step {
                    checked: Checked::Confirmed,
                    flow: Flow::Stop(Halt::Disconnected),
                });
            }
            return Err(Error::io("failed to write match", err));
        }

        let flow = if self.query.is_exact() {
            Flow::Stop(Halt::FirstMatch)
        } else {
            Flow::Continue
        };
        Ok(Step {
            checked: Checked::Confirmed,
            flow,
        })
    }

    fn finish(mut self, status: ScanStatus) -> Result<ScanReport> {
        let status = match status {
            ScanStatus::Completed => match self.reporter.summary() {
                Ok(()) => ScanStatus::Completed,
                Err(err) if is_disconnect(&err) => ScanStatus::Disconnected,
                Err(err) => return Err(Error::io("failed to write summary", err)),
            },
            other => other,
        };
        Ok(ScanReport {
            status,
            matches: self.reporter.matches(),
            stats: self.stats,
        })
    }
}

pub(crate) fn run<W: Write>(
    path: &Path,
    query: &Query,
    writer: W,
    options: &SearchOptions,
    cancel: &CancelFlag,
) -> Result<ScanReport> {
    debug!(
        path = %path.display(),
        strategy = %options.strategy,
        exact = query.is_exact(),
        "scanning"
    );
    let mut session = Session::new(query, &options.layout, writer, cancel);
    let status = match options.strategy {
        Strategy::Mapped => mapped::scan(path, &mut session, options)?,
        Strategy::Sequential => sequential::scan(path, &mut session, options)?,
        Strategy::Structural => structural::scan(path, &mut session, options)?,
    };
    let report = session.finish(status)?;
    let stats = report.stats;
    debug!(
        status = ?report.status,
        matches = report.matches,
        raw_hits = stats.raw_hits,
        candidates = stats.candidates,
        prefiltered = stats.prefiltered,
        unresolved = stats.unresolved,
        undecodable = stats.undecodable,
        rejected = stats.rejected,
        "scan finished"
    );
    Ok(report)
}
