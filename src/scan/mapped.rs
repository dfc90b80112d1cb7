//! Fast path: raw byte search over a read-only memory map of the file.
//!
//! Precondition: the file uses the two-space element layout documented in
//! [`crate::boundary`]. Files in any other layout yield no matches here; use
//! the structural strategy for those.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use memmap2::Mmap;
use tracing::trace;

use super::{Checked, Flow, ScanStatus, Session};
use crate::boundary::BoundaryResolver;
use crate::options::SearchOptions;
use crate::query::QueryKind;
use crate::{Error, Result};

pub(crate) fn scan<W: Write>(
    path: &Path,
    session: &mut Session<'_, W>,
    options: &SearchOptions,
) -> Result<ScanStatus> {
    let file = File::open(path).map_err(|err| Error::open(path, err))?;
    let len = file
        .metadata()
        .map_err(|err| Error::io(format!("failed to stat {}", path.display()), err))?
        .len();
    if len == 0 {
        return Ok(ScanStatus::Completed);
    }

    // SAFETY: the map is read-only and dropped before this function returns.
    // The canonical file is not rewritten while it is being searched.
    let map = unsafe { Mmap::map(&file) }
        .map_err(|err| Error::io(format!("failed to map {}", path.display()), err))?;

    let scanner = MappedScan {
        haystack: &map,
        resolver: BoundaryResolver::new(options.head_window),
        window: options.search_window,
        overlap: session.query().max_hit_len(),
    };
    match session.query().kind() {
        QueryKind::ExactCode(_) => scanner.scan_code(session),
        QueryKind::Substring(_) => scanner.scan_term(session),
    }
}

enum Probe {
    Hit(usize),
    Exhausted,
    Cancelled,
}

struct MappedScan<'m> {
    haystack: &'m [u8],
    resolver: BoundaryResolver,
    window: usize,
    overlap: usize,
}

impl MappedScan<'_> {
    /// Leftmost hit at or after `cursor`. The map is searched one window at
    /// a time so an interrupt is noticed even across long hit-free stretches.
    fn next_hit<W, F>(&self, mut cursor: usize, session: &Session<'_, W>, find: F) -> Probe
    where
        W: Write,
        F: Fn(&[u8]) -> Option<usize>,
    {
        let len = self.haystack.len();
        loop {
            if session.cancelled() {
                return Probe::Cancelled;
            }
            if cursor >= len {
                return Probe::Exhausted;
            }
            let end = cursor
                .saturating_add(self.window)
                .saturating_add(self.overlap)
                .min(len);
            if let Some(offset) = find(&self.haystack[cursor..end]) {
                return Probe::Hit(cursor + offset);
            }
            if end == len {
                return Probe::Exhausted;
            }
            cursor = end - self.overlap;
        }
    }

    fn scan_code<W: Write>(&self, session: &mut Session<'_, W>) -> Result<ScanStatus> {
        let query = session.query();
        let pattern_len = query.code_pattern().len();
        let mut cursor = 0;
        loop {
            let idx = match self.next_hit(cursor, session, |window| query.find_code(window)) {
                Probe::Hit(idx) => idx,
                Probe::Exhausted => return Ok(ScanStatus::Completed),
                Probe::Cancelled => return Ok(ScanStatus::Interrupted),
            };
            cursor = idx + 1;
            session.stats.raw_hits += 1;

            // "…": 1234 also matches inside "…": 12345
            let next = self.haystack.get(idx + pattern_len).copied();
            if next.is_some_and(|byte| byte.is_ascii_digit()) {
                continue;
            }

            let Some(span) = self.resolver.resolve(self.haystack, idx) else {
                session.stats.unresolved += 1;
                trace!(offset = idx, "no element boundary around code hit");
                continue;
            };
            let step = session.check(span.slice(self.haystack))?;
            if let Flow::Stop(halt) = step.flow {
                return Ok(halt.into());
            }
        }
    }

    fn scan_term<W: Write>(&self, session: &mut Session<'_, W>) -> Result<ScanStatus> {
        let query = session.query();
        let mut cursor = 0;
        loop {
            let idx = match self.next_hit(cursor, session, |window| query.find_term(window)) {
                Probe::Hit(idx) => idx,
                Probe::Exhausted => return Ok(ScanStatus::Completed),
                Probe::Cancelled => return Ok(ScanStatus::Interrupted),
            };
            session.stats.raw_hits += 1;

            let Some(span) = self.resolver.resolve(self.haystack, idx) else {
                session.stats.unresolved += 1;
                trace!(offset = idx, "no element boundary around term hit");
                cursor = idx + 1;
                continue;
            };
            let step = session.check(span.slice(self.haystack))?;
            if let Flow::Stop(halt) = step.flow {
                return Ok(halt.into());
            }

            // Every other hit inside a decoded element resolves to the same
            // span, so skip past it whether or not it matched.
            cursor = match step.checked {
                Checked::Confirmed | Checked::Rejected => span.end.max(idx + 1),
                Checked::Undecodable => idx + 1,
            };
        }
    }
}
