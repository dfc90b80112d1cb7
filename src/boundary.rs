//! Expands a byte offset inside a top-level element of the canonical file to
//! the element's full byte range.
//!
//! Elements are delimited by their two-space indented braces:
//!
//! ```text
//! [
//!   {            <- "\n  {"  start marker
//!     "ariregistri_kood": 10000001,
//!     ...
//!   },           <- "\n  }," / "\n  }"  end marker
//! ```

use std::ops::Range;

use memchr::memchr;
use memchr::memmem::{Finder, FinderRev};

use crate::constants::{END_MARKER, START_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    pub fn slice(self, haystack: &[u8]) -> &[u8] {
        &haystack[self.range()]
    }
}

#[derive(Debug, Clone)]
pub struct BoundaryResolver {
    start: FinderRev<'static>,
    end: Finder<'static>,
    head_window: usize,
}

impl BoundaryResolver {
    pub fn new(head_window: usize) -> Self {
        Self {
            start: FinderRev::new(START_MARKER).into_owned(),
            end: Finder::new(END_MARKER).into_owned(),
            head_window,
        }
    }

    /// Returns `[opening brace, closing brace + 1)` of the element around
    /// `point`, or `None` when either side cannot be found.
    pub fn resolve(&self, haystack: &[u8], point: usize) -> Option<Span> {
        if point >= haystack.len() {
            return None;
        }
        let start = self.element_start(haystack, point)?;
        let end = self.element_end(haystack, point)?;
        (start < end).then_some(Span { start, end })
    }

    fn element_start(&self, haystack: &[u8], point: usize) -> Option<usize> {
        // a marker whose brace sits exactly on `point` still counts
        let before = &haystack[..point + 1];
        if let Some(marker) = self.start.rfind(before) {
            return Some(marker + START_MARKER.len() - 1);
        }

        // The first element can follow the array bracket directly (`[{`),
        // with no marker in front of it. Its brace is then the first one in
        // the file and has to sit in the head window.
        let head = &haystack[..before.len().min(self.head_window)];
        memchr(b'{', head)
    }

    fn element_end(&self, haystack: &[u8], point: usize) -> Option<usize> {
        // likewise a marker whose brace sits on or after `point`
        let from = point.saturating_sub(END_MARKER.len() - 1);
        let marker = from + self.end.find(&haystack[from..])?;
        Some(marker + END_MARKER.len())
    }
}

impl Default for BoundaryResolver {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_HEAD_WINDOW)
    }
}
