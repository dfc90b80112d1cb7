//! Line-oriented scan. Accumulates the lines of each top-level element and
//! screens the element once its closing line is read. Elements glued to the
//! array brackets (`[{` first line, `  }]` last line) are accepted too.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::{Flow, ScanStatus, Session};
use crate::constants::{is_close_line, OPEN_LINE};
use crate::options::SearchOptions;
use crate::{Error, Result};

pub(crate) fn scan<W: Write>(
    path: &Path,
    session: &mut Session<'_, W>,
    options: &SearchOptions,
) -> Result<ScanStatus> {
    let file = File::open(path).map_err(|err| Error::open(path, err))?;
    let mut reader = BufReader::with_capacity(options.chunk_size, file);
    let mut line = Vec::new();
    let mut element = Vec::new();
    let mut inside = false;

    loop {
        if session.cancelled() {
            return Ok(ScanStatus::Interrupted);
        }

        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;
        if read == 0 {
            return Ok(ScanStatus::Completed);
        }

        if let Some(brace) = element_open(&line) {
            inside = true;
            element.clear();
            element.extend_from_slice(&line[brace..]);
            continue;
        }
        if !inside {
            continue;
        }

        element.extend_from_slice(&line);
        if is_close_line(&line) {
            inside = false;
            if let Flow::Stop(halt) = session.screen(trim_element(&element))? {
                return Ok(halt.into());
            }
        }
    }
}

/// Offset of the element's opening brace when `line` starts a top-level
/// element: `  {` at the base indent, or `[{` for a first element glued to
/// the array bracket.
fn element_open(line: &[u8]) -> Option<usize> {
    if line.starts_with(OPEN_LINE) {
        return Some(OPEN_LINE.len() - 1);
    }
    let rest = line.strip_prefix(b"[")?;
    let skipped = rest.len() - rest.trim_ascii_start().len();
    (rest.get(skipped) == Some(&b'{')).then_some(1 + skipped)
}

/// Drops surrounding whitespace and whatever follows the closing brace on
/// its line: the separating comma, or the array bracket after the last
/// element.
fn trim_element(element: &[u8]) -> &[u8] {
    let trimmed = element.trim_ascii();
    trimmed
        .strip_suffix(b",")
        .or_else(|| trimmed.strip_suffix(b"]"))
        .unwrap_or(trimmed)
}
