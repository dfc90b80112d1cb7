//! Layout-independent scan: a streaming tokenizer that follows string and
//! nesting state byte by byte and cuts out every object that sits directly
//! inside the top-level array.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::{Flow, ScanStatus, Session};
use crate::options::SearchOptions;
use crate::{Error, Result};

pub(crate) fn scan<W: Write>(
    path: &Path,
    session: &mut Session<'_, W>,
    options: &SearchOptions,
) -> Result<ScanStatus> {
    let file = File::open(path).map_err(|err| Error::open(path, err))?;
    let mut reader = BufReader::with_capacity(options.chunk_size, file);
    let mut tokenizer = ElementTokenizer::default();

    loop {
        if session.cancelled() {
            return Ok(ScanStatus::Interrupted);
        }

        let chunk = reader
            .fill_buf()
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;
        if chunk.is_empty() {
            return Ok(ScanStatus::Completed);
        }

        let len = chunk.len();
        let mut offset = 0;
        while let Some(consumed) = tokenizer.feed(&chunk[offset..]) {
            offset += consumed;
            if let Flow::Stop(halt) = session.screen(tokenizer.element())? {
                return Ok(halt.into());
            }
        }
        reader.consume(len);
    }
}

#[derive(Debug, Default)]
pub(crate) struct ElementTokenizer {
    depth: usize,
    in_string: bool,
    escaped: bool,
    capturing: bool,
    element: Vec<u8>,
}

impl ElementTokenizer {
    /// Consumes `bytes` until a top-level element closes and returns how many
    /// bytes that took, or `None` if the whole slice was consumed without
    /// completing one.
    pub fn feed(&mut self, bytes: &[u8]) -> Option<usize> {
        let mut capture_from = self.capturing.then_some(0);

        for (idx, &byte) in bytes.iter().enumerate() {
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => self.in_string = true,
                b'{' | b'[' => {
                    self.depth += 1;
                    if self.depth == 2 && byte == b'{' {
                        self.capturing = true;
                        self.element.clear();
                        capture_from = Some(idx);
                    }
                }
                b'}' | b']' => {
                    if self.depth == 2 && self.capturing {
                        let start = capture_from.unwrap_or(0);
                        self.element.extend_from_slice(&bytes[start..=idx]);
                        self.capturing = false;
                        self.depth -= 1;
                        return Some(idx + 1);
                    }
                    self.depth = self.depth.saturating_sub(1);
                }
                _ => {}
            }
        }

        if let Some(start) = capture_from {
            self.element.extend_from_slice(&bytes[start..]);
        }
        None
    }

    /// The most recently completed element.
    pub fn element(&self) -> &[u8] {
        &self.element
    }
}
