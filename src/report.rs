use std::io::{self, Write};

use crate::constants::SEPARATOR_WIDTH;
use crate::record::Record;

/// Streams confirmed matches to `writer`; keeps only their count.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    writer: W,
    matches: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, matches: 0 }
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    /// Writes a separator line and the pretty-printed record, then flushes
    /// so a consumer that went away is noticed on this very match.
    pub fn emit(&mut self, record: &Record) -> io::Result<()> {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        writeln!(self.writer, "{separator}")?;
        record.write_pretty(&mut self.writer)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.matches += 1;
        Ok(())
    }

    pub fn summary(&mut self) -> io::Result<()> {
        writeln!(self.writer, "{}", summary_line(self.matches))?;
        self.writer.flush()
    }
}

pub fn summary_line(matches: usize) -> String {
    if matches == 0 {
        "No results found.".to_string()
    } else {
        format!("Found {matches} match(es).")
    }
}

pub(crate) fn is_disconnect(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}
