use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CODE_KEY, DEFAULT_HEAD_WINDOW, DEFAULT_NAME_KEY,
    DEFAULT_SEARCH_WINDOW,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Byte-pattern search over a read-only memory map. Requires the canonical
    /// two-space layout.
    #[default]
    Mapped,
    /// Line-oriented scan keyed on the two-space top-level indent.
    Sequential,
    /// Brace-depth tokenizer; independent of the file's whitespace layout.
    Structural,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Mapped => "mapped",
            Strategy::Sequential => "sequential",
            Strategy::Structural => "structural",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mapped" | "mmap" => Ok(Strategy::Mapped),
            "sequential" | "lines" => Ok(Strategy::Sequential),
            "structural" => Ok(Strategy::Structural),
            _ => Err(format!(
                "Invalid strategy \"{raw}\". Valid strategies are: mapped, sequential, structural"
            )),
        }
    }
}

/// Key names of the identifier and name fields of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    pub code_key: String,
    pub name_key: String,
}

impl RecordLayout {
    pub fn new(code_key: impl Into<String>, name_key: impl Into<String>) -> Self {
        Self {
            code_key: code_key.into(),
            name_key: name_key.into(),
        }
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_KEY, DEFAULT_NAME_KEY)
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub strategy: Strategy,
    pub layout: RecordLayout,
    /// Read buffer capacity of the streaming strategies.
    pub chunk_size: usize,
    /// How far into the file the first element's brace may sit when it has
    /// no start marker in front of it.
    pub head_window: usize,
    /// Bytes searched by the mapped strategy between cancellation checks.
    pub search_window: usize,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_head_window(mut self, head_window: usize) -> Self {
        self.head_window = head_window;
        self
    }

    pub fn with_search_window(mut self, search_window: usize) -> Self {
        self.search_window = search_window.max(1);
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            layout: RecordLayout::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            head_window: DEFAULT_HEAD_WINDOW,
            search_window: DEFAULT_SEARCH_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("mapped", Strategy::Mapped)]
    #[case("MMAP", Strategy::Mapped)]
    #[case(" sequential ", Strategy::Sequential)]
    #[case("structural", Strategy::Structural)]
    fn test_strategy_from_str(#[case] raw: &str, #[case] expected: Strategy) {
        assert_eq!(raw.parse::<Strategy>(), Ok(expected));
    }

    #[rstest::rstest]
    fn test_strategy_from_str_rejects_unknown() {
        let err = "fast".parse::<Strategy>().unwrap_err();
        assert!(err.contains("Invalid strategy \"fast\""));
    }

    #[rstest::rstest]
    fn test_builder_clamps_sizes() {
        let options = SearchOptions::new()
            .with_chunk_size(0)
            .with_search_window(0)
            .with_strategy(Strategy::Structural);
        assert_eq!(options.chunk_size, 1);
        assert_eq!(options.search_window, 1);
        assert_eq!(options.strategy, Strategy::Structural);
        assert_eq!(options.layout.code_key, "ariregistri_kood");
    }
}
