//! Layout constants of the canonical file written by the upstream merge
//! (`indent=2`, one object per top-level array element).

pub const BASE_INDENT: usize = 2;

/// Newline, two spaces and the opening brace of a top-level element.
pub const START_MARKER: &[u8] = b"\n  {";

/// Newline, two spaces and the closing brace of a top-level element. A
/// comma-terminated close (`\n  },`) shares this prefix.
pub const END_MARKER: &[u8] = b"\n  }";

pub const OPEN_LINE: &[u8] = b"  {";

pub const CLOSE_LINE: &[u8] = b"  }";

pub const CLOSE_LINE_COMMA: &[u8] = b"  },";

/// Last element glued to the closing array bracket, the mirror of `[{`.
pub const CLOSE_LINE_BRACKET: &[u8] = b"  }]";

pub const DEFAULT_CODE_KEY: &str = "ariregistri_kood";

pub const DEFAULT_NAME_KEY: &str = "nimi";

pub const DEFAULT_FILE: &str = "merged_registry.json";

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

pub const DEFAULT_HEAD_WINDOW: usize = 5000;

pub const DEFAULT_SEARCH_WINDOW: usize = 64 * 1024 * 1024;

pub const SEPARATOR_WIDTH: usize = 40;

#[inline]
pub fn is_close_line(line: &[u8]) -> bool {
    let trimmed = line.trim_ascii_end();
    trimmed == CLOSE_LINE || trimmed == CLOSE_LINE_COMMA || trimmed == CLOSE_LINE_BRACKET
}
