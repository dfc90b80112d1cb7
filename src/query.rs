//! Search term classification and the raw byte matchers derived from it.

use memchr::memmem::Finder;
use regex::bytes::{Regex, RegexBuilder};

use crate::options::RecordLayout;
use crate::record::Record;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    ExactCode(u64),
    Substring(String),
}

#[derive(Debug, Clone)]
pub struct Query {
    term: String,
    kind: QueryKind,
    matcher: Regex,
    digits: Finder<'static>,
    code_pattern: Finder<'static>,
}

impl Query {
    pub fn parse(term: &str, layout: &RecordLayout) -> Result<Self> {
        if term.trim().is_empty() {
            return Err(Error::invalid_query("search term is empty"));
        }

        let kind = if term.bytes().all(|byte| byte.is_ascii_digit()) {
            let code = term
                .parse::<u64>()
                .map_err(|_| Error::invalid_query(format!("registry code {term} is out of range")))?;
            QueryKind::ExactCode(code)
        } else {
            QueryKind::Substring(term.to_string())
        };

        let matcher = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()?;

        let mut buffer = itoa::Buffer::new();
        let canonical = match kind {
            QueryKind::ExactCode(code) => buffer.format(code).as_bytes().to_vec(),
            QueryKind::Substring(_) => Vec::new(),
        };
        let code_pattern = build_code_pattern(&layout.code_key, &canonical);

        Ok(Self {
            term: term.to_string(),
            kind,
            matcher,
            digits: Finder::new(&canonical).into_owned(),
            code_pattern: Finder::new(&code_pattern).into_owned(),
        })
    }

    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    pub fn is_exact(&self) -> bool {
        matches!(self.kind, QueryKind::ExactCode(_))
    }

    /// `"<code key>": <digits>` as the merge step serializes it.
    pub fn code_pattern(&self) -> &[u8] {
        self.code_pattern.needle()
    }

    pub fn find_code(&self, haystack: &[u8]) -> Option<usize> {
        self.code_pattern.find(haystack)
    }

    pub fn find_term(&self, haystack: &[u8]) -> Option<usize> {
        self.matcher.find(haystack).map(|found| found.start())
    }

    /// Upper bound on the byte length of a raw hit, used as the overlap
    /// between consecutive search windows.
    pub fn max_hit_len(&self) -> usize {
        match self.kind {
            QueryKind::ExactCode(_) => self.code_pattern().len() + 1,
            // case folding can widen a character up to three bytes
            QueryKind::Substring(_) => self.term.len() * 4,
        }
    }

    /// Cheap raw check over one element's text before it is decoded.
    pub fn prefilter(&self, raw: &[u8]) -> bool {
        match self.kind {
            QueryKind::ExactCode(_) => self.digits.find(raw).is_some(),
            QueryKind::Substring(_) => self.matcher.is_match(raw),
        }
    }

    /// The authoritative predicate, applied to a decoded record.
    pub fn matches(&self, record: &Record) -> bool {
        match self.kind {
            QueryKind::ExactCode(code) => record.code() == code,
            QueryKind::Substring(_) => self.matcher.is_match(&record.normalized()),
        }
    }
}

fn build_code_pattern(code_key: &str, digits: &[u8]) -> Vec<u8> {
    let mut pattern = Vec::with_capacity(code_key.len() + digits.len() + 4);
    pattern.push(b'"');
    pattern.extend_from_slice(code_key.as_bytes());
    pattern.extend_from_slice(b"\": ");
    pattern.extend_from_slice(digits);
    pattern
}
