use crate::options::RecordLayout;
use crate::query::Query;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Confirmed(Record),
    /// Decoded fine, but the record does not satisfy the query.
    Rejected,
    /// Not a single JSON object carrying an integer identifier; usually a
    /// mis-resolved boundary.
    Undecodable,
}

/// Decodes a candidate span and applies the query to the decoded record
/// rather than to the raw bytes.
pub fn verify(raw: &[u8], query: &Query, layout: &RecordLayout) -> Verdict {
    let Some(record) = Record::decode(raw, layout) else {
        return Verdict::Undecodable;
    };
    if query.matches(&record) {
        Verdict::Confirmed(record)
    } else {
        Verdict::Rejected
    }
}
