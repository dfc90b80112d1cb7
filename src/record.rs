use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};

use crate::options::RecordLayout;

/// One decoded top-level element. Field order is kept as it was in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    code: u64,
    fields: Map<String, Value>,
    name_key: String,
}

impl Record {
    pub fn decode(raw: &[u8], layout: &RecordLayout) -> Option<Self> {
        let value = serde_json::from_slice::<Value>(raw).ok()?;
        Self::from_value(value, layout)
    }

    pub fn from_value(value: Value, layout: &RecordLayout) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        let code = fields.get(&layout.code_key).and_then(Value::as_u64)?;
        Some(Self {
            code,
            fields,
            name_key: layout.name_key.clone(),
        })
    }

    pub fn code(&self) -> u64 {
        self.code
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get(&self.name_key).and_then(Value::as_str)
    }

    /// Single-line text form every strategy matches substring queries
    /// against: `", "` and `": "` separators, non-ASCII left unescaped.
    pub fn normalized(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, NormalizedFormatter);
        if self.fields.serialize(&mut serializer).is_err() {
            out.clear();
        }
        out
    }

    /// Two-space indented form used when a match is reported.
    pub fn write_pretty<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        let formatter = PrettyFormatter::with_indent(b"  ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.fields.serialize(&mut serializer).map_err(io::Error::from)
    }
}

struct NormalizedFormatter;

impl Formatter for NormalizedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn layout() -> RecordLayout {
        RecordLayout::default()
    }

    fn pretty(record: &Record) -> String {
        let mut out = Vec::new();
        record.write_pretty(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[rstest::rstest]
    fn test_decode_keeps_field_order() {
        let raw = r#"{
    "ariregistri_kood": 10000001,
    "nimi": "Alpha OÜ",
    "asukoht": "Tallinn"
  }"#;
        let record = Record::decode(raw.as_bytes(), &layout()).unwrap();
        assert_eq!(record.code(), 10000001);
        assert_eq!(record.name(), Some("Alpha OÜ"));
        assert_eq!(
            pretty(&record),
            "{\n  \"ariregistri_kood\": 10000001,\n  \"nimi\": \"Alpha OÜ\",\n  \"asukoht\": \"Tallinn\"\n}"
        );
    }

    #[rstest::rstest]
    #[case(&b"{\"ariregistri_kood\": 1, \"nimi\": \"x\"} trailing"[..])]
    #[case(&b"{\"ariregistri_kood\": 1,"[..])]
    #[case(&b"{\"nimi\": \"no code\"}"[..])]
    #[case(&b"{\"ariregistri_kood\": \"1\"}"[..])]
    #[case(&b"{\"ariregistri_kood\": -5}"[..])]
    #[case(&b"[1, 2]"[..])]
    fn test_decode_rejects_non_records(#[case] raw: &[u8]) {
        assert!(Record::decode(raw, &layout()).is_none());
    }

    #[rstest::rstest]
    fn test_normalized_form() {
        let record = Record::from_value(
            json!({
                "ariregistri_kood": 10000002,
                "nimi": "Beta \"AS\"",
                "osanikud": [{"isik": "Õie Mägi"}, {"isik": "Jaan"}]
            }),
            &layout(),
        )
        .unwrap();
        let normalized = String::from_utf8(record.normalized()).unwrap();
        assert_eq!(
            normalized,
            r#"{"ariregistri_kood": 10000002, "nimi": "Beta \"AS\"", "osanikud": [{"isik": "Õie Mägi"}, {"isik": "Jaan"}]}"#
        );
    }

    #[rstest::rstest]
    fn test_pretty_form_uses_two_space_indent() {
        let record = Record::from_value(
            json!({"ariregistri_kood": 1, "nimi": "Õun", "tags": []}),
            &layout(),
        )
        .unwrap();
        assert_eq!(
            pretty(&record),
            "{\n  \"ariregistri_kood\": 1,\n  \"nimi\": \"Õun\",\n  \"tags\": []\n}"
        );
    }

    #[rstest::rstest]
    fn test_custom_layout() {
        let layout = RecordLayout::new("code", "name");
        let record = Record::from_value(json!({"code": 3, "name": "Gamma"}), &layout).unwrap();
        assert_eq!(record.code(), 3);
        assert_eq!(record.name(), Some("Gamma"));
        assert!(Record::from_value(json!({"code": 3}), &RecordLayout::default()).is_none());
    }
}
