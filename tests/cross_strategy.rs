mod common;

use common::{pretty_registry, printed_codes, run, write_file};
use proptest::prelude::*;
use registry_scan::Strategy as ScanStrategy;
use serde_json::{json, Value};
use tempfile::TempDir;

const FIRST_CODE: u64 = 10000000;

fn entry() -> impl proptest::strategy::Strategy<Value = (String, Option<String>)> {
    let name = "[A-Za-zÕÄÖÜõäöü {},\"\\\\]{0,12}";
    (name, proptest::option::of(name))
}

fn registry(entries: &[(String, Option<String>)]) -> Value {
    let records: Vec<_> = entries
        .iter()
        .zip(FIRST_CODE..)
        .map(|((name, partner), code)| match partner {
            Some(partner) => json!({
                "ariregistri_kood": code,
                "nimi": name,
                "osanikud": [{"isik": partner}]
            }),
            None => json!({"ariregistri_kood": code, "nimi": name}),
        })
        .collect();
    Value::Array(records)
}

/// Text as it appears inside a serialized JSON string.
fn escaped(name: &str) -> String {
    let quoted = serde_json::to_string(name).unwrap();
    quoted[1..quoted.len() - 1].to_string()
}

fn search_term() -> impl proptest::strategy::Strategy<Value = String> {
    "[a-zõäöü {},\"\\\\]{1,2}"
        .prop_filter("blank terms are rejected", |term| !term.trim().is_empty())
}

fn codes(entries: &[(String, Option<String>)], term: &str, strategy: ScanStrategy) -> (Vec<u64>, String) {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), &pretty_registry(&registry(entries)));
    let (_, output) = run(&path, term, strategy);
    (printed_codes(&output), output)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn substring_matches_agree(
        entries in proptest::collection::vec(entry(), 1..12),
        term in search_term(),
    ) {
        let (mapped, mapped_out) = codes(&entries, &term, ScanStrategy::Mapped);
        let (sequential, sequential_out) = codes(&entries, &term, ScanStrategy::Sequential);
        let (structural, structural_out) = codes(&entries, &term, ScanStrategy::Structural);

        prop_assert_eq!(&mapped, &sequential);
        prop_assert_eq!(&mapped, &structural);
        prop_assert_eq!(&mapped_out, &sequential_out);
        prop_assert_eq!(&mapped_out, &structural_out);

        let needle = term.to_lowercase();
        for (code, (name, _)) in (FIRST_CODE..).zip(&entries) {
            if escaped(name).to_lowercase().contains(&needle) {
                prop_assert!(mapped.contains(&code), "{} should match {:?}", code, name);
            }
        }
        let mut sorted = mapped.clone();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), mapped.len());
    }

    #[test]
    fn present_code_matches_once(
        entries in proptest::collection::vec(entry(), 1..12),
        pick in any::<prop::sample::Index>(),
    ) {
        let code = FIRST_CODE + pick.index(entries.len()) as u64;
        let term = code.to_string();
        for strategy in [ScanStrategy::Mapped, ScanStrategy::Sequential, ScanStrategy::Structural] {
            let (found, output) = codes(&entries, &term, strategy);
            prop_assert_eq!(found, vec![code]);
            prop_assert!(output.ends_with("Found 1 match(es).\n"));
        }
    }
}
