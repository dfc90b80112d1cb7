#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use registry_scan::{CancelFlag, ScanReport, SearchOptions, Strategy};
use serde_json::Value;

pub const STRATEGIES: [Strategy; 3] = [Strategy::Mapped, Strategy::Sequential, Strategy::Structural];

pub fn separator() -> String {
    "-".repeat(40)
}

pub fn write_file(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("registry.json");
    fs::write(&path, contents).expect("write registry file");
    path
}

/// The layout the merge step writes: a pretty-printed array, two-space indent.
pub fn pretty_registry(records: &Value) -> String {
    serde_json::to_string_pretty(records).expect("serialize registry")
}

pub fn run(path: &Path, term: &str, strategy: Strategy) -> (ScanReport, String) {
    run_with(path, term, &SearchOptions::new().with_strategy(strategy))
}

pub fn run_with(path: &Path, term: &str, options: &SearchOptions) -> (ScanReport, String) {
    let mut out = Vec::new();
    let report =
        registry_scan::search_with_options(path, term, &mut out, options, &CancelFlag::new())
            .expect("search");
    (report, String::from_utf8(out).expect("utf-8 output"))
}

/// Registry codes of the records printed in `output`, in print order.
pub fn printed_codes(output: &str) -> Vec<u64> {
    let separator = separator();
    let mut codes = Vec::new();
    let mut block: Option<String> = None;

    for line in output.lines() {
        if line == separator {
            block = Some(String::new());
            continue;
        }
        let Some(text) = block.as_mut() else {
            continue;
        };
        text.push_str(line);
        text.push('\n');
        if line == "}" {
            let record: Value = serde_json::from_str(text).expect("printed record is JSON");
            codes.push(record["ariregistri_kood"].as_u64().expect("printed code"));
            block = None;
        }
    }
    codes
}
