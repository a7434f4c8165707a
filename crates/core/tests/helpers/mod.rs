//! Shared helpers for scanner integration tests.
#![allow(dead_code)]

use defscan_core::{scan_bytes, DefinitionKind, DefinitionRecord, ScanResult};

/// Read a fixture file from `tests/fixtures`.
pub fn fixture(name: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("Fixture '{name}' not found at {}: {e}", path.display()))
}

/// Scan a fixture with default options, checking the structural invariants
/// every result must satisfy.
pub fn scan_fixture(name: &str) -> (Vec<u8>, ScanResult) {
    let bytes = fixture(name);
    let result = scan_bytes(&bytes, name, None).expect("scan should not fail");
    assert_well_formed(&bytes, &result);
    (bytes, result)
}

pub fn names(result: &ScanResult) -> Vec<&str> {
    result.definitions.iter().map(|d| d.name.as_str()).collect()
}

pub fn outline(result: &ScanResult) -> Vec<(&str, DefinitionKind, usize)> {
    result.definitions.iter().map(|d| (d.name.as_str(), d.kind, d.depth)).collect()
}

pub fn by_name<'a>(result: &'a ScanResult, name: &str) -> &'a DefinitionRecord {
    result
        .definitions
        .iter()
        .find(|d| d.name == name)
        .unwrap_or_else(|| panic!("no definition named '{name}' in {:?}", names(result)))
}

pub fn assert_well_formed(source: &[u8], result: &ScanResult) {
    let len = source.len();
    for (i, record) in result.definitions.iter().enumerate() {
        assert!(record.signature_span.end <= len, "signature of record {i} out of bounds");
        if let Some(body) = record.body_span {
            assert!(body.start <= body.end && body.end <= len, "body of record {i} out of bounds");
        }
        if let Some(parent) = record.parent {
            assert!(parent < i, "parent of record {i} must come first");
            assert!(
                record.depth > result.definitions[parent].depth,
                "record {i} must be deeper than its parent"
            );
        }
        if i > 0 {
            assert!(
                result.definitions[i - 1].signature_span.start <= record.signature_span.start,
                "records must be in source order"
            );
        }
    }
    for pair in result.diagnostics.windows(2) {
        assert!(
            (pair[0].span.start, pair[0].span.end) <= (pair[1].span.start, pair[1].span.end),
            "diagnostics must be ordered by span"
        );
    }
}
