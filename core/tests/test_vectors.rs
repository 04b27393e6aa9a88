//! Check the header codec against JSON test vectors stored in `test-vectors/`.
//!
//! Header mappings are written as `[name, [values...]]` pairs so that the
//! order of names is part of each case.

use http_transport::{format_header_block, format_outgoing, parse_incoming, HeaderFields};
use serde_json::Value;

fn vectors() -> Value {
    let raw = include_str!("../../test-vectors/header_codec.json");
    serde_json::from_str(raw).unwrap()
}

/// Build `HeaderFields` from a `[[name, [values...]], ...]` array.
fn fields(value: &Value) -> HeaderFields {
    let mut fields = HeaderFields::new();
    for entry in value.as_array().unwrap() {
        let name = entry[0].as_str().unwrap();
        for v in entry[1].as_array().unwrap() {
            fields.append(name, v.as_str().unwrap());
        }
    }
    fields
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Outgoing
// ---------------------------------------------------------------------------

#[test]
fn format_outgoing_test_vectors() {
    let vectors = vectors();
    for case in vectors["format_outgoing"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = fields(&case["input"]);

        assert_eq!(format_outgoing(&input), strings(&case["expected_lines"]), "{name}: lines");
        assert_eq!(
            format_header_block(&input),
            case["expected_block"].as_str().unwrap(),
            "{name}: block"
        );
    }
}

// ---------------------------------------------------------------------------
// Incoming
// ---------------------------------------------------------------------------

#[test]
fn parse_incoming_test_vectors() {
    let vectors = vectors();
    for case in vectors["parse_incoming"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let parsed = parse_incoming(strings(&case["raw"]));

        assert_eq!(parsed, fields(&case["expected"]), "{name}");
    }
}

#[test]
fn single_valued_outgoing_lines_parse_back() {
    let vectors = vectors();
    for case in vectors["format_outgoing"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = fields(&case["input"]);
        if input.iter().any(|(_, values)| values.len() > 1) {
            continue;
        }
        let trimmed: HeaderFields = input
            .iter()
            .map(|(n, values)| (n.trim().to_string(), values[0].trim().to_string()))
            .collect();

        assert_eq!(parse_incoming(format_outgoing(&input)), trimmed, "{name}");
    }
}
