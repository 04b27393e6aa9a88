//! Header codec shared by both transports.
//!
//! # Design
//! `HeaderFields` keeps every value of a header in arrival order under one
//! name, the same shape on the way out (request headers) and on the way in
//! (raw response lines). Repeated headers such as `Set-Cookie` are never
//! folded into a comma-separated value. Character validation is left to the
//! backend on the way out and to the response type on the way in.

use http::HeaderMap;
use indexmap::IndexMap;

/// Ordered mapping from header name to its values.
///
/// Names are kept exactly as received (trimmed, case preserved) and lookups
/// compare them exactly. Two mappings are equal only if their names come in
/// the same order.
#[derive(Debug, Clone, Default)]
pub struct HeaderFields {
    entries: IndexMap<String, Vec<String>>,
}

impl PartialEq for HeaderFields {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for HeaderFields {}

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` after any values already held for `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&HeaderMap> for HeaderFields {
    /// Values that are not valid UTF-8 are converted lossily.
    fn from(map: &HeaderMap) -> Self {
        let mut fields = HeaderFields::new();
        for (name, value) in map {
            fields.append(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        fields
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderFields
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut fields = HeaderFields::new();
        for (name, value) in iter {
            fields.append(name, value);
        }
        fields
    }
}

/// One `"Name: value"` line per value, names in mapping order and values in
/// list order.
pub fn format_outgoing(headers: &HeaderFields) -> Vec<String> {
    headers
        .iter()
        .flat_map(|(name, values)| {
            values
                .iter()
                .map(move |value| format!("{}: {}", name.trim(), value.trim()))
        })
        .collect()
}

/// The lines of `format_outgoing`, each terminated by CRLF, as one block.
pub fn format_header_block(headers: &HeaderFields) -> String {
    format_outgoing(headers)
        .into_iter()
        .map(|line| line + "\r\n")
        .collect()
}

/// Parse raw response header lines.
///
/// Each line is split on its first colon. Lines without one, such as the
/// status line or the empty terminator, are skipped, as are lines with an
/// empty name.
pub fn parse_incoming<I>(raw_lines: I) -> HeaderFields
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut fields = HeaderFields::new();
    for line in raw_lines {
        let Some((name, value)) = line.as_ref().split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        fields.append(name, value.trim());
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn format_outgoing_emits_one_line_per_value() {
        let headers: HeaderFields = [
            ("Content-Type", "application/json"),
            ("Authorization", "Bearer token123"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            format_outgoing(&headers),
            vec!["Content-Type: application/json", "Authorization: Bearer token123"]
        );
    }

    #[test]
    fn format_outgoing_trims_and_keeps_repeated_values() {
        let mut headers = HeaderFields::new();
        headers.append(" Accept ", " text/html ");
        headers.append(" Accept ", "application/json");

        assert_eq!(
            format_outgoing(&headers),
            vec!["Accept: text/html", "Accept: application/json"]
        );
    }

    #[test]
    fn format_header_block_terminates_every_line() {
        let headers: HeaderFields = [
            ("Content-Type", "application/json"),
            ("Authorization", "Bearer token123"),
            ("User-Agent", "MyApp/1.0"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            format_header_block(&headers),
            "Content-Type: application/json\r\nAuthorization: Bearer token123\r\nUser-Agent: MyApp/1.0\r\n"
        );
    }

    #[test]
    fn format_header_block_of_nothing_is_empty() {
        assert_eq!(format_header_block(&HeaderFields::new()), "");
    }

    #[test]
    fn parse_incoming_groups_repeated_names() {
        let parsed = parse_incoming([
            "Content-Type: application/json",
            "Set-Cookie: cookie1=value1",
            "Set-Cookie: cookie2=value2",
            "X-Custom-Header: custom value",
        ]);

        let expected: HeaderFields = [
            ("Content-Type", "application/json"),
            ("Set-Cookie", "cookie1=value1"),
            ("Set-Cookie", "cookie2=value2"),
            ("X-Custom-Header", "custom value"),
        ]
        .into_iter()
        .collect();
        assert_eq!(parsed, expected);
        assert_eq!(
            parsed.get("Set-Cookie").unwrap(),
            ["cookie1=value1", "cookie2=value2"]
        );
    }

    #[test]
    fn parse_incoming_skips_status_line_and_terminator() {
        let parsed = parse_incoming(["HTTP/1.1 200 OK", "Content-Length: 13", "", ""]);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("Content-Length").unwrap(), ["13"]);
    }

    #[test]
    fn parse_incoming_splits_on_first_colon_only() {
        let parsed = parse_incoming(["Location: http://example.com:8080/next"]);

        assert_eq!(
            parsed.get("Location").unwrap(),
            ["http://example.com:8080/next"]
        );
    }

    #[test]
    fn parse_incoming_drops_empty_names() {
        let parsed = parse_incoming([": orphan value", "  : another"]);
        assert!(parsed.is_empty());
    }

    #[test]
    fn parse_incoming_keeps_name_case() {
        let parsed = parse_incoming(["X-Trace: a", "x-trace: b"]);

        assert_eq!(parsed.get("X-Trace").unwrap(), ["a"]);
        assert_eq!(parsed.get("x-trace").unwrap(), ["b"]);
    }

    #[test]
    fn parse_incoming_reads_back_single_valued_lines() {
        let headers: HeaderFields = [("Host", "example.com"), ("Accept", "*/*")]
            .into_iter()
            .collect();

        assert_eq!(parse_incoming(format_outgoing(&headers)), headers);
    }

    #[test]
    fn from_header_map_keeps_value_order() {
        let mut map = HeaderMap::new();
        map.append("user-agent", HeaderValue::from_static("Mozilla/5.0"));
        map.append("x-tag", HeaderValue::from_static("one"));
        map.append("x-tag", HeaderValue::from_static("two"));

        let fields = HeaderFields::from(&map);
        assert_eq!(fields.get("user-agent").unwrap(), ["Mozilla/5.0"]);
        assert_eq!(fields.get("x-tag").unwrap(), ["one", "two"]);
    }
}
