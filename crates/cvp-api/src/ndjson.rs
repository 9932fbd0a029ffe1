// Line-delimited JSON decoding.
//
// CVP resource endpoints stream one JSON object per line rather than a
// single document. Individual malformed lines are diagnostic-and-skip,
// never fatal: partial results are expected from this format.

use serde_json::Value;
use tracing::warn;

/// Decode a newline-delimited JSON body into an ordered sequence of values.
///
/// Blank lines are skipped silently. A line that fails to parse is
/// skipped with one `warn!` diagnostic and decoding continues, so a
/// body of N valid and M malformed lines yields exactly N values in
/// their original order. Never fails; an empty body yields an empty vec.
pub fn decode(body: &str) -> Vec<Value> {
    let mut values = Vec::new();

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => values.push(value),
            Err(e) => {
                let preview = line.get(..120).unwrap_or(line);
                warn!("skipping malformed NDJSON line: {e} (line preview: {preview:?})");
            }
        }
    }

    values
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_valid_lines_in_order() {
        let body = "{\"a\":1}\n{\"b\":2}\n{\"c\":3}";
        let values = decode(body);
        assert_eq!(values, vec![json!({"a": 1}), json!({"b": 2}), json!({"c": 3})]);
    }

    #[test]
    fn skips_malformed_lines_keeping_order() {
        let body = "{\"a\":1}\nnot json at all\n{\"b\":2}\n{broken\n{\"c\":3}";
        let values = decode(body);
        assert_eq!(values, vec![json!({"a": 1}), json!({"b": 2}), json!({"c": 3})]);
    }

    #[test]
    fn empty_body_yields_empty_sequence() {
        assert!(decode("").is_empty());
    }

    #[test]
    fn blank_and_whitespace_lines_are_skipped() {
        let body = "\n   \n{\"a\":1}\n\t\n";
        assert_eq!(decode(body), vec![json!({"a": 1})]);
    }

    #[test]
    fn all_malformed_yields_empty_not_error() {
        let body = "oops\n<html>\n,,,";
        assert!(decode(body).is_empty());
    }

    #[test]
    fn trims_surrounding_whitespace_per_line() {
        let body = "  {\"a\":1}  \r\n {\"b\":2}\t";
        assert_eq!(decode(body), vec![json!({"a": 1}), json!({"b": 2})]);
    }
}
