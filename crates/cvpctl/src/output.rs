//! JSON output rendering.
//!
//! The inbound contract for every command is a JSON-formatted string. A
//! value that fails to serialize is reported as a structured
//! `{"error": …}` payload rather than a crash.

use serde_json::json;

use crate::cli::OutputFormat;

/// Render a serializable value in the chosen JSON flavor.
///
/// On serialization failure the error itself is returned as a JSON
/// payload, so the caller always gets printable JSON back.
pub fn render<T: serde::Serialize>(format: &OutputFormat, data: &T) -> String {
    let result = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data),
        OutputFormat::JsonCompact => serde_json::to_string(data),
    };

    result.unwrap_or_else(|e| json!({ "error": format!("failed to serialize response: {e}") }).to_string())
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    println!("{output}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pretty_and_compact_flavors() {
        let data = json!([{"a": 1}]);
        assert_eq!(render(&OutputFormat::JsonCompact, &data), "[{\"a\":1}]");
        assert!(render(&OutputFormat::Json, &data).contains("\"a\": 1"));
    }

    #[test]
    fn null_collection_renders_as_json_null() {
        let data: Option<Vec<serde_json::Value>> = None;
        assert_eq!(render(&OutputFormat::Json, &data), "null");
    }
}
