// ABOUTME: Cleanup of provider completion text before JSON parsing
// ABOUTME: Strips code fences, normalizes quotes, and drops trailing commas
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Vital Health Intelligence

//! Response sanitization for the completion extraction tier
//!
//! Completion models wrap JSON in markdown fences, substitute typographic
//! quotes, and leave trailing commas often enough that parsing the raw text
//! directly would fail on otherwise usable answers. Sanitization is purely
//! syntactic - it never invents or reorders data.

use regex::Regex;
use std::sync::LazyLock;

/// Matches a trailing comma before a closing bracket or brace
/// Stored as Option to handle compilation failures gracefully (should never fail for static patterns)
static TRAILING_COMMA: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").ok());

/// Clean a raw completion response for JSON parsing
#[must_use]
pub fn sanitize_response(raw: &str) -> String {
    let mut text = raw.trim().to_owned();

    // Markdown code fences, with or without a language tag
    text = text
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "");

    // Typographic quotes from chat-tuned models
    text = text
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    if let Some(re) = TRAILING_COMMA.as_ref() {
        text = re.replace_all(&text, "$1").into_owned();
    }

    text.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_code_fences() {
        let raw = "```json\n[{\"marker\": \"Glucose\"}]\n```";
        assert_eq!(sanitize_response(raw), "[{\"marker\": \"Glucose\"}]");
    }

    #[test]
    fn test_normalizes_curly_quotes() {
        let raw = "[{\u{201c}marker\u{201d}: \u{201c}Glucose\u{201d}}]";
        assert_eq!(sanitize_response(raw), "[{\"marker\": \"Glucose\"}]");
    }

    #[test]
    fn test_drops_trailing_commas() {
        let raw = "[{\"marker\": \"Glucose\", \"value\": 95,}, ]";
        assert_eq!(sanitize_response(raw), "[{\"marker\": \"Glucose\", \"value\": 95}]");
    }

    #[test]
    fn test_plain_json_passes_through() {
        let raw = "[]";
        assert_eq!(sanitize_response(raw), "[]");
    }
}
