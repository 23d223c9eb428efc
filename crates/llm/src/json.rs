//! Helpers for parsing model output as JSON.
//!
//! Models frequently wrap JSON answers in Markdown code fences even when
//! told not to; every call site that parses a response goes through here.

/// Strip surrounding Markdown code fences and whitespace from model output.
pub fn clean_json(text: &str) -> &str {
    let trimmed = text.trim();

    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);

    let without_close = without_open.strip_suffix("```").unwrap_or(without_open);

    without_close.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_unchanged() {
        assert_eq!(clean_json(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_fenced_json_unwrapped() {
        let fenced = "```json\n[\"one\", \"two\"]\n```";
        assert_eq!(clean_json(fenced), r#"["one", "two"]"#);
    }

    #[test]
    fn test_bare_fence_unwrapped() {
        let fenced = "```\n{\"intent\": \"profile\"}\n```";
        assert_eq!(clean_json(fenced), r#"{"intent": "profile"}"#);
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(clean_json("  [1, 2]  \n"), "[1, 2]");
    }
}
