use crate::domain::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Cleans LLM response by removing reasoning tags and surplus blank lines
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();
    cleaned = cleaned.trim().to_string();

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string()
}

fn strip_code_fence(value: &str) -> &str {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix("```json") {
        return stripped.trim().trim_end_matches("```").trim();
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        return stripped.trim().trim_end_matches("```").trim();
    }
    trimmed
}

/// Parses model output that should be a JSON array of strings.
///
/// Blank entries are dropped. An empty body is an empty batch, not an error.
pub fn parse_string_array(output: &str) -> Result<Vec<String>> {
    let cleaned = clean_llm_response(output);
    let payload = strip_code_fence(&cleaned);
    if payload.is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<String> = serde_json::from_str(payload).map_err(|err| {
        let snippet: String = payload.chars().take(200).collect();
        AppError::ParseError(format!(
            "Expected a JSON array of strings: {} | output_snippet={}",
            err, snippet
        ))
    })?;

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_llm_response(input), "The actual response");
    }

    #[test]
    fn test_clean_self_closing_think() {
        assert_eq!(clean_llm_response("<think />[]"), "[]");
    }

    #[test]
    fn test_clean_multiple_newlines() {
        let input = "Line 1\n\n\n\n\nLine 2";
        assert_eq!(clean_llm_response(input), "Line 1\n\nLine 2");
    }

    #[test]
    fn test_parse_plain_array() {
        let parsed = parse_string_array(r#"["ერთი", "ორი"]"#).unwrap();
        assert_eq!(parsed, vec!["ერთი".to_string(), "ორი".to_string()]);
    }

    #[test]
    fn test_parse_fenced_array_with_reasoning() {
        let output = "<reasoning>plan</reasoning>\n```json\n[\"a\", \"  \", \" b \"]\n```";
        assert_eq!(parse_string_array(output).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(parse_string_array("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_objects() {
        let err = parse_string_array(r#"{"cases": []}"#).unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }
}
