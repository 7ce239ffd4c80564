//! Helpers for cleaning up loosely-structured model output before JSON
//! parsing. Models routinely wrap JSON in Markdown code fences or surround
//! it with commentary despite strict output instructions.

/// Strip a leading/trailing Markdown code fence (```json or plain ```).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let body = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    body.trim().strip_suffix("```").unwrap_or(body).trim()
}

/// Extract the substring from the first `[` to the last `]`, tolerating
/// commentary before and after the array.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Extract the substring from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n[{\"id\": 1}]\n```";
        assert_eq!(strip_code_fences(raw), "[{\"id\": 1}]");
    }

    #[test]
    fn strips_bare_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn extracts_array_with_surrounding_commentary() {
        let raw = "Here are your questions:\n[1, 2, 3]\nGood luck!";
        assert_eq!(extract_json_array(raw), Some("[1, 2, 3]"));
    }

    #[test]
    fn extracts_object_with_surrounding_commentary() {
        let raw = "Sure! {\"score\": 80} hope that helps";
        assert_eq!(extract_json_object(raw), Some("{\"score\": 80}"));
    }

    #[test]
    fn rejects_text_without_array() {
        assert_eq!(extract_json_array("no json here"), None);
        assert_eq!(extract_json_array("] backwards ["), None);
    }
}
