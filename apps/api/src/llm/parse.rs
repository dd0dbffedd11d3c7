//! Defensive parsing of semi-structured model output.
//!
//! Remote models wrap JSON in markdown fences and pad it with prose. Callers
//! cut the payload out before deserializing and fall back on any miss.

/// Removes ```json / ``` fence markers anywhere in the text and trims.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// The substring spanning the first `open` to the last `close`, inclusive.
/// Absent or inverted delimiters yield None.
pub fn slice_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n[\"a\", \"b\"]\n```";
        assert_eq!(strip_code_fences(input), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_code_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_slice_between_cuts_surrounding_prose() {
        let input = "Here you go: [\"Rust\", \"Go\"] — hope that helps!";
        assert_eq!(
            slice_between(input, '[', ']'),
            Some("[\"Rust\", \"Go\"]")
        );
    }

    #[test]
    fn test_slice_between_spans_first_to_last() {
        let input = "{\"a\": {\"b\": 1}} trailing";
        assert_eq!(slice_between(input, '{', '}'), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_slice_between_missing_delimiter() {
        assert_eq!(slice_between("no json here", '{', '}'), None);
    }

    #[test]
    fn test_slice_between_inverted_delimiters() {
        assert_eq!(slice_between("} backwards {", '{', '}'), None);
    }
}
