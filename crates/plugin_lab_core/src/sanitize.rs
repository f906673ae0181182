//! Text input sanitizers applied to request parameters.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Removes markup tags, keeping the text between them.
pub fn strip_tags(input: &str) -> String {
    TAG_RE.replace_all(input, "").into_owned()
}

/// Cleans a single-line text field from untrusted input.
///
/// Strips tags, turns line breaks and tabs into spaces, collapses whitespace
/// runs and trims both ends.
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input).replace(['\r', '\n', '\t'], " ");
    WHITESPACE_RUN_RE
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{sanitize_text_field, strip_tags};

    #[test]
    fn strip_tags_keeps_inner_text() {
        assert_eq!(strip_tags("<b>bold</b> and <i>it</i>"), "bold and it");
        assert_eq!(strip_tags("<script>\nalert(1)</script>"), "\nalert(1)");
    }

    #[test]
    fn sanitize_text_field_flattens_whitespace() {
        assert_eq!(sanitize_text_field("  10\n\t"), "10");
        assert_eq!(sanitize_text_field("a \r\n  b"), "a b");
        assert_eq!(sanitize_text_field("<em>add</em>"), "add");
    }
}
