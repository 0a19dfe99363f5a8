//! Fenced code block extraction.
//!
//! The modifier stage answers with the revised prompt wrapped in a
//! triple-backtick block, optionally tagged with a language on the opening
//! line. These helpers pull that body back out.

use once_cell::sync::Lazy;
use regex::Regex;

/// First non-greedy body between an opening fence (with an optional tag line)
/// and the next closing fence.
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:.*\n)?([\s\S]+?)```").expect("fenced block pattern is valid")
});

/// Returns the trimmed body of the first fenced block in `text`.
///
/// Returns `None` when there is no complete fence pair or the body is
/// whitespace only.
///
/// # Example
///
/// ```
/// use enhancer_core::fence::extract_fenced_block;
///
/// let reply = "Here you go:\n```markdown\nExplain AI in 3 sentences.\n```\nDone.";
/// assert_eq!(
///     extract_fenced_block(reply).as_deref(),
///     Some("Explain AI in 3 sentences.")
/// );
/// ```
pub fn extract_fenced_block(text: &str) -> Option<String> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str().trim().to_string())
        .filter(|body| !body.is_empty())
}

/// Returns the first fenced block body, or the whole text trimmed when the
/// response carries no fence pair.
pub fn extract_prompt(text: &str) -> String {
    extract_fenced_block(text).unwrap_or_else(|| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fence() {
        let text = "```\nIn 3-5 sentences, explain how AI impacts healthcare.\n```";
        assert_eq!(
            extract_fenced_block(text).as_deref(),
            Some("In 3-5 sentences, explain how AI impacts healthcare.")
        );
    }

    #[test]
    fn test_language_tag_is_dropped() {
        let text = "Rationale first.\n\n```text\nRevised prompt body\n```";
        assert_eq!(
            extract_fenced_block(text).as_deref(),
            Some("Revised prompt body")
        );
    }

    #[test]
    fn test_first_block_wins() {
        let text = "```\nfirst\n```\nsome prose\n```\nsecond\n```";
        assert_eq!(extract_fenced_block(text).as_deref(), Some("first"));
    }

    #[test]
    fn test_inline_fence_without_newline() {
        // No newline after the opening fence: the tag group is skipped and
        // the body starts right after the backticks.
        assert_eq!(extract_fenced_block("```inline```").as_deref(), Some("inline"));
    }

    #[test]
    fn test_multiline_body_keeps_inner_lines() {
        let text = "```\n1. Role: analyst\n2. Task: summarize\n\n3. Format: bullets\n```";
        assert_eq!(
            extract_fenced_block(text).as_deref(),
            Some("1. Role: analyst\n2. Task: summarize\n\n3. Format: bullets")
        );
    }

    #[test]
    fn test_unclosed_fence_is_none() {
        assert_eq!(extract_fenced_block("```\nnever closed"), None);
    }

    #[test]
    fn test_fallback_returns_trimmed_text() {
        assert_eq!(extract_prompt("  just the prompt \n"), "just the prompt");
        assert_eq!(extract_prompt("```\n  fenced  \n```"), "fenced");
    }
}
