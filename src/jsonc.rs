//! Comment-tolerant JSON reader.
//!
//! Cursor writes `keybindings.json` with `//` line comments, which strict JSON
//! parsers reject. [`parse_commented`] drops every line whose left-trimmed text
//! starts with `//` and parses the rest as strict JSON.
//!
//! This is a whole-line filter, not a tokenizer. A `//` after other text on
//! the same line is left in place, so trailing comments make the parse fail.
//!
//! Files written by [`crate::applier`] rely on exactly this behavior, so keep it.

use serde_json::Value;

/// Line comment marker recognized by [`strip_comment_lines`].
pub const COMMENT_MARKER: &str = "//";

/// Remove comment-only lines from `text`.
///
/// Remaining lines are rejoined with `\n` in their original order.
pub fn strip_comment_lines(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.trim().starts_with(COMMENT_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse JSON that may contain comment-only lines.
///
/// Returns `Ok(None)` when nothing but comments and whitespace remain. Callers
/// treat that as "no content", which is different from a parse error.
pub fn parse_commented(text: &str) -> Result<Option<Value>, serde_json::Error> {
    let cleaned = strip_comment_lines(text);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(cleaned).map(Some)
}
