//! Message body truncation
//!
//! Bounds the text to the configured character limit. Over-limit input is cut
//! to the limit and `"..."` appended, so the result can exceed the limit by
//! the ellipsis and re-truncation never settles back within the limit.
//! Downstream consumers may depend on that shape, so it stays as-is.

const ELLIPSIS: &str = "...";

/// Cap `text` at `char_limit` characters (not bytes), marking the cut with an
/// ellipsis. Text within the limit is returned unchanged.
pub fn truncate(text: &str, char_limit: usize) -> String {
    if text.chars().count() <= char_limit {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(char_limit).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}
