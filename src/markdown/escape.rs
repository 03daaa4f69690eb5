//! Markdown escaping and code-span helpers.

/// Escape characters that would otherwise start Markdown markup.
///
/// Escapes backslash, `*`, `[`, `]`, `` ` ``, `|`, `<`, `>`, and `!` when it
/// would open an image. `_` is only escaped at a word boundary, since
/// intraword underscores never start emphasis.
///
/// # Examples
///
/// ```
/// use rst2db::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
/// assert_eq!(escape_markdown("snake_case"), "snake_case");
/// assert_eq!(escape_markdown("_under_"), "\\_under\\_");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let escape = match c {
            '\\' | '*' | '[' | ']' | '`' | '|' | '<' | '>' => true,
            '!' => chars.peek() == Some(&'['),
            '_' => {
                let inside_word = prev.is_some_and(char::is_alphanumeric)
                    && chars.peek().is_some_and(|n| n.is_alphanumeric());
                !inside_word
            }
            _ => false,
        };
        if escape {
            result.push('\\');
        }
        result.push(c);
        prev = Some(c);
    }

    result
}

/// Longest run of `ch` in `content`.
fn longest_run(content: &str, ch: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;
    for c in content.chars() {
        if c == ch {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run
}

/// Backtick fence for a literal block: the shortest run (at least 3) that
/// does not occur in the content.
///
/// ```
/// use rst2db::markdown::code_fence;
///
/// assert_eq!(code_fence("let x = 1;"), "```");
/// assert_eq!(code_fence("```rust\ncode\n```"), "````");
/// ```
pub fn code_fence(content: &str) -> String {
    "`".repeat(longest_run(content, '`').max(2) + 1)
}

/// Inline code span with the shortest backtick delimiter not present in the
/// content.
///
/// Content that starts or ends with a backtick is padded with a space.
///
/// ```
/// use rst2db::markdown::code_span;
///
/// assert_eq!(code_span("ls -l"), "`ls -l`");
/// assert_eq!(code_span("a ` b"), "``a ` b``");
/// ```
pub fn code_span(content: &str) -> String {
    let ticks = "`".repeat(longest_run(content, '`') + 1);
    if content.starts_with('`') || content.ends_with('`') {
        format!("{ticks} {content} {ticks}")
    } else {
        format!("{ticks}{content}{ticks}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup_characters() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
        assert_eq!(escape_markdown("a | b"), "a \\| b");
        assert_eq!(escape_markdown("<tag>"), "\\<tag\\>");
    }

    #[test]
    fn test_escape_underscore_at_word_boundary() {
        assert_eq!(escape_markdown("my_var"), "my_var");
        assert_eq!(escape_markdown("_private"), "\\_private");
        assert_eq!(escape_markdown("trailing_"), "trailing\\_");
    }

    #[test]
    fn test_escape_image_start() {
        assert_eq!(escape_markdown("![alt]"), "\\!\\[alt\\]");
        assert_eq!(escape_markdown("Wow! ok"), "Wow! ok");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_markdown("Jane Doe, 2024-01-01."), "Jane Doe, 2024-01-01.");
    }

    #[test]
    fn test_code_fence_length() {
        assert_eq!(code_fence(""), "```");
        assert_eq!(code_fence("``"), "```");
        assert_eq!(code_fence("`` and ```"), "````");
    }

    #[test]
    fn test_code_span_padding() {
        assert_eq!(code_span("`tick"), "`` `tick ``");
        assert_eq!(code_span("x"), "`x`");
    }
}
