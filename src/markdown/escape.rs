//! Markdown escaping and fence sizing for the exporter.
//!
//! Escaping is deliberately narrow: only the characters the import dialect
//! gives meaning to are escaped, so ordinary prose exports unchanged.

/// Escape inline metacharacters in a text run.
///
/// Escapes `*`, `` ` ``, `[` and `]`, plus a backslash that would otherwise
/// escape the following punctuation character.
pub fn escape_inline(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' | '`' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            '\\' if chars.peek().is_some_and(|n| n.is_ascii_punctuation()) => {
                result.push_str("\\\\");
            }
            _ => result.push(c),
        }
    }

    result
}

/// Escape a paragraph line that would otherwise be read as block syntax.
///
/// Covers ATX headings, bullet and ordered list markers and blockquotes.
/// Fences and images need no handling here since `escape_inline` already
/// breaks up backtick and bracket runs.
pub fn escape_line_start(line: &str) -> String {
    let needs_escape = line.starts_with('#')
        || line.starts_with("- ")
        || line.starts_with("+ ")
        || line.starts_with('>');
    if needs_escape {
        return format!("\\{}", line);
    }

    // "1. " style ordered markers: escape the dot
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && line[digits..].starts_with(". ") {
        return format!("{}\\{}", &line[..digits], &line[digits..]);
    }

    line.to_string()
}

/// Length of the longest run of `ch` in `text`.
fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Minimum number of backticks (at least 3) for a fence around `code`.
pub fn fence_length(code: &str) -> usize {
    (longest_run(code, '`') + 1).max(3)
}

/// Wrap `code` as an inline code span, using a tick run longer than any run
/// inside the code and padding when the code touches a backtick.
pub fn inline_code(code: &str) -> String {
    let ticks = "`".repeat(longest_run(code, '`') + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{ticks} {code} {ticks}")
    } else {
        format!("{ticks}{code}{ticks}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_inline() {
        assert_eq!(escape_inline("2 * 3"), "2 \\* 3");
        assert_eq!(escape_inline("[x]"), "\\[x\\]");
        assert_eq!(escape_inline("use `npm`"), "use \\`npm\\`");
        assert_eq!(escape_inline("plain prose, nothing else"), "plain prose, nothing else");
    }

    #[test]
    fn test_backslash_only_escaped_before_punctuation() {
        assert_eq!(escape_inline("C:\\Users"), "C:\\Users");
        assert_eq!(escape_inline("a\\*"), "a\\\\\\*");
    }

    #[test]
    fn test_escape_line_start() {
        assert_eq!(escape_line_start("# not a heading"), "\\# not a heading");
        assert_eq!(escape_line_start("- dash"), "\\- dash");
        assert_eq!(escape_line_start("> quote"), "\\> quote");
        assert_eq!(escape_line_start("2024. A year"), "2024\\. A year");
        assert_eq!(escape_line_start("2024 was fine"), "2024 was fine");
        assert_eq!(escape_line_start("well - fine"), "well - fine");
    }

    #[test]
    fn test_fence_length() {
        assert_eq!(fence_length("fn main() {}"), 3);
        assert_eq!(fence_length("```nested```"), 4);
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(inline_code("x"), "`x`");
        assert_eq!(inline_code("a`b"), "``a`b``");
        assert_eq!(inline_code("`tick"), "`` `tick ``");
    }
}
