//! Quoting helpers for values embedded in query literals.

/// Quote `text` so a regex engine matches it literally, and make the result
/// safe inside a double-quoted query literal.
///
/// Uses `\Q...\E` quoting. An `\E` inside the text would end the quote early,
/// so it is emitted as `\E\\E\Q` (close, literal `\E`, reopen).
///
/// ```
/// use sparql_rules::escape::quote_regex;
///
/// assert_eq!(quote_regex("a.b"), r"\Qa.b\E");
/// assert_eq!(quote_regex(r#"say "hi""#), r#"\Qsay \"hi\"\E"#);
/// ```
pub fn quote_regex(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 4);
    quoted.push_str("\\Q");
    if text.contains("\\E") {
        quoted.push_str(&text.replace("\\E", "\\E\\\\E\\Q"));
    } else {
        quoted.push_str(text);
    }
    quoted.push_str("\\E");
    escape_quotes(&quoted)
}

/// Escape embedded double quotes.
pub fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Escape `text` for a double-quoted string literal: backslashes, quotes and
/// control whitespace.
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Undo literal escaping the way a query parser reads `\"` and `\\`.
    fn unescape(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => out.push('\\'),
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote_regex("test"), r"\Qtest\E");
    }

    #[test]
    fn test_quote_empty() {
        assert_eq!(quote_regex(""), r"\Q\E");
    }

    #[test]
    fn test_quote_metacharacters_stay_inside() {
        assert_eq!(quote_regex("a+b*(c)?"), r"\Qa+b*(c)?\E");
    }

    #[test]
    fn test_quote_embedded_end_marker() {
        assert_eq!(quote_regex(r"x\Ey"), r"\Qx\E\\E\Qy\E");
    }

    #[test]
    fn test_quote_escapes_double_quotes_and_round_trips() {
        let quoted = quote_regex(r#"test "with quotes""#);
        assert_eq!(quoted, r#"\Qtest \"with quotes\"\E"#);
        assert_eq!(unescape(&quoted), r#"\Qtest "with quotes"\E"#);
    }

    #[test]
    fn test_escape_literal() {
        let raw = "say \"hi\"\n\\path";
        let escaped = escape_literal(raw);
        assert_eq!(escaped, r#"say \"hi\"\n\\path"#);
        assert_eq!(unescape(&escaped), raw);
    }
}
