//! iCalendar text escaping (RFC 5545 §3.3.11, RFC 6868).

/// Escapes a TEXT value.
///
/// Backslash, comma, semicolon and line breaks are escaped; `\r\n` and a
/// bare `\r` both become `\n`.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a parameter value, quoting it when it contains delimiters.
///
/// Inside quotes, `^`, newline and `"` use RFC 6868 caret encoding.
#[must_use]
pub fn escape_param_value(s: &str) -> String {
    if !s.contains([':', ';', ',', '"', '\n']) {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len() + 8);
    out.push('"');
    for c in s.chars() {
        match c {
            '^' => out.push_str("^^"),
            '\n' => out.push_str("^n"),
            '"' => out.push_str("^'"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("Room 1, Building A"), "Room 1\\, Building A");
        assert_eq!(escape_text("a;b"), "a\\;b");
        assert_eq!(escape_text("C:\\path"), "C:\\\\path");
        assert_eq!(escape_text("one\r\ntwo\nthree\rfour"), "one\\ntwo\\nthree\\nfour");
    }

    #[test]
    fn test_escape_param_value_plain() {
        assert_eq!(escape_param_value("episode.xml"), "episode.xml");
        assert_eq!(escape_param_value("Jane Doe"), "Jane Doe");
    }

    #[test]
    fn test_escape_param_value_quoted() {
        assert_eq!(escape_param_value("Doe, Jane"), "\"Doe, Jane\"");
        assert_eq!(escape_param_value("say \"hi\""), "\"say ^'hi^'\"");
        assert_eq!(escape_param_value("a:b^c"), "\"a:b^^c\"");
    }
}
