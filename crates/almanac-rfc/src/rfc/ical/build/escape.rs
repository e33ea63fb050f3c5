//! TEXT and parameter value escaping.

/// Escapes a TEXT value (RFC 5545 §3.3.11).
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' => result.push_str("\\,"),
            '\n' => result.push_str("\\n"),
            '\r' => {}
            _ => result.push(c),
        }
    }
    result
}

/// ## Summary
/// Quotes a parameter value when it contains `:`, `;` or `,`
/// (RFC 5545 §3.2). Double quotes cannot be escaped and are dropped.
#[must_use]
pub fn escape_param_value(s: &str) -> String {
    let cleaned: String = s.chars().filter(|&c| c != '"').collect();
    if cleaned.contains([':', ';', ',']) {
        format!("\"{cleaned}\"")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_specials() {
        assert_eq!(escape_text("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn param_quoting() {
        assert_eq!(escape_param_value("Jane Doe"), "Jane Doe");
        assert_eq!(
            escape_param_value("mailto:jane@example.com"),
            "\"mailto:jane@example.com\""
        );
        assert_eq!(escape_param_value("say \"hi\""), "say hi");
    }
}
