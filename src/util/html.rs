//! HTML escaping and attribute validation

use std::borrow::Cow;

fn escape_with(input: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| match c {
        '&' | '<' | '>' => true,
        '"' | '\'' => quotes,
        _ => false,
    };
    if !input.contains(needs_escape) {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            '\'' if quotes => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape text content
pub fn escape_text(input: &str) -> Cow<'_, str> {
    escape_with(input, false)
}

/// Escape a value for a double- or single-quoted attribute
pub fn escape_attr(input: &str) -> Cow<'_, str> {
    escape_with(input, true)
}

/// Check a URL against an allow-list of schemes.
///
/// URLs without a scheme (relative paths, fragments, `//host/...`) pass.
/// Browsers drop ASCII whitespace and control characters inside a scheme,
/// so those are removed before the scheme is compared.
pub fn safe_url<'a, S: AsRef<str>>(url: &'a str, allowed_schemes: &[S]) -> Option<&'a str> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let compact: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();
    let end = compact
        .find(|c| matches!(c, ':' | '/' | '?' | '#'))
        .unwrap_or(compact.len());
    if !compact[end..].starts_with(':') {
        return Some(url);
    }
    let scheme = &compact[..end];
    let allowed = allowed_schemes
        .iter()
        .any(|s| s.as_ref().eq_ignore_ascii_case(scheme));
    if allowed {
        Some(url)
    } else {
        None
    }
}

const COLOR_FUNCTIONS: &[&str] = &["rgb(", "rgba(", "hsl(", "hsla("];

/// Check that a value can only be a CSS color
pub fn safe_color(color: &str) -> Option<&str> {
    let color = color.trim();
    if color.is_empty() || color.len() > 64 {
        return None;
    }
    let charset_ok = color
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-'));
    if !charset_ok {
        return None;
    }
    if color.contains('(') {
        let lower = color.to_ascii_lowercase();
        if !COLOR_FUNCTIONS.iter().any(|f| lower.starts_with(f)) || !lower.ends_with(')') {
            return None;
        }
    }
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::{escape_attr, escape_text, safe_color, safe_url};
    use std::borrow::Cow;

    const SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

    #[test]
    fn test_escape() {
        assert!(matches!(escape_text("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_text("a < b & \"c\""), "a &lt; b &amp; \"c\"");
        assert_eq!(
            escape_attr("\" onmouseover='x'"),
            "&quot; onmouseover=&#39;x&#39;"
        );
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            safe_url("https://example.com/tours", SCHEMES),
            Some("https://example.com/tours")
        );
        assert_eq!(safe_url("MAILTO:desk@example.com", SCHEMES), Some("MAILTO:desk@example.com"));
        assert_eq!(safe_url("/tours/alpine?x=1:2", SCHEMES), Some("/tours/alpine?x=1:2"));
        assert_eq!(safe_url("#itinerary", SCHEMES), Some("#itinerary"));
        assert_eq!(safe_url("//cdn.example.com/a.png", SCHEMES), Some("//cdn.example.com/a.png"));
        assert_eq!(safe_url("javascript:alert(1)", SCHEMES), None);
        assert_eq!(safe_url(" java\tscript:alert(1)", SCHEMES), None);
        assert_eq!(safe_url("data:text/html;base64,AAAA", SCHEMES), None);
        assert_eq!(safe_url("   ", SCHEMES), None);
    }

    #[test]
    fn test_colors() {
        assert_eq!(safe_color("#ff0000"), Some("#ff0000"));
        assert_eq!(safe_color("rgb(1, 2, 3)"), Some("rgb(1, 2, 3)"));
        assert_eq!(safe_color("rebeccapurple"), Some("rebeccapurple"));
        assert_eq!(safe_color("red; background: url(x)"), None);
        assert_eq!(safe_color("expression(alert(1))"), None);
        assert_eq!(safe_color("\"red\""), None);
    }
}
