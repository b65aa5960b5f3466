//! Text helpers for structured data and HTML output.

use regex::Regex;

lazy_static::lazy_static! {
    static ref SCRIPT_STYLE_REGEX: Regex =
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)\s*>").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
}

/// Removes all HTML tags, including the contents of `script` and `style`
/// elements, and trims surrounding whitespace.
pub fn strip_tags(input: &str) -> String {
    let without_blocks = SCRIPT_STYLE_REGEX.replace_all(input, "");
    TAG_REGEX.replace_all(&without_blocks, "").trim().to_string()
}

/// Escapes a string for use inside an HTML attribute or text node.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Rounds half away from zero to the given number of decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Formats a number without a trailing `.0` for whole values.
///
/// `90.0` becomes `"90"`, `76.3` stays `"76.3"`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_removes_markup() {
        assert_eq!(
            strip_tags("<p>An <strong>epic</strong> tale</p>"),
            "An epic tale"
        );
    }

    #[test]
    fn test_strip_tags_drops_script_contents() {
        assert_eq!(
            strip_tags("Intro<script type=\"text/javascript\">alert(1)</script> end "),
            "Intro end"
        );
        assert_eq!(strip_tags("<STYLE>p{}</STYLE>Body"), "Body");
    }

    #[test]
    fn test_strip_tags_keeps_unicode() {
        assert_eq!(strip_tags("<em>আমার</em> গল্প"), "আমার গল্প");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"a"b'<c>&"#),
            "a&quot;b&#039;&lt;c&gt;&amp;"
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(76.34, 1), 76.3);
        assert_eq!(round_to(76.36, 1), 76.4);
        assert_eq!(round_to(90.0, 1), 90.0);
        assert_eq!(round_to(4.5, 0), 5.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(90.0), "90");
        assert_eq!(format_number(76.3), "76.3");
        assert_eq!(format_number(0.0), "0");
    }
}
