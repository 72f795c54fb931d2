//! HTML text and attribute escaping.

/// Escape HTML special characters in text and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\u{a0}', "&nbsp;")
}

/// Make text safe inside an HTML comment (`--` may not appear there).
pub fn comment_escape(s: &str) -> String {
    let mut out = s.to_string();
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}
