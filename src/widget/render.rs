//! HTML rendering for message entries.
//!
//! Message text is always plain text. Markup is escaped first; newline to
//! `<br>` conversion happens afterwards as a presentation step.

use super::message::Role;

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and turn each line break into `<br>`.
///
/// `\r\n` counts as a single break.
pub fn content_html(text: &str) -> String {
    escape_html(text)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

/// Number of visual lines `text` occupies. Never less than one.
pub fn line_count(text: &str) -> usize {
    text.replace("\r\n", "\n").split('\n').count()
}

/// Render one complete message entry.
pub fn message_html(role: Role, text: &str) -> String {
    format!(
        r#"<div class="{class}"><div class="avatar">{glyph}</div><div class="content">{content}</div></div>"#,
        class = role.css_class(),
        glyph = role.glyph(),
        content = content_html(text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(content_html("line1\nline2"), "line1<br>line2");
        assert_eq!(content_html("a\r\nb"), "a<br>b");
        assert_eq!(line_count("line1\nline2"), 2);
        assert_eq!(line_count(""), 1);
    }

    #[test]
    fn markup_is_escaped_before_breaks() {
        let html = content_html("<script>alert('x')</script>\n&");
        assert_eq!(
            html,
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;<br>&amp;"
        );
    }

    #[test]
    fn entry_carries_role_marker() {
        let html = message_html(Role::User, "hi");
        assert!(html.starts_with(r#"<div class="message user-message">"#));
        assert!(html.contains(r#"<div class="avatar">👤</div>"#));
        assert!(html.contains(r#"<div class="content">hi</div>"#));
    }
}
