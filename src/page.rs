//! Host page markup.
//!
//! Renders the page the widget binds to: a form, a text input and a message
//! container, each carrying the id from [`HostBindings`]. Styling targets
//! fixed class names, never the bound ids.

use crate::widget::render::escape_html;
use crate::widget::{ChatWindow, HostBindings};

/// Default page title.
pub const DEFAULT_TITLE: &str = "Chat";

/// Render a full HTML document with the current contents of `window`.
pub fn render_page(title: &str, bindings: &HostBindings, window: &ChatWindow) -> String {
    let title = escape_html(title);
    let form_id = escape_html(&bindings.form_id);
    let input_id = escape_html(&bindings.input_id);
    let container_id = escape_html(&bindings.container_id);
    let messages = window.inner_html();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; display: flex; flex-direction: column; height: 100vh; }}
        .chat-window {{ flex: 1; overflow-y: auto; padding: 16px; display: flex; flex-direction: column; gap: 8px; }}
        .message {{ display: flex; gap: 8px; align-items: flex-start; }}
        .user-message {{ flex-direction: row-reverse; }}
        .content {{ padding: 8px 12px; border-radius: 12px; background: #f1f1f1; max-width: 80%; }}
        .user-message .content {{ background: #dcf3ff; }}
        .message-form {{ display: flex; gap: 8px; padding: 12px 16px; border-top: 1px solid #ddd; }}
        .message-input {{ flex: 1; padding: 8px 12px; }}
    </style>
</head>
<body>
    <header><h1>{title}</h1></header>
    <div id="{container_id}" class="chat-window" aria-live="polite" aria-label="Chat messages">{messages}</div>
    <form id="{form_id}" class="message-form">
        <input id="{input_id}" class="message-input" type="text" placeholder="Type your message..." autocomplete="off">
        <button type="submit">Send</button>
    </form>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{MessageList, Role};

    #[test]
    fn page_exposes_bound_ids() {
        let window = ChatWindow::new();
        let html = render_page(DEFAULT_TITLE, &HostBindings::default(), &window);
        assert!(html.contains(r#"<form id="message-form" class="message-form">"#));
        assert!(html.contains(r#"<input id="message-input""#));
        assert!(html.contains(r#"<div id="chat-window""#));
    }

    #[test]
    fn page_includes_rendered_messages() {
        let window = ChatWindow::new();
        window.append(Role::User, "a < b");
        let html = render_page("T", &HostBindings::default(), &window);
        assert!(html.contains(r#"<div class="content">a &lt; b</div>"#));
    }

    #[test]
    fn title_and_ids_are_escaped() {
        let bindings = HostBindings {
            form_id: "f\"x".into(),
            ..HostBindings::default()
        };
        let html = render_page("<b>", &bindings, &ChatWindow::new());
        assert!(html.contains("<title>&lt;b&gt;</title>"));
        assert!(html.contains(r#"<form id="f&quot;x" class="message-form">"#));
    }

    #[test]
    fn unusual_ids_stay_out_of_the_stylesheet() {
        let bindings = HostBindings {
            form_id: "my form".into(),
            input_id: "input.main".into(),
            container_id: "chat}window".into(),
        };
        let html = render_page("T", &bindings, &ChatWindow::new());
        let style = &html[html.find("<style>").unwrap()..html.find("</style>").unwrap()];

        for id in ["my form", "input.main", "chat}window"] {
            assert!(!style.contains(id), "{id} leaked into the stylesheet");
        }
        assert!(style.contains(".chat-window {"));
        assert!(html.contains(r#"<div id="chat}window" class="chat-window""#));
        assert!(html.contains(r#"<input id="input.main" class="message-input""#));
    }
}
