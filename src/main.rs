//! Chat Widget terminal front end
//!
//! Every stdin line is submitted through the widget as if typed into the
//! form. Exchanges resolve concurrently on spawned tasks.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use dotenvy::dotenv;
use tokio::io::BufReader;
use tracing::info;

use chat_widget::config::AppConfig;
use chat_widget::page::render_page;
use chat_widget::telemetry;
use chat_widget::terminal::{TerminalWindow, drive_lines};
use chat_widget::widget::{ChatWidget, ChatWindow, TextInput};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = AppConfig::load()?;
    telemetry::init(&config.logging)?;

    let client = config.chat_client()?;
    info!(
        name: "chat.config.loaded",
        endpoint = %client.endpoint(),
        submit_policy = ?config.widget.submit_policy,
        "Chat configuration loaded"
    );

    let input = TextInput::new();
    let window = ChatWindow::with_viewport(config.widget.viewport_lines);
    let widget = ChatWidget::new(
        Arc::new(client),
        Arc::new(input.clone()),
        Arc::new(TerminalWindow::new(window.clone(), std::io::stdout())),
        config.widget_settings(),
    );

    // Returns after stdin closes and outstanding exchanges have landed
    let summary = drive_lines(&widget, &input, BufReader::new(tokio::io::stdin())).await?;
    info!(
        name: "chat.session.finished",
        started = summary.started,
        resolved = summary.resolved,
        aborted = summary.aborted,
        "Input closed"
    );

    if let Some(path) = &config.html_out {
        let html = render_page(&config.page.title, &config.host_bindings(), &window);
        tokio::fs::write(path, html).await?;
        info!(
            name: "chat.page.written",
            path = %path.display(),
            messages = window.len(),
            "Conversation snapshot written"
        );
    }

    Ok(())
}
