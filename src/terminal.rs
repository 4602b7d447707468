//! Terminal rendering of the message list.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};

use crate::widget::{
    ChatWidget, ChatWindow, Exchange, MessageList, NodeId, Role, SubmitEvent, Submission,
    TextInput,
};

/// [`MessageList`] that keeps a [`ChatWindow`] and echoes every change to a
/// writer as `<glyph> <text>` lines.
pub struct TerminalWindow<W> {
    window: ChatWindow,
    out: Mutex<W>,
}

impl<W> fmt::Debug for TerminalWindow<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalWindow")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<W: Write> TerminalWindow<W> {
    pub fn new(window: ChatWindow, out: W) -> Self {
        Self {
            window,
            out: Mutex::new(out),
        }
    }

    /// The backing window.
    pub fn window(&self) -> &ChatWindow {
        &self.window
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn echo(&self, role: Role, text: &str) {
        if let Err(e) = self.write_lines(role, text) {
            tracing::warn!(name: "terminal.write.failed", error = %e, "Failed to echo message");
        }
    }

    fn write_lines(&self, role: Role, text: &str) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let mut lines = text.lines();
        writeln!(out, "{} {}", role.glyph(), lines.next().unwrap_or_default())?;
        // Continuation lines are indented under the glyph.
        for line in lines {
            writeln!(out, "   {line}")?;
        }
        out.flush()
    }
}

impl<W: Write + Send> MessageList for TerminalWindow<W> {
    fn append(&self, role: Role, text: &str) -> NodeId {
        let node = self.window.append(role, text);
        self.echo(role, text);
        node
    }

    fn set_content(&self, node: NodeId, text: &str) -> bool {
        let Some(entry) = self.window.entry(node) else {
            return false;
        };
        let updated = self.window.set_content(node, text);
        if updated {
            self.echo(entry.role, text);
        }
        updated
    }

    fn scroll_to_bottom(&self) {
        self.window.scroll_to_bottom();
    }
}

/// What happened while driving the widget from a line source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveSummary {
    /// Exchanges that were started.
    pub started: usize,
    /// Exchanges whose task ran to completion.
    pub resolved: usize,
    /// Exchange tasks that panicked or were cancelled.
    pub aborted: usize,
}

impl DriveSummary {
    fn record(&mut self, result: Result<Exchange, JoinError>) {
        match result {
            Ok(_) => self.resolved += 1,
            Err(e) => {
                self.aborted += 1;
                tracing::error!(
                    name: "chat.exchange.aborted",
                    error = %e,
                    "Exchange task did not complete"
                );
            }
        }
    }
}

/// Submit every line of `source` through `widget` as if typed into `input`.
///
/// Exchanges resolve concurrently on spawned tasks. Returns once the source
/// is exhausted and every exchange task has finished.
pub async fn drive_lines<R>(
    widget: &ChatWidget,
    input: &TextInput,
    source: R,
) -> io::Result<DriveSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = source.lines();
    let mut tasks = JoinSet::new();
    let mut summary = DriveSummary::default();

    while let Some(line) = lines.next_line().await? {
        input.set_value(line);
        if let Submission::Started(pending) = widget.begin(&mut SubmitEvent::new()) {
            summary.started += 1;
            tasks.spawn(pending.resolve());
        }
        while let Some(result) = tasks.try_join_next() {
            summary.record(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        summary.record(result);
    }
    Ok(summary)
}
