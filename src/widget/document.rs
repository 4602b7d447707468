//! In-memory host document.
//!
//! [`TextInput`] and [`ChatWindow`] stand in for the page's input element
//! and message container. Both are cheap `Clone` handles over shared state,
//! so the host can keep one handle while the widget holds another.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use super::host::{InputField, MessageList, NodeId};
use super::message::Role;
use super::render;

/// Default viewport height of a [`ChatWindow`], in lines.
pub const DEFAULT_VIEWPORT_LINES: usize = 20;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

// ─────────────────────────────────────────────────────────────────────────────
// Text input
// ─────────────────────────────────────────────────────────────────────────────

/// Shared text input value.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: Arc<RwLock<String>>,
}

impl TextInput {
    /// Create an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value, as if the user typed it.
    pub fn set_value(&self, value: impl Into<String>) {
        *write(&self.value) = value.into();
    }
}

impl InputField for TextInput {
    fn value(&self) -> String {
        read(&self.value).clone()
    }

    fn clear(&self) {
        write(&self.value).clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Message container
// ─────────────────────────────────────────────────────────────────────────────

/// One rendered entry in a [`ChatWindow`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: NodeId,
    pub role: Role,
    /// Current content as plain text.
    pub text: String,
}

impl Entry {
    /// Rendered HTML for this entry.
    pub fn html(&self) -> String {
        render::message_html(self.role, &self.text)
    }

    /// Visual lines the content occupies.
    pub fn lines(&self) -> usize {
        render::line_count(&self.text)
    }
}

#[derive(Debug)]
struct WindowState {
    entries: Vec<Entry>,
    next_id: u64,
    client_height: usize,
    scroll_top: usize,
}

impl WindowState {
    fn scroll_height(&self) -> usize {
        self.entries.iter().map(Entry::lines).sum()
    }

    fn max_scroll_top(&self) -> usize {
        self.scroll_height().saturating_sub(self.client_height)
    }
}

/// Scrolling message container.
#[derive(Debug, Clone)]
pub struct ChatWindow {
    state: Arc<RwLock<WindowState>>,
}

impl Default for ChatWindow {
    fn default() -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT_LINES)
    }
}

impl ChatWindow {
    /// Create an empty window with the default viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty window showing `client_height` lines at once.
    #[must_use]
    pub fn with_viewport(client_height: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(WindowState {
                entries: Vec::new(),
                next_id: 1,
                client_height,
                scroll_top: 0,
            })),
        }
    }

    /// Snapshot of every entry, oldest first.
    pub fn entries(&self) -> Vec<Entry> {
        read(&self.state).entries.clone()
    }

    /// Look up a single entry.
    pub fn entry(&self, node: NodeId) -> Option<Entry> {
        read(&self.state)
            .entries
            .iter()
            .find(|e| e.id == node)
            .cloned()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        read(&self.state).entries.len()
    }

    /// Whether the window has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total content height, in lines.
    pub fn scroll_height(&self) -> usize {
        read(&self.state).scroll_height()
    }

    /// Viewport height, in lines.
    pub fn client_height(&self) -> usize {
        read(&self.state).client_height
    }

    /// Current scroll offset, in lines.
    pub fn scroll_top(&self) -> usize {
        read(&self.state).scroll_top
    }

    /// Scroll to an arbitrary offset, clamped to the valid range.
    pub fn scroll_to(&self, offset: usize) {
        let mut state = write(&self.state);
        state.scroll_top = offset.min(state.max_scroll_top());
    }

    /// Whether the newest content is in view.
    pub fn is_scrolled_to_bottom(&self) -> bool {
        let state = read(&self.state);
        state.scroll_top == state.max_scroll_top()
    }

    /// Rendered HTML of every entry, in order.
    pub fn inner_html(&self) -> String {
        read(&self.state).entries.iter().map(Entry::html).collect()
    }
}

impl MessageList for ChatWindow {
    fn append(&self, role: Role, text: &str) -> NodeId {
        let mut state = write(&self.state);
        let id = NodeId(state.next_id);
        state.next_id += 1;
        state.entries.push(Entry {
            id,
            role,
            text: text.to_string(),
        });
        state.scroll_top = state.max_scroll_top();
        id
    }

    fn set_content(&self, node: NodeId, text: &str) -> bool {
        let mut state = write(&self.state);
        match state.entries.iter_mut().find(|e| e.id == node) {
            Some(entry) => {
                entry.text = text.to_string();
                // Shorter content can leave the offset past the end.
                state.scroll_top = state.scroll_top.min(state.max_scroll_top());
                true
            }
            None => false,
        }
    }

    fn scroll_to_bottom(&self) {
        let mut state = write(&self.state);
        state.scroll_top = state.max_scroll_top();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_round_trip() {
        let input = TextInput::new();
        input.set_value("  hello ");
        assert_eq!(input.value(), "  hello ");
        input.clear();
        assert_eq!(input.value(), "");
    }

    #[test]
    fn handles_share_state() {
        let window = ChatWindow::new();
        let other = window.clone();
        other.append(Role::User, "hi");
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let window = ChatWindow::new();
        let a = window.append(Role::User, "a");
        let b = window.append(Role::Agent, "b");
        assert!(a < b);
        assert_eq!(window.entry(b).unwrap().role, Role::Agent);
    }

    #[test]
    fn scroll_height_counts_lines() {
        let window = ChatWindow::with_viewport(2);
        window.append(Role::User, "line1\nline2");
        window.append(Role::Agent, "one");
        assert_eq!(window.scroll_height(), 3);
        assert_eq!(window.scroll_top(), 1);
        assert!(window.is_scrolled_to_bottom());
    }

    #[test]
    fn scroll_to_is_clamped() {
        let window = ChatWindow::with_viewport(1);
        window.append(Role::User, "a\nb\nc");
        window.scroll_to(0);
        assert!(!window.is_scrolled_to_bottom());
        window.scroll_to(100);
        assert_eq!(window.scroll_top(), 2);
    }

    #[test]
    fn set_content_on_unknown_node_is_rejected() {
        let window = ChatWindow::new();
        window.append(Role::User, "a");
        assert!(!window.set_content(NodeId(42), "b"));
        assert_eq!(window.entries()[0].text, "a");
    }

    #[test]
    fn shrinking_content_keeps_offset_valid() {
        let window = ChatWindow::with_viewport(1);
        let node = window.append(Role::Agent, "a\nb\nc\nd");
        assert_eq!(window.scroll_top(), 3);
        window.set_content(node, "done");
        assert_eq!(window.scroll_top(), 0);
        assert!(window.is_scrolled_to_bottom());
    }

    #[test]
    fn inner_html_renders_entries_in_order() {
        let window = ChatWindow::new();
        window.append(Role::User, "first");
        window.append(Role::Agent, "second");
        let html = window.inner_html();
        let first = html.find("first").unwrap();
        let second = html.find("second").unwrap();
        assert!(first < second);
    }
}
