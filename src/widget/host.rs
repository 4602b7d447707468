//! Host page contract.
//!
//! The widget never owns the page. It is handed a text input and a message
//! container by the host and mutates them through these traits.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::message::Role;

/// Default id of the host form.
pub const DEFAULT_FORM_ID: &str = "message-form";
/// Default id of the host text input.
pub const DEFAULT_INPUT_ID: &str = "message-input";
/// Default id of the host message container.
pub const DEFAULT_CONTAINER_ID: &str = "chat-window";

/// Identifier of a rendered entry inside a [`MessageList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Stable element ids the host page exposes to the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBindings {
    pub form_id: String,
    pub input_id: String,
    pub container_id: String,
}

impl Default for HostBindings {
    fn default() -> Self {
        Self {
            form_id: DEFAULT_FORM_ID.to_string(),
            input_id: DEFAULT_INPUT_ID.to_string(),
            container_id: DEFAULT_CONTAINER_ID.to_string(),
        }
    }
}

/// A form submission dispatched by the host.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    /// Create a fresh submit event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the host from running its default navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler suppressed the default navigation.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// The text input bound to the form.
pub trait InputField: Send + Sync + fmt::Debug {
    /// Current raw value.
    fn value(&self) -> String;

    /// Reset the value to empty.
    fn clear(&self);
}

/// The scrolling container messages are appended to.
pub trait MessageList: Send + Sync + fmt::Debug {
    /// Append an entry as the last child and return its id.
    fn append(&self, role: Role, text: &str) -> NodeId;

    /// Replace the content region of an existing entry.
    ///
    /// Returns `false` if `node` is not in the list.
    fn set_content(&self, node: NodeId, text: &str) -> bool;

    /// Scroll to the maximum offset so the newest entry is visible.
    fn scroll_to_bottom(&self);
}
