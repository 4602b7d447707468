//! The chat widget.
//!
//! [`ChatWidget`] binds to a host's input field and message list and turns
//! form submissions into exchanges with the chat endpoint.
//!
//! # Flow
//!
//! 1. [`ChatWidget::begin`] handles the submit event synchronously: it
//!    appends the user message, clears the input, appends a placeholder and
//!    opens a pending [`Exchange`].
//! 2. [`PendingExchange::resolve`] sends the prompt and overwrites the
//!    placeholder with the reply, a fallback, or an error.
//!
//! [`ChatWidget::on_submit`] runs both steps back to back. Hosts that want
//! several exchanges in flight at once call `begin` and spawn `resolve`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chat_widget::client::HttpChatClient;
//! use chat_widget::widget::{ChatWidget, ChatWindow, SubmitEvent, TextInput, WidgetSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let input = TextInput::new();
//! let window = ChatWindow::new();
//! let client = HttpChatClient::new("http://localhost:8000", "/chat")?;
//! let widget = ChatWidget::new(
//!     Arc::new(client),
//!     Arc::new(input.clone()),
//!     Arc::new(window.clone()),
//!     WidgetSettings::default(),
//! );
//!
//! input.set_value("Hello!");
//! widget.on_submit(&mut SubmitEvent::new()).await;
//! assert_eq!(window.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod exchange;
pub mod host;
pub mod message;
pub mod render;

pub use document::{ChatWindow, Entry, TextInput};
pub use exchange::{Exchange, ExchangeId, ExchangeLedger, ExchangeState, Outcome};
pub use host::{HostBindings, InputField, MessageList, NodeId, SubmitEvent};
pub use message::Role;

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::client::{ChatClient, ChatReply};
use crate::error::ChatError;

/// Default placeholder text shown while waiting on the server.
pub const DEFAULT_THINKING_TEXT: &str = "Thinking...";
/// Default text shown when the server replies without a `response`.
pub const DEFAULT_FALLBACK_TEXT: &str = "Sorry, I ran into a problem.";
/// Default prefix of the inline error message.
pub const DEFAULT_ERROR_PREFIX: &str = "Something went wrong: ";

/// Whether a new submission may start while another is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPolicy {
    /// Every submission starts its own exchange immediately.
    #[default]
    Concurrent,
    /// Submissions are refused while any exchange is pending.
    SingleFlight,
}

/// Presentation and policy knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    pub thinking_text: String,
    pub fallback_text: String,
    pub error_prefix: String,
    pub submit_policy: SubmitPolicy,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            thinking_text: DEFAULT_THINKING_TEXT.to_string(),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
            error_prefix: DEFAULT_ERROR_PREFIX.to_string(),
            submit_policy: SubmitPolicy::Concurrent,
        }
    }
}

/// Result of handling the synchronous half of a submit event.
#[derive(Debug)]
pub enum Submission {
    /// Input was empty after trimming. Nothing happened.
    Ignored,
    /// Refused because an exchange is still pending.
    Busy,
    /// Messages were appended and an exchange is waiting to be resolved.
    Started(PendingExchange),
}

/// Result of [`ChatWidget::on_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    Ignored,
    Busy,
    Resolved(Exchange),
}

/// Chat widget bound to one input field and one message list.
///
/// Cloning is cheap and yields a handle to the same widget.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    inner: Arc<WidgetInner>,
}

#[derive(Debug)]
struct WidgetInner {
    client: Arc<dyn ChatClient>,
    input: Arc<dyn InputField>,
    list: Arc<dyn MessageList>,
    ledger: ExchangeLedger,
    settings: WidgetSettings,
    /// Serializes the synchronous half of submissions.
    submit_gate: Mutex<()>,
}

impl ChatWidget {
    /// Bind a widget to its collaborators.
    pub fn new(
        client: Arc<dyn ChatClient>,
        input: Arc<dyn InputField>,
        list: Arc<dyn MessageList>,
        settings: WidgetSettings,
    ) -> Self {
        Self {
            inner: Arc::new(WidgetInner {
                client,
                input,
                list,
                ledger: ExchangeLedger::new(),
                settings,
                submit_gate: Mutex::new(()),
            }),
        }
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.inner.settings
    }

    /// Handle a submit event and wait for its exchange to resolve.
    pub async fn on_submit(&self, event: &mut SubmitEvent) -> SubmitResult {
        match self.begin(event) {
            Submission::Ignored => SubmitResult::Ignored,
            Submission::Busy => SubmitResult::Busy,
            Submission::Started(pending) => SubmitResult::Resolved(pending.resolve().await),
        }
    }

    /// Handle the synchronous half of a submit event.
    ///
    /// Always prevents the default navigation, even when the submission is
    /// ignored or refused.
    pub fn begin(&self, event: &mut SubmitEvent) -> Submission {
        event.prevent_default();

        let raw = self.inner.input.value();
        let prompt = raw.trim();
        if prompt.is_empty() {
            debug!(name: "chat.submit.ignored", "Empty input, nothing to send");
            return Submission::Ignored;
        }

        let _gate = self
            .inner
            .submit_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.inner.settings.submit_policy == SubmitPolicy::SingleFlight {
            let pending = self.inner.ledger.pending_count();
            if pending > 0 {
                warn!(
                    name: "chat.submit.busy",
                    pending,
                    "Submission refused while an exchange is pending"
                );
                return Submission::Busy;
            }
        }

        self.append_message(Role::User, prompt);
        self.inner.input.clear();

        let placeholder = self.append_message(Role::Agent, &self.inner.settings.thinking_text);
        let exchange = self.inner.ledger.open(prompt, placeholder);

        info!(
            name: "chat.exchange.started",
            exchange_id = %exchange.id,
            placeholder = %placeholder,
            prompt_chars = prompt.chars().count(),
            "Exchange started"
        );

        Submission::Started(PendingExchange {
            widget: self.clone(),
            exchange,
        })
    }

    /// Append a message to the list and scroll to it.
    pub fn append_message(&self, role: Role, text: &str) -> NodeId {
        let node = self.inner.list.append(role, text);
        self.inner.list.scroll_to_bottom();
        node
    }

    /// Snapshot of every exchange, in submission order.
    pub fn exchanges(&self) -> Vec<Exchange> {
        self.inner.ledger.snapshot()
    }

    /// Look up one exchange.
    pub fn exchange(&self, id: ExchangeId) -> Option<Exchange> {
        self.inner.ledger.get(id)
    }

    /// Number of exchanges still waiting on the server.
    pub fn pending_count(&self) -> usize {
        self.inner.ledger.pending_count()
    }

    /// Remove and return resolved exchange records.
    pub fn drain_resolved(&self) -> Vec<Exchange> {
        self.inner.ledger.drain_resolved()
    }

    fn outcome_for(&self, result: Result<ChatReply, ChatError>) -> (Outcome, String) {
        let settings = &self.inner.settings;
        match result {
            Ok(reply) => match reply.text() {
                Some(text) => (
                    Outcome::Reply {
                        text: text.to_string(),
                    },
                    text.to_string(),
                ),
                None => (Outcome::Fallback, settings.fallback_text.clone()),
            },
            Err(err) => {
                let diagnostic = format!("{}{err}", settings.error_prefix);
                (
                    Outcome::Failed {
                        diagnostic: diagnostic.clone(),
                    },
                    diagnostic,
                )
            }
        }
    }

    fn finish(&self, exchange: Exchange, result: Result<ChatReply, ChatError>) -> Exchange {
        if let Err(err) = &result {
            error!(
                name: "chat.exchange.failed",
                exchange_id = %exchange.id,
                status = ?err.status(),
                error = %err,
                "Chat request failed"
            );
        }

        let (outcome, display) = self.outcome_for(result);

        if !self.inner.list.set_content(exchange.placeholder, &display) {
            warn!(
                name: "chat.placeholder.missing",
                exchange_id = %exchange.id,
                placeholder = %exchange.placeholder,
                "Placeholder no longer in the message list"
            );
        }
        self.inner.list.scroll_to_bottom();

        let elapsed_ms = (Utc::now() - exchange.started_at).num_milliseconds();
        info!(
            name: "chat.exchange.resolved",
            exchange_id = %exchange.id,
            failed = outcome.is_failure(),
            elapsed_ms,
            "Exchange resolved"
        );

        match self.inner.ledger.resolve(exchange.id, outcome.clone()) {
            Some(resolved) => resolved,
            None => Exchange {
                state: ExchangeState::Resolved {
                    outcome,
                    resolved_at: Utc::now(),
                },
                ..exchange
            },
        }
    }
}

/// An exchange whose placeholder is on screen but whose request has not
/// been sent yet.
#[derive(Debug)]
pub struct PendingExchange {
    widget: ChatWidget,
    exchange: Exchange,
}

impl PendingExchange {
    pub fn id(&self) -> ExchangeId {
        self.exchange.id
    }

    pub fn placeholder(&self) -> NodeId {
        self.exchange.placeholder
    }

    pub fn prompt(&self) -> &str {
        &self.exchange.prompt
    }

    /// Send the prompt and overwrite the placeholder with the result.
    pub async fn resolve(self) -> Exchange {
        let result = self.widget.inner.client.send(&self.exchange.prompt).await;
        self.widget.finish(self.exchange, result)
    }
}
