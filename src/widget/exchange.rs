//! Per-submission exchange records.
//!
//! Each accepted submission gets its own [`Exchange`], keyed by
//! [`ExchangeId`] and bound to the placeholder entry it will overwrite.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::host::NodeId;

/// Unique identifier of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExchangeId(Uuid);

impl ExchangeId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How an exchange ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The server replied with non-empty text.
    Reply { text: String },
    /// The server succeeded but sent no text.
    Fallback,
    /// The request failed; `diagnostic` is what the user was shown.
    Failed { diagnostic: String },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Lifecycle of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExchangeState {
    Pending,
    Resolved {
        outcome: Outcome,
        resolved_at: DateTime<Utc>,
    },
}

/// One user submission and its round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub id: ExchangeId,
    pub prompt: String,
    /// Placeholder entry this exchange owns.
    pub placeholder: NodeId,
    pub started_at: DateTime<Utc>,
    pub state: ExchangeState,
}

impl Exchange {
    fn new(prompt: String, placeholder: NodeId) -> Self {
        Self {
            id: ExchangeId::new(),
            prompt,
            placeholder,
            started_at: Utc::now(),
            state: ExchangeState::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, ExchangeState::Pending)
    }

    /// Outcome, once resolved.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            ExchangeState::Pending => None,
            ExchangeState::Resolved { outcome, .. } => Some(outcome),
        }
    }
}

/// Shared record of every exchange, in submission order.
#[derive(Debug, Clone, Default)]
pub struct ExchangeLedger {
    records: Arc<RwLock<Vec<Exchange>>>,
}

impl ExchangeLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a pending exchange for `prompt` owning `placeholder`.
    pub fn open(&self, prompt: impl Into<String>, placeholder: NodeId) -> Exchange {
        let exchange = Exchange::new(prompt.into(), placeholder);
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(exchange.clone());
        exchange
    }

    /// Move a pending exchange to resolved.
    ///
    /// Returns `None` if the id is unknown or already resolved.
    pub fn resolve(&self, id: ExchangeId, outcome: Outcome) -> Option<Exchange> {
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let record = guard.iter_mut().find(|e| e.id == id && e.is_pending())?;
        record.state = ExchangeState::Resolved {
            outcome,
            resolved_at: Utc::now(),
        };
        Some(record.clone())
    }

    /// Look up one exchange.
    pub fn get(&self, id: ExchangeId) -> Option<Exchange> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// Snapshot of all exchanges.
    pub fn snapshot(&self) -> Vec<Exchange> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of exchanges still waiting on the server.
    pub fn pending_count(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.is_pending())
            .count()
    }

    /// Remove and return every resolved exchange.
    pub fn drain_resolved(&self) -> Vec<Exchange> {
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let (resolved, pending): (Vec<_>, Vec<_>) =
            guard.drain(..).partition(|e| !e.is_pending());
        *guard = pending;
        resolved
    }
}
