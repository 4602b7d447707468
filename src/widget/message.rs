//! Chat message roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the form.
    User,
    /// The remote agent behind the chat endpoint.
    Agent,
}

impl Role {
    /// Visual marker shown next to every message of this role.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::User => "👤",
            Self::Agent => "🤖",
        }
    }

    /// CSS classes for the rendered entry.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "message user-message",
            Self::Agent => "message agent-message",
        }
    }

    /// Lowercase role name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_have_distinct_markers() {
        assert_ne!(Role::User.glyph(), Role::Agent.glyph());
        assert_eq!(Role::User.css_class(), "message user-message");
        assert_eq!(Role::Agent.to_string(), "agent");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&[Role::User, Role::Agent]).unwrap();
        assert_eq!(json, r#"["user","agent"]"#);
    }
}
