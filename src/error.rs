//! Error types for the chat exchange.

use thiserror::Error;

/// Why an exchange with the chat endpoint failed.
///
/// Every variant is shown to the user inline on the placeholder message,
/// so the `Display` output doubles as the user-facing diagnostic.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The endpoint answered with a non-success status code.
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The request never completed normally.
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The success body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The configured base URL and endpoint do not form a valid URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ChatError {
    /// HTTP status code, if the failure came from the server's status line.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

/// Result type alias for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_code() {
        let err = ChatError::Status { status: 500 };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn decode_error_has_no_status() {
        let err = ChatError::Decode("expected value at line 1 column 1".into());
        assert!(err.to_string().starts_with("invalid response body"));
        assert_eq!(err.status(), None);
    }
}
