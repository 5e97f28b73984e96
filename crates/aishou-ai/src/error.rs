use thiserror::Error;

use crate::decode::DecodeError;

/// Longest slice of a service error body carried into the user-facing message.
const MAX_BODY_CHARS: usize = 200;

/// Why a fortune request failed. Every variant is recoverable: the caller
/// shows [`user_message`](Self::user_message) and returns to idle.
#[derive(Debug, Error)]
pub enum FortuneError {
    #[error("could not reach the fortune service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fortune service returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("fortune service declined to answer ({0})")]
    Blocked(String),

    #[error("fortune service returned an empty reply")]
    EmptyReply,

    #[error("could not read the fortune reply: {0}")]
    Decode(#[from] DecodeError),
}

impl FortuneError {
    pub fn server(status: u16, body: &str) -> Self {
        Self::Server {
            status,
            body: truncate(body.trim()),
        }
    }

    /// One-line message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => "Could not reach the fortune service. Check your connection and try again.".to_string(),
            Self::Server { status: 401 | 403, .. } => {
                "The fortune service rejected the API key. Check GEMINI_API_KEY.".to_string()
            }
            Self::Server { status: 429, .. } => {
                "The fortune service is busy right now. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let cut: String = body.chars().take(MAX_BODY_CHARS).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_body_is_truncated() {
        let long = "x".repeat(500);
        let FortuneError::Server { body, .. } = FortuneError::server(500, &long) else {
            panic!("expected server error");
        };
        assert_eq!(body.chars().count(), MAX_BODY_CHARS + 1);
        assert!(body.ends_with('…'));
    }

    #[test]
    fn auth_failures_get_a_key_hint() {
        let msg = FortuneError::server(403, "denied").user_message();
        assert!(msg.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn other_statuses_pass_through() {
        let msg = FortuneError::server(500, "internal").user_message();
        assert_eq!(msg, "fortune service returned 500: internal");
    }
}
