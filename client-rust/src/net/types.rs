//! Error types for engine operations.

/// Errors produced while talking to the state engine.
///
/// Every variant is caught where the request was issued and folded into an
/// `ErrorState`; none of them propagate into rendering.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The request never produced a response (unreachable host, timeout,
    /// body read failure).
    #[error("engine request failed: {0}")]
    Transport(String),

    /// The engine answered with a non-success HTTP status. `body` is kept
    /// for debugging and is not meant for end users.
    #[error("engine returned status {status}")]
    Protocol { status: u16, body: String },

    /// The response body was not the expected amplitude JSON.
    #[error("engine response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl EngineError {
    /// Stable label for logs and structured output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol { .. } => "protocol",
            Self::Decode(_) => "decode",
            Self::HttpClientBuild(_) => "client_build",
        }
    }

    /// Short text suitable for display next to the state expression.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Network response was not ok: engine unreachable".to_owned(),
            Self::Protocol { status, .. } => format!("Network response was not ok: HTTP {status}"),
            Self::Decode(_) => "Engine sent an unexpected response".to_owned(),
            Self::HttpClientBuild(_) => "HTTP client unavailable".to_owned(),
        }
    }

    /// Diagnostic payload, if the engine sent one.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Protocol { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

impl From<wire::WireError> for EngineError {
    fn from(e: wire::WireError) -> Self {
        Self::Decode(e.to_string())
    }
}
