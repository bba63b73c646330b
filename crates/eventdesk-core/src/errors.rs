/// Failures of a single call against the events resource.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, reset mid-body, timeout.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
    /// The body could not be decoded.
    #[error("format error: {0}")]
    Format(String),
}

impl ApiError {
    /// Short classification string for log fields.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::Format(_) => "format",
        }
    }

    /// Build the error for a non-success status.
    pub fn from_status(status: u16, body: String) -> Self {
        Self::Server { status, body }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Format(e.to_string())
    }
}
