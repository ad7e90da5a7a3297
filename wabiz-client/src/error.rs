use reqwest::StatusCode;
use shared_types::ErrorResponse;

/// Failure of a backend call, classified at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Rejected input. `status` is `None` when the check failed locally,
    /// before any request was sent.
    #[error("{message}")]
    Validation { status: Option<u16>, message: String },

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("Not logged in. Run `wabiz login` first.")]
    NoSession,

    #[error("No company selected. Run `wabiz use-company <ID>` first.")]
    NoCompany,
}

impl ApiError {
    /// Builds an error from a non-success status and its raw response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message(status, body);

        match status {
            400 | 422 => Self::Validation {
                status: Some(status),
                message,
            },
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Server { status, message },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Validation { .. } => "validation",
            Self::Conflict(_) => "conflict",
            Self::Server { .. } => "server",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::NoSession => "no_session",
            Self::NoCompany => "no_company",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::Validation { status, .. } => *status,
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        if let Some(text) = parsed.text() {
            return text;
        }
    }

    let raw = body.trim();
    // JSON bodies that carry no usable text fall through to the reason phrase
    if !raw.is_empty() && !raw.starts_with('{') {
        return raw.to_string();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}
