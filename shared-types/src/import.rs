use serde::{Deserialize, Serialize};

/// Structural failures that stop a CSV import before any row is read.
///
/// Display strings are shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("CSV file is empty.")]
    EmptyInput,

    #[error("CSV must contain a header row and at least one data row.")]
    MissingDataRows,

    #[error("Missing required column: {0}")]
    MissingRequiredColumn(String),
}

/// Error body returned by the backend. `message` is a single string for most
/// failures and a list of strings for request validation failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: Option<ErrorMessage>,
    pub error: Option<String>,
    pub status_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

impl ErrorResponse {
    /// Best human-readable text in the body, if any.
    pub fn text(&self) -> Option<String> {
        let message = match &self.message {
            Some(ErrorMessage::Single(message)) => message.trim().to_string(),
            Some(ErrorMessage::Many(messages)) => messages
                .iter()
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            None => String::new(),
        };

        if !message.is_empty() {
            return Some(message);
        }

        self.error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_messages() {
        assert_eq!(ImportError::EmptyInput.to_string(), "CSV file is empty.");
        assert_eq!(
            ImportError::MissingDataRows.to_string(),
            "CSV must contain a header row and at least one data row."
        );
        assert_eq!(
            ImportError::MissingRequiredColumn("phone".to_string()).to_string(),
            "Missing required column: phone"
        );
    }

    #[test]
    fn test_error_response_text() {
        let single: ErrorResponse =
            serde_json::from_str(r#"{"message":"Invalid credentials","statusCode":401}"#).unwrap();
        assert_eq!(single.text(), Some("Invalid credentials".to_string()));
        assert_eq!(single.status_code, Some(401));

        let many: ErrorResponse = serde_json::from_str(
            r#"{"message":["phone must be a string","email must be an email"],"error":"Bad Request"}"#,
        )
        .unwrap();
        assert_eq!(
            many.text(),
            Some("phone must be a string, email must be an email".to_string())
        );

        let fallback: ErrorResponse = serde_json::from_str(r#"{"error":"Conflict"}"#).unwrap();
        assert_eq!(fallback.text(), Some("Conflict".to_string()));

        assert_eq!(ErrorResponse::default().text(), None);
    }
}
