use serde::{Deserialize, Serialize};
use shared_types::{SessionUser, TokenPair};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to replace session file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Logged-in user, tokens and the company the user is working in.
///
/// Passed explicitly to every authenticated call. Persisted between runs by
/// [`SessionStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<SessionUser>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub current_company: Option<String>,
}

impl Session {
    pub fn set_auth(&mut self, user: SessionUser, access_token: String, refresh_token: String) {
        self.user = Some(user);
        self.access_token = Some(access_token);
        self.refresh_token = Some(refresh_token);
    }

    pub fn set_tokens(&mut self, tokens: TokenPair) {
        self.access_token = Some(tokens.access_token);
        self.refresh_token = Some(tokens.refresh_token);
    }

    pub fn set_user(&mut self, user: SessionUser) {
        self.user = Some(user);
    }

    pub fn set_current_company(&mut self, company_id: impl Into<String>) {
        self.current_company = Some(company_id.into());
    }

    /// Picks the user's first company when none is selected yet. Returns the
    /// selected id, if any.
    pub fn select_default_company(&mut self) -> Option<&str> {
        if self.current_company.is_none() {
            self.current_company = self
                .user
                .as_ref()
                .and_then(|u| u.companies.as_ref())
                .and_then(|companies| companies.first())
                .map(|company| company.id.clone());
        }
        self.current_company.as_deref()
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn require_token(&self) -> Result<&str, ApiError> {
        self.access_token.as_deref().ok_or(ApiError::NoSession)
    }

    pub fn require_refresh_token(&self) -> Result<&str, ApiError> {
        self.refresh_token.as_deref().ok_or(ApiError::NoSession)
    }

    pub fn require_company(&self) -> Result<&str, ApiError> {
        self.current_company.as_deref().ok_or(ApiError::NoCompany)
    }
}

/// Load/save boundary between a [`Session`] and its JSON file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns an empty session when nothing has been saved yet.
    pub fn load(&self) -> Result<Session, SessionError> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        // Write next to the target and rename, so a crash never leaves half a file
        let mut temp_file = NamedTempFile::new_in(&dir)?;
        temp_file.write_all(serde_json::to_string_pretty(session)?.as_bytes())?;
        temp_file.persist(&self.path)?;

        tracing::debug!(path = %self.path.display(), "Saved session");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::debug!(path = %self.path.display(), "Removed session file");
        }
        Ok(())
    }
}

/// Shortens a token for display, keeping only its first characters.
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    let hidden = token.chars().count().saturating_sub(6);
    if hidden == 0 {
        return visible;
    }

    let masked = format!("{}{}", visible, "*".repeat(hidden));
    if masked.chars().count() > 40 {
        format!("{}...", masked.chars().take(37).collect::<String>())
    } else {
        masked
    }
}
