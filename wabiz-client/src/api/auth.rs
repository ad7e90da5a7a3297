use reqwest::Method;
use shared_types::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, SessionUser, TokenPair,
};
use std::future::Future;

use super::ApiClient;
use crate::error::ApiError;
use crate::session::Session;

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.send(self.request(Method::POST, "/auth/register").json(request))
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.send(self.request(Method::POST, "/auth/login").json(request))
            .await
    }

    pub async fn profile(&self, session: &Session) -> Result<SessionUser, ApiError> {
        self.send(self.authorized(Method::GET, "/auth/me", session)?)
            .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.send(self.request(Method::POST, "/auth/refresh").json(&body))
            .await
    }

    /// Exchanges the session's refresh token for a new token pair and stores
    /// it in the session.
    pub async fn refresh_session(&self, session: &mut Session) -> Result<(), ApiError> {
        let tokens = self.refresh_token(session.require_refresh_token()?).await?;
        session.set_tokens(tokens);
        tracing::info!("Refreshed access token");
        Ok(())
    }

    /// Runs `call`, and when it is rejected as unauthorized, refreshes the
    /// session once and runs it again. A second rejection is returned as is.
    ///
    /// `call` gets its own client and session snapshot so the future it
    /// returns can own them.
    pub async fn with_refresh<T, F, Fut>(&self, session: &mut Session, call: F) -> Result<T, ApiError>
    where
        F: Fn(ApiClient, Session) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match call(self.clone(), session.clone()).await {
            Err(ApiError::Unauthorized(message)) if session.refresh_token.is_some() => {
                tracing::debug!("Access token rejected ({}), refreshing", message);
                self.refresh_session(session).await?;
                call(self.clone(), session.clone()).await
            }
            other => other,
        }
    }

    pub async fn verify_email(&self, token: &str) -> Result<serde_json::Value, ApiError> {
        self.send(
            self.request(Method::GET, "/auth/verify-email")
                .query(&[("token", token)]),
        )
        .await
    }
}
