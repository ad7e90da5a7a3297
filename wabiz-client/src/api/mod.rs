//! Typed client for the messaging backend's REST API.
//!
//! Each resource lives in its own module as an `impl ApiClient` block. All
//! calls return `Result<T, ApiError>`; authenticated ones take the caller's
//! [`Session`](crate::session::Session).

pub mod auth;
pub mod companies;
pub mod contacts;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::new(&settings.base_url, settings.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    pub(crate) fn authorized(
        &self,
        method: Method,
        path: &str,
        session: &Session,
    ) -> Result<RequestBuilder, ApiError> {
        let token = session.require_token()?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    /// Sends the request and decodes a JSON success body.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends the request and ignores whatever success body comes back.
    pub(crate) async fn send_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", self.base_url, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), &body);
            tracing::warn!(
                status = status.as_u16(),
                kind = err.kind(),
                "{} failed: {}",
                url,
                err
            );
            return Err(err);
        }

        tracing::debug!(status = status.as_u16(), "{} succeeded", url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let api = client("http://localhost:3001/api/");
        assert_eq!(api.base_url(), "http://localhost:3001/api");
        assert_eq!(api.url("/contacts/import"), "http://localhost:3001/api/contacts/import");
        assert_eq!(api.url("auth/me"), "http://localhost:3001/api/auth/me");
    }

    #[test]
    fn test_authorized_needs_token() {
        let api = client("http://localhost:3001/api");
        let err = api
            .authorized(Method::GET, "/companies", &Session::default())
            .unwrap_err();
        assert_eq!(err, ApiError::NoSession);
    }

    #[test]
    fn test_authorized_sets_bearer_header() {
        let api = client("http://localhost:3001/api");
        let session = Session {
            access_token: Some("token-1".to_string()),
            ..Default::default()
        };

        let request = api
            .authorized(Method::GET, "/companies", &session)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:3001/api/companies");
        assert_eq!(
            request.headers()["authorization"].to_str().unwrap(),
            "Bearer token-1"
        );
    }

    #[derive(Debug, serde::Deserialize)]
    struct Ping {
        ok: bool,
    }

    #[tokio::test]
    async fn test_send_decodes_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let ping: Ping = api.send(api.request(Method::GET, "/ping")).await.unwrap();
        assert!(ping.ok);
    }

    #[tokio::test]
    async fn test_send_maps_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forbidden"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "message": "Not a member of this company" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/invalid"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": ["phone must be a string"],
                "error": "Unprocessable Entity"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
            .mount(&server)
            .await;

        let api = client(&server.uri());

        let err = api
            .send::<Ping>(api.request(Method::GET, "/forbidden"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Forbidden("Not a member of this company".to_string()));

        let err = api
            .send::<Ping>(api.request(Method::GET, "/invalid"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.message(), "phone must be a string");

        let err = api
            .send::<Ping>(api.request(Method::GET, "/broken"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 500,
                message: "database unavailable".to_string()
            }
        );

        // No mock for this path, wiremock answers 404 with an empty body
        let err = api
            .send::<Ping>(api.request(Method::GET, "/missing"))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound("Not Found".to_string()));
    }

    #[tokio::test]
    async fn test_send_rejects_unexpected_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let api = client(&server.uri());
        let err = api
            .send::<Ping>(api.request(Method::GET, "/ping"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[tokio::test]
    async fn test_send_unit_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/things/1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/things/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server.uri());
        api.send_unit(api.request(Method::DELETE, "/things/1"))
            .await
            .unwrap();
        api.send_unit(api.request(Method::DELETE, "/things/2"))
            .await
            .unwrap();

        let err = api
            .send_unit(api.request(Method::DELETE, "/things/3"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let api = client("http://127.0.0.1:1");
        let err = api
            .send::<Ping>(api.request(Method::GET, "/ping"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
