use reqwest::Method;
use shared_types::{Company, CreateCompanyRequest};

use super::ApiClient;
use crate::error::ApiError;
use crate::session::Session;

impl ApiClient {
    pub async fn list_companies(&self, session: &Session) -> Result<Vec<Company>, ApiError> {
        self.send(self.authorized(Method::GET, "/companies", session)?)
            .await
    }

    pub async fn get_company(&self, session: &Session, id: &str) -> Result<Company, ApiError> {
        self.send(self.authorized(Method::GET, &format!("/companies/{id}"), session)?)
            .await
    }

    pub async fn create_company(
        &self,
        session: &Session,
        request: &CreateCompanyRequest,
    ) -> Result<Company, ApiError> {
        self.send(
            self.authorized(Method::POST, "/companies", session)?
                .json(request),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> Session {
        Session {
            access_token: Some("token".to_string()),
            ..Default::default()
        }
    }

    fn company_body(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Acme",
            "slug": "acme",
            "logo": null,
            "timezone": "UTC",
            "locale": "en",
            "whatsappConnected": true,
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z"
        })
    }

    #[tokio::test]
    async fn test_list_companies_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies"))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([company_body("c1")])))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let companies = api.list_companies(&session()).await.unwrap();

        assert_eq!(companies.len(), 1);
        assert!(companies[0].whatsapp_connected);
    }

    #[tokio::test]
    async fn test_get_company_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/companies/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(company_body("c1")))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let company = api.get_company(&session(), "c1").await.unwrap();
        assert_eq!(company.slug, "acme");
    }

    #[tokio::test]
    async fn test_create_company_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/companies"))
            .and(body_json(json!({ "name": "Acme", "slug": "acme", "timezone": "UTC" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(company_body("c2")))
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let company = api
            .create_company(
                &session(),
                &CreateCompanyRequest {
                    name: "Acme".to_string(),
                    slug: "acme".to_string(),
                    timezone: Some("UTC".to_string()),
                    locale: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(company.id, "c2");
    }

    #[tokio::test]
    async fn test_company_calls_need_session() {
        let api = ApiClient::new("http://localhost:3001/api", Duration::from_secs(5)).unwrap();
        let err = api.list_companies(&Session::default()).await.unwrap_err();
        assert_eq!(err, ApiError::NoSession);
    }
}
