use reqwest::Method;
use serde::Serialize;
use shared_types::{
    CompanyContactRequest, Contact, ContactPayload, ContactRecord, ImportContactsRequest,
    ImportContactsResponse, PaginatedContacts,
};

use super::ApiClient;
use crate::error::ApiError;
use crate::session::Session;

pub const EMPTY_IMPORT_MESSAGE: &str = "No contacts to import. Please upload a CSV file.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompanyQuery<'a> {
    company_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

impl<'a> CompanyQuery<'a> {
    fn new(company_id: &'a str) -> Self {
        Self {
            company_id,
            page: None,
            limit: None,
        }
    }
}

impl ApiClient {
    pub async fn list_contacts(
        &self,
        session: &Session,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedContacts, ApiError> {
        let query = CompanyQuery {
            page: Some(page),
            limit: Some(limit),
            ..CompanyQuery::new(session.require_company()?)
        };

        self.send(
            self.authorized(Method::GET, "/contacts", session)?
                .query(&query),
        )
        .await
    }

    pub async fn create_contact(
        &self,
        session: &Session,
        contact: &ContactPayload,
    ) -> Result<Contact, ApiError> {
        let body = CompanyContactRequest {
            company_id: session.require_company()?.to_string(),
            contact: contact.clone(),
        };

        self.send(self.authorized(Method::POST, "/contacts", session)?.json(&body))
            .await
    }

    pub async fn update_contact(
        &self,
        session: &Session,
        id: &str,
        contact: &ContactPayload,
    ) -> Result<Contact, ApiError> {
        let body = CompanyContactRequest {
            company_id: session.require_company()?.to_string(),
            contact: contact.clone(),
        };

        self.send(
            self.authorized(Method::PATCH, &format!("/contacts/{id}"), session)?
                .json(&body),
        )
        .await
    }

    pub async fn delete_contact(&self, session: &Session, id: &str) -> Result<(), ApiError> {
        let query = CompanyQuery::new(session.require_company()?);

        self.send_unit(
            self.authorized(Method::DELETE, &format!("/contacts/{id}"), session)?
                .query(&query),
        )
        .await
    }

    /// Submits a decoded CSV batch to the bulk import endpoint.
    ///
    /// An empty batch is rejected locally without a request.
    pub async fn import_contacts(
        &self,
        session: &Session,
        records: Vec<ContactRecord>,
    ) -> Result<ImportContactsResponse, ApiError> {
        if records.is_empty() {
            return Err(ApiError::Validation {
                status: None,
                message: EMPTY_IMPORT_MESSAGE.to_string(),
            });
        }

        let body = ImportContactsRequest {
            company_id: session.require_company()?.to_string(),
            contacts: records.into_iter().map(ContactPayload::from).collect(),
        };

        tracing::info!(
            company_id = %body.company_id,
            contacts = body.contacts.len(),
            "Importing contacts"
        );

        self.send(
            self.authorized(Method::POST, "/contacts/import", session)?
                .json(&body),
        )
        .await
    }
}
