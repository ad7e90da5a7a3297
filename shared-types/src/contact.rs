use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One row of a contact import, as decoded from a CSV upload.
///
/// `name` and `email` are `Some` only when the header carries that column and
/// the row has a cell for it. An empty string is kept as-is here; converting
/// into a [`ContactPayload`] drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactRecord {
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub company_id: String,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub country_code: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body shared by contact create, update and bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ContactPayload {
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl From<ContactRecord> for ContactPayload {
    fn from(record: ContactRecord) -> Self {
        Self {
            phone: record.phone,
            name: record.name.filter(|name| !name.is_empty()),
            email: record.email.filter(|email| !email.is_empty()),
            country_code: None,
            tags: Some(record.tags),
        }
    }
}

/// Create and update requests carry the owning company next to the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContactRequest {
    pub company_id: String,
    #[serde(flatten)]
    pub contact: ContactPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportContactsRequest {
    pub company_id: String,
    pub contacts: Vec<ContactPayload>,
}

/// Counts reported by the backend after a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportSummary {
    pub processed: u32,
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportContactsResponse {
    pub summary: Option<ImportSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageMeta {
    pub total: u32,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaginatedContacts {
    pub data: Vec<Contact>,
    pub meta: PageMeta,
}
